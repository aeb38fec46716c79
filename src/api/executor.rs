//! Spawned tasks that run API calls and post completions back onto the
//! event channel. Nothing here touches app state; the event loop applies
//! results on the main task.

use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::event::{ApiEvent, Event};
use crate::state::editor::EditorIntent;
use crate::state::layout::LayoutPayload;

use super::client::ApiClient;

pub fn spawn_list(client: ApiClient, tx: UnboundedSender<Event>) {
    tokio::spawn(async move {
        let result = client.list_layouts().await;
        if let Err(err) = &result {
            warn!(%err, "layout list fetch failed");
        }
        let _ = tx.send(Event::Api(ApiEvent::LayoutsListed(result)));
    });
}

/// Fetches one layout for the editor session `session`. Cancelling the
/// token drops the task without posting anything; the session the result
/// was for is gone either way.
pub fn spawn_fetch(
    client: ApiClient,
    id: String,
    session: u64,
    tx: UnboundedSender<Event>,
    cancel: CancellationToken,
) {
    tokio::spawn(async move {
        let result = tokio::select! {
            res = client.get_layout(&id) => res,
            _ = cancel.cancelled() => return,
        };
        if let Err(err) = &result {
            warn!(%err, layout_id = %id, "layout fetch failed");
        }
        let _ = tx.send(Event::Api(ApiEvent::LayoutFetched { session, result }));
    });
}

pub fn spawn_submit(
    client: ApiClient,
    intent: EditorIntent,
    payload: LayoutPayload,
    session: u64,
    tx: UnboundedSender<Event>,
) {
    tokio::spawn(async move {
        let result = match &intent {
            EditorIntent::Create => client.create_layout(&payload).await,
            EditorIntent::Edit { id } => client.update_layout(id, &payload).await,
        };
        if let Err(err) = &result {
            warn!(%err, "layout submit failed");
        }
        let _ = tx.send(Event::Api(ApiEvent::SubmitCompleted {
            session,
            intent,
            result,
        }));
    });
}
