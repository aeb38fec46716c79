use crossterm::event::{KeyEvent, MouseEvent};

use crate::error::AppError;
use crate::state::editor::EditorIntent;
use crate::state::layout::Layout;

#[derive(Debug)]
pub enum Event {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Tick,
    Resize(u16, u16),
    Api(ApiEvent),
}

/// Completions posted by the spawned API tasks. Fetch and submit carry
/// the editor session they were started for so stale ones can be dropped.
#[derive(Debug)]
pub enum ApiEvent {
    LayoutsListed(Result<Vec<Layout>, AppError>),
    LayoutFetched {
        session: u64,
        result: Result<Option<Layout>, AppError>,
    },
    SubmitCompleted {
        session: u64,
        intent: EditorIntent,
        result: Result<Layout, AppError>,
    },
}
