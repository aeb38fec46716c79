//! Content-change pipeline: parse, extract, reconcile.

use tracing::debug;

use crate::state::layout::TemplateVariable;

use super::extract::extract_variables;
use super::parser::{self, Ast};
use super::reconcile::reconcile;

/// Runs on every observed content change and owns the most recent tree
/// that parsed successfully. Malformed content keeps the previous tree;
/// mid-keystroke states are expected, so no error reaches the user.
#[derive(Debug, Clone, Default)]
pub struct ContentPipeline {
    ast: Ast,
}

impl ContentPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `content` and, on success, returns `current` reconciled with
    /// the variables the new tree references. Returns `None` when the
    /// content does not parse; the caller leaves its variable list alone.
    pub fn content_changed(
        &mut self,
        content: &str,
        current: &[TemplateVariable],
    ) -> Option<Vec<TemplateVariable>> {
        match parser::parse(content) {
            Ok(ast) => {
                self.ast = ast;
                Some(reconcile(&extract_variables(&self.ast), current))
            }
            Err(err) => {
                debug!(%err, "content kept previous tree");
                None
            }
        }
    }

    /// Most recent tree that parsed; the empty document before any did.
    pub fn ast(&self) -> &Ast {
        &self.ast
    }
}
