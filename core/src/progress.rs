//! Page completion detection.

use crate::visit::VisitBoard;

/// Watches a page's visit board and fires once when every word is complete.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageProgress {
    completed: bool,
}

impl PageProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check the board after a mutation.
    ///
    /// Returns true exactly once per page: on the first observation where all
    /// words are completed. Pages without words never complete on their own.
    pub fn observe(&mut self, board: &VisitBoard) -> bool {
        if self.completed || board.is_empty() || !board.all_completed() {
            return false;
        }
        self.completed = true;
        tracing::info!(words = board.len(), "page completed");
        true
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }
}
