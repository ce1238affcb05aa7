use std::cell::RefCell;
use coach_types::session::SessionSummary;

/// Cached thread list backing the history drawer.
/// Only ever replaced wholesale.
#[derive(Default)]
pub struct ThreadDirectory {
    sessions: RefCell<Vec<SessionSummary>>,
}

impl ThreadDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn list(&self) -> Vec<SessionSummary> {
        self.sessions.borrow().clone()
    }

    pub fn find_by_id(&self, id: &str) -> Option<SessionSummary> {
        self.sessions
            .borrow()
            .iter()
            .find(|s| s.session_id == id)
            .cloned()
    }

    pub fn replace(&self, sessions: Vec<SessionSummary>) {
        *self.sessions.borrow_mut() = sessions;
    }

    pub fn len(&self) -> usize {
        self.sessions.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.borrow().is_empty()
    }
}
