//! The thread that outgoing messages are written to.
//!
//! In-memory only: a restarted process starts empty and the coordinator
//! re-derives the current thread from the server.

use std::cell::RefCell;
use coach_types::session::{CurrentThread, SessionType};

/// Passive store for the current thread, injected into the coordinator
pub trait SessionStore {
    fn current(&self) -> Option<CurrentThread>;
    fn update(&self, thread_id: &str, session_type: SessionType);
    fn clear(&self);
}

#[derive(Default)]
pub struct SessionCache {
    current: RefCell<Option<CurrentThread>>,
}

impl SessionCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for SessionCache {
    fn current(&self) -> Option<CurrentThread> {
        self.current.borrow().clone()
    }

    fn update(&self, thread_id: &str, session_type: SessionType) {
        *self.current.borrow_mut() = Some(CurrentThread {
            thread_id: thread_id.to_string(),
            session_type,
        });
    }

    fn clear(&self) {
        self.current.borrow_mut().take();
    }
}
