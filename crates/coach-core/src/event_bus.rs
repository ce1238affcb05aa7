//! Event bus between the coordinator and the rendering layer.
//!
//! The bus is single-threaded and uses interior mutability via RefCell.
//! Events are buffered and drained by the renderer whenever it redraws.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use coach_types::event::ChatEvent;

/// Shared event bus — clone-cheap via Rc.
#[derive(Clone)]
pub struct EventBus {
    inner: Rc<RefCell<VecDeque<ChatEvent>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(VecDeque::new())),
        }
    }

    /// Publish an event. Called by the coordinator after each state change.
    pub fn emit(&self, event: ChatEvent) {
        self.inner.borrow_mut().push_back(event);
    }

    /// Drain all pending events.
    pub fn drain(&self) -> Vec<ChatEvent> {
        self.inner.borrow_mut().drain(..).collect()
    }

    pub fn has_pending(&self) -> bool {
        !self.inner.borrow().is_empty()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
