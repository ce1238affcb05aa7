//! Session lifecycle core for the coaching chat client.
//!
//! Everything here is single-threaded: ports are `?Send`, shared handles are
//! `Rc`, and state lives behind `RefCell`. Platform adapters implement the
//! traits in [`ports`] and are injected into the [`ConversationCoordinator`].

pub mod ports;
pub mod event_bus;
pub mod session_cache;
pub mod directory;
pub mod identity;
pub mod homework;
pub mod labels;
pub mod state;
pub mod coordinator;


pub use coordinator::{CoachPorts, ConversationCoordinator};
