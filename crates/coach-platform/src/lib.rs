//! Browser adapters for the coach-core ports.
//!
//! - [`api`]: the conversational backend over `fetch` (gloo-net)
//! - [`storage`]: key-value backends (memory, IndexedDB)
//! - [`timer`]: `setTimeout`-backed delays

pub mod api;
pub mod storage;
pub mod timer;


pub use api::HttpConversationService;
pub use timer::BrowserTimer;
