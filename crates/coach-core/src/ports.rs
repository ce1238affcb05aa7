//! Port traits — the hexagonal architecture boundary.
//!
//! These traits are defined here in `coach-core` (pure Rust).
//! Implementations live in `coach-platform` (browser adapters).
//! The core never imports platform code; it only depends on these traits.

use async_trait::async_trait;
use coach_types::{
    Result,
    message::Message,
    session::{SessionGrant, SessionSummary, SessionType},
    turn::ChatTurn,
};

// ─── Conversation Port ───────────────────────────────────────

/// One outgoing turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnRequest {
    pub user_id: String,
    pub thread_id: String,
    pub message: String,
    pub session_type: SessionType,
}

/// The remote conversational backend.
///
/// Every call may take seconds (the backend runs a multi-step pipeline per
/// turn) and may fail outright. Retries are not this trait's business.
#[async_trait(?Send)]
pub trait ConversationPort {
    /// Resolve the device's current thread, creating one if needed.
    /// With `force_new == false` this must never create a duplicate thread.
    async fn resolve_or_create_session(&self, user_id: &str, force_new: bool) -> Result<SessionGrant>;

    /// Send one message and wait for the agent's reply
    async fn send_turn(&self, req: TurnRequest) -> Result<ChatTurn>;

    /// All threads known for this device, newest first
    async fn list_sessions(&self, user_id: &str) -> Result<Vec<SessionSummary>>;

    /// Full transcript of a thread
    async fn get_transcript(&self, user_id: &str, thread_id: &str) -> Result<Vec<Message>>;

    /// Archive the running program and start a fresh WEEKLY thread at week 1
    async fn reset_program(&self, user_id: &str) -> Result<SessionGrant>;
}

// ─── Storage Port ────────────────────────────────────────────

#[async_trait(?Send)]
pub trait StoragePort {
    /// Get a value by key
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Set a value
    async fn set(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Delete a value
    async fn delete(&self, key: &str) -> Result<()>;

    /// Check if a key exists
    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.get(key).await?.is_some())
    }

    /// Name of this backend (for logging/debug)
    fn backend_name(&self) -> &str;
}

// ─── Timer Port ──────────────────────────────────────────────

/// Delays for cosmetic schedules. Dropping the returned future cancels it.
#[async_trait(?Send)]
pub trait TimerPort {
    async fn sleep(&self, ms: u64);
}
