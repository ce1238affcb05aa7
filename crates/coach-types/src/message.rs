use serde::{Deserialize, Serialize};

/// Reserved text that asks the agent for its opening turn.
/// Sent like a normal message but never rendered as a user bubble.
pub const INIT_TOKEN: &str = "__init__";

/// Who a chat bubble belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Client-side notices: errors, greetings, instructions
    Guide,
    User,
    Assistant,
}

impl Role {
    /// Map a transcript role string onto a bubble role.
    ///
    /// Matching is case-insensitive. `human` counts as user, `ai` and `bot`
    /// as assistant; anything unrecognised renders as a guide bubble.
    pub fn from_wire(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "user" | "human" => Role::User,
            "assistant" | "ai" | "bot" => Role::Assistant,
            _ => Role::Guide,
        }
    }
}

/// A single chat bubble. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub text: String,
}

impl Message {
    pub fn guide(text: impl Into<String>) -> Self {
        Self { role: Role::Guide, text: text.into() }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self { role: Role::User, text: text.into() }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self { role: Role::Assistant, text: text.into() }
    }
}

/// True when `text` is the silent initialization token.
pub fn is_init_token(text: &str) -> bool {
    text.trim() == INIT_TOKEN
}
