use serde::{Deserialize, Serialize};

/// Kind of conversation thread
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SessionType {
    /// Structured multi-week program with a week counter
    Weekly,
    /// Ad-hoc Q&A thread
    General,
}

impl SessionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionType::Weekly => "WEEKLY",
            SessionType::General => "GENERAL",
        }
    }

    /// Lenient wire parsing; the backend only ever sends the two upper-case
    /// names, anything else is treated as the weekly program.
    pub fn from_wire(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("GENERAL") {
            SessionType::General
        } else {
            SessionType::Weekly
        }
    }
}

impl Default for SessionType {
    fn default() -> Self {
        SessionType::Weekly
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Active,
    Ended,
}

impl SessionStatus {
    pub fn from_wire(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("ended") {
            SessionStatus::Ended
        } else {
            SessionStatus::Active
        }
    }
}

/// A server-side conversation thread
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub thread_id: String,
    pub session_type: SessionType,
    pub current_week: u32,
    pub status: SessionStatus,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub created_at: Option<String>,
}

impl Session {
    pub fn is_ended(&self) -> bool {
        self.status == SessionStatus::Ended
    }
}

/// Result of session-init or program reset: the session plus the
/// client-facing flags the server computed alongside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionGrant {
    pub session: Session,
    /// A WEEKLY program is still running for this device
    pub is_weekly_in_progress: bool,
    /// Greeting or notice to show before the first turn; may be empty
    #[serde(default)]
    pub display_message: String,
}

/// Summary of a thread for the history drawer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: String,
    pub title: String,
    pub date: String,
    pub session_type: SessionType,
    pub status: SessionStatus,
}

/// The thread that outgoing messages are written to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentThread {
    pub thread_id: String,
    pub session_type: SessionType,
}
