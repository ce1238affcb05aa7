use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::message::Message;

/// Assignment handed out at the end of a weekly session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Homework {
    pub description: String,
    #[serde(default)]
    pub examples: Vec<String>,
}

/// Homework as persisted for the daily reminder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredHomework {
    pub homework: Homework,
    pub saved_at: DateTime<Utc>,
}

impl StoredHomework {
    pub fn new(homework: Homework) -> Self {
        Self { homework, saved_at: Utc::now() }
    }

    pub fn saved_on(&self, date: NaiveDate) -> bool {
        self.saved_at.date_naive() == date
    }
}

/// Normalized result of one send/receive exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    pub assistant_message: Message,
    pub is_session_ended: bool,
    pub current_week: u32,
    pub week_title: Option<String>,
    pub week_goals: Vec<String>,
    pub homework: Option<Homework>,
}

impl ChatTurn {
    /// A turn with just a reply; the remaining fields mean "no update".
    pub fn reply(text: impl Into<String>, current_week: u32) -> Self {
        Self {
            assistant_message: Message::assistant(text),
            is_session_ended: false,
            current_week,
            week_title: None,
            week_goals: Vec::new(),
            homework: None,
        }
    }
}
