//! Wire types for the coaching backend and their mapping onto the domain.
//!
//! The backend is lenient about optional fields (and sometimes sends
//! `null` for lists), so most response fields are `Option` here and the
//! defaults are applied while mapping.

use serde::{Deserialize, Serialize};

use coach_types::{
    message::{Message, Role},
    session::{Session, SessionGrant, SessionStatus, SessionSummary, SessionType},
    turn::{ChatTurn, Homework},
};

// ─── Requests ────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct InitSessionRequest<'a> {
    pub user_id: &'a str,
    pub force_new: bool,
}

#[derive(Debug, Serialize)]
pub struct ResetRequest<'a> {
    pub user_id: &'a str,
}

#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub user_id: &'a str,
    pub thread_id: &'a str,
    pub message: &'a str,
    pub session_type: &'static str,
}

// ─── Responses ───────────────────────────────────────────────

/// Response of `/session/init` and `/session/reset`
#[derive(Debug, Deserialize)]
pub struct InitSessionResponse {
    pub thread_id: String,
    pub session_type: String,
    #[serde(default)]
    pub current_week: Option<u32>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub is_weekly_in_progress: Option<bool>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub display_message: Option<String>,
}

impl InitSessionResponse {
    pub fn into_grant(self) -> SessionGrant {
        let session_type = SessionType::from_wire(&self.session_type);
        let status = self
            .status
            .as_deref()
            .map(SessionStatus::from_wire)
            .unwrap_or(SessionStatus::Active);
        let is_weekly_in_progress = self.is_weekly_in_progress.unwrap_or(
            session_type == SessionType::Weekly && status == SessionStatus::Active,
        );

        SessionGrant {
            session: Session {
                thread_id: self.thread_id,
                session_type,
                current_week: self.current_week.unwrap_or(1),
                status,
                created_at: non_blank(self.created_at),
            },
            is_weekly_in_progress,
            display_message: self.display_message.unwrap_or_default(),
        }
    }
}

/// Response of `/chat`
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
    #[serde(default)]
    pub is_ended: Option<bool>,
    pub current_week: u32,
    #[serde(default)]
    pub week_title: Option<String>,
    #[serde(default)]
    pub week_goals: Option<Vec<String>>,
    #[serde(default)]
    pub homework: Option<Homework>,
}

impl ChatResponse {
    pub fn into_turn(self) -> ChatTurn {
        ChatTurn {
            assistant_message: Message::assistant(self.reply),
            is_session_ended: self.is_ended.unwrap_or(false),
            current_week: self.current_week,
            week_title: non_blank(self.week_title),
            week_goals: self.week_goals.unwrap_or_default(),
            homework: self.homework.filter(|h| !h.description.trim().is_empty()),
        }
    }
}

/// One drawer entry from `/sessions/{user_id}`
#[derive(Debug, Deserialize)]
pub struct SessionSummaryDto {
    pub session_id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub session_type: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl SessionSummaryDto {
    pub fn into_summary(self) -> SessionSummary {
        SessionSummary {
            session_id: self.session_id,
            title: self.title.unwrap_or_default(),
            date: self.date.unwrap_or_default(),
            // Untyped history rows are ad-hoc threads
            session_type: self
                .session_type
                .as_deref()
                .map(SessionType::from_wire)
                .unwrap_or(SessionType::General),
            status: self
                .status
                .as_deref()
                .map(SessionStatus::from_wire)
                .unwrap_or(SessionStatus::Active),
        }
    }
}

/// One transcript row from `/sessions/{user_id}/{thread_id}/messages`
#[derive(Debug, Deserialize)]
pub struct TranscriptEntry {
    pub role: String,
    #[serde(alias = "content")]
    pub text: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl TranscriptEntry {
    pub fn into_message(self) -> Message {
        Message {
            role: Role::from_wire(&self.role),
            text: self.text,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
