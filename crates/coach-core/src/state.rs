//! Observable chat state and its reducer.
//!
//! `ChatState` is an immutable record; every change goes through
//! [`reduce`] with a [`ChatEvent`], so the renderer can replay the same
//! events it drains from the bus and end up with the same view.

use serde::Serialize;
use coach_types::{
    event::{ChatEvent, LoadingStage},
    message::Message,
    session::SessionType,
};
use crate::labels::PREPARING_TITLE;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatState {
    pub messages: Vec<Message>,
    pub title: String,
    /// `None` until the server has told us
    pub current_week: Option<u32>,
    pub week_goals: Vec<String>,
    pub session_type: SessionType,
    pub is_session_ended: bool,
    /// A WEEKLY program is running; new GENERAL threads are blocked
    pub is_weekly_locked: bool,
    pub restoring: bool,
    pub awaiting_reply: bool,
    pub loading_stage: Option<LoadingStage>,
    pub show_reset_dialog: bool,
    pub notice: Option<String>,
    pub directory_size: usize,
}

/// Coarse phase derived from the state record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Restoring,
    Idle { session_type: SessionType, locked: bool },
    AwaitingReply(LoadingStage),
    Ended,
}

impl ChatState {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            title: PREPARING_TITLE.to_string(),
            current_week: None,
            week_goals: Vec::new(),
            session_type: SessionType::Weekly,
            is_session_ended: false,
            is_weekly_locked: false,
            restoring: false,
            awaiting_reply: false,
            loading_stage: None,
            show_reset_dialog: false,
            notice: None,
            directory_size: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        if self.restoring {
            Phase::Restoring
        } else if self.awaiting_reply {
            Phase::AwaitingReply(self.loading_stage.unwrap_or(LoadingStage::Thinking))
        } else if self.is_session_ended {
            Phase::Ended
        } else {
            Phase::Idle {
                session_type: self.session_type,
                locked: self.is_weekly_locked,
            }
        }
    }

    /// A request is in flight
    pub fn is_busy(&self) -> bool {
        self.restoring || self.awaiting_reply
    }

    /// Whether the input surface accepts text
    pub fn can_send(&self) -> bool {
        !self.is_busy() && !self.is_session_ended
    }
}

impl Default for ChatState {
    fn default() -> Self {
        Self::new()
    }
}

pub fn reduce(state: &ChatState, event: &ChatEvent) -> ChatState {
    let mut next = state.clone();
    match event {
        ChatEvent::RestoreStarted => {
            next.restoring = true;
            next.is_session_ended = false;
        }
        ChatEvent::RestoreFinished => {
            next.restoring = false;
        }
        ChatEvent::SessionApplied {
            session_type,
            current_week,
            ended,
            locked,
        } => {
            next.session_type = *session_type;
            next.current_week = Some(*current_week);
            next.is_session_ended = *ended;
            next.is_weekly_locked = *locked;
        }
        ChatEvent::ThreadOpened { ended } => {
            next.session_type = SessionType::General;
            next.is_session_ended = *ended;
            next.is_weekly_locked = false;
        }
        ChatEvent::NewSessionPrepared { placeholder_title } => {
            next.messages.clear();
            next.title = placeholder_title.clone();
            next.is_session_ended = false;
            next.is_weekly_locked = false;
        }
        ChatEvent::TitleChanged { title } => {
            next.title = title.clone();
        }
        ChatEvent::MessagesReplaced { messages } => {
            next.messages = messages.clone();
        }
        ChatEvent::MessageAppended { message } => {
            next.messages.push(message.clone());
        }
        ChatEvent::TurnStarted { stage } => {
            next.awaiting_reply = true;
            next.loading_stage = Some(*stage);
        }
        ChatEvent::LoadingStageChanged { stage } => {
            // Late ticks after the reply arrived are ignored
            if next.awaiting_reply {
                next.loading_stage = Some(*stage);
            }
        }
        ChatEvent::TurnFinished => {
            next.awaiting_reply = false;
            next.loading_stage = None;
        }
        ChatEvent::ProgressUpdated { current_week, goals } => {
            next.current_week = Some(*current_week);
            if !goals.is_empty() {
                next.week_goals = goals.clone();
            }
        }
        ChatEvent::SessionEnded => {
            next.is_session_ended = true;
            next.is_weekly_locked = false;
        }
        ChatEvent::ResetRequested => {
            next.show_reset_dialog = true;
        }
        ChatEvent::ResetDismissed => {
            next.show_reset_dialog = false;
        }
        ChatEvent::NoticeRaised { text } => {
            next.notice = Some(text.clone());
        }
        ChatEvent::NoticeCleared => {
            next.notice = None;
        }
        ChatEvent::DirectoryRefreshed { count } => {
            next.directory_size = *count;
        }
    }
    next
}
