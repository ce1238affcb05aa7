use serde::{Deserialize, Serialize};

use crate::message::Message;
use crate::session::SessionType;

/// Cosmetic sub-state shown while a reply is pending
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoadingStage {
    /// Reading the user's input
    Thinking,
    /// Picking a technique
    Selecting,
    /// Composing the answer with the chosen technique
    Applying,
}

/// State transitions published by the conversation coordinator.
/// The renderer drains these and folds them into its own view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ChatEvent {
    /// Cold-start resolution began
    RestoreStarted,

    /// Cold-start resolution finished, successfully or not
    RestoreFinished,

    /// Server-confirmed session fields were applied
    SessionApplied {
        session_type: SessionType,
        current_week: u32,
        ended: bool,
        locked: bool,
    },

    /// A historical thread was opened for continuation
    ThreadOpened { ended: bool },

    /// The screen was cleared for a brand-new GENERAL thread
    NewSessionPrepared { placeholder_title: String },

    TitleChanged { title: String },

    MessagesReplaced { messages: Vec<Message> },

    MessageAppended { message: Message },

    /// A request went out; input is blocked until `TurnFinished`
    TurnStarted { stage: LoadingStage },

    LoadingStageChanged { stage: LoadingStage },

    TurnFinished,

    /// Week progress and goals from a completed turn
    ProgressUpdated { current_week: u32, goals: Vec<String> },

    /// The thread finished; the weekly lock no longer applies
    SessionEnded,

    ResetRequested,

    ResetDismissed,

    /// One-shot user-visible notice (toast)
    NoticeRaised { text: String },

    NoticeCleared,

    /// The history directory was replaced
    DirectoryRefreshed { count: usize },
}
