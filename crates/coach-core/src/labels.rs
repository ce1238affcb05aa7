//! User-facing titles and canned guide texts.

use coach_types::session::{Session, SessionType};

pub const PREPARING_TITLE: &str = "Preparing session...";
pub const LOADING_TITLE: &str = "Loading...";
pub const NEW_SESSION_TITLE: &str = "New FAQ";
pub const GENERAL_TITLE: &str = "FAQ";

pub const WEEKLY_LOCK_NOTICE: &str = "Please finish the current weekly session first!";

pub const RESTORE_FAILED: &str = "Couldn't fetch your session. Please try again in a moment.";
pub const INIT_FAILED: &str = "Something went wrong while starting the session.";
pub const SEND_FAILED: &str = "Something went wrong! Please send your reply again in a little while";
pub const SESSION_ENDED_NOTICE: &str = "This session has already ended. Start a new session to keep talking.";
pub const TRANSCRIPT_FAILED: &str = "Couldn't load this conversation.";
pub const CONNECTION_FAILED: &str = "Connection failed";
pub const RESET_FAILED: &str = "Reset failed";
pub const RESET_START_FAILED: &str = "Something went wrong while starting the session after the reset";
pub const DEFAULT_RESET_GREETING: &str = "The program has been reset. Starting again from week 1.";

/// Shown one after another once the final program week ends
pub const RESTART_GUIDANCE: [&str; 3] = [
    "Tap the reset button on the right of the top bar to restart the program!\n\
     (Your previous sessions stay available in the drawer.)",
    "Resetting starts a new week 1 session right away, so tap it whenever you need a fresh program!",
    "You can also ask anything at any time in a general session.",
];

pub fn week_label(week: u32) -> String {
    format!("Week {} Session", week)
}

/// Title for a freshly resolved session
pub fn session_label(session: &Session) -> String {
    match session.session_type {
        SessionType::Weekly => week_label(session.current_week),
        SessionType::General => match session.created_at.as_deref().map(str::trim) {
            Some(created) if !created.is_empty() => format!("{} | {}", GENERAL_TITLE, created),
            _ => GENERAL_TITLE.to_string(),
        },
    }
}

/// Title for a historical thread opened from the drawer
pub fn opened_thread_label(date: Option<&str>) -> String {
    match date.map(str::trim) {
        Some(date) if !date.is_empty() => format!("{} ({})", GENERAL_TITLE, date),
        _ => GENERAL_TITLE.to_string(),
    }
}
