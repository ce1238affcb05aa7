use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum CoachError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Timeout after {0}ms")]
    Timeout(u64),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Device identity unavailable: {0}")]
    Identity(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JS interop error: {0}")]
    JsInterop(String),
}

impl From<serde_json::Error> for CoachError {
    fn from(e: serde_json::Error) -> Self {
        CoachError::Serialization(e.to_string())
    }
}
