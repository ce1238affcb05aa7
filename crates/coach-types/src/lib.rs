pub mod message;
pub mod session;
pub mod turn;
pub mod event;
pub mod config;
pub mod error;

#[cfg(test)]
mod tests;

pub use error::CoachError;
pub type Result<T> = std::result::Result<T, CoachError>;
