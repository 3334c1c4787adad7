// src/utils/error.rs
use thiserror::Error;

#[derive(Debug, Error)]
pub enum KycError {
    #[error("Configuration error: {0}")]
    Config(String),

    /// Every distinct reason is reported together so the user can fix
    /// all of them in one resubmission.
    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("Document decode error: {0}")]
    Decode(String),

    #[error("Engine error: {0}")]
    Engine(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("Invalid pipeline state: {0}")]
    InvalidState(String),

    #[error("I/O error: {0}")]
    Io(String),
}

pub type Result<T> = std::result::Result<T, KycError>;
