//! Error types for eventdesk.

use thiserror::Error;

use crate::validation::ValidationErrors;

/// Errors that can occur in eventdesk operations.
#[derive(Error, Debug)]
pub enum EventDeskError {
    #[error("Invalid event: {0}")]
    Validation(ValidationErrors),

    #[error("Could not save events: {0}")]
    Persistence(String),

    #[error("Could not load events: {0}")]
    Load(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<ValidationErrors> for EventDeskError {
    fn from(errors: ValidationErrors) -> Self {
        EventDeskError::Validation(errors)
    }
}

/// Result type alias for eventdesk operations.
pub type EventDeskResult<T> = Result<T, EventDeskError>;
