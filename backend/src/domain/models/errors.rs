use chrono::NaiveDate;
use thiserror::Error;

use super::validation::ValidationErrors;
use crate::domain::notification::NotificationError;

/// Errors raised by collection operations
#[derive(Debug, Error)]
pub enum CollectionError {
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("Cannot change {kind} status from {from} to {to}")]
    InvalidTransition {
        kind: &'static str,
        from: String,
        to: String,
    },

    #[error("Time slot {slot} on {date} is already booked")]
    SlotUnavailable { date: NaiveDate, slot: String },

    #[error("Notification error: {0}")]
    Notification(#[from] NotificationError),

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

impl CollectionError {
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        CollectionError::NotFound { kind, id: id.into() }
    }
}

impl From<ValidationErrors> for CollectionError {
    fn from(errors: ValidationErrors) -> Self {
        CollectionError::Validation(errors)
    }
}

pub type CollectionResult<T> = Result<T, CollectionError>;
