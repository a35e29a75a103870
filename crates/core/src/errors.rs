use thiserror::Error;
use uuid::Uuid;

use crate::models::reservation::ConflictDescriptor;

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Time slot conflicts with {} existing reservation(s)", .0.len())]
    Conflict(Vec<ConflictDescriptor>),

    #[error("Customer {customer_id} was registered but the reservation was not: {source}")]
    PartialWrite {
        customer_id: Uuid,
        #[source]
        source: eyre::Report,
    },

    #[error("Database error: {0}")]
    Database(#[from] eyre::Report),

    #[error("Internal server error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl BookingError {
    pub fn validation(message: impl Into<String>) -> Self {
        BookingError::Validation(message.into())
    }

    /// Whether re-invoking the same action may succeed without user changes.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            BookingError::Database(_) | BookingError::PartialWrite { .. }
        )
    }
}

pub type BookingResult<T> = Result<T, BookingError>;
