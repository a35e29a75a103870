use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::reservation::{ConflictDescriptor, Reservation};

/// Result of an overlap check for a candidate slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Availability {
    Available,
    Conflicting(Vec<ConflictDescriptor>),
    /// The existing reservations could not be fetched. Treated as not available.
    Unverified(String),
}

impl Availability {
    pub fn is_available(&self) -> bool {
        matches!(self, Availability::Available)
    }

    pub fn conflicts(&self) -> &[ConflictDescriptor] {
        match self {
            Availability::Conflicting(conflicts) => conflicts,
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailureReason {
    AvailabilityUnverified,
    CustomerRegistration,
    ReservationInsert { orphaned_customer: Option<Uuid> },
    Transport { detail: String },
}

impl FailureReason {
    pub fn message(&self) -> &'static str {
        match self {
            FailureReason::AvailabilityUnverified => {
                "Could not verify availability for the selected time. Please try again."
            }
            FailureReason::CustomerRegistration => {
                "Customer registration failed. Please try again."
            }
            FailureReason::ReservationInsert { .. } => {
                "Reservation insert failed. Please try again."
            }
            FailureReason::Transport { .. } => "A network error occurred. Please try again.",
        }
    }
}

/// Result of a reservation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingOutcome {
    Success(Reservation),
    Conflict(Vec<ConflictDescriptor>),
    Failure(FailureReason),
}

impl BookingOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, BookingOutcome::Success(_))
    }
}

/// Fail-soft listing: on a fetch error the list is empty and `error` is set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationListing {
    pub reservations: Vec<Reservation>,
    pub error: Option<String>,
}

impl ReservationListing {
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            reservations: Vec::new(),
            error: Some(error.into()),
        }
    }
}
