use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    errors::{BookingError, BookingResult},
    grid::SlotGrid,
    models::{
        booking::{Availability, FailureReason},
        customer::NewCustomer,
        reservation::{ConflictDescriptor, NewReservation, ReservationStatus},
        time_slot::{SlotTime, TimeSlot},
    },
};

/// Envelope returned by every JSON endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub data: Option<T>,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conflicts: Vec<ConflictDescriptor>,
    /// Set when a reservation write failed without a conflict.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureReason>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            data: Some(data),
            success: true,
            error: None,
            conflicts: Vec::new(),
            failure: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            data: None,
            success: false,
            error: Some(error.into()),
            conflicts: Vec::new(),
            failure: None,
        }
    }

    pub fn with_conflicts(mut self, conflicts: Vec<ConflictDescriptor>) -> Self {
        self.conflicts = conflicts;
        self
    }

    pub fn with_failure(mut self, failure: FailureReason) -> Self {
        self.failure = Some(failure);
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerPayload {
    pub name: String,
    pub student_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservationRequest {
    pub customer: CustomerPayload,
    pub date: NaiveDate,
    pub start_time: SlotTime,
    pub end_time: SlotTime,
    pub number_of_people: Option<i32>,
    pub special_requests: Option<String>,
}

impl CreateReservationRequest {
    /// Validates the request against the grid and identity rules.
    pub fn into_new_reservation(self, grid: &SlotGrid) -> BookingResult<NewReservation> {
        let customer = NewCustomer::new(&self.customer.name, &self.customer.student_id)?;
        let time_slot = TimeSlot::new(self.start_time, self.end_time)?;

        if !grid.is_bookable(self.start_time, self.end_time) {
            return Err(BookingError::validation(format!(
                "{} is not a bookable slot",
                time_slot.label()
            )));
        }

        let number_of_people = self.number_of_people.unwrap_or(1);
        if number_of_people < 1 {
            return Err(BookingError::validation(
                "Number of people must be at least 1",
            ));
        }

        let special_requests = self
            .special_requests
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Ok(NewReservation {
            customer,
            date: self.date,
            time_slot,
            number_of_people,
            special_requests,
        })
    }
}

impl From<&NewReservation> for CreateReservationRequest {
    fn from(reservation: &NewReservation) -> Self {
        Self {
            customer: CustomerPayload {
                name: reservation.customer.name.clone(),
                student_id: reservation.customer.student_id.clone(),
            },
            date: reservation.date,
            start_time: reservation.time_slot.start_time,
            end_time: reservation.time_slot.end_time,
            number_of_people: Some(reservation.number_of_people),
            special_requests: reservation.special_requests.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityQuery {
    pub date: NaiveDate,
    pub start_time: SlotTime,
    pub end_time: SlotTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
    pub available: bool,
    #[serde(default)]
    pub conflicts: Vec<ConflictDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl From<Availability> for AvailabilityResponse {
    fn from(availability: Availability) -> Self {
        match availability {
            Availability::Available => Self {
                available: true,
                conflicts: Vec::new(),
                reason: None,
            },
            Availability::Conflicting(conflicts) => Self {
                available: false,
                conflicts,
                reason: None,
            },
            Availability::Unverified(reason) => Self {
                available: false,
                conflicts: Vec::new(),
                reason: Some(reason),
            },
        }
    }
}

impl From<AvailabilityResponse> for Availability {
    fn from(response: AvailabilityResponse) -> Self {
        if response.available {
            Availability::Available
        } else if !response.conflicts.is_empty() {
            Availability::Conflicting(response.conflicts)
        } else {
            Availability::Unverified(
                response
                    .reason
                    .unwrap_or_else(|| "availability could not be verified".to_string()),
            )
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlotQuery {
    pub date: NaiveDate,
    pub store_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: ReservationStatus,
}
