use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    errors::{BookingError, BookingResult},
    models::{
        customer::{Customer, NewCustomer},
        time_slot::{SlotTime, TimeSlot},
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Pending => "pending",
            ReservationStatus::Confirmed => "confirmed",
            ReservationStatus::Cancelled => "cancelled",
        }
    }

    /// Cancelled reservations release their slot.
    pub fn occupies_slot(&self) -> bool {
        !matches!(self, ReservationStatus::Cancelled)
    }

    pub fn can_transition_to(&self, next: ReservationStatus) -> bool {
        use ReservationStatus::*;
        matches!(
            (self, next),
            (Pending, Confirmed) | (Pending, Cancelled) | (Confirmed, Cancelled)
        )
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReservationStatus {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ReservationStatus::Pending),
            "confirmed" => Ok(ReservationStatus::Confirmed),
            "cancelled" => Ok(ReservationStatus::Cancelled),
            other => Err(BookingError::validation(format!(
                "Unknown reservation status: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub customer: Customer,
    pub date: NaiveDate,
    pub time_slot: TimeSlot,
    pub status: ReservationStatus,
    pub number_of_people: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_requests: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A complete reservation request, ready to hand to the writer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReservation {
    pub customer: NewCustomer,
    pub date: NaiveDate,
    pub time_slot: TimeSlot,
    pub number_of_people: i32,
    pub special_requests: Option<String>,
}

impl NewReservation {
    pub fn new(customer: NewCustomer, date: NaiveDate, time_slot: TimeSlot) -> Self {
        Self {
            customer,
            date,
            time_slot,
            number_of_people: 1,
            special_requests: None,
        }
    }
}

/// The row the writer asks the store to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationRecord {
    pub store_id: Uuid,
    pub customer: Customer,
    pub date: NaiveDate,
    pub start_time: SlotTime,
    pub end_time: SlotTime,
    pub number_of_people: i32,
    pub special_requests: Option<String>,
    pub status: ReservationStatus,
}

/// Projection explaining why a slot is unavailable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictDescriptor {
    pub id: Uuid,
    pub customer_name: String,
    pub start_time: SlotTime,
    pub end_time: SlotTime,
}

impl fmt::Display for ConflictDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{} ({})", self.start_time, self.end_time, self.customer_name)
    }
}

pub const UNKNOWN_CUSTOMER_NAME: &str = "unknown";

/// In-progress reservation filled in across wizard steps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReservationDraft {
    pub date: Option<NaiveDate>,
    pub time_slot: Option<TimeSlot>,
    pub customer: Option<NewCustomer>,
}

impl ReservationDraft {
    pub fn is_empty(&self) -> bool {
        self.date.is_none() && self.time_slot.is_none() && self.customer.is_none()
    }

    pub fn finalize(&self) -> BookingResult<NewReservation> {
        let date = self
            .date
            .ok_or_else(|| BookingError::validation("Reservation date is missing"))?;
        let time_slot = self
            .time_slot
            .clone()
            .ok_or_else(|| BookingError::validation("Reservation time slot is missing"))?;
        let customer = self
            .customer
            .clone()
            .ok_or_else(|| BookingError::validation("Customer information is missing"))?;

        Ok(NewReservation::new(customer, date, time_slot))
    }
}
