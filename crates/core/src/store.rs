//! # Store Collaborator
//!
//! The relational store is an external collaborator. Services receive it as an
//! `Arc<dyn ReservationStore>` so tests and degraded deployments can swap in
//! [`memory::MemoryStore`] in place of the Postgres implementation.

pub mod memory;

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    errors::BookingResult,
    models::{
        customer::{Customer, NewCustomer},
        reservation::{ConflictDescriptor, Reservation, ReservationRecord, ReservationStatus},
        room::RoomStore,
        time_slot::SlotTime,
    },
};

#[async_trait]
pub trait ReservationStore: Send + Sync {
    /// Non-cancelled reservations on `date` with `start_time < end AND end_time > start`.
    async fn find_overlapping(
        &self,
        date: NaiveDate,
        start: SlotTime,
        end: SlotTime,
    ) -> BookingResult<Vec<ConflictDescriptor>>;

    async fn insert_customer(&self, customer: &NewCustomer) -> BookingResult<Customer>;

    /// Inserts a reservation row. A store-enforced overlap rejection surfaces as
    /// `BookingError::Conflict`.
    async fn insert_reservation(&self, record: &ReservationRecord) -> BookingResult<Reservation>;

    /// All reservations, newest reservation date first, customer joined in.
    async fn list_reservations(&self) -> BookingResult<Vec<Reservation>>;

    async fn get_reservation(&self, id: Uuid) -> BookingResult<Option<Reservation>>;

    async fn update_status(
        &self,
        id: Uuid,
        status: ReservationStatus,
    ) -> BookingResult<Option<Reservation>>;

    async fn get_room_store(&self, id: Uuid) -> BookingResult<Option<RoomStore>>;
}
