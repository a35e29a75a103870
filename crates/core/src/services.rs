//! # Booking Services
//!
//! The Overlap Checker, Reservation Writer and Reservation Query are separate
//! components sharing one store collaborator. [`ReservationService`] bundles
//! them for callers that need all three, and implements [`BookingBackend`],
//! the seam the wizard talks through.

pub mod availability;
pub mod listing;
pub mod writer;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    errors::{BookingError, BookingResult},
    grid::SlotGrid,
    models::{
        booking::{Availability, BookingOutcome, ReservationListing},
        reservation::{NewReservation, Reservation, ReservationStatus},
        time_slot::{SlotTime, TimeSlot},
    },
    store::ReservationStore,
};

use self::{availability::AvailabilityChecker, listing::ReservationQuery, writer::ReservationWriter};

/// Remote operations the booking wizard depends on.
///
/// Every call is a round trip. Failures are folded into the returned values
/// rather than raised.
#[async_trait]
pub trait BookingBackend: Send + Sync {
    async fn check_availability(
        &self,
        date: NaiveDate,
        start: SlotTime,
        end: SlotTime,
    ) -> Availability;

    async fn create_reservation(&self, reservation: &NewReservation) -> BookingOutcome;

    async fn list_reservations(&self) -> ReservationListing;
}

#[derive(Clone)]
pub struct ReservationService {
    store: Arc<dyn ReservationStore>,
    store_id: Uuid,
    checker: AvailabilityChecker,
    writer: ReservationWriter,
    query: ReservationQuery,
}

impl ReservationService {
    pub fn new(store: Arc<dyn ReservationStore>, store_id: Uuid) -> Self {
        Self {
            checker: AvailabilityChecker::new(store.clone()),
            writer: ReservationWriter::new(store.clone(), store_id),
            query: ReservationQuery::new(store.clone()),
            store,
            store_id,
        }
    }

    pub fn store_id(&self) -> Uuid {
        self.store_id
    }

    pub fn checker(&self) -> &AvailabilityChecker {
        &self.checker
    }

    pub fn writer(&self) -> &ReservationWriter {
        &self.writer
    }

    pub fn query(&self) -> &ReservationQuery {
        &self.query
    }

    /// Grid of the given store, or of the service's own store.
    pub async fn grid(&self, store_id: Option<Uuid>) -> BookingResult<SlotGrid> {
        let id = store_id.unwrap_or(self.store_id);
        match self.store.get_room_store(id).await? {
            Some(room) => SlotGrid::from_store(&room),
            None if store_id.is_none() => {
                debug!(store_id = %id, "default store row missing; using default grid");
                Ok(SlotGrid::default())
            }
            None => Err(BookingError::NotFound(format!("Store with ID {id} not found"))),
        }
    }

    /// Single-step slots for `date`, each flagged with whether it is free.
    pub async fn time_slots(
        &self,
        date: NaiveDate,
        store_id: Option<Uuid>,
    ) -> BookingResult<Vec<TimeSlot>> {
        let grid = self.grid(store_id).await?;
        let taken = self
            .store
            .find_overlapping(date, grid.opening(), grid.closing())
            .await?;

        Ok(grid
            .slots()
            .into_iter()
            .map(|mut slot| {
                slot.available = !taken
                    .iter()
                    .any(|c| slot.overlaps(c.start_time, c.end_time));
                slot
            })
            .collect())
    }

    pub async fn get_reservation(&self, id: Uuid) -> BookingResult<Reservation> {
        self.query
            .get(id)
            .await?
            .ok_or_else(|| BookingError::NotFound(format!("Reservation with ID {id} not found")))
    }

    pub async fn update_status(
        &self,
        id: Uuid,
        status: ReservationStatus,
    ) -> BookingResult<Reservation> {
        let current = self.get_reservation(id).await?;
        if current.status == status {
            return Ok(current);
        }
        if !current.status.can_transition_to(status) {
            return Err(BookingError::validation(format!(
                "Cannot change reservation status from {} to {}",
                current.status, status
            )));
        }

        let updated = self
            .store
            .update_status(id, status)
            .await?
            .ok_or_else(|| BookingError::NotFound(format!("Reservation with ID {id} not found")))?;
        info!(%id, from = %current.status, to = %status, "reservation status changed");

        Ok(updated)
    }
}

#[async_trait]
impl BookingBackend for ReservationService {
    async fn check_availability(
        &self,
        date: NaiveDate,
        start: SlotTime,
        end: SlotTime,
    ) -> Availability {
        self.checker.check(date, start, end).await
    }

    async fn create_reservation(&self, reservation: &NewReservation) -> BookingOutcome {
        self.writer.create(reservation).await
    }

    async fn list_reservations(&self) -> ReservationListing {
        self.query.list_all().await
    }
}
