//! # Reservation Writer
//!
//! Creation is check-then-act and not transactional:
//!
//! 1. Re-run the overlap check. Conflicts return early without writes.
//! 2. Insert a fresh customer row.
//! 3. Insert the reservation as `pending`, linked to that customer.
//!
//! Two clients can both pass step 1 before either reaches step 3. Only the
//! store's exclusion constraint closes that window; a rejection there comes
//! back as `BookingError::Conflict` and is reported as a conflict here too,
//! listing the reservations that hold the slot. When those cannot be looked
//! up the outcome is `AvailabilityUnverified` instead.
//!
//! If step 3 fails for any other reason the customer row from step 2 is left
//! behind. Its id is carried in [`FailureReason::ReservationInsert`].

use std::sync::Arc;

use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    errors::BookingError,
    models::{
        booking::{Availability, BookingOutcome, FailureReason},
        reservation::{NewReservation, ReservationRecord, ReservationStatus},
    },
    services::availability::AvailabilityChecker,
    store::ReservationStore,
};

#[derive(Clone)]
pub struct ReservationWriter {
    store: Arc<dyn ReservationStore>,
    checker: AvailabilityChecker,
    store_id: Uuid,
}

impl ReservationWriter {
    pub fn new(store: Arc<dyn ReservationStore>, store_id: Uuid) -> Self {
        Self {
            checker: AvailabilityChecker::new(store.clone()),
            store,
            store_id,
        }
    }

    pub async fn create(&self, reservation: &NewReservation) -> BookingOutcome {
        let slot = &reservation.time_slot;

        match self
            .checker
            .check(reservation.date, slot.start_time, slot.end_time)
            .await
        {
            Availability::Available => {}
            Availability::Conflicting(conflicts) => {
                info!(date = %reservation.date, slot = %slot.label(), "reservation rejected: slot taken");
                return BookingOutcome::Conflict(conflicts);
            }
            Availability::Unverified(_) => {
                return BookingOutcome::Failure(FailureReason::AvailabilityUnverified);
            }
        }

        let customer = match self.store.insert_customer(&reservation.customer).await {
            Ok(customer) => customer,
            Err(e) => {
                error!(error = %e, "customer registration failed");
                return BookingOutcome::Failure(FailureReason::CustomerRegistration);
            }
        };

        let record = ReservationRecord {
            store_id: self.store_id,
            customer: customer.clone(),
            date: reservation.date,
            start_time: slot.start_time,
            end_time: slot.end_time,
            number_of_people: reservation.number_of_people,
            special_requests: reservation.special_requests.clone(),
            status: ReservationStatus::Pending,
        };

        match self.store.insert_reservation(&record).await {
            Ok(stored) => {
                info!(id = ?stored.id, date = %stored.date, slot = %stored.time_slot.label(), "reservation created");
                BookingOutcome::Success(stored)
            }
            Err(BookingError::Conflict(conflicts)) => {
                warn!(
                    customer_id = ?customer.id,
                    "reservation rejected by store overlap constraint; customer row left behind"
                );
                if !conflicts.is_empty() {
                    return BookingOutcome::Conflict(conflicts);
                }
                match self
                    .checker
                    .check(reservation.date, slot.start_time, slot.end_time)
                    .await
                {
                    Availability::Conflicting(conflicts) => BookingOutcome::Conflict(conflicts),
                    // The competing row is gone again; the slot was still taken at insert time.
                    Availability::Available => BookingOutcome::Conflict(Vec::new()),
                    Availability::Unverified(reason) => {
                        warn!(%reason, "could not look up the reservations that won the slot");
                        BookingOutcome::Failure(FailureReason::AvailabilityUnverified)
                    }
                }
            }
            Err(e) => {
                error!(customer_id = ?customer.id, error = %e, "reservation insert failed; customer row left behind");
                BookingOutcome::Failure(FailureReason::ReservationInsert {
                    orphaned_customer: customer.id,
                })
            }
        }
    }
}
