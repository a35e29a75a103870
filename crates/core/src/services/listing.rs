use std::sync::Arc;

use tracing::warn;
use uuid::Uuid;

use crate::{
    errors::BookingResult,
    models::{booking::ReservationListing, reservation::Reservation},
    store::ReservationStore,
};

pub const LISTING_FAILED_MESSAGE: &str = "Failed to load reservations.";

/// Read-only access to stored reservations.
#[derive(Clone)]
pub struct ReservationQuery {
    store: Arc<dyn ReservationStore>,
}

impl ReservationQuery {
    pub fn new(store: Arc<dyn ReservationStore>) -> Self {
        Self { store }
    }

    /// Newest reservation date first. Never fails: a fetch error yields an
    /// empty list with `error` set.
    pub async fn list_all(&self) -> ReservationListing {
        match self.store.list_reservations().await {
            Ok(reservations) => ReservationListing {
                reservations,
                error: None,
            },
            Err(e) => {
                warn!(error = %e, "reservation listing failed");
                ReservationListing::failed(LISTING_FAILED_MESSAGE)
            }
        }
    }

    pub async fn get(&self, id: Uuid) -> BookingResult<Option<Reservation>> {
        self.store.get_reservation(id).await
    }
}
