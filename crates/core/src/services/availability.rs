//! # Overlap Checker
//!
//! Decides whether a candidate `[start, end)` on a date collides with any
//! non-cancelled reservation. Touching endpoints are not a collision: a
//! reservation ending at 10:00 leaves a 10:00 start free.
//!
//! A failed fetch is reported as [`Availability::Unverified`], which callers
//! must treat as "not available".

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::{
    models::{
        booking::Availability,
        time_slot::{SlotTime, overlaps},
    },
    store::ReservationStore,
};

#[derive(Clone)]
pub struct AvailabilityChecker {
    store: Arc<dyn ReservationStore>,
}

impl AvailabilityChecker {
    pub fn new(store: Arc<dyn ReservationStore>) -> Self {
        Self { store }
    }

    pub async fn check(&self, date: NaiveDate, start: SlotTime, end: SlotTime) -> Availability {
        let rows = match self.store.find_overlapping(date, start, end).await {
            Ok(rows) => rows,
            Err(e) => {
                warn!(%date, %start, %end, error = %e, "availability fetch failed; reporting unavailable");
                return Availability::Unverified(e.to_string());
            }
        };

        let conflicts: Vec<_> = rows
            .into_iter()
            .filter(|row| overlaps(row.start_time, row.end_time, start, end))
            .collect();

        debug!(%date, %start, %end, conflicts = conflicts.len(), "availability checked");

        if conflicts.is_empty() {
            Availability::Available
        } else {
            Availability::Conflicting(conflicts)
        }
    }
}
