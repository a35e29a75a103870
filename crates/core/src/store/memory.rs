use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use eyre::eyre;
use uuid::Uuid;

use crate::{
    errors::{BookingError, BookingResult},
    models::{
        customer::{Customer, NewCustomer},
        reservation::{
            ConflictDescriptor, Reservation, ReservationRecord, ReservationStatus,
            UNKNOWN_CUSTOMER_NAME,
        },
        room::{DEFAULT_STORE_ID, OpeningHours, RoomStore},
        time_slot::{SlotTime, TimeSlot, overlaps},
    },
    store::ReservationStore,
};

#[derive(Debug, Clone)]
struct StoredReservation {
    id: Uuid,
    store_id: Uuid,
    customer_id: Uuid,
    date: NaiveDate,
    start_time: SlotTime,
    end_time: SlotTime,
    number_of_people: i32,
    special_requests: Option<String>,
    status: ReservationStatus,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct MemoryState {
    customers: Vec<Customer>,
    reservations: Vec<StoredReservation>,
    stores: Vec<RoomStore>,
}

/// Process-local store with the same contract as the Postgres store,
/// including rejection of overlapping non-cancelled reservations.
#[derive(Debug)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        let state = MemoryState {
            stores: vec![default_room_store()],
            ..MemoryState::default()
        };

        Self {
            state: Mutex::new(state),
        }
    }

    pub fn customer_count(&self) -> usize {
        self.state().map(|s| s.customers.len()).unwrap_or_default()
    }

    pub fn reservation_count(&self) -> usize {
        self.state().map(|s| s.reservations.len()).unwrap_or_default()
    }

    fn state(&self) -> BookingResult<MutexGuard<'_, MemoryState>> {
        self.state
            .lock()
            .map_err(|_| BookingError::Database(eyre!("memory store lock poisoned")))
    }
}

fn default_room_store() -> RoomStore {
    let grid = crate::grid::SlotGrid::default();
    RoomStore {
        id: DEFAULT_STORE_ID,
        name: "Practice Room".to_string(),
        description: Some("Soundproof practice room".to_string()),
        opening_hours: OpeningHours {
            start: grid.opening(),
            end: grid.closing(),
        },
        max_capacity: 5,
        time_slot_duration: crate::grid::DEFAULT_STEP_MINUTES as i32,
        created_at: Utc::now(),
    }
}

impl MemoryState {
    fn customer(&self, id: Uuid) -> Option<&Customer> {
        self.customers.iter().find(|c| c.id == Some(id))
    }

    fn hydrate(&self, row: &StoredReservation) -> Reservation {
        let customer = self.customer(row.customer_id).cloned().unwrap_or(Customer {
            id: Some(row.customer_id),
            name: String::new(),
            student_id: String::new(),
        });

        Reservation {
            id: Some(row.id),
            customer,
            date: row.date,
            time_slot: TimeSlot {
                start_time: row.start_time,
                end_time: row.end_time,
                available: true,
            },
            status: row.status,
            number_of_people: row.number_of_people,
            special_requests: row.special_requests.clone(),
            created_at: row.created_at,
        }
    }

    fn overlapping(
        &self,
        store_id: Option<Uuid>,
        date: NaiveDate,
        start: SlotTime,
        end: SlotTime,
    ) -> Vec<ConflictDescriptor> {
        self.reservations
            .iter()
            .filter(|r| store_id.is_none_or(|id| r.store_id == id))
            .filter(|r| r.date == date && r.status.occupies_slot())
            .filter(|r| overlaps(r.start_time, r.end_time, start, end))
            .map(|r| ConflictDescriptor {
                id: r.id,
                customer_name: self
                    .customer(r.customer_id)
                    .map(|c| c.name.clone())
                    .unwrap_or_else(|| UNKNOWN_CUSTOMER_NAME.to_string()),
                start_time: r.start_time,
                end_time: r.end_time,
            })
            .collect()
    }
}

#[async_trait]
impl ReservationStore for MemoryStore {
    async fn find_overlapping(
        &self,
        date: NaiveDate,
        start: SlotTime,
        end: SlotTime,
    ) -> BookingResult<Vec<ConflictDescriptor>> {
        let state = self.state()?;
        Ok(state.overlapping(None, date, start, end))
    }

    async fn insert_customer(&self, customer: &NewCustomer) -> BookingResult<Customer> {
        let mut state = self.state()?;
        let stored = Customer {
            id: Some(Uuid::new_v4()),
            name: customer.name.clone(),
            student_id: customer.student_id.clone(),
        };
        state.customers.push(stored.clone());
        Ok(stored)
    }

    async fn insert_reservation(&self, record: &ReservationRecord) -> BookingResult<Reservation> {
        let mut state = self.state()?;

        let customer_id = record
            .customer
            .id
            .filter(|id| state.customer(*id).is_some())
            .ok_or_else(|| BookingError::Database(eyre!("customer row does not exist")))?;

        if record.status.occupies_slot() {
            let conflicts = state.overlapping(
                Some(record.store_id),
                record.date,
                record.start_time,
                record.end_time,
            );
            if !conflicts.is_empty() {
                return Err(BookingError::Conflict(conflicts));
            }
        }

        let row = StoredReservation {
            id: Uuid::new_v4(),
            store_id: record.store_id,
            customer_id,
            date: record.date,
            start_time: record.start_time,
            end_time: record.end_time,
            number_of_people: record.number_of_people,
            special_requests: record.special_requests.clone(),
            status: record.status,
            created_at: Utc::now(),
        };
        state.reservations.push(row.clone());

        Ok(state.hydrate(&row))
    }

    async fn list_reservations(&self) -> BookingResult<Vec<Reservation>> {
        let state = self.state()?;
        let mut rows: Vec<&StoredReservation> = state.reservations.iter().collect();
        rows.sort_by(|a, b| {
            b.date
                .cmp(&a.date)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });

        Ok(rows.into_iter().map(|row| state.hydrate(row)).collect())
    }

    async fn get_reservation(&self, id: Uuid) -> BookingResult<Option<Reservation>> {
        let state = self.state()?;
        Ok(state
            .reservations
            .iter()
            .find(|r| r.id == id)
            .map(|row| state.hydrate(row)))
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: ReservationStatus,
    ) -> BookingResult<Option<Reservation>> {
        let mut state = self.state()?;
        let Some(row) = state.reservations.iter_mut().find(|r| r.id == id) else {
            return Ok(None);
        };
        row.status = status;
        let row = row.clone();

        Ok(Some(state.hydrate(&row)))
    }

    async fn get_room_store(&self, id: Uuid) -> BookingResult<Option<RoomStore>> {
        let state = self.state()?;
        Ok(state.stores.iter().find(|s| s.id == id).cloned())
    }
}
