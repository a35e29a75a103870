//! # Postgres Store
//!
//! [`ReservationStore`] over the repository functions. Database failures are
//! carried as `BookingError::Database`; an insert rejected by the
//! `reservations_no_overlap` exclusion constraint becomes
//! `BookingError::Conflict`.

use async_trait::async_trait;
use chrono::NaiveDate;
use eyre::eyre;
use roombook_core::{
    errors::{BookingError, BookingResult},
    models::{
        customer::{Customer, NewCustomer},
        reservation::{
            ConflictDescriptor, Reservation, ReservationRecord, ReservationStatus,
            UNKNOWN_CUSTOMER_NAME,
        },
        room::{OpeningHours, RoomStore},
        time_slot::{SlotTime, TimeSlot},
    },
    store::ReservationStore,
};
use uuid::Uuid;

use crate::{
    DbPool,
    models::{DbConflict, DbReservation, DbReservationWithCustomer, DbStore},
    repositories::{
        customer,
        reservation::{self, InsertReservation},
        store,
    },
};

/// SQLSTATE raised by an exclusion constraint.
const EXCLUSION_VIOLATION: &str = "23P01";

#[derive(Clone)]
pub struct PgReservationStore {
    pool: DbPool,
}

impl PgReservationStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

pub fn is_overlap_violation(report: &eyre::Report) -> bool {
    match report.downcast_ref::<sqlx::Error>() {
        Some(sqlx::Error::Database(db_err)) => db_err.code().as_deref() == Some(EXCLUSION_VIOLATION),
        _ => false,
    }
}

fn parse_status(raw: &str) -> BookingResult<ReservationStatus> {
    raw.parse()
        .map_err(|_| BookingError::Database(eyre!("Unexpected reservation status in store: {raw}")))
}

impl From<DbConflict> for ConflictDescriptor {
    fn from(row: DbConflict) -> Self {
        ConflictDescriptor {
            id: row.id,
            customer_name: row
                .customer_name
                .unwrap_or_else(|| UNKNOWN_CUSTOMER_NAME.to_string()),
            start_time: row.start_time.into(),
            end_time: row.end_time.into(),
        }
    }
}

fn joined_into_reservation(row: DbReservationWithCustomer) -> BookingResult<Reservation> {
    Ok(Reservation {
        id: Some(row.id),
        customer: Customer {
            id: Some(row.customer_id),
            name: row.customer_name.unwrap_or_default(),
            student_id: row.customer_student_id.unwrap_or_default(),
        },
        date: row.reservation_date,
        time_slot: TimeSlot {
            start_time: row.start_time.into(),
            end_time: row.end_time.into(),
            available: true,
        },
        status: parse_status(&row.status)?,
        number_of_people: row.number_of_people,
        special_requests: row.special_requests,
        created_at: row.created_at,
    })
}

fn inserted_into_reservation(row: DbReservation, customer: Customer) -> BookingResult<Reservation> {
    Ok(Reservation {
        id: Some(row.id),
        customer,
        date: row.reservation_date,
        time_slot: TimeSlot {
            start_time: row.start_time.into(),
            end_time: row.end_time.into(),
            available: true,
        },
        status: parse_status(&row.status)?,
        number_of_people: row.number_of_people,
        special_requests: row.special_requests,
        created_at: row.created_at,
    })
}

fn store_into_room(row: DbStore) -> BookingResult<RoomStore> {
    let hours = row.opening_hours.0;
    Ok(RoomStore {
        id: row.id,
        name: row.name,
        description: row.description,
        opening_hours: OpeningHours {
            start: hours.start.parse()?,
            end: hours.end.parse()?,
        },
        max_capacity: row.max_capacity,
        time_slot_duration: row.time_slot_duration,
        created_at: row.created_at,
    })
}

#[async_trait]
impl ReservationStore for PgReservationStore {
    async fn find_overlapping(
        &self,
        date: NaiveDate,
        start: SlotTime,
        end: SlotTime,
    ) -> BookingResult<Vec<ConflictDescriptor>> {
        let rows = reservation::get_overlapping_reservations(
            &self.pool,
            date,
            start.as_naive(),
            end.as_naive(),
        )
        .await?;

        Ok(rows.into_iter().map(ConflictDescriptor::from).collect())
    }

    async fn insert_customer(&self, new_customer: &NewCustomer) -> BookingResult<Customer> {
        let row =
            customer::create_customer(&self.pool, &new_customer.name, &new_customer.student_id)
                .await?;

        Ok(Customer {
            id: Some(row.id),
            name: row.name,
            student_id: row.student_id,
        })
    }

    async fn insert_reservation(&self, record: &ReservationRecord) -> BookingResult<Reservation> {
        let customer_id = record
            .customer
            .id
            .ok_or_else(|| BookingError::validation("Customer must be stored before reserving"))?;

        let insert = InsertReservation {
            store_id: record.store_id,
            customer_id,
            reservation_date: record.date,
            start_time: record.start_time.as_naive(),
            end_time: record.end_time.as_naive(),
            number_of_people: record.number_of_people,
            special_requests: record.special_requests.as_deref(),
            status: record.status.as_str(),
        };

        match reservation::create_reservation(&self.pool, insert).await {
            Ok(row) => inserted_into_reservation(row, record.customer.clone()),
            Err(report) if is_overlap_violation(&report) => {
                tracing::debug!("Reservation rejected by overlap constraint");
                Err(BookingError::Conflict(Vec::new()))
            }
            Err(report) => Err(BookingError::Database(report)),
        }
    }

    async fn list_reservations(&self) -> BookingResult<Vec<Reservation>> {
        reservation::get_all_reservations(&self.pool)
            .await?
            .into_iter()
            .map(joined_into_reservation)
            .collect()
    }

    async fn get_reservation(&self, id: Uuid) -> BookingResult<Option<Reservation>> {
        reservation::get_reservation_by_id(&self.pool, id)
            .await?
            .map(joined_into_reservation)
            .transpose()
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: ReservationStatus,
    ) -> BookingResult<Option<Reservation>> {
        let updated =
            reservation::update_reservation_status(&self.pool, id, status.as_str()).await;

        match updated {
            Ok(false) => Ok(None),
            Ok(true) => self.get_reservation(id).await,
            Err(report) if is_overlap_violation(&report) => Err(BookingError::Conflict(Vec::new())),
            Err(report) => Err(BookingError::Database(report)),
        }
    }

    async fn get_room_store(&self, id: Uuid) -> BookingResult<Option<RoomStore>> {
        store::get_store_by_id(&self.pool, id)
            .await?
            .map(store_into_room)
            .transpose()
    }
}
