use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, types::Json};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbCustomer {
    pub id: Uuid,
    pub name: String,
    pub student_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbReservation {
    pub id: Uuid,
    pub store_id: Uuid,
    pub customer_id: Uuid,
    pub reservation_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub number_of_people: i32,
    pub special_requests: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Reservation joined with its customer; the customer columns are null when
/// the row has gone missing.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbReservationWithCustomer {
    pub id: Uuid,
    pub store_id: Uuid,
    pub customer_id: Uuid,
    pub reservation_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub number_of_people: i32,
    pub special_requests: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub customer_name: Option<String>,
    pub customer_student_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbConflict {
    pub id: Uuid,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub customer_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DbOpeningHours {
    pub start: String,
    pub end: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbStore {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub opening_hours: Json<DbOpeningHours>,
    pub max_capacity: i32,
    pub time_slot_duration: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
