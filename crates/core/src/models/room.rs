use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::time_slot::SlotTime;

/// Identifier of the single practice room every reservation is booked against.
pub const DEFAULT_STORE_ID: Uuid = Uuid::from_u128(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpeningHours {
    pub start: SlotTime,
    pub end: SlotTime,
}

/// A bookable location; rows of the `stores` collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomStore {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub opening_hours: OpeningHours,
    pub max_capacity: i32,
    /// Minutes per grid step.
    pub time_slot_duration: i32,
    pub created_at: DateTime<Utc>,
}
