pub mod availability;
pub mod reservations;
pub mod time_slots;
