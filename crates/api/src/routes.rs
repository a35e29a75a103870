pub mod availability;
pub mod health;
pub mod reservations;
pub mod time_slots;
