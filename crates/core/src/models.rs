pub mod api;
pub mod booking;
pub mod customer;
pub mod reservation;
pub mod room;
pub mod time_slot;
