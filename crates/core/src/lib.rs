//! # Roombook Core
//!
//! Domain model and booking logic for the practice-room reservation service:
//! the slot grid, the overlap checker, the reservation writer, the listing
//! query and the booking wizard state machine. Persistence is reached only
//! through the [`store::ReservationStore`] trait.

pub mod errors;
pub mod grid;
pub mod models;
pub mod services;
pub mod store;
pub mod wizard;
