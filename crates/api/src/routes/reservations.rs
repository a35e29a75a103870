use axum::{
    Router,
    routing::{get, put},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/reservations",
            get(handlers::reservations::list_reservations)
                .post(handlers::reservations::create_reservation),
        )
        .route(
            "/api/reservations/:id",
            get(handlers::reservations::get_reservation),
        )
        .route(
            "/api/reservations/:id/status",
            put(handlers::reservations::update_reservation_status),
        )
}
