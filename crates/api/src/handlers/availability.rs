//! # Availability Handlers
//!
//! Advisory overlap check for a candidate slot. The answer is always `200`:
//! an unverifiable check is reported as `available: false` with a `reason`,
//! never as an error, so clients fail closed.

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use roombook_core::{
    models::{
        api::{ApiResponse, AvailabilityQuery, AvailabilityResponse},
        time_slot::TimeSlot,
    },
    services::BookingBackend,
};
use std::sync::Arc;

use crate::{ApiState, middleware::error_handling::AppError};

/// `GET /api/availability?date=YYYY-MM-DD&startTime=HH:MM&endTime=HH:MM`
#[axum::debug_handler]
pub async fn check_availability(
    State(state): State<Arc<ApiState>>,
    query: Result<Query<AvailabilityQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<AvailabilityResponse>>, AppError> {
    let Query(query) = query?;
    let slot = TimeSlot::new(query.start_time, query.end_time)?;

    let availability = state
        .service
        .check_availability(query.date, slot.start_time, slot.end_time)
        .await;

    Ok(Json(ApiResponse::ok(availability.into())))
}
