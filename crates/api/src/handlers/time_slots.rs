use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use roombook_core::models::{
    api::{ApiResponse, TimeSlotQuery},
    time_slot::TimeSlot,
};
use std::sync::Arc;

use crate::{ApiState, middleware::error_handling::AppError};

/// `GET /api/time-slots?date=YYYY-MM-DD&storeId=...`
///
/// One entry per grid step, flagged unavailable when a live reservation
/// overlaps it.
#[axum::debug_handler]
pub async fn get_time_slots(
    State(state): State<Arc<ApiState>>,
    query: Result<Query<TimeSlotQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<TimeSlot>>>, AppError> {
    let Query(query) = query?;
    let slots = state.service.time_slots(query.date, query.store_id).await?;

    Ok(Json(ApiResponse::ok(slots)))
}
