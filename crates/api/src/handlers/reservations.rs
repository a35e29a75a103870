//! # Reservation Handlers
//!
//! Create, list and inspect reservations, plus the staff-side status change.
//! Creation runs the same check-then-write sequence the kiosk uses in process:
//! a conflict answers `409 Conflict` with the overlapping reservations in the
//! envelope, and a failed write answers `500` with the failure message.

use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use roombook_core::{
    errors::BookingError,
    models::{
        api::{ApiResponse, CreateReservationRequest, UpdateStatusRequest},
        booking::BookingOutcome,
        reservation::Reservation,
    },
    services::BookingBackend,
};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    ApiState,
    middleware::error_handling::{AppError, failure_response},
};

/// `POST /api/reservations`
#[axum::debug_handler]
pub async fn create_reservation(
    State(state): State<Arc<ApiState>>,
    payload: Result<Json<CreateReservationRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(payload) = payload?;

    let grid = state.service.grid(None).await?;
    let reservation = payload.into_new_reservation(&grid)?;

    match state.service.create_reservation(&reservation).await {
        BookingOutcome::Success(created) => {
            info!(
                "Reservation {} created for {} at {}",
                created.id.map(|id| id.to_string()).unwrap_or_default(),
                created.date,
                created.time_slot.label()
            );
            Ok((StatusCode::CREATED, Json(ApiResponse::ok(created))).into_response())
        }
        BookingOutcome::Conflict(conflicts) => Err(AppError(BookingError::Conflict(conflicts))),
        BookingOutcome::Failure(reason) => Ok(failure_response(reason)),
    }
}

/// `GET /api/reservations`
///
/// A failed fetch is reported in the envelope; `data` stays an empty list.
#[axum::debug_handler]
pub async fn list_reservations(
    State(state): State<Arc<ApiState>>,
) -> (StatusCode, Json<ApiResponse<Vec<Reservation>>>) {
    let listing = state.service.list_reservations().await;

    match listing.error {
        None => (StatusCode::OK, Json(ApiResponse::ok(listing.reservations))),
        Some(error) => {
            warn!("Serving empty reservation list: {}", error);
            let body = ApiResponse {
                data: Some(Vec::new()),
                ..ApiResponse::failure(error)
            };
            (StatusCode::INTERNAL_SERVER_ERROR, Json(body))
        }
    }
}

/// `GET /api/reservations/:id`
#[axum::debug_handler]
pub async fn get_reservation(
    State(state): State<Arc<ApiState>>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<ApiResponse<Reservation>>, AppError> {
    let Path(id) = id?;
    let reservation = state.service.get_reservation(id).await?;

    Ok(Json(ApiResponse::ok(reservation)))
}

/// `PUT /api/reservations/:id/status`
#[axum::debug_handler]
pub async fn update_reservation_status(
    State(state): State<Arc<ApiState>>,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdateStatusRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Reservation>>, AppError> {
    let Path(id) = id?;
    let Json(payload) = payload?;

    let reservation = state.service.update_status(id, payload.status).await?;

    Ok(Json(ApiResponse::ok(reservation)))
}
