//! # Error Handling Middleware
//!
//! Maps `BookingError` to HTTP status codes and the JSON envelope every
//! endpoint returns (`{data, success, error, conflicts}`).

use axum::{
    BoxError, Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use eyre::eyre;
use roombook_core::{
    errors::BookingError,
    models::{api::ApiResponse, booking::FailureReason},
};
use tracing::error;

/// Application error wrapper that provides HTTP status code mapping
///
/// # Example
///
/// ```
/// use axum::Json;
/// use roombook_api::middleware::error_handling::AppError;
/// use roombook_core::errors::BookingError;
///
/// async fn handler(name: String) -> Result<Json<String>, AppError> {
///     if name.trim().is_empty() {
///         return Err(AppError(BookingError::validation("Name is required")));
///     }
///     Ok(Json(name))
/// }
/// # fn main() {}
/// ```
#[derive(Debug)]
pub struct AppError(pub BookingError);

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match &self.0 {
            BookingError::NotFound(_) => StatusCode::NOT_FOUND,
            BookingError::Validation(_) => StatusCode::BAD_REQUEST,
            BookingError::Conflict(_) => StatusCode::CONFLICT,
            BookingError::PartialWrite { .. }
            | BookingError::Database(_)
            | BookingError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Request failed: {:?}", self.0);
        }

        let message = self.0.to_string();
        let conflicts = match self.0 {
            BookingError::Conflict(conflicts) => conflicts,
            _ => Vec::new(),
        };
        let body = ApiResponse::<()>::failure(message).with_conflicts(conflicts);

        (status, Json(body)).into_response()
    }
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        AppError(err)
    }
}

impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(BookingError::Database(err))
    }
}

/// A failed write that could not be reported as a conflict.
impl From<FailureReason> for AppError {
    fn from(reason: FailureReason) -> Self {
        let err = match reason {
            FailureReason::ReservationInsert {
                orphaned_customer: Some(customer_id),
            } => BookingError::PartialWrite {
                customer_id,
                source: eyre!(reason.message()),
            },
            FailureReason::Transport { detail } => BookingError::Internal(detail.into()),
            other => BookingError::Database(eyre!(other.message())),
        };
        AppError(err)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError(BookingError::validation(rejection.body_text()))
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError(BookingError::validation(rejection.body_text()))
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError(BookingError::validation(rejection.body_text()))
    }
}

/// Response for a failed reservation write. Carries the failure kind in the
/// envelope so clients can tell the cases apart.
pub fn failure_response(reason: FailureReason) -> Response {
    let error = AppError::from(reason.clone());
    let status = error.status_code();
    error!("Reservation write failed: {:?}", error.0);

    let body = ApiResponse::<()>::failure(error.0.to_string()).with_failure(reason);
    (status, Json(body)).into_response()
}

/// Responds to errors raised by the timeout layer.
pub async fn handle_layer_error(err: BoxError) -> Response {
    if err.is::<tower::timeout::error::Elapsed>() {
        let body = ApiResponse::<()>::failure("Request timed out");
        return (StatusCode::REQUEST_TIMEOUT, Json(body)).into_response();
    }

    AppError(BookingError::Internal(err)).into_response()
}
