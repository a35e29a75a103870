use axum::{http::StatusCode, response::IntoResponse};
use eyre::eyre;
use roombook_api::middleware::error_handling::AppError;
use roombook_core::{errors::BookingError, models::booking::FailureReason};
use rstest::rstest;
use uuid::Uuid;

#[rstest]
#[case::not_found(BookingError::NotFound("Reservation".into()), StatusCode::NOT_FOUND)]
#[case::validation(BookingError::validation("Name is required"), StatusCode::BAD_REQUEST)]
#[case::conflict(BookingError::Conflict(Vec::new()), StatusCode::CONFLICT)]
#[case::database(BookingError::Database(eyre!("Database error")), StatusCode::INTERNAL_SERVER_ERROR)]
#[case::partial_write(
    BookingError::PartialWrite { customer_id: Uuid::new_v4(), source: eyre!("insert failed") },
    StatusCode::INTERNAL_SERVER_ERROR
)]
#[case::internal(
    BookingError::Internal(Box::new(std::io::Error::other("Internal error"))),
    StatusCode::INTERNAL_SERVER_ERROR
)]
fn test_error_status_mapping(#[case] error: BookingError, #[case] expected: StatusCode) {
    let response = AppError(error).into_response();

    assert_eq!(response.status(), expected);
}

#[test]
fn test_orphaned_customer_becomes_partial_write() {
    let customer_id = Uuid::new_v4();

    let AppError(error) = FailureReason::ReservationInsert {
        orphaned_customer: Some(customer_id),
    }
    .into();

    assert!(matches!(
        error,
        BookingError::PartialWrite { customer_id: id, .. } if id == customer_id
    ));
}

#[rstest]
#[case(FailureReason::AvailabilityUnverified)]
#[case(FailureReason::CustomerRegistration)]
#[case(FailureReason::ReservationInsert { orphaned_customer: None })]
fn test_other_failures_are_server_errors(#[case] reason: FailureReason) {
    let message = reason.message();

    let error: AppError = reason.into();

    assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(error.0.to_string().contains(message));
}
