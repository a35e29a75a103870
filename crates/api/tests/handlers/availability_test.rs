use axum::http::StatusCode;
use eyre::eyre;
use pretty_assertions::assert_eq;
use roombook_core::{
    errors::BookingError,
    models::api::{ApiResponse, AvailabilityResponse},
};
use roombook_db::mock::MockStoreRepo;
use rstest::rstest;

use crate::test_utils::{DATE, memory_server, mock_server, reservation_body};

async fn check(
    server: &axum_test::TestServer,
    start: &str,
    end: &str,
) -> (StatusCode, ApiResponse<AvailabilityResponse>) {
    let response = server
        .get("/api/availability")
        .add_query_param("date", DATE)
        .add_query_param("startTime", start)
        .add_query_param("endTime", end)
        .await;
    (response.status_code(), response.json())
}

#[rstest]
#[case::same_slot("10:00", "11:00", false)]
#[case::inside("10:00", "10:30", false)]
#[case::straddles_start("09:30", "10:30", false)]
#[case::straddles_end("10:30", "11:30", false)]
#[case::covers("09:00", "12:00", false)]
#[case::ends_at_start("09:00", "10:00", true)]
#[case::starts_at_end("11:00", "12:00", true)]
#[tokio::test]
async fn test_availability_against_existing_reservation(
    #[case] start: &str,
    #[case] end: &str,
    #[case] available: bool,
) {
    let (server, _store) = memory_server();
    server
        .post("/api/reservations")
        .json(&reservation_body(DATE, "10:00", "11:00"))
        .await
        .assert_status(StatusCode::CREATED);

    let (status, body) = check(&server, start, end).await;

    assert_eq!(status, StatusCode::OK);
    let data = body.data.expect("availability in envelope");
    assert_eq!(data.available, available);
    assert_eq!(data.conflicts.len(), usize::from(!available));
}

#[tokio::test]
async fn test_other_dates_do_not_conflict() {
    let (server, _store) = memory_server();
    server
        .post("/api/reservations")
        .json(&reservation_body("2026-10-21", "10:00", "11:00"))
        .await
        .assert_status(StatusCode::CREATED);

    let (_, body) = check(&server, "10:00", "11:00").await;

    assert_eq!(body.data.map(|d| d.available), Some(true));
}

#[test_log::test(tokio::test)]
async fn test_fetch_failure_reports_unavailable() {
    let mut store = MockStoreRepo::new();
    store
        .expect_find_overlapping()
        .times(1)
        .returning(|_, _, _| Err(BookingError::Database(eyre!("connection reset"))));
    let server = mock_server(store);

    let (status, body) = check(&server, "10:00", "11:00").await;

    assert_eq!(status, StatusCode::OK);
    let data = body.data.expect("availability in envelope");
    assert!(!data.available);
    assert!(data.conflicts.is_empty());
    assert!(data.reason.is_some());
}

#[rstest]
#[case::reversed("11:00", "10:00")]
#[case::empty("10:00", "10:00")]
#[case::garbage("10:00", "late")]
#[tokio::test]
async fn test_invalid_range_is_bad_request(#[case] start: &str, #[case] end: &str) {
    let (server, _store) = memory_server();

    let (status, body) = check(&server, start, end).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(!body.success);
}
