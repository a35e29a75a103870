use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use roombook_core::models::{api::ApiResponse, time_slot::TimeSlot};
use uuid::Uuid;

use crate::test_utils::{DATE, memory_server, reservation_body};

#[tokio::test]
async fn test_time_slots_cover_opening_hours() {
    let (server, _store) = memory_server();

    let response = server
        .get("/api/time-slots")
        .add_query_param("date", DATE)
        .await;

    response.assert_status_ok();
    let slots = response
        .json::<ApiResponse<Vec<TimeSlot>>>()
        .data
        .unwrap_or_default();
    assert_eq!(slots.len(), 24);
    assert_eq!(slots[0].label(), "09:00-09:30");
    assert_eq!(slots[23].label(), "20:30-21:00");
    assert!(slots.iter().all(|slot| slot.available));
}

#[tokio::test]
async fn test_booked_slots_are_flagged() {
    let (server, _store) = memory_server();
    server
        .post("/api/reservations")
        .json(&reservation_body(DATE, "10:00", "11:00"))
        .await
        .assert_status(StatusCode::CREATED);

    let slots = server
        .get("/api/time-slots")
        .add_query_param("date", DATE)
        .await
        .json::<ApiResponse<Vec<TimeSlot>>>()
        .data
        .unwrap_or_default();

    let taken: Vec<String> = slots
        .iter()
        .filter(|slot| !slot.available)
        .map(TimeSlot::label)
        .collect();
    assert_eq!(taken, vec!["10:00-10:30", "10:30-11:00"]);
}

#[tokio::test]
async fn test_unknown_store_is_not_found() {
    let (server, _store) = memory_server();

    let response = server
        .get("/api/time-slots")
        .add_query_param("date", DATE)
        .add_query_param("storeId", Uuid::new_v4())
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_missing_date_is_bad_request() {
    let (server, _store) = memory_server();

    let response = server.get("/api/time-slots").await;

    response.assert_status(StatusCode::BAD_REQUEST);
}
