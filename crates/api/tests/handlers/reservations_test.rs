use axum::http::StatusCode;
use chrono::Utc;
use eyre::eyre;
use pretty_assertions::assert_eq;
use roombook_core::{
    errors::BookingError,
    models::{
        api::ApiResponse,
        booking::FailureReason,
        customer::Customer,
        reservation::{Reservation, ReservationStatus},
    },
};
use roombook_db::mock::MockStoreRepo;
use rstest::rstest;
use serde_json::json;
use uuid::Uuid;

use crate::test_utils::{DATE, memory_server, mock_server, reservation_body};

#[tokio::test]
async fn test_create_reservation_success() {
    let (server, store) = memory_server();

    let response = server
        .post("/api/reservations")
        .json(&reservation_body(DATE, "10:00", "11:00"))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: ApiResponse<Reservation> = response.json();
    assert!(body.success);
    let reservation = body.data.expect("reservation in envelope");
    assert_eq!(reservation.status, ReservationStatus::Pending);
    assert_eq!(reservation.time_slot.label(), "10:00-11:00");
    assert_eq!(reservation.number_of_people, 1);
    assert_eq!(store.customer_count(), 1);
    assert_eq!(store.reservation_count(), 1);
}

#[tokio::test]
async fn test_create_overlapping_reservation_is_conflict() {
    let (server, store) = memory_server();
    server
        .post("/api/reservations")
        .json(&reservation_body(DATE, "10:00", "11:00"))
        .await
        .assert_status(StatusCode::CREATED);

    let response = server
        .post("/api/reservations")
        .json(&reservation_body(DATE, "10:30", "11:30"))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    let body: ApiResponse<Reservation> = response.json();
    assert!(!body.success);
    assert!(body.data.is_none());
    assert_eq!(body.conflicts.len(), 1);
    assert_eq!(body.conflicts[0].start_time.to_string(), "10:00");
    assert_eq!(store.reservation_count(), 1);
    assert_eq!(store.customer_count(), 1);
}

#[tokio::test]
async fn test_adjacent_reservations_do_not_conflict() {
    let (server, _store) = memory_server();

    for (start, end) in [("10:00", "11:00"), ("11:00", "12:00"), ("09:00", "10:00")] {
        server
            .post("/api/reservations")
            .json(&reservation_body(DATE, start, end))
            .await
            .assert_status(StatusCode::CREATED);
    }
}

#[rstest]
#[case::empty_name(json!({
    "customer": { "name": "  ", "studentId": "S1" },
    "date": DATE, "startTime": "10:00", "endTime": "11:00"
}))]
#[case::empty_student_id(json!({
    "customer": { "name": "Aoi", "studentId": "" },
    "date": DATE, "startTime": "10:00", "endTime": "11:00"
}))]
#[case::end_before_start(json!({
    "customer": { "name": "Aoi", "studentId": "S1" },
    "date": DATE, "startTime": "11:00", "endTime": "10:00"
}))]
#[case::off_grid_end(json!({
    "customer": { "name": "Aoi", "studentId": "S1" },
    "date": DATE, "startTime": "10:00", "endTime": "10:15"
}))]
#[case::past_closing(json!({
    "customer": { "name": "Aoi", "studentId": "S1" },
    "date": DATE, "startTime": "20:30", "endTime": "21:30"
}))]
#[case::no_people(json!({
    "customer": { "name": "Aoi", "studentId": "S1" },
    "date": DATE, "startTime": "10:00", "endTime": "11:00", "numberOfPeople": 0
}))]
#[case::bad_time_label(json!({
    "customer": { "name": "Aoi", "studentId": "S1" },
    "date": DATE, "startTime": "ten", "endTime": "11:00"
}))]
#[tokio::test]
async fn test_create_reservation_rejects_invalid_input(#[case] body: serde_json::Value) {
    let (server, store) = memory_server();

    let response = server.post("/api/reservations").json(&body).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: ApiResponse<Reservation> = response.json();
    assert!(!body.success);
    assert!(body.error.is_some());
    assert_eq!(store.customer_count(), 0);
    assert_eq!(store.reservation_count(), 0);
}

#[tokio::test]
async fn test_list_reservations_newest_date_first() {
    let (server, _store) = memory_server();
    for date in ["2026-10-19", "2026-10-21", "2026-10-20"] {
        server
            .post("/api/reservations")
            .json(&reservation_body(date, "13:00", "14:00"))
            .await
            .assert_status(StatusCode::CREATED);
    }

    let response = server.get("/api/reservations").await;

    response.assert_status_ok();
    let body: ApiResponse<Vec<Reservation>> = response.json();
    let dates: Vec<String> = body
        .data
        .unwrap_or_default()
        .iter()
        .map(|r| r.date.to_string())
        .collect();
    assert_eq!(dates, vec!["2026-10-21", "2026-10-20", "2026-10-19"]);
}

#[tokio::test]
async fn test_get_reservation_by_id() {
    let (server, _store) = memory_server();
    let created: ApiResponse<Reservation> = server
        .post("/api/reservations")
        .json(&reservation_body(DATE, "15:00", "16:30"))
        .await
        .json();
    let id = created.data.and_then(|r| r.id).expect("created id");

    let response = server.get(&format!("/api/reservations/{id}")).await;

    response.assert_status_ok();
    let body: ApiResponse<Reservation> = response.json();
    assert_eq!(body.data.and_then(|r| r.id), Some(id));
}

#[tokio::test]
async fn test_get_unknown_reservation_is_not_found() {
    let (server, _store) = memory_server();

    let response = server
        .get(&format!("/api/reservations/{}", Uuid::new_v4()))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_reservation_with_malformed_id_is_bad_request() {
    let (server, _store) = memory_server();

    let response = server.get("/api/reservations/not-a-uuid").await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_status_lifecycle() {
    let (server, _store) = memory_server();
    let created: ApiResponse<Reservation> = server
        .post("/api/reservations")
        .json(&reservation_body(DATE, "10:00", "11:00"))
        .await
        .json();
    let id = created.data.and_then(|r| r.id).expect("created id");
    let path = format!("/api/reservations/{id}/status");

    let confirmed = server.put(&path).json(&json!({ "status": "confirmed" })).await;
    confirmed.assert_status_ok();
    let body: ApiResponse<Reservation> = confirmed.json();
    assert_eq!(body.data.map(|r| r.status), Some(ReservationStatus::Confirmed));

    server
        .put(&path)
        .json(&json!({ "status": "cancelled" }))
        .await
        .assert_status_ok();

    server
        .put(&path)
        .json(&json!({ "status": "pending" }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_cancelled_reservation_releases_slot() {
    let (server, _store) = memory_server();
    let created: ApiResponse<Reservation> = server
        .post("/api/reservations")
        .json(&reservation_body(DATE, "10:00", "11:00"))
        .await
        .json();
    let id = created.data.and_then(|r| r.id).expect("created id");

    server
        .put(&format!("/api/reservations/{id}/status"))
        .json(&json!({ "status": "cancelled" }))
        .await
        .assert_status_ok();

    server
        .post("/api/reservations")
        .json(&reservation_body(DATE, "10:00", "11:00"))
        .await
        .assert_status(StatusCode::CREATED);
}

#[tokio::test]
async fn test_unknown_status_value_is_bad_request() {
    let (server, _store) = memory_server();

    let response = server
        .put(&format!("/api/reservations/{}/status", Uuid::new_v4()))
        .json(&json!({ "status": "archived" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[test_log::test(tokio::test)]
async fn test_listing_failure_is_reported_with_empty_list() {
    let mut store = MockStoreRepo::new();
    store
        .expect_list_reservations()
        .times(1)
        .returning(|| Err(BookingError::Database(eyre!("connection refused"))));
    let server = mock_server(store);

    let response = server.get("/api/reservations").await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: ApiResponse<Vec<Reservation>> = response.json();
    assert!(!body.success);
    assert_eq!(body.data, Some(Vec::new()));
    assert_eq!(body.error.as_deref(), Some("Failed to load reservations."));
}

#[test_log::test(tokio::test)]
async fn test_unverifiable_availability_blocks_create() {
    let mut store = MockStoreRepo::new();
    store.expect_get_room_store().returning(|_| Ok(None));
    store
        .expect_find_overlapping()
        .returning(|_, _, _| Err(BookingError::Database(eyre!("timeout"))));
    store.expect_insert_customer().times(0);
    store.expect_insert_reservation().times(0);
    let server = mock_server(store);

    let response = server
        .post("/api/reservations")
        .json(&reservation_body(DATE, "10:00", "11:00"))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: ApiResponse<Reservation> = response.json();
    assert!(!body.success);
    assert_eq!(body.failure, Some(FailureReason::AvailabilityUnverified));
    assert!(
        body.error
            .unwrap_or_default()
            .contains("Could not verify availability")
    );
}

#[test_log::test(tokio::test)]
async fn test_failed_reservation_insert_reports_orphaned_customer() {
    let customer_id = Uuid::new_v4();
    let mut store = MockStoreRepo::new();
    store.expect_get_room_store().returning(|_| Ok(None));
    store.expect_find_overlapping().returning(|_, _, _| Ok(Vec::new()));
    store.expect_insert_customer().times(1).returning(move |c| {
        Ok(Customer {
            id: Some(customer_id),
            name: c.name.clone(),
            student_id: c.student_id.clone(),
        })
    });
    store
        .expect_insert_reservation()
        .times(1)
        .returning(|_| Err(BookingError::Database(eyre!("disk full"))));
    let server = mock_server(store);

    let response = server
        .post("/api/reservations")
        .json(&reservation_body(DATE, "10:00", "11:00"))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: ApiResponse<Reservation> = response.json();
    assert_eq!(
        body.failure,
        Some(FailureReason::ReservationInsert {
            orphaned_customer: Some(customer_id)
        })
    );
    assert!(body.error.unwrap_or_default().contains(&customer_id.to_string()));
}

#[tokio::test]
async fn test_store_constraint_race_is_conflict() {
    let customer_id = Uuid::new_v4();
    let existing = roombook_core::models::reservation::ConflictDescriptor {
        id: Uuid::new_v4(),
        customer_name: "Ren".to_string(),
        start_time: "10:00".parse().unwrap(),
        end_time: "11:00".parse().unwrap(),
    };
    let mut calls = 0;
    let mut store = MockStoreRepo::new();
    store.expect_get_room_store().returning(|_| Ok(None));
    store.expect_find_overlapping().returning(move |_, _, _| {
        calls += 1;
        // The competing write lands between the check and the insert.
        if calls == 1 {
            Ok(Vec::new())
        } else {
            Ok(vec![existing.clone()])
        }
    });
    store.expect_insert_customer().returning(move |c| {
        Ok(Customer {
            id: Some(customer_id),
            name: c.name.clone(),
            student_id: c.student_id.clone(),
        })
    });
    store
        .expect_insert_reservation()
        .returning(|_| Err(BookingError::Conflict(Vec::new())));
    let server = mock_server(store);

    let response = server
        .post("/api/reservations")
        .json(&reservation_body(DATE, "10:00", "11:00"))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    let body: ApiResponse<Reservation> = response.json();
    assert_eq!(body.conflicts.len(), 1);
    assert_eq!(body.conflicts[0].customer_name, "Ren");
}

#[tokio::test]
async fn test_reservation_wire_format() {
    let (server, _store) = memory_server();
    let mut body = reservation_body(DATE, "18:00", "19:00");
    body["numberOfPeople"] = json!(4);
    body["specialRequests"] = json!("Need the piano");

    let response = server.post("/api/reservations").json(&body).await;

    response.assert_status(StatusCode::CREATED);
    let raw: serde_json::Value = response.json();
    assert_eq!(raw["success"], json!(true));
    assert_eq!(raw["data"]["timeSlot"]["startTime"], json!("18:00"));
    assert_eq!(raw["data"]["timeSlot"]["endTime"], json!("19:00"));
    assert_eq!(raw["data"]["numberOfPeople"], json!(4));
    assert_eq!(raw["data"]["specialRequests"], json!("Need the piano"));
    assert_eq!(raw["data"]["status"], json!("pending"));
    assert!(raw.get("error").is_none());
    assert!(raw["data"]["createdAt"].as_str().is_some());
    let created_at: chrono::DateTime<Utc> =
        serde_json::from_value(raw["data"]["createdAt"].clone()).unwrap();
    assert!(created_at <= Utc::now());
}
