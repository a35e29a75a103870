use std::{sync::Arc, time::Duration};

use chrono::NaiveDate;
use eyre::eyre;
use pretty_assertions::assert_eq;
use roombook_api::{ApiState, router};
use roombook_core::{
    errors::BookingError,
    models::{
        booking::{Availability, BookingOutcome, FailureReason},
        customer::{Customer, NewCustomer},
        reservation::NewReservation,
        room::DEFAULT_STORE_ID,
        time_slot::{SlotTime, TimeSlot},
    },
    services::{BookingBackend, listing::LISTING_FAILED_MESSAGE},
    store::{ReservationStore, memory::MemoryStore},
};
use roombook_db::mock::MockStoreRepo;
use roombook_kiosk::client::ApiClient;
use uuid::Uuid;

const TIMEOUT: Duration = Duration::from_secs(5);

fn t(label: &str) -> SlotTime {
    label.parse().unwrap()
}

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 20).unwrap()
}

fn reservation(name: &str, start: &str, end: &str) -> NewReservation {
    NewReservation::new(
        NewCustomer::new(name, "S2026001").unwrap(),
        date(),
        TimeSlot::new(t(start), t(end)).unwrap(),
    )
}

/// Serves the booking API on an ephemeral port and returns its base URL.
async fn spawn_api(store: Arc<dyn ReservationStore>) -> String {
    let state = Arc::new(ApiState::new(store, DEFAULT_STORE_ID, false));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(state)).await.unwrap();
    });
    format!("http://{addr}/")
}

/// A base URL nothing is listening on.
async fn unreachable_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

#[tokio::test]
async fn test_base_url_is_normalised() {
    let client = ApiClient::new("http://kiosk.local:3001///", TIMEOUT).unwrap();
    assert_eq!(client.base_url(), "http://kiosk.local:3001");
}

#[test_log::test(tokio::test)]
async fn test_booking_round_trip_over_http() {
    let store = Arc::new(MemoryStore::new());
    let client = ApiClient::new(&spawn_api(store.clone()).await, TIMEOUT).unwrap();

    let availability = client.check_availability(date(), t("10:00"), t("11:00")).await;
    assert_eq!(availability, Availability::Available);

    let outcome = client.create_reservation(&reservation("Aoi", "10:00", "11:00")).await;
    let created = match outcome {
        BookingOutcome::Success(created) => created,
        other => panic!("expected success, got {other:?}"),
    };
    assert_eq!(created.customer.name, "Aoi");
    assert_eq!(created.time_slot.label(), "10:00-11:00");
    assert_eq!(store.reservation_count(), 1);

    let availability = client.check_availability(date(), t("10:30"), t("11:30")).await;
    assert!(!availability.is_available());
    assert_eq!(availability.conflicts()[0].customer_name, "Aoi");

    let listing = client.list_reservations().await;
    assert_eq!(listing.error, None);
    assert_eq!(listing.reservations.len(), 1);
    assert_eq!(listing.reservations[0].id, created.id);
}

#[tokio::test]
async fn test_overlapping_create_is_conflict() {
    let store = Arc::new(MemoryStore::new());
    let client = ApiClient::new(&spawn_api(store.clone()).await, TIMEOUT).unwrap();
    client.create_reservation(&reservation("Aoi", "10:00", "11:00")).await;

    let outcome = client.create_reservation(&reservation("Ren", "10:30", "11:30")).await;

    let conflicts = match outcome {
        BookingOutcome::Conflict(conflicts) => conflicts,
        other => panic!("expected conflict, got {other:?}"),
    };
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].to_string(), "10:00-11:00 (Aoi)");
    assert_eq!(store.reservation_count(), 1);
}

#[tokio::test]
async fn test_failure_kind_survives_the_wire() {
    let customer_id = Uuid::new_v4();
    let mut store = MockStoreRepo::new();
    store.expect_get_room_store().returning(|_| Ok(None));
    store.expect_find_overlapping().returning(|_, _, _| Ok(Vec::new()));
    store.expect_insert_customer().returning(move |c| {
        Ok(Customer {
            id: Some(customer_id),
            name: c.name.clone(),
            student_id: c.student_id.clone(),
        })
    });
    store
        .expect_insert_reservation()
        .returning(|_| Err(BookingError::Database(eyre!("disk full"))));
    store
        .expect_list_reservations()
        .returning(|| Err(BookingError::Database(eyre!("connection reset"))));
    let client = ApiClient::new(&spawn_api(Arc::new(store)).await, TIMEOUT).unwrap();

    let outcome = client.create_reservation(&reservation("Aoi", "10:00", "11:00")).await;
    assert_eq!(
        outcome,
        BookingOutcome::Failure(FailureReason::ReservationInsert {
            orphaned_customer: Some(customer_id)
        })
    );

    let listing = client.list_reservations().await;
    assert!(listing.reservations.is_empty());
    assert_eq!(listing.error.as_deref(), Some(LISTING_FAILED_MESSAGE));
}

#[tokio::test]
async fn test_unreachable_api_degrades_gracefully() {
    let client = ApiClient::new(&unreachable_url().await, TIMEOUT).unwrap();

    let availability = client.check_availability(date(), t("10:00"), t("11:00")).await;
    assert!(matches!(availability, Availability::Unverified(_)));

    let outcome = client.create_reservation(&reservation("Aoi", "10:00", "11:00")).await;
    assert!(matches!(
        outcome,
        BookingOutcome::Failure(FailureReason::Transport { .. })
    ));

    let listing = client.list_reservations().await;
    assert_eq!(listing.error.as_deref(), Some(LISTING_FAILED_MESSAGE));
}
