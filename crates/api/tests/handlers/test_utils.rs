use std::sync::Arc;

use axum_test::TestServer;
use fake::{Fake, faker::name::en::Name};
use roombook_api::{ApiState, router};
use roombook_core::{
    models::room::DEFAULT_STORE_ID,
    store::{ReservationStore, memory::MemoryStore},
};
use roombook_db::mock::MockStoreRepo;
use serde_json::{Value, json};

pub const DATE: &str = "2026-10-20";

pub fn server_with(store: Arc<dyn ReservationStore>, degraded: bool) -> TestServer {
    let state = Arc::new(ApiState::new(store, DEFAULT_STORE_ID, degraded));
    TestServer::new(router(state)).expect("failed to start test server")
}

/// Server over a fresh in-memory store, plus a handle on that store.
pub fn memory_server() -> (TestServer, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    (server_with(store.clone(), true), store)
}

pub fn mock_server(store: MockStoreRepo) -> TestServer {
    server_with(Arc::new(store), false)
}

pub fn reservation_body(date: &str, start: &str, end: &str) -> Value {
    let name: String = Name().fake();
    json!({
        "customer": { "name": name, "studentId": "S2026001" },
        "date": date,
        "startTime": start,
        "endTime": end,
    })
}
