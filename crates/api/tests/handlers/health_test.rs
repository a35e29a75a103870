use std::sync::Arc;

use pretty_assertions::assert_eq;
use roombook_core::store::memory::MemoryStore;
use serde_json::{Value, json};

use crate::test_utils::server_with;

#[tokio::test]
async fn test_health_reports_store_mode() {
    let degraded = server_with(Arc::new(MemoryStore::new()), true);
    let healthy = server_with(Arc::new(MemoryStore::new()), false);

    let degraded: Value = degraded.get("/health").await.json();
    let healthy: Value = healthy.get("/health").await.json();

    assert_eq!(degraded, json!({ "status": "degraded", "degraded": true }));
    assert_eq!(healthy, json!({ "status": "ok", "degraded": false }));
}

#[tokio::test]
async fn test_version() {
    let server = server_with(Arc::new(MemoryStore::new()), true);

    let body: Value = server.get("/version").await.json();

    assert_eq!(body["version"], json!(env!("CARGO_PKG_VERSION")));
}
