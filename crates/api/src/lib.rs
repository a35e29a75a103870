//! # Roombook API
//!
//! HTTP JSON surface of the practice-room booking service. Every endpoint
//! answers with the `{data, success, error, conflicts}` envelope.
//!
//! ## Architecture
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Translate requests into `ReservationService` calls
//! - **Middleware**: Error-to-response mapping
//! - **Config**: Environment configuration
//!
//! The store behind the service is chosen by the binary: Postgres when a
//! database URL is configured, the in-memory store otherwise.

/// Configuration module for API settings
pub mod config;
/// Request handlers
pub mod handlers;
/// Error handling shared by all handlers
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;

use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    error_handling::HandleErrorLayer,
    http::{HeaderValue, Method, header},
};
use eyre::{Result, WrapErr};
use roombook_core::{services::ReservationService, store::ReservationStore};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

/// Shared application state that is accessible to all request handlers
pub struct ApiState {
    pub service: ReservationService,
    /// Set when running against the in-memory store.
    pub degraded: bool,
}

impl ApiState {
    pub fn new(store: Arc<dyn ReservationStore>, store_id: uuid::Uuid, degraded: bool) -> Self {
        Self {
            service: ReservationService::new(store, store_id),
            degraded,
        }
    }
}

/// Installs the global `tracing` subscriber at the given level.
pub fn init_tracing(level: Level) -> Result<()> {
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// All API routes with request tracing attached.
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Reservation endpoints
        .merge(routes::reservations::routes())
        // Grid and availability endpoints
        .merge(routes::time_slots::routes())
        .merge(routes::availability::routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    let origins = origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .wrap_err_with(|| format!("Invalid CORS origin: {origin}"))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .allow_origin(origins))
}

/// Starts the API server
///
/// # Example
///
/// ```no_run
/// # use std::sync::Arc;
/// # use roombook_api::{ApiState, config::ApiConfig};
/// # use roombook_core::store::memory::MemoryStore;
/// # async fn run() -> eyre::Result<()> {
/// let config = ApiConfig::from_env()?;
/// let state = ApiState::new(Arc::new(MemoryStore::new()), config.store_id, true);
/// roombook_api::start_server(config, state).await?;
/// # Ok(())
/// # }
/// ```
pub async fn start_server(config: config::ApiConfig, state: ApiState) -> Result<()> {
    let app = router(Arc::new(state));

    // Apply CORS configuration if origins are specified
    let app = match &config.cors_origins {
        Some(origins) if !origins.is_empty() => app.layer(cors_layer(origins)?),
        _ => app,
    };

    // Add request timeout middleware
    let app = app.layer(
        ServiceBuilder::new()
            .layer(HandleErrorLayer::new(
                middleware::error_handling::handle_layer_error,
            ))
            .timeout(Duration::from_secs(config.request_timeout)),
    );

    // Start the HTTP server
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
