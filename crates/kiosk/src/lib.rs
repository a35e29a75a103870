//! # Roombook Kiosk
//!
//! Terminal front end for booking the practice room. Talks to the booking
//! API when `API_BASE_URL` is set; otherwise runs the booking services in
//! process over the in-memory store, so reservations last only as long as the
//! kiosk does.

pub mod client;
pub mod config;
pub mod session;

use std::{sync::Arc, time::Duration};

use eyre::Result;
use roombook_core::{
    grid::SlotGrid,
    models::room::DEFAULT_STORE_ID,
    services::{BookingBackend, ReservationService},
    store::memory::MemoryStore,
};
use tokio::io::{BufReader, stdin, stdout};
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;

use crate::{client::ApiClient, config::KioskConfig, session::Session};

/// Installs a stderr logger so log lines stay out of the prompt.
pub fn init_tracing(config: &KioskConfig) -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// The backend the kiosk books through.
pub fn build_backend(config: &KioskConfig) -> Result<Arc<dyn BookingBackend>> {
    match &config.api_base_url {
        Some(url) => {
            info!("Using booking API at {}", url);
            let client = ApiClient::new(url, Duration::from_secs(config.request_timeout))?;
            Ok(Arc::new(client))
        }
        None => {
            warn!("API_BASE_URL not set; reservations are kept in memory and lost on exit");
            let service = ReservationService::new(Arc::new(MemoryStore::new()), DEFAULT_STORE_ID);
            Ok(Arc::new(service))
        }
    }
}

/// Runs an interactive session on stdin/stdout until `quit` or end of input.
pub async fn run_kiosk(config: KioskConfig) -> Result<()> {
    let backend = build_backend(&config)?;
    let mut session = Session::new(backend, SlotGrid::default());

    session.run(BufReader::new(stdin()), stdout()).await
}
