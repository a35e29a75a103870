use std::sync::Arc;

use color_eyre::eyre::Result;
use dotenv::dotenv;
use roombook_api::{ApiState, config::ApiConfig, init_tracing};
use roombook_core::store::{ReservationStore, memory::MemoryStore};
use roombook_db::{PgReservationStore, create_pool, schema::initialize_database};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    // Load configuration
    let config = ApiConfig::from_env()?;
    init_tracing(config.log_level)?;

    let (store, degraded): (Arc<dyn ReservationStore>, bool) = match &config.database_url {
        Some(database_url) => {
            // Create database connection pool
            let db_pool = create_pool(database_url).await?;

            // Initialize database schema
            initialize_database(&db_pool).await?;
            info!("Connected to PostgreSQL");

            (Arc::new(PgReservationStore::new(db_pool)), false)
        }
        None => {
            warn!("DATABASE_URL not set; serving from the in-memory store");
            (Arc::new(MemoryStore::new()), true)
        }
    };

    // Start API server
    let state = ApiState::new(store, config.store_id, degraded);
    roombook_api::start_server(config, state).await?;

    Ok(())
}
