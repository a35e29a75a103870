use color_eyre::eyre::Result;
use dotenv::dotenv;
use roombook_kiosk::{config::KioskConfig, init_tracing, run_kiosk};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    let config = KioskConfig::from_env()?;
    init_tracing(&config)?;

    run_kiosk(config).await?;

    Ok(())
}
