use eyre::{Result, WrapErr};
use std::env;
use tracing::Level;

/// Configuration for the booking kiosk.
#[derive(Debug, Clone)]
pub struct KioskConfig {
    /// Base URL of the booking API, e.g. `http://localhost:3001`. Without it
    /// the kiosk books against an in-process, in-memory store.
    pub api_base_url: Option<String>,
    /// Log level (defaults to warn so logs do not drown the prompt)
    pub log_level: Level,
    /// HTTP request timeout in seconds
    pub request_timeout: u64,
}

fn default_log_level() -> Level {
    Level::WARN
}

impl Default for KioskConfig {
    fn default() -> Self {
        Self {
            api_base_url: None,
            log_level: default_log_level(),
            request_timeout: 30,
        }
    }
}

impl KioskConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let api_base_url = env::var("API_BASE_URL")
            .ok()
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty());

        let log_level = match env::var("LOG_LEVEL") {
            Ok(level) => level
                .trim()
                .parse::<Level>()
                .wrap_err("Invalid LOG_LEVEL value")?,
            Err(_) => default_log_level(),
        };

        let request_timeout = match env::var("KIOSK_REQUEST_TIMEOUT_SECONDS") {
            Ok(secs) => secs
                .trim()
                .parse()
                .wrap_err("KIOSK_REQUEST_TIMEOUT_SECONDS must be a whole number of seconds")?,
            Err(_) => 30,
        };

        Ok(Self {
            api_base_url,
            log_level,
            request_timeout,
        })
    }

    pub fn is_degraded(&self) -> bool {
        self.api_base_url.is_none()
    }
}
