use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;
use crate::error::{AppError, Result};

/// Upstream fetches are cancelled after this long unless overridden
/// via `SCRAPE_TIMEOUT_MS`.
const DEFAULT_FETCH_TIMEOUT_MS: u64 = 15_000;

#[derive(Clone)]
pub struct Config {
    pub server_addr: SocketAddr,
    pub fetch_timeout: Duration,
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load environment variables from .env file if it exists
        dotenv::dotenv().ok();

        // Load server configuration with defaults
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT").unwrap_or_else(|_| "3000".to_string());
        let port = port.parse::<u16>().map_err(|e| AppError::Config(format!("Invalid port: {}", e)))?;
        let ip = IpAddr::from_str(&host).map_err(|e| AppError::Config(format!("Invalid host address: {}", e)))?;

        let server_addr = SocketAddr::new(ip, port);

        let fetch_timeout = match env::var("SCRAPE_TIMEOUT_MS") {
            Ok(raw) => {
                let ms = raw
                    .parse::<u64>()
                    .map_err(|e| AppError::Config(format!("Invalid SCRAPE_TIMEOUT_MS: {}", e)))?;
                Duration::from_millis(ms)
            }
            Err(_) => Duration::from_millis(DEFAULT_FETCH_TIMEOUT_MS),
        };

        Ok(Config {
            server_addr,
            fetch_timeout,
        })
    }
}
