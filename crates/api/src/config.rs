use std::path::PathBuf;
use std::time::Duration;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development; override via
/// environment variables in production.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Directory for project snapshot files (default: `./snapshots`).
    pub snapshot_dir: PathBuf,
    /// Base URL of the generation gateway.
    pub gateway_url: String,
    /// API key for the generation gateway.
    pub gateway_api_key: String,
    /// Pause between batch generation calls in milliseconds.
    pub batch_delay_ms: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                          |
    /// |------------------------|----------------------------------|
    /// | `HOST`                 | `0.0.0.0`                        |
    /// | `PORT`                 | `3000`                           |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`          |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                             |
    /// | `SNAPSHOT_DIR`         | `./snapshots`                    |
    /// | `GATEWAY_URL`          | `https://gateway.shotflow.local` |
    /// | `GATEWAY_API_KEY`      | (empty)                          |
    /// | `BATCH_DELAY_MS`       | `2000`                           |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let snapshot_dir = PathBuf::from(
            std::env::var("SNAPSHOT_DIR").unwrap_or_else(|_| "./snapshots".into()),
        );

        let gateway_url = std::env::var("GATEWAY_URL")
            .unwrap_or_else(|_| "https://gateway.shotflow.local".into());
        let gateway_api_key = std::env::var("GATEWAY_API_KEY").unwrap_or_default();

        let batch_delay_ms: u64 = std::env::var("BATCH_DELAY_MS")
            .unwrap_or_else(|_| "2000".into())
            .parse()
            .expect("BATCH_DELAY_MS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            snapshot_dir,
            gateway_url,
            gateway_api_key,
            batch_delay_ms,
        }
    }

    /// Pause between batch generation calls.
    pub fn batch_delay(&self) -> Duration {
        Duration::from_millis(self.batch_delay_ms)
    }
}
