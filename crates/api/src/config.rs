/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// Vendor base URLs and polling policies are loaded separately by
/// `studio_vendors::VendorEndpoints` and `studio_pipeline::PollingConfig`.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `1200`).
    ///
    /// Inline-polling routes hold the request open for the whole poll window,
    /// so this must stay above the longest configured window.
    pub request_timeout_secs: u64,
    /// Upper bound for background tasks to wind down after shutdown (default: `5`).
    pub shutdown_timeout_secs: u64,
    /// Largest accepted request body in bytes, for multipart uploads (default: 50 MiB).
    pub max_upload_bytes: usize,
    /// PostgreSQL connection string. The in-memory job store is used when unset.
    pub database_url: Option<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:3001`    |
    /// | `REQUEST_TIMEOUT_SECS` | `1200`                     |
    /// | `SHUTDOWN_TIMEOUT_SECS`| `5`                        |
    /// | `MAX_UPLOAD_MB`        | `50`                       |
    /// | `DATABASE_URL`         | unset (memory store)       |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3001".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "1200".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "5".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let max_upload_mb: usize = std::env::var("MAX_UPLOAD_MB")
            .unwrap_or_else(|_| "50".into())
            .parse()
            .expect("MAX_UPLOAD_MB must be a valid usize");

        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            max_upload_bytes: max_upload_mb * 1024 * 1024,
            database_url,
        }
    }
}
