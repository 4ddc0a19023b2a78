use fedits_engine::invoker::DEFAULT_PROVIDER_TIMEOUT;

/// Server configuration loaded from environment variables.
///
/// Everything except `HASH_SECRET` has a default suitable for local
/// development.
#[derive(Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Timeout of a single provider webhook call in seconds (default: `10`).
    pub provider_timeout_secs: u64,
    /// Key for sealing provider secrets; exactly 32 bytes.
    pub hash_secret: String,
    /// Version stamped on every dispatch response.
    pub version: String,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                    |
    /// |-------------------------|----------------------------|
    /// | `HOST`                  | `0.0.0.0`                  |
    /// | `PORT`                  | `8000`                     |
    /// | `CORS_ORIGINS`          | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                       |
    /// | `PROVIDER_TIMEOUT_SECS` | `10`                       |
    /// | `HASH_SECRET`           | (required)                 |
    /// | `VERSION`               | crate version              |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "8000".into())
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

        let provider_timeout_secs: u64 = match std::env::var("PROVIDER_TIMEOUT_SECS") {
            Ok(raw) => raw
                .parse()
                .expect("PROVIDER_TIMEOUT_SECS must be a valid u64"),
            Err(_) => DEFAULT_PROVIDER_TIMEOUT.as_secs(),
        };

        let hash_secret = std::env::var("HASH_SECRET").expect("HASH_SECRET must be set");

        let version =
            std::env::var("VERSION").unwrap_or_else(|_| env!("CARGO_PKG_VERSION").to_string());

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            provider_timeout_secs,
            hash_secret,
            version,
        }
    }
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("cors_origins", &self.cors_origins)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("provider_timeout_secs", &self.provider_timeout_secs)
            .field("hash_secret", &"<redacted>")
            .field("version", &self.version)
            .finish()
    }
}
