use std::sync::Arc;
use std::time::Duration;

use fedits_core::secret::{CryptoError, SecretCodec};
use fedits_db::Registry;
use fedits_engine::{Catalog, Orchestrator, WebhookInvoker};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Method and provider storage, used directly by the health check.
    pub registry: Arc<dyn Registry>,
    /// Dispatches `POST /call` requests.
    pub orchestrator: Orchestrator,
    /// Administers methods and providers.
    pub catalog: Catalog,
}

impl AppState {
    /// Wire the engine services around `registry`.
    ///
    /// Fails if `config.hash_secret` is not a valid sealing key.
    pub fn build(config: ServerConfig, registry: Arc<dyn Registry>) -> Result<Self, CryptoError> {
        let codec = SecretCodec::new(config.hash_secret.as_bytes())?;
        let invoker = Arc::new(WebhookInvoker::new(
            codec.clone(),
            Duration::from_secs(config.provider_timeout_secs),
            config.version.clone(),
        ));

        Ok(Self {
            orchestrator: Orchestrator::new(Arc::clone(&registry), invoker),
            catalog: Catalog::new(Arc::clone(&registry), codec),
            registry,
            config: Arc::new(config),
        })
    }
}
