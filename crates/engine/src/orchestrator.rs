//! Entry point for method calls: resolve, select providers, dispatch.

use std::sync::Arc;

use fedits_core::orchestration::{CallPayload, Envelope};
use fedits_db::Registry;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::coordinator::Coordinator;
use crate::error::EngineError;
use crate::invoker::ProviderInvoker;

/// Resolves a method by name and dispatches it under its policy.
#[derive(Clone)]
pub struct Orchestrator {
    registry: Arc<dyn Registry>,
    coordinator: Coordinator,
}

impl Orchestrator {
    pub fn new(registry: Arc<dyn Registry>, invoker: Arc<dyn ProviderInvoker>) -> Self {
        Self {
            registry,
            coordinator: Coordinator::new(invoker),
        }
    }

    /// Call `method` on behalf of `user_ref` with positional `params`.
    ///
    /// Errors:
    /// - [`EngineError::MethodNotFound`] when `method` is not registered (no
    ///   provider is contacted);
    /// - [`EngineError::NoProviderAvailable`] when no provider is bound, or
    ///   every provider of a `Fallback` method failed;
    /// - [`EngineError::Provider`] with the first failure when every provider
    ///   of a `Broadcast` or `Concurrent` method failed;
    /// - [`EngineError::Cancelled`] when `cancel` fires first.
    pub async fn request(
        &self,
        cancel: &CancellationToken,
        user_ref: &str,
        method: &str,
        params: Vec<Value>,
    ) -> Result<Envelope, EngineError> {
        let resolved = self
            .registry
            .find_method_by_name(method)
            .await?
            .ok_or_else(|| EngineError::MethodNotFound(method.to_string()))?;

        let providers = self.registry.find_eligible_providers(&resolved.name).await?;
        tracing::debug!(
            method = %resolved.name,
            kind = %resolved.kind,
            providers = providers.len(),
            user_ref,
            "Dispatching method call"
        );

        let call = CallPayload::new(user_ref, resolved.name, params);
        self.coordinator
            .dispatch(resolved.kind, providers, call, cancel)
            .await
    }
}
