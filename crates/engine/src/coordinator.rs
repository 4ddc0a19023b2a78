//! Dispatch policies: how one call fans out over a method's providers.
//!
//! | Kind         | Strategy                         | Losers                 |
//! |--------------|----------------------------------|------------------------|
//! | `Broadcast`  | race, first success wins         | run to completion      |
//! | `Concurrent` | race, first success wins         | cancelled              |
//! | `Fallback`   | one at a time, in listing order  | never started          |
//!
//! A race only reports a provider failure once every provider has failed,
//! and then reports the first failure to arrive.

use std::sync::Arc;

use fedits_core::dispatch::DispatchKind;
use fedits_core::orchestration::{CallPayload, Envelope};
use fedits_db::models::provider::Provider;
use tokio_util::sync::CancellationToken;

use crate::error::{EngineError, ProviderError};
use crate::invoker::ProviderInvoker;
use crate::race::{self, RaceMode, Settlement};

/// Execution strategy resolved from a [`DispatchKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Race(RaceMode),
    Sequential,
}

impl Strategy {
    pub fn for_kind(kind: DispatchKind) -> Self {
        match kind {
            DispatchKind::Broadcast => Strategy::Race(RaceMode::KeepSiblings),
            DispatchKind::Concurrent => Strategy::Race(RaceMode::CancelSiblings),
            DispatchKind::Fallback => Strategy::Sequential,
        }
    }
}

/// Runs a call against an ordered list of providers under a policy.
#[derive(Clone)]
pub struct Coordinator {
    invoker: Arc<dyn ProviderInvoker>,
}

impl Coordinator {
    pub fn new(invoker: Arc<dyn ProviderInvoker>) -> Self {
        Self { invoker }
    }

    /// Dispatch `call` to `providers` according to `kind`.
    ///
    /// `providers` must be in listing order; only `Fallback` depends on it.
    pub async fn dispatch(
        &self,
        kind: DispatchKind,
        providers: Vec<Provider>,
        call: CallPayload,
        cancel: &CancellationToken,
    ) -> Result<Envelope, EngineError> {
        if providers.is_empty() {
            tracing::warn!(method = %call.method, kind = %kind, "No provider bound to method");
            return Err(EngineError::NoProviderAvailable {
                method: call.method,
                failures: Vec::new(),
            });
        }

        match Strategy::for_kind(kind) {
            Strategy::Race(mode) => self.race(mode, providers, call, cancel).await,
            Strategy::Sequential => self.fallback(providers, call, cancel).await,
        }
    }

    async fn race(
        &self,
        mode: RaceMode,
        providers: Vec<Provider>,
        call: CallPayload,
        cancel: &CancellationToken,
    ) -> Result<Envelope, EngineError> {
        let scope = cancel.child_token();
        let call = Arc::new(call);

        let contenders: Vec<_> = providers
            .into_iter()
            .map(|provider| {
                let invoker = Arc::clone(&self.invoker);
                let call = Arc::clone(&call);
                let token = scope.clone();
                async move {
                    let outcome = invoker.invoke(&provider, &call, &token).await;
                    if let Err(ref e) = outcome {
                        if !e.is_cancelled() {
                            tracing::warn!(
                                provider = %provider.slug,
                                method = %call.method,
                                error = %e,
                                "Provider call failed"
                            );
                        }
                    }
                    outcome
                }
            })
            .collect();

        match race::first_success(contenders, &scope, mode).await {
            Settlement::Settled(envelope) => {
                tracing::info!(
                    method = %call.method,
                    provider = %envelope.provider,
                    ?mode,
                    "Dispatch settled"
                );
                Ok(envelope)
            }
            Settlement::AllFailed(failures) => Err(first_failure(&call.method, failures)),
            Settlement::Cancelled => {
                tracing::info!(method = %call.method, "Dispatch cancelled by caller");
                Err(EngineError::Cancelled)
            }
        }
    }

    async fn fallback(
        &self,
        providers: Vec<Provider>,
        call: CallPayload,
        cancel: &CancellationToken,
    ) -> Result<Envelope, EngineError> {
        let mut failures = Vec::new();

        for provider in &providers {
            if cancel.is_cancelled() {
                return Err(EngineError::Cancelled);
            }

            match self.invoker.invoke(provider, &call, cancel).await {
                Ok(envelope) => {
                    tracing::info!(
                        method = %call.method,
                        provider = %provider.slug,
                        attempts = failures.len() + 1,
                        "Fallback dispatch settled"
                    );
                    return Ok(envelope);
                }
                Err(e) if e.is_cancelled() => return Err(EngineError::Cancelled),
                Err(e) => {
                    tracing::warn!(
                        provider = %provider.slug,
                        method = %call.method,
                        error = %e,
                        "Provider failed, trying next"
                    );
                    failures.push(e.to_string());
                }
            }
        }

        Err(EngineError::NoProviderAvailable {
            method: call.method,
            failures,
        })
    }
}

/// Error of a race in which every provider failed.
fn first_failure(method: &str, failures: Vec<ProviderError>) -> EngineError {
    match failures.into_iter().next() {
        Some(first) => EngineError::Provider(first),
        None => EngineError::NoProviderAvailable {
            method: method.to_string(),
            failures: Vec::new(),
        },
    }
}
