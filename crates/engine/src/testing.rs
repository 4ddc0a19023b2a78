//! Scripted [`ProviderInvoker`] for exercising dispatch policies without HTTP.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use fedits_core::orchestration::{CallPayload, Envelope};
use fedits_db::models::provider::Provider;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::error::ProviderError;
use crate::invoker::ProviderInvoker;

pub const VERSION: &str = "test";

#[derive(Clone)]
struct Script {
    delay: Duration,
    outcome: Result<Value, u16>,
}

/// Answers each provider (by slug) after a fixed delay with a fixed outcome,
/// recording which calls started, completed and were cancelled.
#[derive(Default)]
pub struct ScriptedInvoker {
    scripts: HashMap<String, Script>,
    started: Mutex<Vec<String>>,
    completed: Mutex<Vec<String>>,
    cancelled: Mutex<Vec<String>>,
}

impl ScriptedInvoker {
    pub fn new() -> Self {
        Self::default()
    }

    /// `slug` answers `result` after `delay_ms`.
    pub fn succeed(mut self, slug: &str, delay_ms: u64, result: Value) -> Self {
        self.scripts.insert(
            slug.to_string(),
            Script {
                delay: Duration::from_millis(delay_ms),
                outcome: Ok(result),
            },
        );
        self
    }

    /// `slug` answers HTTP `status` after `delay_ms`.
    pub fn fail(mut self, slug: &str, delay_ms: u64, status: u16) -> Self {
        self.scripts.insert(
            slug.to_string(),
            Script {
                delay: Duration::from_millis(delay_ms),
                outcome: Err(status),
            },
        );
        self
    }

    pub fn started(&self) -> Vec<String> {
        self.started.lock().unwrap().clone()
    }

    pub fn completed(&self) -> Vec<String> {
        self.completed.lock().unwrap().clone()
    }

    pub fn cancelled(&self) -> Vec<String> {
        self.cancelled.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProviderInvoker for ScriptedInvoker {
    async fn invoke(
        &self,
        provider: &Provider,
        _call: &CallPayload,
        cancel: &CancellationToken,
    ) -> Result<Envelope, ProviderError> {
        let slug = provider.slug.clone();
        self.started.lock().unwrap().push(slug.clone());

        let script = self.scripts.get(&slug).cloned().unwrap_or(Script {
            delay: Duration::ZERO,
            outcome: Err(404),
        });

        tokio::select! {
            _ = tokio::time::sleep(script.delay) => {}
            _ = cancel.cancelled() => {
                self.cancelled.lock().unwrap().push(slug.clone());
                return Err(ProviderError::Cancelled { provider: slug });
            }
        }
        self.completed.lock().unwrap().push(slug.clone());

        match script.outcome {
            Ok(result) => Ok(Envelope {
                provider: provider.name.clone(),
                version: VERSION.to_string(),
                result,
            }),
            Err(status) => Err(ProviderError::Rejected {
                provider: slug,
                status,
            }),
        }
    }
}

/// A provider row whose name is the upper-cased slug.
pub fn provider(slug: &str) -> Provider {
    let now = chrono::Utc::now();
    Provider {
        id: 0,
        slug: slug.to_string(),
        name: slug.to_uppercase(),
        contact: None,
        webhook: format!("http://{slug}.invalid/hook"),
        secret: String::new(),
        created_at: now,
        updated_at: now,
    }
}
