//! Signed webhook invocation of a single provider.
//!
//! [`WebhookInvoker`] opens the provider's sealed secret, signs the exact
//! bytes it is about to send, POSTs them, and parses the JSON answer into an
//! [`Envelope`]. Every call races against a [`CancellationToken`] so the
//! coordinator can abandon losers of a concurrent dispatch.

use std::time::Duration;

use async_trait::async_trait;
use fedits_core::orchestration::{CallPayload, Envelope};
use fedits_core::secret::SecretCodec;
use fedits_core::signing::{self, SIGNATURE_HEADER};
use fedits_db::models::provider::Provider;
use reqwest::header::CONTENT_TYPE;
use tokio_util::sync::CancellationToken;

use crate::error::ProviderError;

/// Default timeout for a single provider call.
pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(10);

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Performs one call against one provider.
#[async_trait]
pub trait ProviderInvoker: Send + Sync {
    /// Invoke `provider` with `call`, giving up with
    /// [`ProviderError::Cancelled`] as soon as `cancel` fires.
    async fn invoke(
        &self,
        provider: &Provider,
        call: &CallPayload,
        cancel: &CancellationToken,
    ) -> Result<Envelope, ProviderError>;
}

// ---------------------------------------------------------------------------
// WebhookInvoker
// ---------------------------------------------------------------------------

/// Invokes providers over HTTP POST with an HMAC-signed body.
pub struct WebhookInvoker {
    client: reqwest::Client,
    codec: SecretCodec,
    version: String,
}

impl WebhookInvoker {
    /// Build an invoker whose HTTP client gives up after `timeout`.
    ///
    /// `version` is stamped on every [`Envelope`] this invoker produces.
    pub fn new(codec: SecretCodec, timeout: Duration, version: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self {
            client,
            codec,
            version: version.into(),
        }
    }

    async fn post(&self, provider: &Provider, call: &CallPayload) -> Result<Envelope, ProviderError> {
        let body = call.to_bytes()?;

        let secret = self
            .codec
            .decrypt(&provider.secret)
            .map_err(|source| ProviderError::SecretDecryption {
                provider: provider.slug.clone(),
                source,
            })?;
        let signature = signing::sign(secret.as_bytes(), &body);
        drop(secret);

        let unreachable = |source| ProviderError::Unreachable {
            provider: provider.slug.clone(),
            source,
        };

        let response = self
            .client
            .post(&provider.webhook)
            .header(CONTENT_TYPE, "application/json")
            .header(SIGNATURE_HEADER, signature)
            .body(body)
            .send()
            .await
            .map_err(unreachable)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Rejected {
                provider: provider.slug.clone(),
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await.map_err(unreachable)?;
        let result = if bytes.iter().all(u8::is_ascii_whitespace) {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).map_err(|e| ProviderError::MalformedResponse {
                provider: provider.slug.clone(),
                reason: e.to_string(),
            })?
        };

        Ok(Envelope {
            provider: provider.name.clone(),
            version: self.version.clone(),
            result,
        })
    }
}

#[async_trait]
impl ProviderInvoker for WebhookInvoker {
    async fn invoke(
        &self,
        provider: &Provider,
        call: &CallPayload,
        cancel: &CancellationToken,
    ) -> Result<Envelope, ProviderError> {
        tracing::debug!(provider = %provider.slug, method = %call.method, "Invoking provider webhook");

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ProviderError::Cancelled {
                provider: provider.slug.clone(),
            }),
            outcome = self.post(provider, call) => outcome,
        }
    }
}
