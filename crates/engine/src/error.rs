//! Error taxonomy of the orchestration engine.
//!
//! [`ProviderError`] describes what went wrong with one provider call and
//! stays inside the coordinator; [`EngineError`] is what callers of the
//! engine and the admin catalog see.

use fedits_core::error::CoreError;
use fedits_core::secret::CryptoError;
use fedits_db::RegistryError;

// ---------------------------------------------------------------------------
// ProviderError
// ---------------------------------------------------------------------------

/// Failure of a single provider invocation.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The stored secret could not be opened; only this provider is affected.
    #[error("Secret of provider '{provider}' could not be decrypted: {source}")]
    SecretDecryption {
        provider: String,
        source: CryptoError,
    },

    /// Network, DNS, TLS or timeout failure.
    #[error("Provider '{provider}' is unreachable: {source}")]
    Unreachable {
        provider: String,
        source: reqwest::Error,
    },

    /// The webhook answered with a non-2xx status.
    #[error("Provider '{provider}' rejected the call with HTTP {status}")]
    Rejected { provider: String, status: u16 },

    /// The webhook answered 2xx with a body that is not JSON.
    #[error("Provider '{provider}' returned a malformed body: {reason}")]
    MalformedResponse { provider: String, reason: String },

    /// The call was abandoned because its cancellation token fired.
    #[error("Call to provider '{provider}' was cancelled")]
    Cancelled { provider: String },

    #[error("Call payload could not be serialized: {0}")]
    Payload(#[from] serde_json::Error),
}

impl ProviderError {
    /// Slug of the provider the error belongs to, if any.
    pub fn provider(&self) -> Option<&str> {
        match self {
            ProviderError::SecretDecryption { provider, .. }
            | ProviderError::Unreachable { provider, .. }
            | ProviderError::Rejected { provider, .. }
            | ProviderError::MalformedResponse { provider, .. }
            | ProviderError::Cancelled { provider } => Some(provider),
            ProviderError::Payload(_) => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ProviderError::Cancelled { .. })
    }
}

// ---------------------------------------------------------------------------
// EngineError
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Method '{0}' not found")]
    MethodNotFound(String),

    #[error("Provider '{0}' not found")]
    ProviderNotFound(String),

    /// Every eligible provider failed (or there were none). `failures` keeps
    /// the per-provider reasons for diagnostics only.
    #[error("No provider could handle method '{method}'")]
    NoProviderAvailable {
        method: String,
        failures: Vec<String>,
    },

    /// A concurrent dispatch where every provider failed: the first failure
    /// to arrive.
    #[error(transparent)]
    Provider(ProviderError),

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// The caller's cancellation token fired before the dispatch settled.
    #[error("Dispatch was cancelled")]
    Cancelled,

    #[error("Crypto error: {0}")]
    Crypto(#[from] CryptoError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Registry error: {0}")]
    Registry(RegistryError),
}

impl From<RegistryError> for EngineError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::Duplicate { .. } => EngineError::Conflict(err.to_string()),
            RegistryError::UnknownMethod(name) => {
                EngineError::Validation(format!("Unknown method: '{name}'"))
            }
            other => EngineError::Registry(other),
        }
    }
}

impl From<CoreError> for EngineError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(msg) => EngineError::Validation(msg),
        }
    }
}

impl From<validator::ValidationErrors> for EngineError {
    fn from(errors: validator::ValidationErrors) -> Self {
        EngineError::Validation(errors.to_string())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn duplicate_maps_to_conflict() {
        let err: EngineError = RegistryError::Duplicate {
            entity: "Provider",
            key: "acme".into(),
        }
        .into();
        assert_matches!(err, EngineError::Conflict(msg) if msg.contains("acme"));
    }

    #[test]
    fn unknown_method_binding_maps_to_validation() {
        let err: EngineError = RegistryError::UnknownMethod("ghost".into()).into();
        assert_matches!(err, EngineError::Validation(msg) if msg.contains("ghost"));
    }

    #[test]
    fn provider_error_display() {
        let err = ProviderError::Rejected {
            provider: "acme".into(),
            status: 502,
        };
        assert_eq!(err.to_string(), "Provider 'acme' rejected the call with HTTP 502");
        assert_eq!(err.provider(), Some("acme"));
    }

    #[test]
    fn no_provider_display_hides_failures() {
        let err = EngineError::NoProviderAvailable {
            method: "ping".into(),
            failures: vec!["secret detail".into()],
        };
        assert_eq!(err.to_string(), "No provider could handle method 'ping'");
    }
}
