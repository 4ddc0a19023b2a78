//! Wire payloads exchanged between the orchestrator and providers.

use serde::{Deserialize, Serialize};

/// Body POSTed to a provider webhook.
///
/// Field order is part of the signature contract: the signature covers the
/// serialized bytes, so the layout of this struct must not change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallPayload {
    pub user_ref: String,
    pub method: String,
    pub params: Vec<serde_json::Value>,
}

impl CallPayload {
    pub fn new(
        user_ref: impl Into<String>,
        method: impl Into<String>,
        params: Vec<serde_json::Value>,
    ) -> Self {
        Self {
            user_ref: user_ref.into(),
            method: method.into(),
            params,
        }
    }

    /// Serialize to the canonical bytes that are both signed and sent.
    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}

/// The orchestrator's answer: which provider responded and what it said.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub provider: String,
    pub version: String,
    pub result: serde_json::Value,
}
