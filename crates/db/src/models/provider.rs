//! Provider model, DTOs and the canonical payloads of signed mutations.

use fedits_core::types::{DbId, Timestamp};
use fedits_core::validation::SLUG_RE;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `providers` table.
///
/// **Note:** `secret` holds the sealed secret and is never serialized to
/// responses.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Provider {
    #[serde(skip_serializing)]
    pub id: DbId,
    pub slug: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    pub webhook: String,
    #[serde(skip_serializing)]
    pub secret: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for registering a provider. `secret` is plaintext here and is
/// sealed before it reaches the registry.
#[derive(Clone, Deserialize, Validate)]
pub struct CreateProvider {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    #[serde(default)]
    pub contact: Option<String>,
    #[validate(
        length(min = 1, max = 128),
        regex(path = *SLUG_RE, message = "slug must be lowercase words joined by hyphens")
    )]
    pub slug: String,
    #[validate(url(message = "webhook must be a valid URL"))]
    pub webhook: String,
    #[validate(length(min = 1, message = "secret must not be empty"))]
    pub secret: String,
    /// Names of the methods this provider implements.
    #[serde(default)]
    pub methods: Vec<String>,
}

impl std::fmt::Debug for CreateProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateProvider")
            .field("name", &self.name)
            .field("contact", &self.contact)
            .field("slug", &self.slug)
            .field("webhook", &self.webhook)
            .field("secret", &"<redacted>")
            .field("methods", &self.methods)
            .finish()
    }
}

/// A provider ready for insertion: the secret is already sealed.
#[derive(Debug, Clone)]
pub struct NewProvider {
    pub slug: String,
    pub name: String,
    pub contact: Option<String>,
    pub webhook: String,
    pub sealed_secret: String,
    pub methods: Vec<String>,
}

/// Patch body for `PATCH /providers/{slug}`.
///
/// This struct is also the canonical signed form of an update: the caller
/// signs `serde_json::to_vec(&update)` with absent fields omitted and the
/// fields in declaration order.
#[derive(Clone, Default, Serialize, Deserialize, Validate)]
pub struct ProviderUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(url(message = "webhook must be a valid URL"))]
    pub webhook: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "secret must not be empty"))]
    pub secret: Option<String>,
    /// When present, replaces the full set of bound methods.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub methods: Option<Vec<String>>,
}

impl ProviderUpdate {
    /// Bytes covered by the `X-Signature` of an update request.
    pub fn canonical_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}

impl std::fmt::Debug for ProviderUpdate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderUpdate")
            .field("name", &self.name)
            .field("contact", &self.contact)
            .field("webhook", &self.webhook)
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .field("methods", &self.methods)
            .finish()
    }
}

/// Changes applied by the registry; the secret, if any, is already sealed.
#[derive(Debug, Clone, Default)]
pub struct ProviderChanges {
    pub name: Option<String>,
    pub contact: Option<String>,
    pub webhook: Option<String>,
    pub sealed_secret: Option<String>,
    pub methods: Option<Vec<String>>,
}

/// Canonical signed form of a delete request: `{"slug":"<slug>"}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderDeletion {
    pub slug: String,
}

impl ProviderDeletion {
    pub fn new(slug: impl Into<String>) -> Self {
        Self { slug: slug.into() }
    }

    /// Bytes covered by the `X-Signature` of a delete request.
    pub fn canonical_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}
