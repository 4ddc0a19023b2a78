//! Administrative catalog: registering methods and managing providers.
//!
//! Provider secrets are sealed with the [`SecretCodec`] before they reach the
//! registry. Updates and deletions must carry an `X-Signature` made with the
//! provider's *current* secret over the canonical bytes of the mutation.

use std::sync::Arc;

use fedits_core::secret::SecretCodec;
use fedits_core::signing;
use fedits_core::validation::{
    validate_param_tags, validate_result_structure, validate_webhook_scheme,
};
use fedits_db::models::method::{CreateMethod, Method};
use fedits_db::models::provider::{
    CreateProvider, NewProvider, Provider, ProviderChanges, ProviderDeletion, ProviderUpdate,
};
use fedits_db::Registry;
use validator::Validate;

use crate::error::EngineError;

/// Method and provider administration on top of a [`Registry`].
#[derive(Clone)]
pub struct Catalog {
    registry: Arc<dyn Registry>,
    codec: SecretCodec,
}

impl Catalog {
    pub fn new(registry: Arc<dyn Registry>, codec: SecretCodec) -> Self {
        Self { registry, codec }
    }

    // -- methods ------------------------------------------------------------

    pub async fn create_method(&self, input: CreateMethod) -> Result<Method, EngineError> {
        input.validate()?;
        validate_param_tags(&input.params)?;
        validate_result_structure(&input.result_structure)?;

        let method = self.registry.create_method(&input).await?;
        tracing::info!(method = %method.name, kind = %method.kind, "Method registered");
        Ok(method)
    }

    pub async fn list_methods(&self) -> Result<Vec<Method>, EngineError> {
        Ok(self.registry.list_methods().await?)
    }

    pub async fn get_method(&self, name: &str) -> Result<Method, EngineError> {
        self.registry
            .find_method_by_name(name)
            .await?
            .ok_or_else(|| EngineError::MethodNotFound(name.to_string()))
    }

    // -- providers ----------------------------------------------------------

    pub async fn create_provider(&self, input: CreateProvider) -> Result<Provider, EngineError> {
        input.validate()?;
        validate_webhook_scheme(&input.webhook)?;

        let new_provider = NewProvider {
            sealed_secret: self.codec.encrypt(&input.secret)?,
            slug: input.slug,
            name: input.name,
            contact: input.contact,
            webhook: input.webhook,
            methods: input.methods,
        };
        let provider = self.registry.create_provider(&new_provider).await?;
        tracing::info!(
            provider = %provider.slug,
            methods = ?new_provider.methods,
            "Provider registered"
        );
        Ok(provider)
    }

    pub async fn get_provider(&self, slug: &str) -> Result<Provider, EngineError> {
        self.registry
            .find_provider_by_slug(slug)
            .await?
            .ok_or_else(|| EngineError::ProviderNotFound(slug.to_string()))
    }

    /// Providers bound to `method`, in listing order.
    pub async fn list_providers(&self, method: &str) -> Result<Vec<Provider>, EngineError> {
        let method = self.get_method(method).await?;
        Ok(self.registry.find_eligible_providers(&method.name).await?)
    }

    /// Apply a signed partial update to a provider.
    ///
    /// The signature is checked against the secret stored *before* the
    /// update; a new secret only applies to later requests.
    pub async fn update_provider(
        &self,
        slug: &str,
        signature: &str,
        update: ProviderUpdate,
    ) -> Result<Provider, EngineError> {
        let current = self.get_provider(slug).await?;
        self.check_signature(&current, &update.canonical_bytes()?, signature)?;

        update.validate()?;
        if let Some(ref webhook) = update.webhook {
            validate_webhook_scheme(webhook)?;
        }

        let changes = ProviderChanges {
            sealed_secret: update
                .secret
                .as_deref()
                .map(|secret| self.codec.encrypt(secret))
                .transpose()?,
            name: update.name,
            contact: update.contact,
            webhook: update.webhook,
            methods: update.methods,
        };

        let provider = self
            .registry
            .update_provider(slug, &changes)
            .await?
            .ok_or_else(|| EngineError::ProviderNotFound(slug.to_string()))?;
        tracing::info!(
            provider = %provider.slug,
            secret_rotated = changes.sealed_secret.is_some(),
            "Provider updated"
        );
        Ok(provider)
    }

    /// Remove a provider after checking the signature over `{"slug": ...}`.
    pub async fn delete_provider(&self, slug: &str, signature: &str) -> Result<(), EngineError> {
        let current = self.get_provider(slug).await?;
        let payload = ProviderDeletion::new(slug).canonical_bytes()?;
        self.check_signature(&current, &payload, signature)?;

        if !self.registry.delete_provider(slug).await? {
            return Err(EngineError::ProviderNotFound(slug.to_string()));
        }
        tracing::info!(provider = %slug, "Provider deleted");
        Ok(())
    }

    fn check_signature(
        &self,
        provider: &Provider,
        payload: &[u8],
        signature: &str,
    ) -> Result<(), EngineError> {
        let secret = match self.codec.decrypt(&provider.secret) {
            Ok(secret) => secret,
            Err(e) => {
                tracing::error!(provider = %provider.slug, error = %e, "Stored secret is unreadable");
                return Err(EngineError::InvalidSignature);
            }
        };

        if signing::verify(secret.as_bytes(), payload, signature) {
            Ok(())
        } else {
            tracing::warn!(provider = %provider.slug, "Rejected mutation with invalid signature");
            Err(EngineError::InvalidSignature)
        }
    }
}
