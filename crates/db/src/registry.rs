//! The registry seam consumed by the orchestration engine and the admin
//! catalog.
//!
//! [`Registry`] is the narrow interface through which methods, providers
//! and their bindings are read and written. [`PgRegistry`] backs it with
//! the Postgres repositories; [`crate::memory::InMemoryRegistry`] offers the
//! same contract without a database.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::models::method::{CreateMethod, Method};
use crate::models::provider::{NewProvider, Provider, ProviderChanges};
use crate::repositories::{MethodRepo, ProviderRepo};

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// A uniqueness invariant (`methods.name`, `providers.slug`) would break.
    #[error("{entity} '{key}' already exists")]
    Duplicate { entity: &'static str, key: String },

    /// A binding names a method that is not registered.
    #[error("Unknown method: '{0}'")]
    UnknownMethod(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// PostgreSQL unique constraint violation.
const UNIQUE_VIOLATION: &str = "23505";

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().as_deref() == Some(UNIQUE_VIOLATION),
        _ => false,
    }
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Read/write access to the method and provider registry.
#[async_trait]
pub trait Registry: Send + Sync {
    /// Confirm the backing store is reachable.
    async fn health_check(&self) -> Result<(), RegistryError>;

    async fn find_method_by_name(&self, name: &str) -> Result<Option<Method>, RegistryError>;

    async fn list_methods(&self) -> Result<Vec<Method>, RegistryError>;

    /// Fails with [`RegistryError::Duplicate`] if the name is taken.
    async fn create_method(&self, input: &CreateMethod) -> Result<Method, RegistryError>;

    /// Providers bound to `method`, in a stable listing order. Unknown
    /// methods yield an empty list.
    async fn find_eligible_providers(&self, method: &str) -> Result<Vec<Provider>, RegistryError>;

    async fn find_provider_by_slug(&self, slug: &str) -> Result<Option<Provider>, RegistryError>;

    /// Fails with [`RegistryError::Duplicate`] if the slug is taken and with
    /// [`RegistryError::UnknownMethod`] if a binding names no method.
    async fn create_provider(&self, input: &NewProvider) -> Result<Provider, RegistryError>;

    /// Returns `None` when no provider has `slug`.
    async fn update_provider(
        &self,
        slug: &str,
        changes: &ProviderChanges,
    ) -> Result<Option<Provider>, RegistryError>;

    /// Returns `true` if a provider was removed.
    async fn delete_provider(&self, slug: &str) -> Result<bool, RegistryError>;
}

// ---------------------------------------------------------------------------
// PgRegistry
// ---------------------------------------------------------------------------

/// [`Registry`] backed by the Postgres repositories.
#[derive(Clone)]
pub struct PgRegistry {
    pool: PgPool,
}

impl PgRegistry {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn ensure_methods_exist(&self, names: &[String]) -> Result<(), RegistryError> {
        if names.is_empty() {
            return Ok(());
        }
        let unknown = ProviderRepo::unknown_methods(&self.pool, names).await?;
        match unknown.into_iter().next() {
            Some(name) => Err(RegistryError::UnknownMethod(name)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Registry for PgRegistry {
    async fn health_check(&self) -> Result<(), RegistryError> {
        Ok(crate::health_check(&self.pool).await?)
    }

    async fn find_method_by_name(&self, name: &str) -> Result<Option<Method>, RegistryError> {
        Ok(MethodRepo::find_by_name(&self.pool, name).await?)
    }

    async fn list_methods(&self) -> Result<Vec<Method>, RegistryError> {
        Ok(MethodRepo::list(&self.pool).await?)
    }

    async fn create_method(&self, input: &CreateMethod) -> Result<Method, RegistryError> {
        MethodRepo::create(&self.pool, input).await.map_err(|e| {
            if is_unique_violation(&e) {
                RegistryError::Duplicate {
                    entity: "Method",
                    key: input.name.clone(),
                }
            } else {
                e.into()
            }
        })
    }

    async fn find_eligible_providers(&self, method: &str) -> Result<Vec<Provider>, RegistryError> {
        Ok(ProviderRepo::list_for_method(&self.pool, method).await?)
    }

    async fn find_provider_by_slug(&self, slug: &str) -> Result<Option<Provider>, RegistryError> {
        Ok(ProviderRepo::find_by_slug(&self.pool, slug).await?)
    }

    async fn create_provider(&self, input: &NewProvider) -> Result<Provider, RegistryError> {
        self.ensure_methods_exist(&input.methods).await?;
        ProviderRepo::create(&self.pool, input).await.map_err(|e| {
            if is_unique_violation(&e) {
                RegistryError::Duplicate {
                    entity: "Provider",
                    key: input.slug.clone(),
                }
            } else {
                e.into()
            }
        })
    }

    async fn update_provider(
        &self,
        slug: &str,
        changes: &ProviderChanges,
    ) -> Result<Option<Provider>, RegistryError> {
        if let Some(ref methods) = changes.methods {
            self.ensure_methods_exist(methods).await?;
        }
        Ok(ProviderRepo::update(&self.pool, slug, changes).await?)
    }

    async fn delete_provider(&self, slug: &str) -> Result<bool, RegistryError> {
        Ok(ProviderRepo::delete(&self.pool, slug).await?)
    }
}
