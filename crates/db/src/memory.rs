//! In-process [`Registry`] with the same invariants as the Postgres one.
//!
//! Used by tests across the workspace and for running the service without a
//! database. Listing order is insertion order, matching the binding order
//! the Postgres registry returns.

use async_trait::async_trait;
use fedits_core::types::DbId;
use tokio::sync::RwLock;

use crate::models::method::{CreateMethod, Method};
use crate::models::provider::{NewProvider, Provider, ProviderChanges};
use crate::registry::{Registry, RegistryError};

#[derive(Default)]
struct State {
    next_id: DbId,
    methods: Vec<Method>,
    providers: Vec<Provider>,
    /// `(method_id, provider_id)` pairs in binding order.
    bindings: Vec<(DbId, DbId)>,
}

impl State {
    fn allocate_id(&mut self) -> DbId {
        self.next_id += 1;
        self.next_id
    }

    fn method_id(&self, name: &str) -> Option<DbId> {
        self.methods.iter().find(|m| m.name == name).map(|m| m.id)
    }

    fn resolve_methods(&self, names: &[String]) -> Result<Vec<DbId>, RegistryError> {
        let mut ids = Vec::with_capacity(names.len());
        for name in names {
            let id = self
                .method_id(name)
                .ok_or_else(|| RegistryError::UnknownMethod(name.clone()))?;
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        Ok(ids)
    }

    /// Existing pairs keep their position; only new pairs are appended.
    fn bind(&mut self, provider_id: DbId, method_ids: Vec<DbId>) {
        self.bindings
            .retain(|(m, p)| *p != provider_id || method_ids.contains(m));
        for m in method_ids {
            if !self.bindings.contains(&(m, provider_id)) {
                self.bindings.push((m, provider_id));
            }
        }
    }
}

/// A [`Registry`] that keeps everything in memory.
#[derive(Default)]
pub struct InMemoryRegistry {
    state: RwLock<State>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Registry for InMemoryRegistry {
    async fn health_check(&self) -> Result<(), RegistryError> {
        Ok(())
    }

    async fn find_method_by_name(&self, name: &str) -> Result<Option<Method>, RegistryError> {
        let state = self.state.read().await;
        Ok(state.methods.iter().find(|m| m.name == name).cloned())
    }

    async fn list_methods(&self) -> Result<Vec<Method>, RegistryError> {
        let state = self.state.read().await;
        let mut methods = state.methods.clone();
        methods.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(methods)
    }

    async fn create_method(&self, input: &CreateMethod) -> Result<Method, RegistryError> {
        let mut state = self.state.write().await;
        if state.method_id(&input.name).is_some() {
            return Err(RegistryError::Duplicate {
                entity: "Method",
                key: input.name.clone(),
            });
        }

        let now = chrono::Utc::now();
        let method = Method {
            id: state.allocate_id(),
            name: input.name.clone(),
            params: input.params.clone(),
            description: input.description.clone(),
            result_structure: input.result_structure.clone(),
            kind: input.kind,
            created_at: now,
            updated_at: now,
        };
        state.methods.push(method.clone());
        Ok(method)
    }

    async fn find_eligible_providers(&self, method: &str) -> Result<Vec<Provider>, RegistryError> {
        let state = self.state.read().await;
        let Some(method_id) = state.method_id(method) else {
            return Ok(Vec::new());
        };

        Ok(state
            .bindings
            .iter()
            .filter(|(m, _)| *m == method_id)
            .filter_map(|(_, p)| state.providers.iter().find(|provider| provider.id == *p))
            .cloned()
            .collect())
    }

    async fn find_provider_by_slug(&self, slug: &str) -> Result<Option<Provider>, RegistryError> {
        let state = self.state.read().await;
        Ok(state.providers.iter().find(|p| p.slug == slug).cloned())
    }

    async fn create_provider(&self, input: &NewProvider) -> Result<Provider, RegistryError> {
        let mut state = self.state.write().await;
        if state.providers.iter().any(|p| p.slug == input.slug) {
            return Err(RegistryError::Duplicate {
                entity: "Provider",
                key: input.slug.clone(),
            });
        }
        let method_ids = state.resolve_methods(&input.methods)?;

        let now = chrono::Utc::now();
        let provider = Provider {
            id: state.allocate_id(),
            slug: input.slug.clone(),
            name: input.name.clone(),
            contact: input.contact.clone(),
            webhook: input.webhook.clone(),
            secret: input.sealed_secret.clone(),
            created_at: now,
            updated_at: now,
        };
        state.providers.push(provider.clone());
        state.bind(provider.id, method_ids);
        Ok(provider)
    }

    async fn update_provider(
        &self,
        slug: &str,
        changes: &ProviderChanges,
    ) -> Result<Option<Provider>, RegistryError> {
        let mut state = self.state.write().await;
        let method_ids = match changes.methods {
            Some(ref names) => Some(state.resolve_methods(names)?),
            None => None,
        };

        let Some(provider) = state.providers.iter_mut().find(|p| p.slug == slug) else {
            return Ok(None);
        };
        if let Some(ref name) = changes.name {
            provider.name = name.clone();
        }
        if let Some(ref contact) = changes.contact {
            provider.contact = Some(contact.clone());
        }
        if let Some(ref webhook) = changes.webhook {
            provider.webhook = webhook.clone();
        }
        if let Some(ref sealed) = changes.sealed_secret {
            provider.secret = sealed.clone();
        }
        provider.updated_at = chrono::Utc::now();
        let updated = provider.clone();

        if let Some(ids) = method_ids {
            state.bind(updated.id, ids);
        }
        Ok(Some(updated))
    }

    async fn delete_provider(&self, slug: &str) -> Result<bool, RegistryError> {
        let mut state = self.state.write().await;
        let Some(pos) = state.providers.iter().position(|p| p.slug == slug) else {
            return Ok(false);
        };
        let removed = state.providers.remove(pos);
        state.bindings.retain(|(_, p)| *p != removed.id);
        Ok(true)
    }
}
