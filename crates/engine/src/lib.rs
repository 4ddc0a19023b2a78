//! Orchestration engine: dispatches method calls to signed provider webhooks.
//!
//! - [`orchestrator::Orchestrator`] resolves a method and dispatches a call.
//! - [`coordinator::Coordinator`] applies the method's dispatch policy.
//! - [`invoker::WebhookInvoker`] performs one signed HTTP call.
//! - [`catalog::Catalog`] administers methods and providers.

pub mod catalog;
pub mod coordinator;
pub mod error;
pub mod invoker;
pub mod orchestrator;
pub mod race;

#[cfg(test)]
mod testing;

pub use catalog::Catalog;
pub use error::{EngineError, ProviderError};
pub use invoker::{ProviderInvoker, WebhookInvoker};
pub use orchestrator::Orchestrator;
