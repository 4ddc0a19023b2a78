//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod method_repo;
pub mod provider_repo;

pub use method_repo::MethodRepo;
pub use provider_repo::ProviderRepo;
