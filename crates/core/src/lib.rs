//! Domain primitives shared by every fedits crate.
//!
//! Nothing in here performs I/O: the secret codec, the request signer, the
//! dispatch-kind vocabulary, the wire payloads and the input validation
//! rules are all pure so the engine, the registry and the HTTP layer can
//! depend on them without pulling each other in.

pub mod dispatch;
pub mod error;
pub mod orchestration;
pub mod secret;
pub mod signing;
pub mod types;
pub mod validation;
