/// Errors raised by the pure domain rules in this crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoreError {
    /// Input violates a declared rule; the message names the offending field.
    #[error("Validation failed: {0}")]
    Validation(String),
}
