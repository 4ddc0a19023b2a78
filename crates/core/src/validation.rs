//! Validation rules for method and provider records.
//!
//! Field-level checks (lengths, URL syntax, patterns) are declared on the
//! DTOs with `validator`; the patterns live here so every crate agrees on
//! them. Rules that `validator` cannot express are plain functions.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Method names are camelCase identifiers.
pub const METHOD_NAME_PATTERN: &str = r"^[a-z][a-zA-Z0-9]*$";

/// Provider slugs are lowercase words joined by single hyphens.
pub const SLUG_PATTERN: &str = r"^[a-z0-9]+(?:-[a-z0-9]+)*$";

/// Maximum number of declared parameters on a method.
pub const MAX_PARAMS: usize = 64;

pub static METHOD_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(METHOD_NAME_PATTERN).expect("valid regex"));

pub static SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(SLUG_PATTERN).expect("valid regex"));

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// Validate the ordered parameter type tags of a method.
pub fn validate_param_tags(params: &[String]) -> Result<(), CoreError> {
    if params.is_empty() {
        return Err(CoreError::Validation(
            "params must declare at least one type tag".into(),
        ));
    }
    if params.len() > MAX_PARAMS {
        return Err(CoreError::Validation(format!(
            "params must declare at most {MAX_PARAMS} type tags"
        )));
    }
    if let Some(pos) = params.iter().position(|p| p.trim().is_empty()) {
        return Err(CoreError::Validation(format!(
            "params[{pos}] must not be blank"
        )));
    }
    Ok(())
}

/// The declared result structure must be a JSON object.
pub fn validate_result_structure(value: &serde_json::Value) -> Result<(), CoreError> {
    if value.is_object() {
        Ok(())
    } else {
        Err(CoreError::Validation(
            "result_structure must be a JSON object".into(),
        ))
    }
}

/// Webhooks must be reachable over HTTP(S).
pub fn validate_webhook_scheme(webhook: &str) -> Result<(), CoreError> {
    let lower = webhook.trim().to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "webhook must use http or https: '{webhook}'"
        )))
    }
}
