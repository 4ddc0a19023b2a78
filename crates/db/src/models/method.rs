//! Method model and DTOs.

use fedits_core::dispatch::DispatchKind;
use fedits_core::types::{DbId, Timestamp};
use fedits_core::validation::METHOD_NAME_RE;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `methods` table.
///
/// `name` is unique and never changes after creation.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Method {
    #[serde(skip_serializing)]
    pub id: DbId,
    pub name: String,
    pub params: Vec<String>,
    pub description: String,
    pub result_structure: serde_json::Value,
    #[sqlx(try_from = "String")]
    pub kind: DispatchKind,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for registering a new method.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateMethod {
    #[validate(
        length(min = 1, max = 128),
        regex(path = *METHOD_NAME_RE, message = "name must be camelCase")
    )]
    pub name: String,
    pub params: Vec<String>,
    #[validate(length(min = 1, message = "description must not be empty"))]
    pub description: String,
    #[serde(default = "empty_object")]
    pub result_structure: serde_json::Value,
    #[serde(default)]
    pub kind: DispatchKind,
}

fn empty_object() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}
