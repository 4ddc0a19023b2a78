//! Repository for the `methods` table.

use sqlx::PgPool;

use crate::models::method::{CreateMethod, Method};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, name, params, description, result_structure, kind, created_at, updated_at";

/// Provides CRUD operations for methods.
pub struct MethodRepo;

impl MethodRepo {
    /// Insert a new method, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateMethod) -> Result<Method, sqlx::Error> {
        let query = format!(
            "INSERT INTO methods (name, params, description, result_structure, kind) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Method>(&query)
            .bind(&input.name)
            .bind(&input.params)
            .bind(&input.description)
            .bind(&input.result_structure)
            .bind(input.kind.as_str())
            .fetch_one(pool)
            .await
    }

    /// Find a method by its unique name.
    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Method>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM methods WHERE name = $1");
        sqlx::query_as::<_, Method>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// List all methods ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<Method>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM methods ORDER BY name");
        sqlx::query_as::<_, Method>(&query).fetch_all(pool).await
    }
}
