//! Repository for the `providers` and `method_providers` tables.

use fedits_core::types::DbId;
use sqlx::PgPool;

use crate::models::provider::{NewProvider, Provider, ProviderChanges};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, slug, name, contact, webhook, secret, created_at, updated_at";

/// Same columns, qualified for joins.
const JOINED_COLUMNS: &str = "p.id, p.slug, p.name, p.contact, p.webhook, p.secret, \
                              p.created_at, p.updated_at";

/// Provides CRUD operations for providers and their method bindings.
pub struct ProviderRepo;

impl ProviderRepo {
    /// Insert a provider and bind it to `input.methods` in one transaction.
    pub async fn create(pool: &PgPool, input: &NewProvider) -> Result<Provider, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let insert_query = format!(
            "INSERT INTO providers (slug, name, contact, webhook, secret) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        let provider = sqlx::query_as::<_, Provider>(&insert_query)
            .bind(&input.slug)
            .bind(&input.name)
            .bind(&input.contact)
            .bind(&input.webhook)
            .bind(&input.sealed_secret)
            .fetch_one(&mut *tx)
            .await?;

        if !input.methods.is_empty() {
            Self::set_methods_inner(&mut tx, provider.id, &input.methods).await?;
        }

        tx.commit().await?;
        Ok(provider)
    }

    /// Find a provider by its unique slug.
    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Provider>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM providers WHERE slug = $1");
        sqlx::query_as::<_, Provider>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// List the providers bound to a method, in binding order.
    pub async fn list_for_method(
        pool: &PgPool,
        method_name: &str,
    ) -> Result<Vec<Provider>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} \
             FROM providers p \
             JOIN method_providers mp ON mp.provider_id = p.id \
             JOIN methods m ON m.id = mp.method_id \
             WHERE m.name = $1 \
             ORDER BY mp.created_at, p.id"
        );
        sqlx::query_as::<_, Provider>(&query)
            .bind(method_name)
            .fetch_all(pool)
            .await
    }

    /// Apply a partial update. Returns `None` when no provider has `slug`.
    pub async fn update(
        pool: &PgPool,
        slug: &str,
        changes: &ProviderChanges,
    ) -> Result<Option<Provider>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let update_query = format!(
            "UPDATE providers SET \
                name = COALESCE($2, name), \
                contact = COALESCE($3, contact), \
                webhook = COALESCE($4, webhook), \
                secret = COALESCE($5, secret), \
                updated_at = now() \
             WHERE slug = $1 \
             RETURNING {COLUMNS}"
        );
        let provider = sqlx::query_as::<_, Provider>(&update_query)
            .bind(slug)
            .bind(&changes.name)
            .bind(&changes.contact)
            .bind(&changes.webhook)
            .bind(&changes.sealed_secret)
            .fetch_optional(&mut *tx)
            .await?;

        if let Some(ref provider) = provider {
            if let Some(ref methods) = changes.methods {
                Self::set_methods_inner(&mut tx, provider.id, methods).await?;
            }
        }

        tx.commit().await?;
        Ok(provider)
    }

    /// Delete a provider; bindings go with it. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, slug: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM providers WHERE slug = $1")
            .bind(slug)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Return the names in `names` that do not match any registered method.
    pub async fn unknown_methods(pool: &PgPool, names: &[String]) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>(
            "SELECT n FROM unnest($1::TEXT[]) AS n \
             WHERE NOT EXISTS (SELECT 1 FROM methods m WHERE m.name = n)",
        )
        .bind(names)
        .fetch_all(pool)
        .await
    }

    /// Make the provider's bindings equal `method_names` (within an existing
    /// transaction). Bindings that survive keep their original `created_at`,
    /// so the provider's position in other methods' listings is unchanged.
    async fn set_methods_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        provider_id: DbId,
        method_names: &[String],
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "DELETE FROM method_providers mp USING methods m \
             WHERE mp.method_id = m.id AND mp.provider_id = $1 AND m.name <> ALL($2)",
        )
        .bind(provider_id)
        .bind(method_names)
        .execute(&mut **tx)
        .await?;

        sqlx::query(
            "INSERT INTO method_providers (method_id, provider_id) \
             SELECT id, $2 FROM methods WHERE name = ANY($1) \
             ON CONFLICT (method_id, provider_id) DO NOTHING",
        )
        .bind(method_names)
        .bind(provider_id)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }
}
