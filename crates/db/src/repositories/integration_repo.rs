//! Repository for the `hotel_integrations` table.

use hotelhub_core::types::DbId;
use sqlx::PgPool;

use crate::models::integration::{IntegrationInfo, IntegrationRecord, Provider, SyncStatus};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, hotel_id, provider, settings, is_active, \
    last_synced, last_sync_status, last_sync_message, created_at, updated_at";

/// Provides CRUD operations for hotel integration records.
///
/// Settings arrive here already encrypted; this layer never sees plaintext.
pub struct IntegrationRepo;

impl IntegrationRepo {
    /// Upsert an integration: insert or update if one already exists for
    /// the hotel/provider pair. Only `settings`, `is_active`, and
    /// `updated_at` are touched on conflict; sync tracking fields are owned
    /// by [`update_sync_status`](Self::update_sync_status).
    pub async fn upsert(
        pool: &PgPool,
        hotel_id: DbId,
        provider: Provider,
        encrypted_settings: &str,
        is_active: bool,
    ) -> Result<IntegrationRecord, sqlx::Error> {
        let query = format!(
            "INSERT INTO hotel_integrations (hotel_id, provider, settings, is_active)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (hotel_id, provider) DO UPDATE SET
                settings = EXCLUDED.settings,
                is_active = EXCLUDED.is_active,
                updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, IntegrationRecord>(&query)
            .bind(hotel_id)
            .bind(provider.as_str())
            .bind(encrypted_settings)
            .bind(is_active)
            .fetch_one(pool)
            .await
    }

    /// Find an integration by hotel and provider.
    pub async fn find_by_hotel_provider(
        pool: &PgPool,
        hotel_id: DbId,
        provider: Provider,
    ) -> Result<Option<IntegrationRecord>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM hotel_integrations WHERE hotel_id = $1 AND provider = $2"
        );
        sqlx::query_as::<_, IntegrationRecord>(&query)
            .bind(hotel_id)
            .bind(provider.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Find an integration by primary key.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<IntegrationRecord>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM hotel_integrations WHERE id = $1");
        sqlx::query_as::<_, IntegrationRecord>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all integrations for a hotel (safe info only, no settings blob).
    pub async fn list_by_hotel(
        pool: &PgPool,
        hotel_id: DbId,
    ) -> Result<Vec<IntegrationInfo>, sqlx::Error> {
        let rows: Vec<IntegrationInfo> = sqlx::query_as(
            "SELECT provider, is_active, last_synced, last_sync_status, last_sync_message \
             FROM hotel_integrations WHERE hotel_id = $1 ORDER BY provider",
        )
        .bind(hotel_id)
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }

    /// Delete an integration. Returns `true` if a row was deleted.
    pub async fn delete(
        pool: &PgPool,
        hotel_id: DbId,
        provider: Provider,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM hotel_integrations WHERE hotel_id = $1 AND provider = $2")
                .bind(hotel_id)
                .bind(provider.as_str())
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Record the outcome of a sync attempt without touching settings or
    /// the active flag, so a failed sync never overwrites working
    /// credentials. Returns `true` if the record existed.
    pub async fn update_sync_status(
        pool: &PgPool,
        hotel_id: DbId,
        provider: Provider,
        status: SyncStatus,
        message: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE hotel_integrations SET \
                last_synced = NOW(), \
                last_sync_status = $3, \
                last_sync_message = $4, \
                updated_at = NOW() \
             WHERE hotel_id = $1 AND provider = $2",
        )
        .bind(hotel_id)
        .bind(provider.as_str())
        .bind(status.as_str())
        .bind(message)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
