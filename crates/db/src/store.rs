//! Encrypted settings store: the integration repository composed with the
//! vault.
//!
//! Callers hand this layer plaintext [`IntegrationSettings`] and receive
//! them back decrypted; ciphertext never crosses this boundary in either
//! direction. The store is handed its pool and vault explicitly so callers
//! control wiring.

use std::sync::Arc;

use hotelhub_core::catalog::IntegrationSettings;
use hotelhub_core::types::DbId;
use hotelhub_core::vault::{Vault, VaultError};
use sqlx::PgPool;

use crate::models::integration::{IntegrationRecord, Provider, SyncStatus};
use crate::repositories::IntegrationRepo;

/// Errors from store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Vault(#[from] VaultError),
}

/// Per-hotel, per-provider persistence of encrypted integration settings.
#[derive(Clone)]
pub struct IntegrationStore {
    pool: PgPool,
    vault: Arc<Vault>,
}

impl IntegrationStore {
    pub fn new(pool: PgPool, vault: Arc<Vault>) -> Self {
        Self { pool, vault }
    }

    /// Encrypt `settings` and upsert the record, returning its id.
    pub async fn save(
        &self,
        hotel_id: DbId,
        provider: Provider,
        settings: &IntegrationSettings,
        is_active: bool,
    ) -> Result<DbId, StoreError> {
        let encrypted = self.vault.encrypt_json(settings)?;
        let record =
            IntegrationRepo::upsert(&self.pool, hotel_id, provider, &encrypted, is_active)
                .await?;
        tracing::debug!(hotel_id, provider = %provider, record_id = record.id, "Saved integration settings");
        Ok(record.id)
    }

    /// Fetch the raw record, ciphertext included.
    pub async fn get(
        &self,
        hotel_id: DbId,
        provider: Provider,
    ) -> Result<Option<IntegrationRecord>, StoreError> {
        Ok(IntegrationRepo::find_by_hotel_provider(&self.pool, hotel_id, provider).await?)
    }

    /// Fetch and decrypt the settings for an integration.
    ///
    /// A decryption failure here is a hard error; downgrading it is the
    /// reconciliation engine's call, not the store's.
    pub async fn get_settings(
        &self,
        hotel_id: DbId,
        provider: Provider,
    ) -> Result<Option<IntegrationSettings>, StoreError> {
        let Some(record) = self.get(hotel_id, provider).await? else {
            return Ok(None);
        };
        if record.settings.is_empty() {
            return Ok(None);
        }
        Ok(Some(self.vault.decrypt_json(&record.settings)?))
    }

    /// Record the outcome of a sync attempt. Never touches settings or the
    /// active flag.
    pub async fn update_sync_status(
        &self,
        hotel_id: DbId,
        provider: Provider,
        status: SyncStatus,
        message: &str,
    ) -> Result<bool, StoreError> {
        Ok(
            IntegrationRepo::update_sync_status(&self.pool, hotel_id, provider, status, message)
                .await?,
        )
    }

    /// Delete an integration. Returns `true` if a record was removed.
    pub async fn delete(&self, hotel_id: DbId, provider: Provider) -> Result<bool, StoreError> {
        Ok(IntegrationRepo::delete(&self.pool, hotel_id, provider).await?)
    }

    /// Whether the integration exists and is marked active.
    pub async fn is_active(
        &self,
        hotel_id: DbId,
        provider: Provider,
    ) -> Result<bool, StoreError> {
        Ok(self
            .get(hotel_id, provider)
            .await?
            .map(|record| record.is_active)
            .unwrap_or(false))
    }
}
