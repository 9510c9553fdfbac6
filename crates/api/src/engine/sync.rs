//! Fetch-and-reconcile orchestration plus the manual save paths.

use hotelhub_core::catalog::{CatalogCategory, IntegrationSettings, NoteType, TaskType};
use hotelhub_core::reconcile;
use hotelhub_core::types::DbId;
use hotelhub_db::models::integration::{Provider, SyncStatus};
use hotelhub_db::store::{IntegrationStore, StoreError};
use hotelhub_providers::{CatalogClient, ClientError};

/// Errors from a sync run or a manual catalog save.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// No stored settings (or no credentials) for this hotel + provider.
    #[error("{0}")]
    CredentialsMissing(String),

    /// The provider fetch failed; nothing was written.
    #[error(transparent)]
    Provider(#[from] ClientError),

    /// The provider returned an empty catalog; nothing was written.
    #[error("Provider returned no {what}")]
    EmptyResult { what: &'static str },

    /// Persistence failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Orchestrates catalog syncs for one store.
///
/// Holds a cloned [`IntegrationStore`] handle; the provider client is
/// injected per call so tests can substitute a mock.
pub struct SyncEngine {
    store: IntegrationStore,
}

impl SyncEngine {
    pub fn new(store: IntegrationStore) -> Self {
        Self { store }
    }

    /// Fetch the site catalog and merge it with the curated structure.
    ///
    /// Fetch errors and empty results abort before any write and record an
    /// `error` sync status. On success the merged structure is persisted
    /// and a `success` status recorded.
    pub async fn sync_sites<C: CatalogClient>(
        &self,
        hotel_id: DbId,
        provider: Provider,
        client: &C,
    ) -> Result<Vec<CatalogCategory>, SyncError> {
        let fresh = match client.fetch_sites().await {
            Ok(rows) => rows,
            Err(err) => {
                self.record_failure(hotel_id, provider, &err.to_string())
                    .await;
                return Err(err.into());
            }
        };
        if fresh.is_empty() {
            self.record_failure(hotel_id, provider, "Provider returned no sites")
                .await;
            return Err(SyncError::EmptyResult { what: "sites" });
        }

        let (mut settings, is_active) = self.load_prior(hotel_id, provider).await?;
        let merged = reconcile::reconcile_sites(&fresh, &settings.categories_sort);

        tracing::info!(
            hotel_id,
            provider = %provider,
            sites = fresh.len(),
            categories = merged.len(),
            "Reconciled site catalog"
        );

        settings.categories_sort = merged.clone();
        self.store
            .save(hotel_id, provider, &settings, is_active)
            .await?;
        self.store
            .update_sync_status(
                hotel_id,
                provider,
                SyncStatus::Success,
                &format!("Synced {} sites into {} categories", fresh.len(), merged.len()),
            )
            .await?;

        Ok(merged)
    }

    /// Fetch task types and merge them with the curated list.
    pub async fn sync_task_types<C: CatalogClient>(
        &self,
        hotel_id: DbId,
        provider: Provider,
        client: &C,
    ) -> Result<Vec<TaskType>, SyncError> {
        let fresh = match client.fetch_task_types().await {
            Ok(rows) => rows,
            Err(err) => {
                self.record_failure(hotel_id, provider, &err.to_string())
                    .await;
                return Err(err.into());
            }
        };
        if fresh.is_empty() {
            self.record_failure(hotel_id, provider, "Provider returned no task types")
                .await;
            return Err(SyncError::EmptyResult { what: "task types" });
        }

        let (mut settings, is_active) = self.load_prior(hotel_id, provider).await?;
        let merged = reconcile::reconcile_task_types(&fresh, &settings.task_types);

        tracing::info!(
            hotel_id,
            provider = %provider,
            task_types = merged.len(),
            "Reconciled task types"
        );

        settings.task_types = merged.clone();
        self.store
            .save(hotel_id, provider, &settings, is_active)
            .await?;
        self.store
            .update_sync_status(
                hotel_id,
                provider,
                SyncStatus::Success,
                &format!("Synced {} task types", merged.len()),
            )
            .await?;

        Ok(merged)
    }

    /// Fetch note types and merge them with the curated list.
    pub async fn sync_note_types<C: CatalogClient>(
        &self,
        hotel_id: DbId,
        provider: Provider,
        client: &C,
    ) -> Result<Vec<NoteType>, SyncError> {
        let fresh = match client.fetch_note_types().await {
            Ok(rows) => rows,
            Err(err) => {
                self.record_failure(hotel_id, provider, &err.to_string())
                    .await;
                return Err(err.into());
            }
        };
        if fresh.is_empty() {
            self.record_failure(hotel_id, provider, "Provider returned no note types")
                .await;
            return Err(SyncError::EmptyResult { what: "note types" });
        }

        let (mut settings, is_active) = self.load_prior(hotel_id, provider).await?;
        let merged = reconcile::reconcile_note_types(&fresh, &settings.note_types);

        tracing::info!(
            hotel_id,
            provider = %provider,
            note_types = merged.len(),
            "Reconciled note types"
        );

        settings.note_types = merged.clone();
        self.store
            .save(hotel_id, provider, &settings, is_active)
            .await?;
        self.store
            .update_sync_status(
                hotel_id,
                provider,
                SyncStatus::Success,
                &format!("Synced {} note types", merged.len()),
            )
            .await?;

        Ok(merged)
    }

    // -----------------------------------------------------------------------
    // Manual save paths (merge bypassed, last write wins)
    // -----------------------------------------------------------------------

    /// Replace the curated category structure wholesale.
    pub async fn save_categories(
        &self,
        hotel_id: DbId,
        provider: Provider,
        categories: Vec<CatalogCategory>,
    ) -> Result<(), SyncError> {
        let (mut settings, is_active) = self.require_existing(hotel_id, provider).await?;
        settings.categories_sort = categories;
        self.store
            .save(hotel_id, provider, &settings, is_active)
            .await?;
        Ok(())
    }

    /// Replace the curated task type list wholesale.
    pub async fn save_task_types(
        &self,
        hotel_id: DbId,
        provider: Provider,
        task_types: Vec<TaskType>,
    ) -> Result<(), SyncError> {
        let (mut settings, is_active) = self.require_existing(hotel_id, provider).await?;
        settings.task_types = task_types;
        self.store
            .save(hotel_id, provider, &settings, is_active)
            .await?;
        Ok(())
    }

    /// Replace the curated note type list wholesale.
    pub async fn save_note_types(
        &self,
        hotel_id: DbId,
        provider: Provider,
        note_types: Vec<NoteType>,
    ) -> Result<(), SyncError> {
        let (mut settings, is_active) = self.require_existing(hotel_id, provider).await?;
        settings.note_types = note_types;
        self.store
            .save(hotel_id, provider, &settings, is_active)
            .await?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    /// Load the prior settings and active flag for a sync run.
    ///
    /// An unreadable stored blob (secrets rotated under stored data, or a
    /// corrupt payload) is downgraded to "no prior structure" with a warning
    /// so a sync can rebuild the catalog instead of wedging the integration.
    /// Database errors are propagated.
    async fn load_prior(
        &self,
        hotel_id: DbId,
        provider: Provider,
    ) -> Result<(IntegrationSettings, bool), SyncError> {
        let is_active = self
            .store
            .get(hotel_id, provider)
            .await?
            .map(|record| record.is_active)
            .unwrap_or(false);

        let settings = match self.store.get_settings(hotel_id, provider).await {
            Ok(Some(settings)) => settings,
            Ok(None) => IntegrationSettings::default(),
            Err(StoreError::Vault(err)) => {
                tracing::warn!(
                    hotel_id,
                    provider = %provider,
                    error = %err,
                    "Stored settings unreadable; reconciling against empty prior"
                );
                IntegrationSettings::default()
            }
            Err(err) => return Err(err.into()),
        };

        Ok((settings, is_active))
    }

    /// Load existing settings for a manual save, failing if none exist.
    async fn require_existing(
        &self,
        hotel_id: DbId,
        provider: Provider,
    ) -> Result<(IntegrationSettings, bool), SyncError> {
        let Some(record) = self.store.get(hotel_id, provider).await? else {
            return Err(SyncError::CredentialsMissing(format!(
                "No {provider} integration configured for hotel {hotel_id}"
            )));
        };
        let settings = self
            .store
            .get_settings(hotel_id, provider)
            .await?
            .unwrap_or_default();
        Ok((settings, record.is_active))
    }

    /// Best-effort error status update. A failed status write must not mask
    /// the sync error itself.
    async fn record_failure(&self, hotel_id: DbId, provider: Provider, message: &str) {
        if let Err(err) = self
            .store
            .update_sync_status(hotel_id, provider, SyncStatus::Error, message)
            .await
        {
            tracing::error!(
                hotel_id,
                provider = %provider,
                error = %err,
                "Failed to record sync error status"
            );
        }
    }
}
