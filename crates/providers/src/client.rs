use async_trait::async_trait;
use hotelhub_core::catalog::{NoteTypeRow, SiteRow, TaskTypeRow};

use crate::error::ClientError;

/// Catalog operations the reconciliation engine needs from a provider.
///
/// The engine is generic over this trait so syncs can be exercised with a
/// scripted client in tests.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Fetch the flat list of sites, each tagged with its category.
    async fn fetch_sites(&self) -> Result<Vec<SiteRow>, ClientError>;

    /// Fetch the flat list of task types.
    async fn fetch_task_types(&self) -> Result<Vec<TaskTypeRow>, ClientError>;

    /// Fetch the flat list of note types.
    async fn fetch_note_types(&self) -> Result<Vec<NoteTypeRow>, ClientError>;
}
