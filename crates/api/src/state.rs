use std::sync::Arc;

use hotelhub_db::store::IntegrationStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: hotelhub_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Encrypted integration settings store.
    pub store: IntegrationStore,
}
