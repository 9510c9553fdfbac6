pub mod health;
pub mod integrations;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /hotels/{hotel_id}/integrations                  list, per-provider CRUD
/// /hotels/{hotel_id}/integrations/{provider}/...   settings, test, sync, manual saves
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Hotel-scoped provider integrations.
        .nest("/hotels", integrations::router())
}
