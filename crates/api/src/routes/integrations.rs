//! Route definitions for hotel provider integrations.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::integrations;
use crate::state::AppState;

/// Integration routes mounted at `/hotels`.
///
/// ```text
/// GET    /{hotel_id}/integrations                               list (safe info)
/// PUT    /{hotel_id}/integrations/{provider}                    save credentials
/// DELETE /{hotel_id}/integrations/{provider}                    delete
/// GET    /{hotel_id}/integrations/{provider}/settings           decrypted settings
/// POST   /{hotel_id}/integrations/{provider}/test               connection test
/// POST   /{hotel_id}/integrations/{provider}/sync/sites         fetch + reconcile sites
/// POST   /{hotel_id}/integrations/{provider}/sync/task-types    fetch + reconcile task types
/// POST   /{hotel_id}/integrations/{provider}/sync/note-types    fetch + reconcile note types
/// PUT    /{hotel_id}/integrations/{provider}/categories         manual category save
/// PUT    /{hotel_id}/integrations/{provider}/task-types         manual task type save
/// PUT    /{hotel_id}/integrations/{provider}/note-types         manual note type save
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{hotel_id}/integrations", get(integrations::list_integrations))
        .route(
            "/{hotel_id}/integrations/{provider}",
            put(integrations::save_integration).delete(integrations::delete_integration),
        )
        .route(
            "/{hotel_id}/integrations/{provider}/settings",
            get(integrations::get_settings),
        )
        .route(
            "/{hotel_id}/integrations/{provider}/test",
            post(integrations::test_connection),
        )
        .route(
            "/{hotel_id}/integrations/{provider}/sync/sites",
            post(integrations::sync_sites),
        )
        .route(
            "/{hotel_id}/integrations/{provider}/sync/task-types",
            post(integrations::sync_task_types),
        )
        .route(
            "/{hotel_id}/integrations/{provider}/sync/note-types",
            post(integrations::sync_note_types),
        )
        .route(
            "/{hotel_id}/integrations/{provider}/categories",
            put(integrations::save_categories),
        )
        .route(
            "/{hotel_id}/integrations/{provider}/task-types",
            put(integrations::save_task_types),
        )
        .route(
            "/{hotel_id}/integrations/{provider}/note-types",
            put(integrations::save_note_types),
        )
}
