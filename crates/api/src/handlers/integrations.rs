//! Handlers for hotel provider integrations.
//!
//! Everything is scoped to a `(hotel_id, provider)` pair: credential
//! management, connection tests, catalog syncs, and the manual curation
//! save paths.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use hotelhub_core::catalog::{CatalogCategory, NoteType, ProviderCredentials, TaskType};
use hotelhub_core::error::CoreError;
use hotelhub_core::types::DbId;
use hotelhub_db::models::integration::Provider;
use hotelhub_db::repositories::IntegrationRepo;
use hotelhub_db::store::StoreError;
use hotelhub_providers::pms::PmsClient;
use hotelhub_providers::reservations::ReservationsClient;

use crate::engine::{SyncEngine, SyncError};
use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Parse the provider path segment, rejecting unknown names with a 400.
fn parse_provider(raw: &str) -> Result<Provider, AppError> {
    raw.parse()
        .map_err(|_| AppError::BadRequest(format!("Unknown provider '{raw}'")))
}

// ---------------------------------------------------------------------------
// Credential management
// ---------------------------------------------------------------------------

/// Request body for saving an integration.
#[derive(Debug, Deserialize)]
pub struct SaveIntegrationRequest {
    #[serde(flatten)]
    pub credentials: ProviderCredentials,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// GET /api/v1/hotels/{hotel_id}/integrations
///
/// List a hotel's integrations. Exposes sync state only, never settings.
pub async fn list_integrations(
    State(state): State<AppState>,
    Path(hotel_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let integrations = IntegrationRepo::list_by_hotel(&state.pool, hotel_id).await?;
    Ok(Json(DataResponse { data: integrations }))
}

/// PUT /api/v1/hotels/{hotel_id}/integrations/{provider}
///
/// Save credentials and the active flag for an integration. Existing
/// curated catalogs (category order, exclusions, type colors) are kept;
/// only the credentials and flag change.
pub async fn save_integration(
    State(state): State<AppState>,
    Path((hotel_id, provider)): Path<(DbId, String)>,
    Json(input): Json<SaveIntegrationRequest>,
) -> AppResult<impl IntoResponse> {
    let provider = parse_provider(&provider)?;

    if input.credentials.kind() != provider.as_str() {
        return Err(AppError::BadRequest(format!(
            "Credentials are for provider '{}', path says '{provider}'",
            input.credentials.kind()
        )));
    }
    input.credentials.validate()?;

    // Keep curated catalogs across credential updates. Undecryptable
    // settings (rotated secrets) start fresh rather than wedging the save;
    // database errors still abort it.
    let mut settings = match state.store.get_settings(hotel_id, provider).await {
        Ok(existing) => existing.unwrap_or_default(),
        Err(StoreError::Vault(err)) => {
            tracing::warn!(
                hotel_id,
                provider = %provider,
                error = %err,
                "Existing settings undecryptable; saving fresh settings"
            );
            Default::default()
        }
        Err(err) => return Err(err.into()),
    };
    settings.credentials = Some(input.credentials);

    let record_id = state
        .store
        .save(hotel_id, provider, &settings, input.is_active)
        .await?;

    tracing::info!(hotel_id, provider = %provider, is_active = input.is_active, "Integration saved");

    let record = IntegrationRepo::find_by_id(&state.pool, record_id)
        .await?
        .ok_or_else(|| AppError::InternalError("Saved integration not found".to_string()))?;

    Ok(Json(DataResponse { data: record }))
}

/// GET /api/v1/hotels/{hotel_id}/integrations/{provider}/settings
///
/// Decrypted settings for an integration. Unlike a sync run, a decryption
/// failure here is surfaced as a hard error.
pub async fn get_settings(
    State(state): State<AppState>,
    Path((hotel_id, provider)): Path<(DbId, String)>,
) -> AppResult<impl IntoResponse> {
    let provider = parse_provider(&provider)?;

    let settings = state
        .store
        .get_settings(hotel_id, provider)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "integration",
            id: hotel_id,
        })?;

    Ok(Json(DataResponse { data: settings }))
}

/// DELETE /api/v1/hotels/{hotel_id}/integrations/{provider}
///
/// Remove an integration: credentials, curated catalogs, and sync state.
pub async fn delete_integration(
    State(state): State<AppState>,
    Path((hotel_id, provider)): Path<(DbId, String)>,
) -> AppResult<impl IntoResponse> {
    let provider = parse_provider(&provider)?;

    let deleted = state.store.delete(hotel_id, provider).await?;
    if !deleted {
        return Err(CoreError::NotFound {
            entity: "integration",
            id: hotel_id,
        }
        .into());
    }

    tracing::info!(hotel_id, provider = %provider, "Integration deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Connection test
// ---------------------------------------------------------------------------

/// Request body for a connection test: the credentials to probe, which may
/// differ from what is stored (tested before saving).
#[derive(Debug, Deserialize)]
pub struct TestConnectionRequest {
    #[serde(flatten)]
    pub credentials: ProviderCredentials,
}

/// Result of a connection test. Always returned with HTTP 200; failure is
/// data, not an error response, so clients can show the provider's message.
#[derive(Debug, Serialize)]
pub struct TestConnectionResult {
    pub success: bool,
    pub message: String,
}

/// POST /api/v1/hotels/{hotel_id}/integrations/{provider}/test
pub async fn test_connection(
    State(_state): State<AppState>,
    Path((hotel_id, provider)): Path<(DbId, String)>,
    Json(input): Json<TestConnectionRequest>,
) -> AppResult<impl IntoResponse> {
    let provider = parse_provider(&provider)?;

    if input.credentials.kind() != provider.as_str() {
        return Err(AppError::BadRequest(format!(
            "Credentials are for provider '{}', path says '{provider}'",
            input.credentials.kind()
        )));
    }

    let outcome = match provider {
        Provider::Pms => {
            let client = PmsClient::from_credentials(&input.credentials)?;
            client.test_connection().await
        }
        Provider::Reservations => {
            let client = ReservationsClient::from_credentials(&input.credentials)?;
            client.test_connection().await
        }
        Provider::Pos => {
            return Err(AppError::BadRequest(
                "Connection testing is not supported for this provider".to_string(),
            ));
        }
    };

    let result = match outcome {
        Ok(()) => TestConnectionResult {
            success: true,
            message: "Connection successful".to_string(),
        },
        Err(err) => {
            tracing::info!(hotel_id, provider = %provider, error = %err, "Connection test failed");
            TestConnectionResult {
                success: false,
                message: err.to_string(),
            }
        }
    };

    Ok(Json(DataResponse { data: result }))
}

// ---------------------------------------------------------------------------
// Catalog sync
// ---------------------------------------------------------------------------

/// Load stored PMS credentials and build a catalog client from them.
async fn pms_client_for(
    state: &AppState,
    hotel_id: DbId,
    provider: Provider,
) -> Result<PmsClient, AppError> {
    let settings = state.store.get_settings(hotel_id, provider).await?;
    let credentials = settings
        .and_then(|s| s.credentials)
        .ok_or_else(|| {
            SyncError::CredentialsMissing(format!(
                "No {provider} credentials configured for hotel {hotel_id}"
            ))
        })?;
    Ok(PmsClient::from_credentials(&credentials)?)
}

/// POST /api/v1/hotels/{hotel_id}/integrations/{provider}/sync/sites
pub async fn sync_sites(
    State(state): State<AppState>,
    Path((hotel_id, provider)): Path<(DbId, String)>,
) -> AppResult<impl IntoResponse> {
    let provider = parse_provider(&provider)?;
    let client = pms_client_for(&state, hotel_id, provider).await?;

    let engine = SyncEngine::new(state.store.clone());
    let categories = engine.sync_sites(hotel_id, provider, &client).await?;

    Ok(Json(DataResponse { data: categories }))
}

/// POST /api/v1/hotels/{hotel_id}/integrations/{provider}/sync/task-types
pub async fn sync_task_types(
    State(state): State<AppState>,
    Path((hotel_id, provider)): Path<(DbId, String)>,
) -> AppResult<impl IntoResponse> {
    let provider = parse_provider(&provider)?;
    let client = pms_client_for(&state, hotel_id, provider).await?;

    let engine = SyncEngine::new(state.store.clone());
    let task_types = engine.sync_task_types(hotel_id, provider, &client).await?;

    Ok(Json(DataResponse { data: task_types }))
}

/// POST /api/v1/hotels/{hotel_id}/integrations/{provider}/sync/note-types
pub async fn sync_note_types(
    State(state): State<AppState>,
    Path((hotel_id, provider)): Path<(DbId, String)>,
) -> AppResult<impl IntoResponse> {
    let provider = parse_provider(&provider)?;
    let client = pms_client_for(&state, hotel_id, provider).await?;

    let engine = SyncEngine::new(state.store.clone());
    let note_types = engine.sync_note_types(hotel_id, provider, &client).await?;

    Ok(Json(DataResponse { data: note_types }))
}

// ---------------------------------------------------------------------------
// Manual curation saves (merge bypassed, last write wins)
// ---------------------------------------------------------------------------

/// PUT /api/v1/hotels/{hotel_id}/integrations/{provider}/categories
pub async fn save_categories(
    State(state): State<AppState>,
    Path((hotel_id, provider)): Path<(DbId, String)>,
    Json(categories): Json<Vec<CatalogCategory>>,
) -> AppResult<impl IntoResponse> {
    let provider = parse_provider(&provider)?;

    let engine = SyncEngine::new(state.store.clone());
    engine
        .save_categories(hotel_id, provider, categories.clone())
        .await?;

    tracing::info!(hotel_id, provider = %provider, count = categories.len(), "Categories saved");
    Ok(Json(DataResponse { data: categories }))
}

/// PUT /api/v1/hotels/{hotel_id}/integrations/{provider}/task-types
pub async fn save_task_types(
    State(state): State<AppState>,
    Path((hotel_id, provider)): Path<(DbId, String)>,
    Json(task_types): Json<Vec<TaskType>>,
) -> AppResult<impl IntoResponse> {
    let provider = parse_provider(&provider)?;

    let engine = SyncEngine::new(state.store.clone());
    engine
        .save_task_types(hotel_id, provider, task_types.clone())
        .await?;

    tracing::info!(hotel_id, provider = %provider, count = task_types.len(), "Task types saved");
    Ok(Json(DataResponse { data: task_types }))
}

/// PUT /api/v1/hotels/{hotel_id}/integrations/{provider}/note-types
pub async fn save_note_types(
    State(state): State<AppState>,
    Path((hotel_id, provider)): Path<(DbId, String)>,
    Json(note_types): Json<Vec<NoteType>>,
) -> AppResult<impl IntoResponse> {
    let provider = parse_provider(&provider)?;

    let engine = SyncEngine::new(state.store.clone());
    engine
        .save_note_types(hotel_id, provider, note_types.clone())
        .await?;

    tracing::info!(hotel_id, provider = %provider, count = note_types.len(), "Note types saved");
    Ok(Json(DataResponse { data: note_types }))
}
