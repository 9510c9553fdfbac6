use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use hotelhub_core::error::CoreError;
use hotelhub_core::vault::VaultError;
use hotelhub_db::store::StoreError;
use hotelhub_providers::ClientError;
use serde_json::json;

use crate::engine::SyncError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `hotelhub_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A persistence or crypto error from the integration store.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A failure while syncing catalogs from an external provider.
    #[error(transparent)]
    Sync(#[from] SyncError),

    /// A provider HTTP client error outside of a sync run.
    #[error("Provider error: {0}")]
    Client(#[from] ClientError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },

            // --- Store errors ---
            AppError::Store(err) => classify_store_error(err),

            // --- Sync engine errors ---
            AppError::Sync(err) => match err {
                SyncError::CredentialsMissing(msg) => (
                    StatusCode::BAD_REQUEST,
                    "CREDENTIALS_MISSING",
                    msg.clone(),
                ),
                SyncError::Provider(client_err) => classify_client_error(client_err),
                SyncError::EmptyResult { what } => (
                    StatusCode::BAD_GATEWAY,
                    "PROVIDER_EMPTY_RESULT",
                    format!("Provider returned no {what}; existing configuration kept"),
                ),
                SyncError::Store(store_err) => classify_store_error(store_err),
            },

            // --- Provider client errors (connection tests etc.) ---
            AppError::Client(err) => classify_client_error(err),

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Classify an integration store error.
///
/// Decryption failures are reported as 500 with a stable code so operators
/// can tell "secrets changed under stored data" apart from generic errors;
/// plaintext and key material never reach the response.
fn classify_store_error(err: &StoreError) -> (StatusCode, &'static str, String) {
    match err {
        StoreError::Database(db_err) => classify_sqlx_error(db_err),
        StoreError::Vault(vault_err) => match vault_err {
            VaultError::Decryption(_) => {
                tracing::error!(error = %vault_err, "Failed to decrypt stored settings");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DECRYPTION_FAILED",
                    "Stored settings could not be decrypted".to_string(),
                )
            }
            other => {
                tracing::error!(error = %other, "Vault error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        },
    }
}

/// Classify a provider client error into an HTTP status, code, and message.
///
/// Provider-side failures map to 502 because the fault lies upstream of
/// this service; missing credentials are the caller's problem (400).
fn classify_client_error(err: &ClientError) -> (StatusCode, &'static str, String) {
    match err {
        ClientError::MissingCredentials(msg) => (
            StatusCode::BAD_REQUEST,
            "CREDENTIALS_MISSING",
            msg.clone(),
        ),
        ClientError::Connection(msg) => (
            StatusCode::BAD_GATEWAY,
            "PROVIDER_UNREACHABLE",
            format!("Could not reach provider: {msg}"),
        ),
        ClientError::Status { status, message } => (
            StatusCode::BAD_GATEWAY,
            "PROVIDER_ERROR",
            format!("Provider returned HTTP {status}: {message}"),
        ),
        ClientError::Api(msg) => (StatusCode::BAD_GATEWAY, "PROVIDER_ERROR", msg.clone()),
        ClientError::InvalidResponse(msg) => (
            StatusCode::BAD_GATEWAY,
            "PROVIDER_INVALID_RESPONSE",
            format!("Provider response was malformed: {msg}"),
        ),
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`) map to 409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique constraint violation: error code 23505
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    );
                }
            }
            tracing::error!(error = %db_err, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}
