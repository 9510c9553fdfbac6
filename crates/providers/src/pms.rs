//! Client for the booking/PMS REST API.
//!
//! Every endpoint is a POST of a JSON body carrying the api_key and region
//! alongside request parameters, authenticated with HTTP basic auth, and
//! answered with a `{success, data, message}` envelope.

use std::time::Duration;

use async_trait::async_trait;
use hotelhub_core::catalog::{NoteTypeRow, ProviderCredentials, SiteRow, TaskTypeRow};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

use crate::client::CatalogClient;
use crate::error::ClientError;

/// Request timeout for all PMS calls. Bounded so a hung provider cannot
/// hold an administrator request open indefinitely.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Regional API endpoints; unknown regions fall back to EU.
fn region_base_url(region: &str) -> &'static str {
    match region {
        "us" => "https://api-us.newbook.cloud",
        "au" => "https://api-au.newbook.cloud",
        _ => "https://api-eu.newbook.cloud",
    }
}

/// Response envelope returned by every PMS endpoint.
///
/// `success` defaults to true because some endpoints omit it on success
/// and only set it explicitly on failure.
#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    #[serde(default = "default_success")]
    success: bool,
    #[serde(default)]
    message: String,
    data: Option<T>,
}

fn default_success() -> bool {
    true
}

/// HTTP client for one hotel's PMS credentials.
pub struct PmsClient {
    http: reqwest::Client,
    base_url: String,
    username: String,
    password: String,
    api_key: String,
    region: String,
}

impl PmsClient {
    /// Build a client from stored credentials.
    ///
    /// Fails with [`ClientError::MissingCredentials`] when the credentials
    /// belong to a different provider or required fields are empty.
    pub fn from_credentials(credentials: &ProviderCredentials) -> Result<Self, ClientError> {
        match credentials {
            ProviderCredentials::Pms {
                username,
                password,
                api_key,
                region,
            } => Self::new(username, password, api_key, region),
            other => Err(ClientError::MissingCredentials(format!(
                "expected PMS credentials, got {}",
                other.kind()
            ))),
        }
    }

    pub fn new(
        username: &str,
        password: &str,
        api_key: &str,
        region: &str,
    ) -> Result<Self, ClientError> {
        if username.is_empty() || password.is_empty() || api_key.is_empty() {
            return Err(ClientError::MissingCredentials(
                "username, password, and api_key are required".to_string(),
            ));
        }

        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ClientError::Connection(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: region_base_url(region).to_string(),
            username: username.to_string(),
            password: password.to_string(),
            api_key: api_key.to_string(),
            region: region.to_string(),
        })
    }

    /// Override the base URL (used by tests against a local server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Call a PMS endpoint and unwrap the response envelope.
    async fn call<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: serde_json::Value,
    ) -> Result<T, ClientError> {
        let mut body = params;
        if let Some(map) = body.as_object_mut() {
            map.insert("api_key".to_string(), json!(self.api_key));
            map.insert("region".to_string(), json!(self.region));
        }

        let url = format!("{}/rest/{}", self.base_url, endpoint);
        tracing::debug!(endpoint, "Calling PMS API");

        let response = self
            .http
            .post(&url)
            .basic_auth(&self.username, Some(&self.password))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ClientError::Connection(format!("request to {endpoint} timed out"))
                } else {
                    ClientError::Connection(e.to_string())
                }
            })?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ClientError::Connection(e.to_string()))?;

        if !status.is_success() {
            // Prefer the provider's own error message when the body is a
            // well-formed envelope.
            let message = serde_json::from_slice::<ApiEnvelope<serde_json::Value>>(&bytes)
                .ok()
                .filter(|envelope| !envelope.message.is_empty())
                .map(|envelope| envelope.message)
                .unwrap_or_else(|| format!("API returned HTTP {status}"));
            return Err(ClientError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let envelope: ApiEnvelope<T> = serde_json::from_slice(&bytes)
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;

        if !envelope.success {
            let message = if envelope.message.is_empty() {
                "provider reported failure".to_string()
            } else {
                envelope.message
            };
            return Err(ClientError::Api(message));
        }

        envelope
            .data
            .ok_or_else(|| ClientError::InvalidResponse("missing data field".to_string()))
    }

    /// Verify the credentials by listing sites.
    pub async fn test_connection(&self) -> Result<(), ClientError> {
        self.call::<Vec<SiteRow>>("sites_list", json!({})).await?;
        Ok(())
    }
}

#[async_trait]
impl CatalogClient for PmsClient {
    async fn fetch_sites(&self) -> Result<Vec<SiteRow>, ClientError> {
        self.call("sites_list", json!({ "force_refresh": true }))
            .await
    }

    async fn fetch_task_types(&self) -> Result<Vec<TaskTypeRow>, ClientError> {
        self.call("tasks_types_list", json!({ "force_refresh": true }))
            .await
    }

    async fn fetch_note_types(&self) -> Result<Vec<NoteTypeRow>, ClientError> {
        self.call("notes_types_list", json!({ "force_refresh": true }))
            .await
    }
}
