//! Client for the restaurant reservation provider.
//!
//! A much smaller surface than the PMS: bearer-token GETs against a fixed
//! base URL. Only used for connection testing today; the provider exposes
//! no room or task catalogs.

use std::time::Duration;

use hotelhub_core::catalog::ProviderCredentials;

use crate::error::ClientError;

const DEFAULT_BASE_URL: &str = "https://api.resos.com";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for one hotel's reservation-provider credentials.
pub struct ReservationsClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl ReservationsClient {
    /// Build a client from stored credentials.
    pub fn from_credentials(credentials: &ProviderCredentials) -> Result<Self, ClientError> {
        match credentials {
            ProviderCredentials::Reservations { api_key } => Self::new(api_key),
            other => Err(ClientError::MissingCredentials(format!(
                "expected reservation credentials, got {}",
                other.kind()
            ))),
        }
    }

    pub fn new(api_key: &str) -> Result<Self, ClientError> {
        if api_key.is_empty() {
            return Err(ClientError::MissingCredentials(
                "api_key is required".to_string(),
            ));
        }

        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ClientError::Connection(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Override the base URL (used by tests against a local server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Verify the API key by listing venues.
    pub async fn test_connection(&self) -> Result<(), ClientError> {
        let url = format!("{}/v2/venues", self.base_url);
        tracing::debug!("Testing reservation provider connection");

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ClientError::Connection("request to venues timed out".to_string())
                } else {
                    ClientError::Connection(e.to_string())
                }
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED
            || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(ClientError::Api(
                "Authentication failed - check API key".to_string(),
            ));
        }
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                message: format!("API returned HTTP {status}"),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_api_key_is_rejected() {
        assert!(matches!(
            ReservationsClient::new(""),
            Err(ClientError::MissingCredentials(_))
        ));
    }

    #[test]
    fn wrong_credentials_variant_is_rejected() {
        let credentials = ProviderCredentials::Pos {
            api_key: "k".to_string(),
        };
        assert!(matches!(
            ReservationsClient::from_credentials(&credentials),
            Err(ClientError::MissingCredentials(_))
        ));
    }
}
