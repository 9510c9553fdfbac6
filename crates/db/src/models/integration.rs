//! Integration record entity model and enums.

use hotelhub_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Failed to parse a provider name from its text representation.
#[derive(Debug, thiserror::Error)]
#[error("unknown provider: {0}")]
pub struct ParseProviderError(String);

/// External system a hotel can integrate with.
///
/// Stored as TEXT in the `provider` column; one record exists per
/// `(hotel_id, provider)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    /// Booking / property-management system.
    Pms,
    /// Restaurant reservations system.
    Reservations,
    /// Point-of-sale system.
    Pos,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Pms => "pms",
            Provider::Reservations => "reservations",
            Provider::Pos => "pos",
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Provider {
    type Err = ParseProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pms" => Ok(Provider::Pms),
            "reservations" => Ok(Provider::Reservations),
            "pos" => Ok(Provider::Pos),
            other => Err(ParseProviderError(other.to_string())),
        }
    }
}

impl TryFrom<String> for Provider {
    type Error = ParseProviderError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Outcome recorded for the most recent sync attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    Success,
    Error,
    Pending,
}

impl SyncStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncStatus::Success => "success",
            SyncStatus::Error => "error",
            SyncStatus::Pending => "pending",
        }
    }
}

impl std::fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A row from the `hotel_integrations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct IntegrationRecord {
    pub id: DbId,
    pub hotel_id: DbId,
    #[sqlx(try_from = "String")]
    pub provider: Provider,
    /// Encrypted settings blob. Skipped during serialization so ciphertext
    /// never leaves the persistence layer.
    #[serde(skip_serializing)]
    pub settings: String,
    pub is_active: bool,
    pub last_synced: Option<Timestamp>,
    pub last_sync_status: Option<String>,
    pub last_sync_message: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl IntegrationRecord {
    /// Typed view of `last_sync_status`; unknown stored values map to `None`.
    pub fn sync_status(&self) -> Option<SyncStatus> {
        match self.last_sync_status.as_deref() {
            Some("success") => Some(SyncStatus::Success),
            Some("error") => Some(SyncStatus::Error),
            Some("pending") => Some(SyncStatus::Pending),
            _ => None,
        }
    }
}

/// Safe API-facing integration info (never exposes the settings blob).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct IntegrationInfo {
    #[sqlx(try_from = "String")]
    pub provider: Provider,
    pub is_active: bool,
    pub last_synced: Option<Timestamp>,
    pub last_sync_status: Option<String>,
    pub last_sync_message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_round_trips_through_text() {
        for provider in [Provider::Pms, Provider::Reservations, Provider::Pos] {
            let parsed: Provider = provider.as_str().parse().unwrap();
            assert_eq!(parsed, provider);
        }
        assert!("epos".parse::<Provider>().is_err());
    }

    #[test]
    fn sync_status_text_is_stable() {
        assert_eq!(SyncStatus::Success.as_str(), "success");
        assert_eq!(SyncStatus::Error.as_str(), "error");
        assert_eq!(SyncStatus::Pending.as_str(), "pending");
    }
}
