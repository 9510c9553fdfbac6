//! Catalog data model shared by the reconciliation engine, the settings
//! store, and the provider clients.
//!
//! The persisted settings blob is typed end to end: credentials are a
//! tagged enum per provider capability, and the curated catalog fields
//! default to empty so legacy blobs without them still deserialize.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Category key used when the provider omits a category id.
pub const UNCATEGORIZED_ID: &str = "uncategorized";

/// Display name for the sentinel category.
pub const UNCATEGORIZED_NAME: &str = "Uncategorized";

/// Regions with a dedicated PMS API endpoint.
pub const PMS_REGIONS: &[&str] = &["eu", "us", "au"];

// ---------------------------------------------------------------------------
// Curated structures (persisted inside the encrypted settings blob)
// ---------------------------------------------------------------------------

/// One curated site within a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub site_id: String,
    pub site_name: String,
    pub order: i64,
    #[serde(default)]
    pub excluded: bool,
}

/// A category of sites with user-curated ordering and exclusion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogCategory {
    /// Provider-issued id. Absent in legacy data saved before ids were
    /// stored, in which case the name is the matching key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub order: i64,
    #[serde(default)]
    pub excluded: bool,
    #[serde(default)]
    pub sites: Vec<CatalogItem>,
}

/// Curated task type entry (flat list, no categories).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskType {
    pub id: String,
    pub name: String,
    pub color: String,
    pub icon: String,
}

/// Curated note type entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteType {
    pub id: String,
    pub name: String,
    #[serde(rename = "default", default)]
    pub is_default: bool,
    pub color: String,
    pub icon: String,
}

// ---------------------------------------------------------------------------
// Fresh provider rows (flat records as returned by the catalog endpoints)
// ---------------------------------------------------------------------------

/// Flat site record from the PMS catalog endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SiteRow {
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub category_name: Option<String>,
    pub site_id: String,
    pub site_name: String,
}

/// Flat task type record from the PMS task types endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TaskTypeRow {
    pub id: String,
    pub name: String,
}

/// Flat note type record from the PMS note types endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NoteTypeRow {
    pub note_type_id: String,
    pub note_type_name: String,
    #[serde(default)]
    pub note_type_default: bool,
}

// ---------------------------------------------------------------------------
// Credentials and the settings blob
// ---------------------------------------------------------------------------

/// Provider credentials stored inside the encrypted settings blob.
///
/// Tagged per provider capability so each variant carries exactly the
/// fields that provider needs, instead of an open-ended map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "provider", rename_all = "snake_case")]
pub enum ProviderCredentials {
    Pms {
        username: String,
        password: String,
        api_key: String,
        #[serde(default = "default_region")]
        region: String,
    },
    Reservations {
        api_key: String,
    },
    Pos {
        api_key: String,
    },
}

fn default_region() -> String {
    "eu".to_string()
}

impl ProviderCredentials {
    /// The provider key this credential set belongs to, matching the
    /// serialized tag.
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderCredentials::Pms { .. } => "pms",
            ProviderCredentials::Reservations { .. } => "reservations",
            ProviderCredentials::Pos { .. } => "pos",
        }
    }

    /// Validate credential fields at the boundary: required fields must be
    /// non-empty and the PMS region must be a known one.
    pub fn validate(&self) -> Result<(), CoreError> {
        match self {
            ProviderCredentials::Pms {
                username,
                password,
                api_key,
                region,
            } => {
                if username.trim().is_empty()
                    || password.is_empty()
                    || api_key.trim().is_empty()
                {
                    return Err(CoreError::Validation(
                        "PMS credentials require username, password, and api_key".to_string(),
                    ));
                }
                if !PMS_REGIONS.contains(&region.as_str()) {
                    return Err(CoreError::Validation(format!(
                        "Unknown PMS region '{region}'. Known regions: {}",
                        PMS_REGIONS.join(", ")
                    )));
                }
                Ok(())
            }
            ProviderCredentials::Reservations { api_key }
            | ProviderCredentials::Pos { api_key } => {
                if api_key.trim().is_empty() {
                    return Err(CoreError::Validation(
                        "An API key is required".to_string(),
                    ));
                }
                Ok(())
            }
        }
    }
}

/// Decrypted per-integration settings: credentials plus curated catalogs.
///
/// Serialization round-trips exactly: fields absent in the stored JSON
/// deserialize to their defaults and default-valued fields are omitted on
/// write.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntegrationSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials: Option<ProviderCredentials>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories_sort: Vec<CatalogCategory>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub task_types: Vec<TaskType>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub note_types: Vec<NoteType>,
}
