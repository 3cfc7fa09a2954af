//! Share request and result types.
//!
//! Field names follow the share service's wire format.

use chrono::{DateTime, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::{ShareError, ShareResult};

/// Length of generated passwords.
pub const DEFAULT_PASSWORD_LENGTH: usize = 8;

/// How folders in a share are unpacked for visitors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractFolder {
    #[default]
    None,
    Front,
    Back,
}

/// Sort key for the shared listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderBy {
    #[default]
    None,
    Name,
    Size,
    Modified,
}

/// Sort direction for the shared listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderDirection {
    #[default]
    None,
    Asc,
    Desc,
}

/// Body of a share creation call.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ShareRequest {
    /// Absolute paths being shared, in listing order.
    #[serde(rename = "files")]
    pub paths: Vec<String>,
    /// Absolute expiration; `None` never expires.
    #[serde(rename = "expires")]
    pub expires_at: Option<DateTime<Utc>>,
    /// Access password; empty means none.
    #[serde(rename = "pwd")]
    pub password: String,
    /// Maximum number of accesses; 0 is unlimited.
    pub max_accessed: u32,
    pub order_by: OrderBy,
    pub order_direction: OrderDirection,
    #[serde(rename = "extract_folder")]
    pub extract_folder_policy: ExtractFolder,
    pub remark: String,
    pub readme: String,
    pub header: String,
}

impl ShareRequest {
    /// Create a request for `paths` with default settings and no password.
    pub fn new(paths: Vec<String>) -> Self {
        Self {
            paths,
            ..Default::default()
        }
    }

    /// Check the fields the service requires.
    pub fn validate(&self) -> ShareResult<()> {
        if self.paths.is_empty() || self.paths.iter().any(|p| p.trim().is_empty()) {
            return Err(ShareError::missing_field("files"));
        }
        Ok(())
    }
}

/// A created share as returned by the service.
///
/// Opaque apart from a few well-known fields; every field is available to
/// message templates.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShareInfo {
    fields: Map<String, Value>,
}

impl ShareInfo {
    /// Wrap a JSON object.
    pub fn from_value(value: Value) -> ShareResult<Self> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(ShareError::invalid_response(format!(
                "expected a share object, got {}",
                other
            ))),
        }
    }

    /// All fields, in service order.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Get a field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// The share identifier, if present.
    pub fn id(&self) -> Option<String> {
        match self.fields.get("id")? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// Generate a random alphanumeric password.
pub fn random_password(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}
