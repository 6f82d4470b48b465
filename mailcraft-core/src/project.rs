//! Project Files - Settings Plus Components, Versioned
//!
//! Loading is the one place external input enters the model: JSON is decoded,
//! the schema version checked, and legacy keys migrated before anything else
//! sees the components.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::components::EmailComponent;
use crate::document::Document;
use crate::migrate::{self, CURRENT_SCHEMA_VERSION, LEGACY_SCHEMA_VERSION};
use crate::settings::DesignSettings;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Invalid project JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid schema version: {0}")]
    InvalidSchemaVersion(String),

    #[error("Schema version {found} is newer than supported {supported}")]
    UnsupportedSchemaVersion { found: String, supported: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(default = "legacy_version")]
    pub schema_version: String,
    #[serde(default)]
    pub settings: DesignSettings,
    #[serde(default)]
    pub components: Vec<EmailComponent>,
}

fn legacy_version() -> String { LEGACY_SCHEMA_VERSION.to_string() }

impl Project {
    pub fn new(settings: DesignSettings, components: Vec<EmailComponent>) -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION.to_string(),
            settings,
            components,
        }
    }

    /// Decode and migrate. A bare component array is a legacy document with
    /// default settings.
    pub fn from_json(content: &str) -> Result<Self, LoadError> {
        let mut project = match serde_json::from_str::<Value>(content)? {
            Value::Array(items) => Project {
                schema_version: legacy_version(),
                settings: DesignSettings::default(),
                components: serde_json::from_value(Value::Array(items))?,
            },
            other => serde_json::from_value(other)?,
        };
        let version =
            migrate::migrate_components(&mut project.components, &project.schema_version)?;
        project.schema_version = version.to_string();
        Ok(project)
    }

    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn document(&self) -> Document {
        Document::from_components(&self.components)
    }
}
