//! JSON configuration file support for the lineup pipeline.
//!
//! Deployments describe the enrollment and search stages in a single JSON
//! document loaded at startup. Field names follow the same camelCase wire
//! convention as the records themselves, and every field has a default, so
//! the minimal valid document is `{"version": "1"}`.
//!
//! ## Example JSON Configuration
//!
//! ```json
//! {
//!   "version": "1.0",
//!   "name": "precinct-9 lineup",
//!   "enrollment": {
//!     "idNamespace": "6ba7b811-9dad-11d1-80b4-00c04fd430c8"
//!   },
//!   "search": {
//!     "batchSize": 256,
//!     "parallel": true,
//!     "deadlineMs": 2000
//!   }
//! }
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use matcher::SearchConfig;

/// Errors that can occur when loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),
}

/// Runtime settings for the enrollment stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrollmentConfig {
    /// UUIDv5 namespace used when deriving record ids from the image URL
    /// and uploader.
    pub id_namespace: Uuid,
}

impl EnrollmentConfig {
    pub fn with_id_namespace(mut self, namespace: Uuid) -> Self {
        self.id_namespace = namespace;
        self
    }
}

impl Default for EnrollmentConfig {
    fn default() -> Self {
        Self {
            id_namespace: Uuid::NAMESPACE_URL,
        }
    }
}

/// Top-level configuration structure for the lineup pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineupConfig {
    /// Configuration format version.
    pub version: String,

    /// Optional configuration name/description.
    #[serde(default)]
    pub name: Option<String>,

    /// Enrollment stage configuration.
    #[serde(default)]
    pub enrollment: EnrollmentSection,

    /// Search stage configuration.
    #[serde(default)]
    pub search: SearchSection,
}

impl LineupConfig {
    /// Load a configuration file from the given path.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse a configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigLoadError> {
        let config: LineupConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => Ok(()),
            v => Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }?;

        self.enrollment.validate()?;
        self.search.validate()?;

        Ok(())
    }

    /// Materialize the enrollment settings.
    pub fn enrollment_config(&self) -> Result<EnrollmentConfig, ConfigLoadError> {
        let namespace = Uuid::parse_str(&self.enrollment.id_namespace)
            .map_err(|err| ConfigLoadError::Validation(format!("enrollment.idNamespace: {err}")))?;
        Ok(EnrollmentConfig::default().with_id_namespace(namespace))
    }

    /// Materialize the search settings.
    pub fn search_config(&self) -> SearchConfig {
        let mut config = SearchConfig::default()
            .with_batch_size(self.search.batch_size)
            .with_parallel(self.search.parallel);
        if let Some(ms) = self.search.deadline_ms {
            config = config.with_deadline(Duration::from_millis(ms));
        }
        config
    }
}

impl Default for LineupConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            name: None,
            enrollment: EnrollmentSection::default(),
            search: SearchSection::default(),
        }
    }
}

/// Enrollment section of the configuration file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentSection {
    /// Namespace for derived record ids, as a UUID string.
    #[serde(default = "default_id_namespace")]
    pub id_namespace: String,
}

impl EnrollmentSection {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        if Uuid::parse_str(&self.id_namespace).is_err() {
            return Err(ConfigLoadError::Validation(format!(
                "enrollment.idNamespace is not a valid UUID: {}",
                self.id_namespace
            )));
        }
        Ok(())
    }
}

impl Default for EnrollmentSection {
    fn default() -> Self {
        Self {
            id_namespace: default_id_namespace(),
        }
    }
}

/// Search section of the configuration file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchSection {
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    #[serde(default = "true_value")]
    pub parallel: bool,

    /// Scan budget in milliseconds. Absent means unbounded.
    #[serde(default)]
    pub deadline_ms: Option<u64>,
}

impl SearchSection {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.batch_size == 0 {
            return Err(ConfigLoadError::Validation(
                "search.batchSize must be >= 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for SearchSection {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            parallel: true,
            deadline_ms: None,
        }
    }
}

// Helper functions for serde defaults
fn default_id_namespace() -> String {
    Uuid::NAMESPACE_URL.to_string()
}
fn true_value() -> bool {
    true
}
fn default_batch_size() -> usize {
    256
}
