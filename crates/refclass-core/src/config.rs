//! Configuration for refclass
//!
//! Loaded from a TOML file such as:
//!
//! ```toml
//! catalog_path = "references.json"
//! pdf_dir = "pdfs"
//! database_path = "/var/lib/refclass/refclass.db"
//! submit_endpoint = "https://collector.example.org/submit"
//! bind_addr = "127.0.0.1:8080"
//! ```
//!
//! Every key is optional; missing keys take the defaults below.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// JSON file holding the reference catalog
    pub catalog_path: PathBuf,
    /// Directory served under `/pdfs/`
    pub pdf_dir: PathBuf,
    /// SQLite file holding the annotation partitions
    pub database_path: PathBuf,
    /// Remote collection endpoint for submissions (disabled when unset)
    pub submit_endpoint: Option<String>,
    /// Listen address of the local server
    pub bind_addr: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from("references.json"),
            pdf_dir: PathBuf::from("pdfs"),
            database_path: default_database_path(),
            submit_endpoint: None,
            bind_addr: "127.0.0.1:8080".to_string(),
        }
    }
}

/// `<data dir>/refclass/refclass.db`, or `./.refclass/refclass.db` when the
/// platform has no data directory.
pub fn default_database_path() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("refclass"))
        .unwrap_or_else(|| PathBuf::from(".refclass"))
        .join("refclass.db")
}

impl AppConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
        Self::from_toml(&content)
    }

    /// Load from `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            let config = Self::load(path)?;
            tracing::info!("Loaded configuration from {}", path.display());
            Ok(config)
        } else {
            tracing::info!("No configuration at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }
}
