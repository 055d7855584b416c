//! Error types for refclass-core

use thiserror::Error;

/// Result type alias for refclass operations
pub type Result<T> = std::result::Result<T, RefclassError>;

/// Main error type for refclass operations
#[derive(Error, Debug)]
pub enum RefclassError {
    /// Catalog could not be loaded
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Uploaded annotations could not be parsed
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Persisted partition could not be read or written
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration could not be loaded
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Value is not part of the field's vocabulary
    #[error("{value:?} is not a valid {field} option")]
    InvalidOption { field: String, value: String },

    /// Export could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// No reference is selected (empty filtered sequence)
    #[error("No reference selected")]
    NoSelection,
}

/// Catalog loading errors
#[derive(Error, Debug)]
pub enum FetchError {
    /// Catalog source could not be read
    #[error("Could not read catalog {path}: {message}")]
    Io { path: String, message: String },

    /// Catalog source is not a valid reference list
    #[error("Invalid catalog JSON: {0}")]
    Json(String),
}

/// Upload parsing errors
#[derive(Error, Debug)]
pub enum ParseError {
    /// Not valid JSON at all
    #[error("Invalid JSON file: {0}")]
    InvalidJson(String),

    /// Valid JSON, but not a list of records
    #[error("Expected a JSON array of records")]
    NotAnArray,

    /// A record carries a field of the wrong type
    #[error("Invalid record {id}: {message}")]
    InvalidRecord { id: String, message: String },
}

/// Persistence backend errors
#[derive(Error, Debug)]
pub enum StorageError {
    /// Backend failure (database, filesystem)
    #[error("Backend error: {0}")]
    Backend(String),

    /// Persisted snapshot is not valid JSON
    #[error("Corrupt snapshot under {key}: {message}")]
    Corrupt { key: String, message: String },

    /// Snapshot could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("IO error: {0}")]
    Io(String),

    /// TOML parse error
    #[error("TOML parse error: {0}")]
    Parse(String),
}

#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        StorageError::Backend(err.to_string())
    }
}

#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for RefclassError {
    fn from(err: rusqlite::Error) -> Self {
        RefclassError::Storage(StorageError::Backend(err.to_string()))
    }
}
