//! refclass-core: annotation state for classifying a reference corpus.
//!
//! Each reference (a citable work with a PDF) gets a classification record:
//! a reference type and a subject of study from fixed vocabularies, plus a
//! free-text motivation. Records persist per group identifier and can be
//! exported, re-imported, or submitted to a collection endpoint.
//!
//! - **Catalog**: loading and filtering the fixed reference list
//! - **Vocabulary**: the two option lists
//! - **Store**: id → record map with toggle semantics, merge, and export
//! - **Storage**: key-value partitions (in-memory or SQLite)
//! - **Navigation**: bounded current index, first-unclassified start
//! - **Session**: one controller per group tying the above together
//! - **Export**: download, upload and submission formats
//! - **Config**: TOML application configuration

pub mod catalog;
pub mod config;
pub mod error;
pub mod export;
pub mod navigation;
pub mod record;
pub mod session;
pub mod storage;
pub mod store;
pub mod vocabulary;

pub use catalog::{derive_author, filter_by_group, filter_eligible, Catalog, Reference, Year};
pub use config::AppConfig;
pub use error::{ConfigError, FetchError, ParseError, RefclassError, Result, StorageError};
pub use export::{
    export_filename, parse_upload, short_group_id, to_pretty_json, ExportEntry, SubmitPayload,
    UploadedRecord,
};
pub use navigation::{initial_index, Navigator};
pub use record::ClassificationRecord;
pub use session::{pdf_url, AnnotationSession, ExportFile, ListItem, ReferenceView};
#[cfg(feature = "sqlite")]
pub use storage::SqliteStorage;
pub use storage::{partition_key, MemoryStorage, Storage};
pub use store::AnnotationStore;
pub use vocabulary::{ClassificationField, Vocabulary, REFERENCE_TYPES, SUBJECTS_OF_STUDY};
