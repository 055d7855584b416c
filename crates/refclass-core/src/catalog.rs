//! Reference catalog: loading and filtering the fixed corpus.
//!
//! The catalog is loaded once at startup. Only references with a PDF are
//! eligible for annotation, and every downstream view (navigation, export,
//! submission) works on the eligible set narrowed to one group.
//!
//! Filtering never reorders: the source order is the navigation order.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::FetchError;

/// Publication year as given by the catalog source (number or free text).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Year {
    Number(i64),
    Text(String),
}

impl Default for Year {
    fn default() -> Self {
        Year::Text(String::new())
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Year::Number(n) => write!(f, "{}", n),
            Year::Text(s) => write!(f, "{}", s),
        }
    }
}

/// One citable work from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub id: u64,
    #[serde(default)]
    pub year: Year,
    pub authors: String,
    pub title: String,
    #[serde(default)]
    pub doi: Option<String>,
    #[serde(default)]
    pub pdf: Option<String>,
    #[serde(default)]
    pub group: String,
}

impl Reference {
    /// First author, as shown in the list and info bar.
    pub fn author(&self) -> &str {
        derive_author(&self.authors)
    }

    /// Whether this reference has a PDF and can be annotated.
    pub fn is_eligible(&self) -> bool {
        self.pdf.as_deref().is_some_and(|p| !p.trim().is_empty())
    }

    /// DOI or the empty string.
    pub fn doi_or_empty(&self) -> &str {
        self.doi.as_deref().unwrap_or("")
    }

    /// Storage key for this reference's classification record.
    pub fn key(&self) -> String {
        self.id.to_string()
    }
}

/// First comma-delimited token of an author list, trimmed.
///
/// ```
/// use refclass_core::derive_author;
/// assert_eq!(derive_author("Smith J, Doe A"), "Smith J");
/// assert_eq!(derive_author("  Solo  "), "Solo");
/// ```
pub fn derive_author(authors: &str) -> &str {
    authors.split(',').next().unwrap_or("").trim()
}

/// Keep only references with a non-empty PDF filename.
pub fn filter_eligible(all: &[Reference]) -> Vec<Reference> {
    all.iter().filter(|r| r.is_eligible()).cloned().collect()
}

/// Keep only references whose group equals `group` exactly.
///
/// `None` passes every reference through.
pub fn filter_by_group(all: &[Reference], group: Option<&str>) -> Vec<Reference> {
    match group {
        Some(g) => all.iter().filter(|r| r.group == g).cloned().collect(),
        None => all.to_vec(),
    }
}

/// The eligible reference set, loaded once.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    references: Vec<Reference>,
}

impl Catalog {
    /// Build from an already-parsed reference list, dropping ineligible entries.
    pub fn new(all: Vec<Reference>) -> Self {
        let total = all.len();
        let references: Vec<Reference> = all.into_iter().filter(|r| r.is_eligible()).collect();
        if references.len() < total {
            tracing::debug!(
                "Dropped {} references without a PDF",
                total - references.len()
            );
        }
        Self { references }
    }

    /// Parse a catalog from its JSON source text.
    pub fn from_json(json: &str) -> Result<Self, FetchError> {
        let all: Vec<Reference> =
            serde_json::from_str(json).map_err(|e| FetchError::Json(e.to_string()))?;
        Ok(Self::new(all))
    }

    /// Load a catalog from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FetchError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| FetchError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let catalog = Self::from_json(&json)?;
        tracing::info!(
            "Loaded {} eligible references from {}",
            catalog.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// All eligible references, in source order.
    pub fn references(&self) -> &[Reference] {
        &self.references
    }

    /// Eligible references for one group (or all of them).
    pub fn for_group(&self, group: Option<&str>) -> Vec<Reference> {
        filter_by_group(&self.references, group)
    }

    pub fn len(&self) -> usize {
        self.references.len()
    }

    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }
}
