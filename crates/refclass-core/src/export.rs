//! Export, upload and submission formats.
//!
//! Downloads and uploads share one flat record shape:
//!
//! ```json
//! [
//!   {
//!     "id": 12,
//!     "group": "4f2a-77",
//!     "year": 1972,
//!     "authors": "Caffey J",
//!     "title": "On the theory and practice of shaking infants",
//!     "doi": "",
//!     "article_type": "📝 Narrative Review / Opinion Piece",
//!     "topic": "",
//!     "motivation": ""
//!   }
//! ]
//! ```
//!
//! Submissions wrap the same records (without `group`) as
//! `{ "uuid": ..., "entries": [...] }`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::catalog::{Reference, Year};
use crate::error::ParseError;
use crate::record::ClassificationRecord;

/// One flat record: reference metadata plus its classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportEntry {
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    pub year: Year,
    pub authors: String,
    pub title: String,
    pub doi: String,
    pub article_type: String,
    pub topic: String,
    pub motivation: String,
}

impl ExportEntry {
    /// Combine a reference with its (possibly missing) record.
    ///
    /// Missing classification fields become empty strings.
    pub fn new(
        reference: &Reference,
        record: Option<&ClassificationRecord>,
        group: Option<String>,
    ) -> Self {
        let record = record.cloned().unwrap_or_default();
        Self {
            id: reference.id,
            group,
            year: reference.year.clone(),
            authors: reference.authors.clone(),
            title: reference.title.clone(),
            doi: reference.doi_or_empty().to_string(),
            article_type: record.article_type_or_empty().to_string(),
            topic: record.topic_or_empty().to_string(),
            motivation: record.motivation_or_empty().to_string(),
        }
    }

    /// True when type, topic and motivation are all empty.
    pub fn is_unclassified(&self) -> bool {
        self.article_type.is_empty() && self.topic.is_empty() && self.motivation.is_empty()
    }

    /// The same entry without its group tag, as sent in submissions.
    pub fn without_group(mut self) -> Self {
        self.group = None;
        self
    }
}

/// Body of a remote submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitPayload {
    pub uuid: String,
    pub entries: Vec<ExportEntry>,
}

impl SubmitPayload {
    /// Build a payload; `uuid` falls back to `"unknown"` without a group.
    pub fn new(group: Option<&str>, entries: Vec<ExportEntry>) -> Self {
        Self {
            uuid: group.unwrap_or("unknown").to_string(),
            entries: entries.into_iter().map(ExportEntry::without_group).collect(),
        }
    }
}

/// First hyphen-delimited segment of the group id, or `"all"`.
pub fn short_group_id(group: Option<&str>) -> &str {
    group
        .unwrap_or("all")
        .split('-')
        .next()
        .unwrap_or("all")
}

/// Download filename for a group's export.
///
/// ```
/// use refclass_core::export_filename;
/// assert_eq!(
///     export_filename(Some("3fa85f64-5717-4562")),
///     "classifications_3fa85f64.json"
/// );
/// assert_eq!(export_filename(None), "classifications_all.json");
/// ```
pub fn export_filename(group: Option<&str>) -> String {
    format!("classifications_{}.json", short_group_id(group))
}

/// Pretty-print export entries as a JSON array (two-space indent).
pub fn to_pretty_json(entries: &[ExportEntry]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(entries)
}

/// One record from an uploaded file.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedRecord {
    /// Storage key, `None` when the record has no usable `id`.
    pub id: Option<String>,
    /// The whole uploaded object, stored as-is on merge.
    pub record: ClassificationRecord,
}

/// Storage key for an uploaded `id`: non-zero numbers and non-empty strings.
///
/// Integral numbers key like catalog ids, so `5.0` and `5` both map to `"5"`.
fn upload_key(id: Option<&Value>) -> Option<String> {
    match id? {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return (i != 0).then(|| i.to_string());
            }
            if let Some(u) = n.as_u64() {
                return Some(u.to_string());
            }
            let f = n.as_f64()?;
            if f == 0.0 {
                None
            } else if f.fract() == 0.0 && f.abs() < 9_007_199_254_740_992.0 {
                Some((f as i64).to_string())
            } else {
                Some(n.to_string())
            }
        }
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

/// Parse an uploaded annotations file.
///
/// The whole file is validated before anything is returned, so a bad file
/// never leads to a partial merge. Array items that are not objects are
/// skipped, like items without an `id`.
pub fn parse_upload(json: &str) -> Result<Vec<UploadedRecord>, ParseError> {
    let value: Value =
        serde_json::from_str(json).map_err(|e| ParseError::InvalidJson(e.to_string()))?;
    let Value::Array(items) = value else {
        return Err(ParseError::NotAnArray);
    };

    let mut records = Vec::with_capacity(items.len());
    for item in items {
        let Value::Object(object) = item else {
            continue;
        };
        let id = upload_key(object.get("id"));
        let record: ClassificationRecord =
            serde_json::from_value(Value::Object(object)).map_err(|e| {
                ParseError::InvalidRecord {
                    id: id.clone().unwrap_or_else(|| "<none>".to_string()),
                    message: e.to_string(),
                }
            })?;
        records.push(UploadedRecord { id, record });
    }
    Ok(records)
}
