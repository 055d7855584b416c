//! Classification record attached to one reference.

use serde::{Deserialize, Serialize};

use crate::vocabulary::ClassificationField;

/// The three-field annotation for a reference.
///
/// Fields are absent until first set. Imported records replace stored ones
/// wholesale, so any extra keys they carry (`id`, `title`, ...) are kept in
/// `extra` and written back unchanged.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ClassificationRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub article_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub motivation: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ClassificationRecord {
    /// Current value of an option field.
    pub fn field(&self, field: ClassificationField) -> Option<&str> {
        match field {
            ClassificationField::ArticleType => self.article_type.as_deref(),
            ClassificationField::Topic => self.topic.as_deref(),
        }
    }

    pub(crate) fn field_mut(&mut self, field: ClassificationField) -> &mut Option<String> {
        match field {
            ClassificationField::ArticleType => &mut self.article_type,
            ClassificationField::Topic => &mut self.topic,
        }
    }

    pub fn article_type_or_empty(&self) -> &str {
        self.article_type.as_deref().unwrap_or("")
    }

    pub fn topic_or_empty(&self) -> &str {
        self.topic.as_deref().unwrap_or("")
    }

    pub fn motivation_or_empty(&self) -> &str {
        self.motivation.as_deref().unwrap_or("")
    }

    /// True when type, topic and motivation are all absent or empty.
    pub fn is_unclassified(&self) -> bool {
        self.article_type_or_empty().is_empty()
            && self.topic_or_empty().is_empty()
            && self.motivation_or_empty().is_empty()
    }
}

/// Whether a possibly-missing record counts as unclassified.
pub fn is_unclassified(record: Option<&ClassificationRecord>) -> bool {
    record.map_or(true, ClassificationRecord::is_unclassified)
}
