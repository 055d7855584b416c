//! Controlled vocabularies for the two option fields.

use serde::{Deserialize, Serialize};

/// Reference-type options, in display order.
pub const REFERENCE_TYPES: &[&str] = &[
    "🧪 Single Study",
    "📘 Book",
    "📚 Systematic Review",
    "📊 Meta-Analysis",
    "📝 Narrative Review / Opinion Piece",
    "📄 Guideline",
    "❓ Other",
];

/// Subject-of-study options, in display order.
pub const SUBJECTS_OF_STUDY: &[&str] = &[
    "🔬 Associated findings and diagnostic methods for SBS and/or AHT",
    "🎯 Race bias",
    "⚙️ Biomechanics (e.g., animal studies, crash test dummy simulations)",
    "📈 Incidence rates of AHT",
    "🌱 Outcomes and Long-Term Effects of AHT",
    "⚖️ Legal and Forensic Aspects (e.g., court case, forensic pathology, expert witness reliability)",
    "👤 Perpetrator characteristics, Risk Factors and Prevention Strategies",
    "❓ Other (please describe)",
];

/// A classification field backed by a fixed option list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationField {
    ArticleType,
    Topic,
}

impl ClassificationField {
    /// Parse from the record key (`article_type`, `topic`).
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "article_type" => Some(Self::ArticleType),
            "topic" => Some(Self::Topic),
            _ => None,
        }
    }

    /// Record key.
    pub fn key(&self) -> &'static str {
        match self {
            Self::ArticleType => "article_type",
            Self::Topic => "topic",
        }
    }

    /// The allowed options for this field.
    pub fn options(&self) -> &'static [&'static str] {
        match self {
            Self::ArticleType => REFERENCE_TYPES,
            Self::Topic => SUBJECTS_OF_STUDY,
        }
    }

    /// Whether `value` is one of this field's options.
    pub fn accepts(&self, value: &str) -> bool {
        self.options().contains(&value)
    }
}

/// Both option lists, as served to the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct Vocabulary {
    pub article_type: &'static [&'static str],
    pub topic: &'static [&'static str],
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            article_type: REFERENCE_TYPES,
            topic: SUBJECTS_OF_STUDY,
        }
    }
}
