//! Tag domain model.
//!
//! # Invariants
//! - `(slug, kind)` is unique; the same slug may exist once per kind.
//! - Date tags carry no structured year; it is inferred at read time by
//!   [`crate::timeline::year::extract_year`].

use serde::{Deserialize, Serialize};

/// Storage identifier of a tag.
pub type TagId = i64;

/// Tag flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagKind {
    /// Free topical label shown next to the topic.
    General,
    /// Chronological label ("18. Yüzyıl", "M.Ö. 450") used for timeline placement.
    Date,
}

impl TagKind {
    /// Stable storage/wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Date => "date",
        }
    }

    /// Parses the storage name produced by [`TagKind::as_str`].
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "general" => Some(Self::General),
            "date" => Some(Self::Date),
            _ => None,
        }
    }
}

/// Persisted tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
    pub slug: String,
    pub kind: TagKind,
}

impl Tag {
    pub fn is_date(&self) -> bool {
        self.kind == TagKind::Date
    }
}
