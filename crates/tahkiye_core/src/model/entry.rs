//! Entry (article) domain model.
//!
//! # Responsibility
//! - Define the write-side entry record and vote values.
//!
//! # Invariants
//! - Every entry belongs to exactly one topic.
//! - `author` and `content` are never blank.
//! - A voter has at most one vote per entry.

use super::topic::TopicId;
use super::{require_text, ModelValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of an entry.
pub type EntryId = Uuid;

/// User-authored contribution under a topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    pub topic_id: TopicId,
    pub author: String,
    pub content: String,
}

impl Entry {
    /// Creates an entry with a generated id. Author is trimmed, content kept
    /// verbatim.
    pub fn new(topic_id: TopicId, author: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            topic_id,
            author: author.into().trim().to_string(),
            content: content.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ModelValidationError> {
        if self.id.is_nil() || self.topic_id.is_nil() {
            return Err(ModelValidationError::NilId);
        }
        require_text("author", &self.author)?;
        require_text("content", &self.content)
    }
}

/// One up/down vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteValue {
    Up,
    Down,
}

impl VoteValue {
    /// Signed contribution to the entry score.
    pub fn score(self) -> i64 {
        match self {
            Self::Up => 1,
            Self::Down => -1,
        }
    }
}
