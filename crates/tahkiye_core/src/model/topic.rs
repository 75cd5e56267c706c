//! Topic domain model.
//!
//! # Responsibility
//! - Define the write-side topic record.
//! - Derive the topic slug from its title.
//!
//! # Invariants
//! - `id` is stable and never reused.
//! - `slug` is unique across topics (enforced by storage).
//! - `year_override`, when set, always wins over date-tag inference.

use super::{require_slug, require_text, ModelValidationError};
use crate::slug::slugify;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a topic.
pub type TopicId = Uuid;

/// Canonical topic record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub id: TopicId,
    /// Display title, trimmed.
    pub title: String,
    /// URL key derived from `title`.
    pub slug: String,
    /// Explicit signed year (negative for BCE) set by an editor.
    pub year_override: Option<i64>,
}

impl Topic {
    /// Creates a topic with a generated id and a slug derived from `title`.
    pub fn new(title: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), title)
    }

    /// Creates a topic with a caller-provided id.
    ///
    /// Does not validate; call [`Topic::validate`] before persisting.
    pub fn with_id(id: TopicId, title: impl Into<String>) -> Self {
        let title = title.into().trim().to_string();
        let slug = slugify(&title);
        Self {
            id,
            title,
            slug,
            year_override: None,
        }
    }

    /// Builder-style helper for the explicit year.
    pub fn with_year_override(mut self, year: Option<i64>) -> Self {
        self.year_override = year;
        self
    }

    /// Checks id, title and slug shape.
    pub fn validate(&self) -> Result<(), ModelValidationError> {
        if self.id.is_nil() {
            return Err(ModelValidationError::NilId);
        }
        require_text("title", &self.title)?;
        require_slug(&self.slug)
    }
}
