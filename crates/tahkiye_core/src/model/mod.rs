//! Domain model for topics, entries, tags and categories.
//!
//! # Responsibility
//! - Define canonical write-side records used by repositories and services.
//! - Keep validation rules next to the data they protect.
//!
//! # Invariants
//! - Topics and entries are identified by stable non-nil UUIDs.
//! - Slugs are canonical (see [`crate::slug`]) before they reach storage.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod category;
pub mod entry;
pub mod tag;
pub mod topic;

/// Validation failure for domain records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelValidationError {
    /// Identifier is the nil UUID.
    NilId,
    /// A required text field is empty after trimming.
    BlankField(&'static str),
    /// Slug is empty or not in canonical shape.
    InvalidSlug(String),
}

impl Display for ModelValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "id must not be nil"),
            Self::BlankField(field) => write!(f, "`{field}` must not be blank"),
            Self::InvalidSlug(slug) => write!(f, "invalid slug `{slug}`"),
        }
    }
}

impl Error for ModelValidationError {}

pub(crate) fn require_text(field: &'static str, value: &str) -> Result<(), ModelValidationError> {
    if value.trim().is_empty() {
        return Err(ModelValidationError::BlankField(field));
    }
    Ok(())
}

pub(crate) fn require_slug(slug: &str) -> Result<(), ModelValidationError> {
    if !crate::slug::is_valid_slug(slug) {
        return Err(ModelValidationError::InvalidSlug(slug.to_string()));
    }
    Ok(())
}
