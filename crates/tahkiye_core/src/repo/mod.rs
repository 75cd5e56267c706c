//! Repository layer abstractions and SQLite implementations.
//!
//! # Responsibility
//! - Define typed, use-case oriented data access contracts.
//! - Keep SQL, joins and row decoding inside the persistence boundary.
//!
//! # Invariants
//! - Write paths validate domain records before SQL mutations.
//! - Semantic failures (`*NotFound`, `DuplicateSlug`) are reported apart from
//!   storage transport errors.
//! - Multi-statement writes run in one `IMMEDIATE` transaction.

use crate::db::DbError;
use crate::model::entry::EntryId;
use crate::model::topic::TopicId;
use crate::model::ModelValidationError;
use rusqlite::ErrorCode;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub mod category_repo;
pub mod entry_repo;
pub mod tag_repo;
pub mod topic_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error shared by all persistence contracts.
#[derive(Debug)]
pub enum RepoError {
    Validation(ModelValidationError),
    Db(DbError),
    TopicNotFound(TopicId),
    EntryNotFound(EntryId),
    CategoryNotFound(String),
    /// Unique slug already taken.
    DuplicateSlug(String),
    /// Persisted row cannot be decoded into a valid read model.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::TopicNotFound(id) => write!(f, "topic not found: {id}"),
            Self::EntryNotFound(id) => write!(f, "entry not found: {id}"),
            Self::CategoryNotFound(slug) => write!(f, "category not found: `{slug}`"),
            Self::DuplicateSlug(slug) => write!(f, "slug already in use: `{slug}`"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ModelValidationError> for RepoError {
    fn from(value: ModelValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

pub(crate) fn parse_uuid(value: &str, column: &str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}` in {column}")))
}

/// Maps a UNIQUE constraint failure to [`RepoError::DuplicateSlug`].
pub(crate) fn map_unique_violation(err: rusqlite::Error, slug: &str) -> RepoError {
    match &err {
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.code == ErrorCode::ConstraintViolation
                && failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            RepoError::DuplicateSlug(slug.to_string())
        }
        _ => err.into(),
    }
}

pub(crate) fn normalize_limit(limit: Option<u32>, default: u32, max: u32) -> u32 {
    match limit {
        Some(0) | None => default,
        Some(value) if value > max => max,
        Some(value) => value,
    }
}
