//! Topic use-case service.
//!
//! # Responsibility
//! - Validate and create topics (admin path) with slug uniqueness.
//! - Tag bookkeeping: normalize raw tag names and replace them per kind.
//! - Year override, category assignment, view counter, tag/category listings.
//!
//! # Invariants
//! - Blank or punctuation-only tag names are rejected, never silently dropped.
//! - Tags are deduplicated by slug (date tags by year); the first spelling
//!   wins.
//! - Replacing date tags never touches general tags and vice versa.

use crate::model::tag::TagKind;
use crate::model::topic::{Topic, TopicId};
use crate::model::ModelValidationError;
use crate::repo::topic_repo::{
    normalize_topic_limit, TopicListQuery, TopicRecord, TopicRepository,
};
use crate::repo::RepoError;
use crate::slug::{normalize_tag_name, normalize_tag_names, slugify};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for topic use-cases.
#[derive(Debug)]
pub enum TopicServiceError {
    /// Title, slug or id failed model validation.
    Invalid(ModelValidationError),
    /// Tag input contains a blank value.
    InvalidTag(String),
    /// Another topic already owns the slug derived from the title.
    DuplicateSlug(String),
    TopicNotFound(TopicId),
    CategoryNotFound(String),
    Repo(RepoError),
    /// Write succeeded but read-back did not find the row.
    InconsistentState(&'static str),
}

impl Display for TopicServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invalid(err) => write!(f, "invalid topic: {err}"),
            Self::InvalidTag(value) => write!(f, "invalid tag: `{value}`"),
            Self::DuplicateSlug(slug) => write!(f, "topic already exists: `{slug}`"),
            Self::TopicNotFound(id) => write!(f, "topic not found: {id}"),
            Self::CategoryNotFound(slug) => write!(f, "category not found: `{slug}`"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent topic state: {details}"),
        }
    }
}

impl Error for TopicServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Invalid(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for TopicServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Invalid(err),
            RepoError::DuplicateSlug(slug) => Self::DuplicateSlug(slug),
            RepoError::TopicNotFound(id) => Self::TopicNotFound(id),
            RepoError::CategoryNotFound(slug) => Self::CategoryNotFound(slug),
            other => Self::Repo(other),
        }
    }
}

impl From<ModelValidationError> for TopicServiceError {
    fn from(value: ModelValidationError) -> Self {
        Self::Invalid(value)
    }
}

/// List result envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicListResult {
    pub items: Vec<TopicRecord>,
    /// Effective normalized limit used by the query.
    pub applied_limit: u32,
}

/// Topic service facade over a repository implementation.
pub struct TopicService<R: TopicRepository> {
    repo: R,
}

impl<R: TopicRepository> TopicService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a topic from an admin form.
    ///
    /// Unlike entry submission, an existing slug is an error here.
    pub fn create_topic(
        &self,
        title: &str,
        year_override: Option<i64>,
    ) -> Result<TopicRecord, TopicServiceError> {
        let topic = Topic::new(title).with_year_override(year_override);
        topic.validate()?;

        if self.repo.get_topic_by_slug(&topic.slug)?.is_some() {
            return Err(TopicServiceError::DuplicateSlug(topic.slug));
        }

        let topic_id = self.repo.create_topic(&topic)?;
        info!("event=topic_create module=service status=ok source=admin topic_id={topic_id}");
        self.read_back(topic_id, "created topic not found in read-back")
    }

    pub fn get_topic(&self, id: TopicId) -> Result<Option<TopicRecord>, TopicServiceError> {
        Ok(self.repo.get_topic(id)?)
    }

    /// Looks a topic up by slug. Input is re-slugified, so a raw title works too.
    pub fn get_topic_by_slug(&self, slug: &str) -> Result<Option<TopicRecord>, TopicServiceError> {
        let slug = slugify(slug);
        if slug.is_empty() {
            return Ok(None);
        }
        Ok(self.repo.get_topic_by_slug(&slug)?)
    }

    /// Lists topics for tag/category search pages.
    pub fn list_topics(
        &self,
        tag_slug: Option<&str>,
        category_slug: Option<&str>,
        limit: Option<u32>,
        offset: u32,
    ) -> Result<TopicListResult, TopicServiceError> {
        let applied_limit = normalize_topic_limit(limit);
        let query = TopicListQuery {
            tag_slug: tag_slug.map(slugify).filter(|slug| !slug.is_empty()),
            category_slug: category_slug.map(slugify).filter(|slug| !slug.is_empty()),
            limit: Some(applied_limit),
            offset,
        };
        let items = self.repo.list_topics(&query)?;
        Ok(TopicListResult {
            items,
            applied_limit,
        })
    }

    /// Sets (`Some`) or clears (`None`) the explicit timeline year.
    pub fn set_year_override(
        &self,
        id: TopicId,
        year: Option<i64>,
    ) -> Result<TopicRecord, TopicServiceError> {
        self.repo.set_year_override(id, year)?;
        self.read_back(id, "topic missing after year update")
    }

    /// Replaces the full set of `kind` tags from raw user input.
    pub fn set_tags(
        &self,
        id: TopicId,
        kind: TagKind,
        names: Vec<String>,
    ) -> Result<TopicRecord, TopicServiceError> {
        if let Some(bad) = names.iter().find(|name| normalize_tag_name(name).is_none()) {
            return Err(TopicServiceError::InvalidTag(bad.clone()));
        }

        let normalized = normalize_tag_names(&names, kind);

        self.repo.set_topic_tags(id, kind, &normalized)?;
        info!(
            "event=topic_tags_set module=service status=ok topic_id={id} kind={} count={}",
            kind.as_str(),
            normalized.len()
        );
        self.read_back(id, "topic missing after tag replacement")
    }

    /// Replaces the topic's categories by slug.
    pub fn set_categories(
        &self,
        id: TopicId,
        category_slugs: Vec<String>,
    ) -> Result<TopicRecord, TopicServiceError> {
        let mut slugs: Vec<String> = Vec::new();
        for raw in &category_slugs {
            let slug = slugify(raw);
            if slug.is_empty() {
                return Err(TopicServiceError::CategoryNotFound(raw.clone()));
            }
            if !slugs.contains(&slug) {
                slugs.push(slug);
            }
        }

        self.repo.set_topic_categories(id, &slugs)?;
        self.read_back(id, "topic missing after category replacement")
    }

    /// Counts one page view and returns the new total.
    pub fn record_view(&self, id: TopicId) -> Result<u64, TopicServiceError> {
        Ok(self.repo.increment_view_count(id)?)
    }

    fn read_back(
        &self,
        id: TopicId,
        details: &'static str,
    ) -> Result<TopicRecord, TopicServiceError> {
        self.repo
            .get_topic(id)?
            .ok_or(TopicServiceError::InconsistentState(details))
    }
}

