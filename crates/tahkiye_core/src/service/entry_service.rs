//! Entry use-case service.
//!
//! # Responsibility
//! - Submit entries by topic title, creating the topic on first submission.
//! - List entries and record votes.
//!
//! # Invariants
//! - A title that slugifies to an existing topic reuses that topic.
//! - Nothing is written when the entry itself fails validation.
//! - A new topic and its first entry are committed together or not at all.

use crate::model::entry::{Entry, EntryId, VoteValue};
use crate::model::topic::{Topic, TopicId};
use crate::model::ModelValidationError;
use crate::repo::entry_repo::{EntryRecord, EntryRepository};
use crate::repo::topic_repo::{TopicRecord, TopicRepository};
use crate::repo::RepoError;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for entry use-cases.
#[derive(Debug)]
pub enum EntryServiceError {
    /// Topic title, author or content failed validation.
    Invalid(ModelValidationError),
    TopicNotFound(TopicId),
    EntryNotFound(EntryId),
    Repo(RepoError),
    InconsistentState(&'static str),
}

impl Display for EntryServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invalid(err) => write!(f, "invalid entry: {err}"),
            Self::TopicNotFound(id) => write!(f, "topic not found: {id}"),
            Self::EntryNotFound(id) => write!(f, "entry not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent entry state: {details}"),
        }
    }
}

impl Error for EntryServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Invalid(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for EntryServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Invalid(err),
            RepoError::TopicNotFound(id) => Self::TopicNotFound(id),
            RepoError::EntryNotFound(id) => Self::EntryNotFound(id),
            other => Self::Repo(other),
        }
    }
}

impl From<ModelValidationError> for EntryServiceError {
    fn from(value: ModelValidationError) -> Self {
        Self::Invalid(value)
    }
}

/// Result of [`EntryService::submit_entry`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedEntry {
    pub topic: TopicRecord,
    pub entry: EntryRecord,
    /// `true` when this submission created the topic.
    pub topic_created: bool,
}

/// Entry service facade over topic and entry repositories.
pub struct EntryService<T: TopicRepository, E: EntryRepository> {
    topics: T,
    entries: E,
}

impl<T: TopicRepository, E: EntryRepository> EntryService<T, E> {
    pub fn new(topics: T, entries: E) -> Self {
        Self { topics, entries }
    }

    /// Adds an entry under the topic named `topic_title`.
    pub fn submit_entry(
        &self,
        topic_title: &str,
        author: &str,
        content: &str,
    ) -> Result<SubmittedEntry, EntryServiceError> {
        let candidate = Topic::new(topic_title);
        candidate.validate()?;
        let first_entry = Entry::new(candidate.id, author, content);
        first_entry.validate()?;

        let (topic_id, entry_id, topic_created) =
            match self.topics.get_topic_by_slug(&candidate.slug)? {
                Some(existing) => {
                    let entry_id = self.add_entry(existing.id, author, content)?;
                    (existing.id, entry_id, false)
                }
                None => match self.entries.create_entry_with_topic(&candidate, &first_entry) {
                    Ok(entry_id) => (candidate.id, entry_id, true),
                    // Lost a race against a concurrent first submission.
                    Err(RepoError::DuplicateSlug(slug)) => {
                        let existing = self.topics.get_topic_by_slug(&slug)?.ok_or(
                            EntryServiceError::InconsistentState("duplicate slug without topic"),
                        )?;
                        let entry_id = self.add_entry(existing.id, author, content)?;
                        (existing.id, entry_id, false)
                    }
                    Err(err) => return Err(err.into()),
                },
            };
        if topic_created {
            info!("event=topic_create module=service status=ok source=entry topic_id={topic_id}");
        }
        info!("event=entry_create module=service status=ok topic_id={topic_id} entry_id={entry_id}");

        let entry = self
            .entries
            .get_entry(entry_id)?
            .ok_or(EntryServiceError::InconsistentState(
                "created entry not found in read-back",
            ))?;
        let topic = self
            .topics
            .get_topic(topic_id)?
            .ok_or(EntryServiceError::InconsistentState(
                "topic missing after entry submission",
            ))?;

        Ok(SubmittedEntry {
            topic,
            entry,
            topic_created,
        })
    }

    fn add_entry(
        &self,
        topic_id: TopicId,
        author: &str,
        content: &str,
    ) -> Result<EntryId, EntryServiceError> {
        Ok(self
            .entries
            .create_entry(&Entry::new(topic_id, author, content))?)
    }

    /// Lists entries of a topic, oldest first.
    pub fn list_entries(&self, topic_id: TopicId) -> Result<Vec<EntryRecord>, EntryServiceError> {
        if self.topics.get_topic(topic_id)?.is_none() {
            return Err(EntryServiceError::TopicNotFound(topic_id));
        }
        Ok(self.entries.list_entries(topic_id)?)
    }

    /// Records, changes or clears one voter's vote; returns the new score.
    pub fn vote(
        &self,
        entry_id: EntryId,
        voter: &str,
        vote: Option<VoteValue>,
    ) -> Result<i64, EntryServiceError> {
        Ok(self.entries.set_vote(entry_id, voter, vote)?)
    }
}
