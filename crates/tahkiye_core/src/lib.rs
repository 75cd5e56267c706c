//! Core domain logic for the Tahkiye community site.
//! This crate is the single source of truth for topic, tag and timeline
//! invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod render;
pub mod repo;
pub mod search;
pub mod service;
pub mod slug;
pub mod timeline;

pub use config::{AppConfig, ConfigError};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::category::{Category, CategoryId};
pub use model::entry::{Entry, EntryId, VoteValue};
pub use model::tag::{Tag, TagId, TagKind};
pub use model::topic::{Topic, TopicId};
pub use model::ModelValidationError;
pub use render::{render_timeline, TimelineHtml};
pub use repo::category_repo::{CategoryRepository, SqliteCategoryRepository};
pub use repo::entry_repo::{EntryRecord, EntryRepository, SqliteEntryRepository};
pub use repo::tag_repo::{SqliteTagRepository, TagRepository, TagUsage};
pub use repo::topic_repo::{
    SqliteTopicRepository, TimelineSource, TopicListQuery, TopicRecord, TopicRepository,
};
pub use repo::{RepoError, RepoResult};
pub use search::fts::{search_topics, HitSource, SearchError, SearchHit, SearchQuery};
pub use service::entry_service::{EntryService, EntryServiceError, SubmittedEntry};
pub use service::timeline_service::TimelineService;
pub use service::topic_service::{TopicListResult, TopicService, TopicServiceError};
pub use timeline::{build_timeline, CenturyBucket, Timeline, TimelineCard, TimelineRow};

/// Minimal health-check API for integration probes.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
