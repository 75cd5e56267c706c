//! Chronological timeline pipeline.
//!
//! # Responsibility
//! - Turn raw topic rows (override year + tags) into century-grouped cards.
//!
//! # Invariants
//! - A topic is on the timeline iff it has an explicit year override or at
//!   least one parseable date tag.
//! - The pipeline is a pure function of its input rows; building twice from
//!   the same rows yields identical output.
//!
//! Stages live in [`year`] (extract + resolve) and [`bucket`] (group + label).

use crate::model::category::Category;
use crate::model::tag::{Tag, TagKind};
use crate::model::topic::TopicId;
use serde::Serialize;

pub mod bucket;
pub mod year;

pub use bucket::{century_key, century_label};
pub use year::{extract_year, resolve_year};

/// Topic row as read from storage, before year resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineRow {
    pub topic_id: TopicId,
    pub title: String,
    pub slug: String,
    pub year_override: Option<i64>,
    pub categories: Vec<Category>,
    /// All tags of the topic, both kinds.
    pub tags: Vec<Tag>,
}

/// Card rendered for one topic on the timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineCard {
    pub topic_id: TopicId,
    pub title: String,
    pub slug: String,
    /// Resolved signed year (negative for BCE).
    pub year: i64,
    pub categories: Vec<Category>,
    /// General tags only; date tags drive placement and are not shown.
    pub tags: Vec<Tag>,
}

/// One 100-year section of the timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CenturyBucket {
    /// `floor(year / 100) * 100`.
    pub key: i64,
    pub label: String,
    pub cards: Vec<TimelineCard>,
}

/// Timeline view model, buckets most recent first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Timeline {
    pub buckets: Vec<CenturyBucket>,
}

impl Timeline {
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Number of cards across all buckets.
    pub fn card_count(&self) -> usize {
        self.buckets.iter().map(|bucket| bucket.cards.len()).sum()
    }
}

/// Builds the timeline from storage rows.
///
/// Rows without a resolvable year are dropped silently.
pub fn build_timeline(rows: &[TimelineRow]) -> Timeline {
    let dated = rows.iter().filter_map(|row| {
        let year = resolve_year(row.year_override, date_tag_names(row))?;
        Some((year, to_card(row, year)))
    });

    let buckets = bucket::group_by_century(dated)
        .into_iter()
        .map(|(key, cards)| CenturyBucket {
            key,
            label: century_label(key),
            cards,
        })
        .collect();

    Timeline { buckets }
}

fn date_tag_names(row: &TimelineRow) -> impl Iterator<Item = &str> {
    row.tags
        .iter()
        .filter(|tag| tag.kind == TagKind::Date)
        .map(|tag| tag.name.as_str())
}

fn to_card(row: &TimelineRow, year: i64) -> TimelineCard {
    TimelineCard {
        topic_id: row.topic_id,
        title: row.title.clone(),
        slug: row.slug.clone(),
        year,
        categories: row.categories.clone(),
        tags: row
            .tags
            .iter()
            .filter(|tag| tag.kind == TagKind::General)
            .cloned()
            .collect(),
    }
}
