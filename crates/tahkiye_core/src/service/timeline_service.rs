//! Timeline use-case service.
//!
//! # Responsibility
//! - Fetch timeline rows and run the pure timeline pipeline.
//!
//! # Invariants
//! - Every call re-fetches; nothing is cached between renders.
//! - A fetch failure is logged and yields an empty timeline, never an error.
//! - One fetch attempt per call, no retries.

use crate::repo::topic_repo::TimelineSource;
use crate::timeline::{build_timeline, Timeline};
use log::{debug, warn};
use std::time::Instant;

/// Timeline service facade over a timeline row source.
pub struct TimelineService<S: TimelineSource> {
    source: S,
}

impl<S: TimelineSource> TimelineService<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Builds the century-grouped timeline from fresh rows.
    pub fn timeline(&self) -> Timeline {
        let started_at = Instant::now();
        let rows = match self.source.list_timeline_rows() {
            Ok(rows) => rows,
            Err(err) => {
                warn!(
                    "event=timeline_build module=service status=error duration_ms={} error_code=timeline_fetch_failed error={err}",
                    started_at.elapsed().as_millis()
                );
                return Timeline::default();
            }
        };

        let timeline = build_timeline(&rows);
        debug!(
            "event=timeline_build module=service status=ok duration_ms={} rows={} cards={} buckets={}",
            started_at.elapsed().as_millis(),
            rows.len(),
            timeline.card_count(),
            timeline.buckets.len()
        );
        timeline
    }
}
