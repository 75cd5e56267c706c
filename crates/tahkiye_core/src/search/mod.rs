//! Search subsystem entry points.
//!
//! # Responsibility
//! - Expose keyword search over topic titles and entry bodies.
//!
//! # See also
//! - [`crate::repo::topic_repo::TopicListQuery`] for exact tag/category pages.

pub mod fts;
