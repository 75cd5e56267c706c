//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into page-level use-cases.
//! - Keep rendering/CLI layers decoupled from storage details.

pub mod entry_service;
pub mod timeline_service;
pub mod topic_service;
