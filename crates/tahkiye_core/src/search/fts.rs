//! SQLite FTS5-based topic search.
//!
//! # Responsibility
//! - Keyword search over topic titles and entry content.
//! - Return one hit per topic with a highlighted snippet.
//!
//! # Invariants
//! - A topic appears at most once, at the rank of its best matching row.
//! - Ordering is deterministic: best rank, then topic insertion order.

use crate::db::DbError;
use crate::model::topic::TopicId;
use rusqlite::{Connection, Row};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const DEFAULT_SEARCH_LIMIT: u32 = 20;

/// Result type for search APIs.
pub type SearchResult<T> = Result<T, SearchError>;

/// Search-layer error for query parsing, DB interaction and row decoding.
#[derive(Debug)]
pub enum SearchError {
    /// Raw FTS5 expression rejected by SQLite.
    InvalidQuery { query: String, message: String },
    Db(DbError),
    InvalidData(String),
}

impl Display for SearchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidQuery { query, message } => {
                write!(f, "invalid full-text query `{query}`: {message}")
            }
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid search row: {message}"),
        }
    }
}

impl Error for SearchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidQuery { .. } | Self::InvalidData(_) => None,
        }
    }
}

impl From<rusqlite::Error> for SearchError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Keyword search options.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    pub text: String,
    /// Maximum number of topics to return.
    pub limit: u32,
    /// Pass `text` through as a raw FTS5 expression.
    ///
    /// Off by default so user input with quotes or operators never errors.
    pub raw_fts_syntax: bool,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            limit: DEFAULT_SEARCH_LIMIT,
            raw_fts_syntax: false,
        }
    }
}

/// Where the best match of a hit was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitSource {
    Title,
    Entry,
}

/// One topic returned by [`search_topics`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub topic_id: TopicId,
    pub title: String,
    pub slug: String,
    pub source: HitSource,
    /// Matched fragment with terms wrapped in `[` `]`.
    pub snippet: String,
}

/// Searches topics by keyword. Blank queries and `limit == 0` return nothing.
pub fn search_topics(conn: &Connection, query: &SearchQuery) -> SearchResult<Vec<SearchHit>> {
    let Some(match_expr) = build_match_expression(query) else {
        return Ok(Vec::new());
    };
    if query.limit == 0 {
        return Ok(Vec::new());
    }

    let mut stmt = conn.prepare(
        "SELECT
            topics.uuid AS uuid,
            topics.title AS title,
            topics.slug AS slug,
            search_fts.kind AS kind,
            snippet(search_fts, 0, '[', ']', ' ... ', 10) AS snippet
         FROM search_fts
         JOIN topics ON topics.uuid = search_fts.topic_uuid
         WHERE search_fts MATCH ?1
         ORDER BY bm25(search_fts), topics.rowid ASC;",
    )?;
    let mut rows = stmt
        .query([match_expr.as_str()])
        .map_err(|err| map_query_error(err, &match_expr))?;

    let limit = usize::try_from(query.limit).unwrap_or(usize::MAX);
    let mut seen = HashSet::new();
    let mut hits = Vec::new();
    while let Some(row) = rows
        .next()
        .map_err(|err| map_query_error(err, &match_expr))?
    {
        let hit = parse_search_hit(row)?;
        if seen.insert(hit.topic_id) {
            hits.push(hit);
            if hits.len() == limit {
                break;
            }
        }
    }

    Ok(hits)
}

fn parse_search_hit(row: &Row<'_>) -> SearchResult<SearchHit> {
    let uuid_text: String = row.get("uuid")?;
    let topic_id = Uuid::parse_str(&uuid_text)
        .map_err(|_| SearchError::InvalidData(format!("invalid uuid `{uuid_text}`")))?;

    let kind: String = row.get("kind")?;
    let source = match kind.as_str() {
        "topic" => HitSource::Title,
        "entry" => HitSource::Entry,
        other => return Err(SearchError::InvalidData(format!("invalid kind `{other}`"))),
    };

    Ok(SearchHit {
        topic_id,
        title: row.get("title")?,
        slug: row.get("slug")?,
        source,
        snippet: row.get("snippet")?,
    })
}

fn build_match_expression(query: &SearchQuery) -> Option<String> {
    let text = query.text.trim();
    if text.is_empty() {
        return None;
    }
    if query.raw_fts_syntax {
        return Some(text.to_string());
    }

    let terms = text
        .split_whitespace()
        .map(escape_fts_term)
        .collect::<Vec<_>>();
    Some(terms.join(" AND "))
}

fn escape_fts_term(raw: &str) -> String {
    format!("\"{}\"", raw.replace('"', "\"\""))
}

fn map_query_error(err: rusqlite::Error, query: &str) -> SearchError {
    if is_match_syntax_error(&err) {
        return SearchError::InvalidQuery {
            query: query.to_string(),
            message: err.to_string(),
        };
    }
    SearchError::Db(DbError::Sqlite(err))
}

fn is_match_syntax_error(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(_, Some(message)) => {
            let msg = message.to_lowercase();
            (msg.contains("fts5") && msg.contains("syntax"))
                || msg.contains("malformed match expression")
                || msg.contains("unterminated")
        }
        _ => false,
    }
}
