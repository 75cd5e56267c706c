//! Tag repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Create-or-reuse tags by `(slug, kind)`.
//! - Provide tag listings and usage counts for tag clouds.
//!
//! # Invariants
//! - Tag names are normalized before storage; the first spelling of a slug
//!   is kept.
//! - Date-tag slugs are derived from the extracted year, so a reused date
//!   tag always resolves to the year of the requested spelling.
//! - Listings are sorted by name, case-insensitive.

use crate::model::tag::{Tag, TagKind};
use crate::model::ModelValidationError;
use crate::repo::{RepoError, RepoResult};
use crate::slug::{normalize_tag_name, tag_slug};
use rusqlite::{params, Connection, OptionalExtension, Row};

const TAG_SELECT_SQL: &str = "SELECT id, name, slug, kind FROM tags";

/// Tag with the number of topics using it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagUsage {
    pub tag: Tag,
    pub topic_count: u64,
}

/// Repository interface for tag bookkeeping.
pub trait TagRepository {
    /// Returns the tag with the same slug and kind, creating it if missing.
    fn ensure_tag(&self, name: &str, kind: TagKind) -> RepoResult<Tag>;
    /// Gets one tag by slug and kind.
    fn get_tag_by_slug(&self, slug: &str, kind: TagKind) -> RepoResult<Option<Tag>>;
    /// Lists tags, optionally restricted to one kind.
    fn list_tags(&self, kind: Option<TagKind>) -> RepoResult<Vec<Tag>>;
    /// Lists tags of one kind with topic counts, most used first.
    fn list_tag_usage(&self, kind: TagKind) -> RepoResult<Vec<TagUsage>>;
}

/// SQLite-backed tag repository.
pub struct SqliteTagRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTagRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl TagRepository for SqliteTagRepository<'_> {
    fn ensure_tag(&self, name: &str, kind: TagKind) -> RepoResult<Tag> {
        ensure_tag_in(self.conn, name, kind)
    }

    fn get_tag_by_slug(&self, slug: &str, kind: TagKind) -> RepoResult<Option<Tag>> {
        find_tag(self.conn, slug, kind)
    }

    fn list_tags(&self, kind: Option<TagKind>) -> RepoResult<Vec<Tag>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TAG_SELECT_SQL}
             WHERE (?1 IS NULL OR kind = ?1)
             ORDER BY name COLLATE NOCASE ASC, id ASC;"
        ))?;
        let mut rows = stmt.query([kind.map(TagKind::as_str)])?;
        let mut tags = Vec::new();
        while let Some(row) = rows.next()? {
            tags.push(parse_tag_row(row)?);
        }
        Ok(tags)
    }

    fn list_tag_usage(&self, kind: TagKind) -> RepoResult<Vec<TagUsage>> {
        let mut stmt = self.conn.prepare(
            "SELECT t.id, t.name, t.slug, t.kind, COUNT(tt.topic_uuid) AS topic_count
             FROM tags t
             LEFT JOIN topic_tags tt ON tt.tag_id = t.id
             WHERE t.kind = ?1
             GROUP BY t.id
             ORDER BY topic_count DESC, t.name COLLATE NOCASE ASC;",
        )?;
        let mut rows = stmt.query([kind.as_str()])?;
        let mut usage = Vec::new();
        while let Some(row) = rows.next()? {
            let count: i64 = row.get("topic_count")?;
            usage.push(TagUsage {
                tag: parse_tag_row(row)?,
                topic_count: u64::try_from(count).map_err(|_| {
                    RepoError::InvalidData(format!("negative tag usage count `{count}`"))
                })?,
            });
        }
        Ok(usage)
    }
}

/// Create-or-reuse on any connection or open transaction.
pub(crate) fn ensure_tag_in(conn: &Connection, name: &str, kind: TagKind) -> RepoResult<Tag> {
    let name = normalize_tag_name(name).ok_or(ModelValidationError::BlankField("tag"))?;
    let slug = tag_slug(&name, kind);

    conn.execute(
        "INSERT OR IGNORE INTO tags (name, slug, kind) VALUES (?1, ?2, ?3);",
        params![name, slug, kind.as_str()],
    )?;

    find_tag(conn, &slug, kind)?
        .ok_or_else(|| RepoError::InvalidData(format!("tag `{slug}` missing after insert")))
}

/// Loads all tags attached to one topic, sorted by name.
pub(crate) fn load_topic_tags(conn: &Connection, topic_uuid: &str) -> RepoResult<Vec<Tag>> {
    let mut stmt = conn.prepare(
        "SELECT t.id, t.name, t.slug, t.kind
         FROM topic_tags tt
         INNER JOIN tags t ON t.id = tt.tag_id
         WHERE tt.topic_uuid = ?1
         ORDER BY t.name COLLATE NOCASE ASC, t.id ASC;",
    )?;
    let mut rows = stmt.query([topic_uuid])?;
    let mut tags = Vec::new();
    while let Some(row) = rows.next()? {
        tags.push(parse_tag_row(row)?);
    }
    Ok(tags)
}

fn find_tag(conn: &Connection, slug: &str, kind: TagKind) -> RepoResult<Option<Tag>> {
    let row = conn
        .query_row(
            &format!("{TAG_SELECT_SQL} WHERE slug = ?1 AND kind = ?2;"),
            params![slug, kind.as_str()],
            |row| {
                Ok((
                    row.get::<_, i64>("id")?,
                    row.get::<_, String>("name")?,
                    row.get::<_, String>("slug")?,
                    row.get::<_, String>("kind")?,
                ))
            },
        )
        .optional()?;

    row.map(|(id, name, slug, kind_text)| build_tag(id, name, slug, &kind_text))
        .transpose()
}

fn parse_tag_row(row: &Row<'_>) -> RepoResult<Tag> {
    let kind_text: String = row.get("kind")?;
    build_tag(row.get("id")?, row.get("name")?, row.get("slug")?, &kind_text)
}

fn build_tag(id: i64, name: String, slug: String, kind_text: &str) -> RepoResult<Tag> {
    let kind = TagKind::parse(kind_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid tag kind `{kind_text}` in tags.kind"))
    })?;
    Ok(Tag {
        id,
        name,
        slug,
        kind,
    })
}
