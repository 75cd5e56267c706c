//! Topic repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide topic CRUD, counters and listing with tag/category filters.
//! - Own topic-tag and topic-category replacement with atomic semantics.
//! - Serve timeline rows (topic + categories + tags) to the timeline service.
//!
//! # Invariants
//! - `slug` is unique; violations surface as `DuplicateSlug`.
//! - `set_topic_tags` replaces only the tags of the given kind, in one
//!   transaction.
//! - Timeline rows come back in insertion order.

use crate::model::category::Category;
use crate::model::tag::{Tag, TagKind};
use crate::model::topic::{Topic, TopicId};
use crate::repo::category_repo::load_topic_categories;
use crate::repo::tag_repo::{ensure_tag_in, load_topic_tags};
use crate::repo::{map_unique_violation, normalize_limit, parse_uuid, RepoError, RepoResult};
use crate::timeline::TimelineRow;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row, Transaction, TransactionBehavior};

const TOPICS_DEFAULT_LIMIT: u32 = 20;
const TOPICS_LIMIT_MAX: u32 = 100;

const TOPIC_SELECT_SQL: &str = "SELECT
    uuid,
    title,
    slug,
    year_override,
    view_count,
    created_at,
    updated_at
FROM topics";

/// Read model for topic list/detail pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicRecord {
    pub id: TopicId,
    pub title: String,
    pub slug: String,
    pub year_override: Option<i64>,
    pub view_count: u64,
    /// Epoch milliseconds.
    pub created_at: i64,
    /// Epoch milliseconds, bumped by edits and new entries.
    pub updated_at: i64,
    pub categories: Vec<Category>,
    /// Tags of both kinds, sorted by name.
    pub tags: Vec<Tag>,
}

impl TopicRecord {
    /// Tags of one kind, in display order.
    pub fn tags_of(&self, kind: TagKind) -> impl Iterator<Item = &Tag> {
        self.tags.iter().filter(move |tag| tag.kind == kind)
    }
}

/// Query options for topic listings ("search by tag/category" pages).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicListQuery {
    /// Exact general-or-date tag slug filter.
    pub tag_slug: Option<String>,
    /// Exact category slug filter.
    pub category_slug: Option<String>,
    /// Defaults to 20 and clamps to 100.
    pub limit: Option<u32>,
    pub offset: u32,
}

/// Repository interface for topics.
pub trait TopicRepository {
    /// Inserts a validated topic and returns its id.
    fn create_topic(&self, topic: &Topic) -> RepoResult<TopicId>;
    fn get_topic(&self, id: TopicId) -> RepoResult<Option<TopicRecord>>;
    fn get_topic_by_slug(&self, slug: &str) -> RepoResult<Option<TopicRecord>>;
    /// Lists topics by `updated_at DESC, uuid ASC`.
    fn list_topics(&self, query: &TopicListQuery) -> RepoResult<Vec<TopicRecord>>;
    /// Sets or clears the explicit timeline year.
    fn set_year_override(&self, id: TopicId, year: Option<i64>) -> RepoResult<()>;
    /// Adds one view and returns the new count.
    fn increment_view_count(&self, id: TopicId) -> RepoResult<u64>;
    /// Replaces all tags of `kind` on the topic with `names`, creating
    /// missing tags. Names must already be normalized.
    fn set_topic_tags(&self, id: TopicId, kind: TagKind, names: &[String]) -> RepoResult<()>;
    /// Replaces the topic's categories. Unknown slugs fail the whole call.
    fn set_topic_categories(&self, id: TopicId, category_slugs: &[String]) -> RepoResult<()>;
}

/// Read contract of the timeline service.
pub trait TimelineSource {
    /// Topics that may appear on the timeline (explicit year or at least one
    /// date tag), in insertion order, with categories and tags joined.
    fn list_timeline_rows(&self) -> RepoResult<Vec<TimelineRow>>;
}

/// SQLite-backed topic repository.
pub struct SqliteTopicRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTopicRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn begin(&self) -> RepoResult<Transaction<'conn>> {
        Ok(Transaction::new_unchecked(
            self.conn,
            TransactionBehavior::Immediate,
        )?)
    }
}

impl TopicRepository for SqliteTopicRepository<'_> {
    fn create_topic(&self, topic: &Topic) -> RepoResult<TopicId> {
        insert_topic(self.conn, topic)?;
        Ok(topic.id)
    }

    fn get_topic(&self, id: TopicId) -> RepoResult<Option<TopicRecord>> {
        self.find_one("uuid", &id.to_string())
    }

    fn get_topic_by_slug(&self, slug: &str) -> RepoResult<Option<TopicRecord>> {
        self.find_one("slug", slug)
    }

    fn list_topics(&self, query: &TopicListQuery) -> RepoResult<Vec<TopicRecord>> {
        let mut sql = format!("{TOPIC_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(tag_slug) = query.tag_slug.as_ref() {
            sql.push_str(
                " AND EXISTS (
                    SELECT 1
                    FROM topic_tags tt
                    INNER JOIN tags t ON t.id = tt.tag_id
                    WHERE tt.topic_uuid = topics.uuid
                      AND t.slug = ?
                )",
            );
            bind_values.push(Value::Text(tag_slug.clone()));
        }

        if let Some(category_slug) = query.category_slug.as_ref() {
            sql.push_str(
                " AND EXISTS (
                    SELECT 1
                    FROM topic_categories tc
                    INNER JOIN categories c ON c.id = tc.category_id
                    WHERE tc.topic_uuid = topics.uuid
                      AND c.slug = ?
                )",
            );
            bind_values.push(Value::Text(category_slug.clone()));
        }

        sql.push_str(" ORDER BY updated_at DESC, uuid ASC LIMIT ?");
        bind_values.push(Value::Integer(i64::from(normalize_topic_limit(query.limit))));
        if query.offset > 0 {
            sql.push_str(" OFFSET ?");
            bind_values.push(Value::Integer(i64::from(query.offset)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut topics = Vec::new();
        while let Some(row) = rows.next()? {
            topics.push(self.parse_topic_row(row)?);
        }
        Ok(topics)
    }

    fn set_year_override(&self, id: TopicId, year: Option<i64>) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE topics
             SET
                year_override = ?2,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1;",
            params![id.to_string(), year],
        )?;

        if changed == 0 {
            return Err(RepoError::TopicNotFound(id));
        }
        Ok(())
    }

    fn increment_view_count(&self, id: TopicId) -> RepoResult<u64> {
        let tx = self.begin()?;
        let changed = tx.execute(
            "UPDATE topics SET view_count = view_count + 1 WHERE uuid = ?1;",
            [id.to_string()],
        )?;
        if changed == 0 {
            return Err(RepoError::TopicNotFound(id));
        }
        let count: i64 = tx.query_row(
            "SELECT view_count FROM topics WHERE uuid = ?1;",
            [id.to_string()],
            |row| row.get(0),
        )?;
        tx.commit()?;

        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative view_count `{count}`")))
    }

    fn set_topic_tags(&self, id: TopicId, kind: TagKind, names: &[String]) -> RepoResult<()> {
        let topic_uuid = id.to_string();
        let tx = self.begin()?;
        if !topic_exists(&tx, &topic_uuid)? {
            return Err(RepoError::TopicNotFound(id));
        }

        tx.execute(
            "DELETE FROM topic_tags
             WHERE topic_uuid = ?1
               AND tag_id IN (SELECT id FROM tags WHERE kind = ?2);",
            params![topic_uuid, kind.as_str()],
        )?;

        for name in names {
            let tag = ensure_tag_in(&tx, name, kind)?;
            tx.execute(
                "INSERT OR IGNORE INTO topic_tags (topic_uuid, tag_id) VALUES (?1, ?2);",
                params![topic_uuid, tag.id],
            )?;
        }

        touch_topic(&tx, &topic_uuid)?;
        tx.commit()?;
        Ok(())
    }

    fn set_topic_categories(&self, id: TopicId, category_slugs: &[String]) -> RepoResult<()> {
        let topic_uuid = id.to_string();
        let tx = self.begin()?;
        if !topic_exists(&tx, &topic_uuid)? {
            return Err(RepoError::TopicNotFound(id));
        }

        tx.execute(
            "DELETE FROM topic_categories WHERE topic_uuid = ?1;",
            [topic_uuid.as_str()],
        )?;

        for slug in category_slugs {
            let inserted = tx.execute(
                "INSERT OR IGNORE INTO topic_categories (topic_uuid, category_id)
                 SELECT ?1, id FROM categories WHERE slug = ?2;",
                params![topic_uuid, slug],
            )?;
            if inserted == 0 && !category_linked(&tx, &topic_uuid, slug)? {
                return Err(RepoError::CategoryNotFound(slug.clone()));
            }
        }

        touch_topic(&tx, &topic_uuid)?;
        tx.commit()?;
        Ok(())
    }
}

impl TimelineSource for SqliteTopicRepository<'_> {
    fn list_timeline_rows(&self) -> RepoResult<Vec<TimelineRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT uuid, title, slug, year_override
             FROM topics
             WHERE year_override IS NOT NULL
                OR EXISTS (
                    SELECT 1
                    FROM topic_tags tt
                    INNER JOIN tags t ON t.id = tt.tag_id
                    WHERE tt.topic_uuid = topics.uuid
                      AND t.kind = 'date'
                )
             ORDER BY rowid ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut timeline_rows = Vec::new();
        while let Some(row) = rows.next()? {
            let uuid_text: String = row.get("uuid")?;
            timeline_rows.push(TimelineRow {
                topic_id: parse_uuid(&uuid_text, "topics.uuid")?,
                title: row.get("title")?,
                slug: row.get("slug")?,
                year_override: row.get("year_override")?,
                categories: load_topic_categories(self.conn, &uuid_text)?,
                tags: load_topic_tags(self.conn, &uuid_text)?,
            });
        }
        Ok(timeline_rows)
    }
}

impl SqliteTopicRepository<'_> {
    fn find_one(&self, column: &'static str, value: &str) -> RepoResult<Option<TopicRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TOPIC_SELECT_SQL} WHERE {column} = ?1;"))?;
        let mut rows = stmt.query([value])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(self.parse_topic_row(row)?));
        }
        Ok(None)
    }

    fn parse_topic_row(&self, row: &Row<'_>) -> RepoResult<TopicRecord> {
        let uuid_text: String = row.get("uuid")?;
        let view_count: i64 = row.get("view_count")?;
        Ok(TopicRecord {
            id: parse_uuid(&uuid_text, "topics.uuid")?,
            title: row.get("title")?,
            slug: row.get("slug")?,
            year_override: row.get("year_override")?,
            view_count: u64::try_from(view_count).map_err(|_| {
                RepoError::InvalidData(format!("negative view_count `{view_count}`"))
            })?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
            categories: load_topic_categories(self.conn, &uuid_text)?,
            tags: load_topic_tags(self.conn, &uuid_text)?,
        })
    }
}

/// Validates and inserts one topic on any connection or open transaction.
pub(crate) fn insert_topic(conn: &Connection, topic: &Topic) -> RepoResult<()> {
    topic.validate()?;

    conn.execute(
        "INSERT INTO topics (uuid, title, slug, year_override)
         VALUES (?1, ?2, ?3, ?4);",
        params![
            topic.id.to_string(),
            topic.title.as_str(),
            topic.slug.as_str(),
            topic.year_override,
        ],
    )
    .map_err(|err| map_unique_violation(err, &topic.slug))?;
    Ok(())
}

/// Normalizes list limit according to the topic listing contract.
pub fn normalize_topic_limit(limit: Option<u32>) -> u32 {
    normalize_limit(limit, TOPICS_DEFAULT_LIMIT, TOPICS_LIMIT_MAX)
}

fn topic_exists(tx: &Transaction<'_>, topic_uuid: &str) -> RepoResult<bool> {
    let exists: i64 = tx.query_row(
        "SELECT EXISTS(SELECT 1 FROM topics WHERE uuid = ?1);",
        [topic_uuid],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn category_linked(tx: &Transaction<'_>, topic_uuid: &str, slug: &str) -> RepoResult<bool> {
    let linked: i64 = tx.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM topic_categories tc
            INNER JOIN categories c ON c.id = tc.category_id
            WHERE tc.topic_uuid = ?1 AND c.slug = ?2
        );",
        params![topic_uuid, slug],
        |row| row.get(0),
    )?;
    Ok(linked == 1)
}

fn touch_topic(tx: &Transaction<'_>, topic_uuid: &str) -> RepoResult<()> {
    tx.execute(
        "UPDATE topics
         SET updated_at = (strftime('%s', 'now') * 1000)
         WHERE uuid = ?1;",
        [topic_uuid],
    )?;
    Ok(())
}
