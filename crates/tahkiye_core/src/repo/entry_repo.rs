//! Entry and vote repository contracts and SQLite implementation.
//!
//! # Invariants
//! - Entries are listed oldest first within a topic.
//! - One vote per `(entry, voter)`; re-voting replaces, clearing deletes.
//! - Creating an entry bumps the parent topic's `updated_at`.
//! - A topic created together with its first entry is committed only with
//!   that entry.

use crate::model::entry::{Entry, EntryId, VoteValue};
use crate::model::topic::{Topic, TopicId};
use crate::model::ModelValidationError;
use crate::repo::topic_repo::insert_topic;
use crate::repo::{parse_uuid, RepoError, RepoResult};
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};

const ENTRY_SELECT_SQL: &str = "SELECT
    e.uuid,
    e.topic_uuid,
    e.author,
    e.content,
    e.created_at,
    COALESCE((SELECT SUM(v.value) FROM entry_votes v WHERE v.entry_uuid = e.uuid), 0) AS score
FROM entries e";

/// Read model for entry lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryRecord {
    pub id: EntryId,
    pub topic_id: TopicId,
    pub author: String,
    pub content: String,
    /// Epoch milliseconds.
    pub created_at: i64,
    /// Sum of up (+1) and down (-1) votes.
    pub score: i64,
}

/// Repository interface for entries and votes.
pub trait EntryRepository {
    /// Inserts a validated entry under an existing topic.
    fn create_entry(&self, entry: &Entry) -> RepoResult<EntryId>;
    /// Inserts a new topic and its first entry in one transaction.
    ///
    /// `entry.topic_id` must be `topic.id`. A taken slug fails with
    /// `DuplicateSlug` and writes nothing.
    fn create_entry_with_topic(&self, topic: &Topic, entry: &Entry) -> RepoResult<EntryId>;
    fn get_entry(&self, id: EntryId) -> RepoResult<Option<EntryRecord>>;
    /// Lists entries of one topic, oldest first.
    fn list_entries(&self, topic_id: TopicId) -> RepoResult<Vec<EntryRecord>>;
    /// Sets (`Some`) or clears (`None`) one voter's vote and returns the new
    /// entry score.
    fn set_vote(&self, id: EntryId, voter: &str, vote: Option<VoteValue>) -> RepoResult<i64>;
}

/// SQLite-backed entry repository.
pub struct SqliteEntryRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEntryRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl EntryRepository for SqliteEntryRepository<'_> {
    fn create_entry(&self, entry: &Entry) -> RepoResult<EntryId> {
        entry.validate()?;

        let topic_uuid = entry.topic_id.to_string();
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let changed = tx.execute(
            "UPDATE topics
             SET updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1;",
            [topic_uuid.as_str()],
        )?;
        if changed == 0 {
            return Err(RepoError::TopicNotFound(entry.topic_id));
        }

        insert_entry(&tx, entry)?;
        tx.commit()?;

        Ok(entry.id)
    }

    fn create_entry_with_topic(&self, topic: &Topic, entry: &Entry) -> RepoResult<EntryId> {
        entry.validate()?;
        if entry.topic_id != topic.id {
            return Err(RepoError::InvalidData(format!(
                "entry {} belongs to topic {}, not new topic {}",
                entry.id, entry.topic_id, topic.id
            )));
        }

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        insert_topic(&tx, topic)?;
        insert_entry(&tx, entry)?;
        tx.commit()?;

        Ok(entry.id)
    }

    fn get_entry(&self, id: EntryId) -> RepoResult<Option<EntryRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ENTRY_SELECT_SQL} WHERE e.uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_entry_row(row)?));
        }
        Ok(None)
    }

    fn list_entries(&self, topic_id: TopicId) -> RepoResult<Vec<EntryRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ENTRY_SELECT_SQL}
             WHERE e.topic_uuid = ?1
             ORDER BY e.created_at ASC, e.rowid ASC;"
        ))?;
        let mut rows = stmt.query([topic_id.to_string()])?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next()? {
            entries.push(parse_entry_row(row)?);
        }
        Ok(entries)
    }

    fn set_vote(&self, id: EntryId, voter: &str, vote: Option<VoteValue>) -> RepoResult<i64> {
        let voter = voter.trim();
        if voter.is_empty() {
            return Err(ModelValidationError::BlankField("voter").into());
        }

        let entry_uuid = id.to_string();
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let exists: i64 = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM entries WHERE uuid = ?1);",
            [entry_uuid.as_str()],
            |row| row.get(0),
        )?;
        if exists == 0 {
            return Err(RepoError::EntryNotFound(id));
        }

        match vote {
            Some(value) => tx.execute(
                "INSERT INTO entry_votes (entry_uuid, voter, value)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT (entry_uuid, voter) DO UPDATE SET value = excluded.value;",
                params![entry_uuid, voter, value.score()],
            )?,
            None => tx.execute(
                "DELETE FROM entry_votes WHERE entry_uuid = ?1 AND voter = ?2;",
                params![entry_uuid, voter],
            )?,
        };

        let score: i64 = tx.query_row(
            "SELECT COALESCE(SUM(value), 0) FROM entry_votes WHERE entry_uuid = ?1;",
            [entry_uuid.as_str()],
            |row| row.get(0),
        )?;
        tx.commit()?;
        Ok(score)
    }
}

fn insert_entry(conn: &Connection, entry: &Entry) -> RepoResult<()> {
    conn.execute(
        "INSERT INTO entries (uuid, topic_uuid, author, content)
         VALUES (?1, ?2, ?3, ?4);",
        params![
            entry.id.to_string(),
            entry.topic_id.to_string(),
            entry.author.as_str(),
            entry.content.as_str(),
        ],
    )?;
    Ok(())
}

fn parse_entry_row(row: &Row<'_>) -> RepoResult<EntryRecord> {
    let uuid_text: String = row.get("uuid")?;
    let topic_text: String = row.get("topic_uuid")?;
    Ok(EntryRecord {
        id: parse_uuid(&uuid_text, "entries.uuid")?,
        topic_id: parse_uuid(&topic_text, "entries.topic_uuid")?,
        author: row.get("author")?,
        content: row.get("content")?,
        created_at: row.get("created_at")?,
        score: row.get("score")?,
    })
}
