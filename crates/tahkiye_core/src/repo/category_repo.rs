//! Category repository contracts and SQLite implementation.
//!
//! # Invariants
//! - Category slugs are unique; creating a second category with the same
//!   slug fails with `DuplicateSlug`.

use crate::model::category::Category;
use crate::model::ModelValidationError;
use crate::repo::{map_unique_violation, RepoResult};
use crate::slug::slugify;
use rusqlite::{params, Connection, OptionalExtension, Row};

const CATEGORY_SELECT_SQL: &str = "SELECT id, name, slug FROM categories";

/// Repository interface for categories.
pub trait CategoryRepository {
    /// Creates a category, deriving its slug from `name`.
    fn create_category(&self, name: &str) -> RepoResult<Category>;
    fn get_category_by_slug(&self, slug: &str) -> RepoResult<Option<Category>>;
    /// Lists all categories sorted by name.
    fn list_categories(&self) -> RepoResult<Vec<Category>>;
}

/// SQLite-backed category repository.
pub struct SqliteCategoryRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCategoryRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl CategoryRepository for SqliteCategoryRepository<'_> {
    fn create_category(&self, name: &str) -> RepoResult<Category> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ModelValidationError::BlankField("name").into());
        }
        let slug = slugify(name);
        if slug.is_empty() {
            return Err(ModelValidationError::InvalidSlug(slug).into());
        }

        self.conn
            .execute(
                "INSERT INTO categories (name, slug) VALUES (?1, ?2);",
                params![name, slug],
            )
            .map_err(|err| map_unique_violation(err, &slug))?;

        Ok(Category {
            id: self.conn.last_insert_rowid(),
            name: name.to_string(),
            slug,
        })
    }

    fn get_category_by_slug(&self, slug: &str) -> RepoResult<Option<Category>> {
        let category = self
            .conn
            .query_row(
                &format!("{CATEGORY_SELECT_SQL} WHERE slug = ?1;"),
                [slug],
                parse_category_row,
            )
            .optional()?;
        Ok(category)
    }

    fn list_categories(&self) -> RepoResult<Vec<Category>> {
        let mut stmt = self.conn.prepare(&format!(
            "{CATEGORY_SELECT_SQL} ORDER BY name COLLATE NOCASE ASC, id ASC;"
        ))?;
        let categories = stmt
            .query_map([], parse_category_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(categories)
    }
}

/// Loads categories attached to one topic, sorted by name.
pub(crate) fn load_topic_categories(
    conn: &Connection,
    topic_uuid: &str,
) -> RepoResult<Vec<Category>> {
    let mut stmt = conn.prepare(
        "SELECT c.id, c.name, c.slug
         FROM topic_categories tc
         INNER JOIN categories c ON c.id = tc.category_id
         WHERE tc.topic_uuid = ?1
         ORDER BY c.name COLLATE NOCASE ASC, c.id ASC;",
    )?;
    let categories = stmt
        .query_map([topic_uuid], parse_category_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(categories)
}

fn parse_category_row(row: &Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: row.get("id")?,
        name: row.get("name")?,
        slug: row.get("slug")?,
    })
}
