//! Category store for linkstash.
//!
//! Implements `CategoryStoreTrait` — CRUD operations for bookmark categories,
//! backed by SQLite via `rusqlite`.

use rusqlite::{params, Connection};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::types::category::{Category, NewCategory};
use crate::types::errors::Error;

/// Trait defining category store operations.
pub trait CategoryStoreTrait {
    /// Lists all categories, ordered by name ascending.
    fn get_all(&self) -> Result<Vec<Category>, Error>;
    fn get_by_id(&self, id: i64) -> Result<Category, Error>;
    fn create(&mut self, fields: &NewCategory) -> Result<Category, Error>;
    /// Full replace of the mutable fields. `id` and `created_at` are immutable.
    fn update(&mut self, id: i64, fields: &NewCategory) -> Result<Category, Error>;
    /// Returns `false` if the id does not exist. After a `true` return, no
    /// bookmark retains a reference to the deleted category.
    fn delete(&mut self, id: i64) -> Result<bool, Error>;
}

/// Category store backed by a SQLite connection.
pub struct CategoryStore<'a> {
    conn: &'a Connection,
}

impl<'a> CategoryStore<'a> {
    /// Creates a new `CategoryStore` using the provided database connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Returns the current UNIX timestamp in seconds.
    fn now() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64
    }

    fn validate(fields: &NewCategory) -> Result<(), Error> {
        if fields.name.trim().is_empty() {
            return Err(Error::Validation("category name must not be empty".to_string()));
        }
        Ok(())
    }

    /// Reads a single `Category` row into a struct.
    pub(crate) fn row_to_category(row: &rusqlite::Row) -> rusqlite::Result<Category> {
        Ok(Category {
            id: row.get(0)?,
            name: row.get(1)?,
            description: row.get(2)?,
            created_at: row.get(3)?,
            updated_at: row.get(4)?,
        })
    }
}

impl<'a> CategoryStoreTrait for CategoryStore<'a> {
    fn get_all(&self) -> Result<Vec<Category>, Error> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, description, created_at, updated_at \
             FROM categories ORDER BY name, id",
        )?;

        let rows = stmt.query_map([], Self::row_to_category)?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row?);
        }
        Ok(results)
    }

    fn get_by_id(&self, id: i64) -> Result<Category, Error> {
        self.conn
            .query_row(
                "SELECT id, name, description, created_at, updated_at \
                 FROM categories WHERE id = ?1",
                params![id],
                Self::row_to_category,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => {
                    Error::NotFound(format!("category {} does not exist", id))
                }
                other => Error::from(other),
            })
    }

    fn create(&mut self, fields: &NewCategory) -> Result<Category, Error> {
        Self::validate(fields)?;

        let now = Self::now();
        self.conn.execute(
            "INSERT INTO categories (name, description, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4)",
            params![fields.name, fields.description, now, now],
        )?;

        self.get_by_id(self.conn.last_insert_rowid())
    }

    fn update(&mut self, id: i64, fields: &NewCategory) -> Result<Category, Error> {
        Self::validate(fields)?;

        let now = Self::now();
        let affected = self.conn.execute(
            "UPDATE categories SET name = ?1, description = ?2, updated_at = ?3 WHERE id = ?4",
            params![fields.name, fields.description, now, id],
        )?;

        if affected == 0 {
            return Err(Error::NotFound(format!("category {} does not exist", id)));
        }
        self.get_by_id(id)
    }

    /// Deletes a category by id.
    ///
    /// Referencing bookmarks are not deleted; their `category_id` is cleared
    /// before the category row is removed.
    fn delete(&mut self, id: i64) -> Result<bool, Error> {
        self.conn.execute(
            "UPDATE bookmarks SET category_id = NULL WHERE category_id = ?1",
            params![id],
        )?;

        let affected = self
            .conn
            .execute("DELETE FROM categories WHERE id = ?1", params![id])?;

        Ok(affected > 0)
    }
}
