//! Bookmark store for linkstash.
//!
//! Implements `BookmarkStoreTrait` — CRUD, export, and import over bookmark
//! records, backed by SQLite via `rusqlite`.

use rusqlite::{params, Connection};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::stores::category_store::{CategoryStore, CategoryStoreTrait};
use crate::types::bookmark::{Bookmark, BookmarkFilter, NewBookmark};
use crate::types::category::{Category, NewCategory};
use crate::types::errors::Error;
use crate::types::export::{ExportSnapshot, ImportPayload};

/// Trait defining bookmark store operations.
pub trait BookmarkStoreTrait {
    /// Lists bookmarks matching the filter, newest first.
    fn get_all(&self, filter: &BookmarkFilter) -> Result<Vec<Bookmark>, Error>;
    fn get_by_id(&self, id: i64) -> Result<Bookmark, Error>;
    fn create(&mut self, fields: &NewBookmark) -> Result<Bookmark, Error>;
    /// Full replace of the mutable fields. `id` and `created_at` are immutable.
    fn update(&mut self, id: i64, fields: &NewBookmark) -> Result<Bookmark, Error>;
    /// Returns `false` if the id does not exist.
    fn delete(&mut self, id: i64) -> Result<bool, Error>;
    /// Snapshots every bookmark and category, stamped at call time.
    fn export(&self) -> Result<ExportSnapshot, Error>;
    /// Imports a snapshot, remapping category references by name.
    /// Returns the number of bookmarks inserted.
    fn import(&mut self, payload: &ImportPayload) -> Result<usize, Error>;
}

const SELECT_COLUMNS: &str =
    "SELECT id, url, title, description, icon, is_private, category_id, created_at, updated_at \
     FROM bookmarks";

/// Bookmark store backed by a SQLite connection.
pub struct BookmarkStore<'a> {
    conn: &'a Connection,
}

impl<'a> BookmarkStore<'a> {
    /// Creates a new `BookmarkStore` using the provided database connection.
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

    fn validate(fields: &NewBookmark) -> Result<(), Error> {
        if fields.url.trim().is_empty() {
            return Err(Error::Validation("bookmark url must not be empty".to_string()));
        }
        if fields.title.trim().is_empty() {
            return Err(Error::Validation("bookmark title must not be empty".to_string()));
        }
        Ok(())
    }

    /// Checks whether a category with the given id exists.
    fn category_exists(&self, category_id: i64) -> Result<bool, Error> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM categories WHERE id = ?1",
            params![category_id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// A non-null category reference must point at an existing row at write time.
    fn check_category_ref(&self, fields: &NewBookmark) -> Result<(), Error> {
        if let Some(cid) = fields.category_id {
            if !self.category_exists(cid)? {
                return Err(Error::Validation(format!("category {} does not exist", cid)));
            }
        }
        Ok(())
    }

    /// Current categories in insertion order, so that the import remap is
    /// deterministic under duplicate names: the first-inserted match wins.
    fn categories_by_insertion(&self) -> Result<Vec<Category>, Error> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, description, created_at, updated_at \
             FROM categories ORDER BY id",
        )?;
        let rows = stmt.query_map([], CategoryStore::row_to_category)?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row?);
        }
        Ok(results)
    }

    /// Reads a single `Bookmark` row into a struct.
    fn row_to_bookmark(row: &rusqlite::Row) -> rusqlite::Result<Bookmark> {
        Ok(Bookmark {
            id: row.get(0)?,
            url: row.get(1)?,
            title: row.get(2)?,
            description: row.get(3)?,
            icon: row.get(4)?,
            is_private: row.get(5)?,
            category_id: row.get(6)?,
            created_at: row.get(7)?,
            updated_at: row.get(8)?,
        })
    }
}

impl<'a> BookmarkStoreTrait for BookmarkStore<'a> {
    /// Lists bookmarks, ordered by creation time descending (id breaks ties
    /// so same-second inserts stay in reverse insertion order). Private rows
    /// are excluded unless `include_private` is set; both predicates compose
    /// with AND.
    fn get_all(&self, filter: &BookmarkFilter) -> Result<Vec<Bookmark>, Error> {
        const ORDER: &str = " ORDER BY created_at DESC, id DESC";

        let sql = match (filter.category_id, filter.include_private) {
            (Some(_), true) => format!("{} WHERE category_id = ?1{}", SELECT_COLUMNS, ORDER),
            (Some(_), false) => format!(
                "{} WHERE category_id = ?1 AND is_private = 0{}",
                SELECT_COLUMNS, ORDER
            ),
            (None, true) => format!("{}{}", SELECT_COLUMNS, ORDER),
            (None, false) => format!("{} WHERE is_private = 0{}", SELECT_COLUMNS, ORDER),
        };

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = match filter.category_id {
            Some(cid) => stmt.query_map(params![cid], Self::row_to_bookmark)?,
            None => stmt.query_map([], Self::row_to_bookmark)?,
        };

        let mut results = Vec::new();
        for row in rows {
            results.push(row?);
        }
        Ok(results)
    }

    fn get_by_id(&self, id: i64) -> Result<Bookmark, Error> {
        self.conn
            .query_row(
                &format!("{} WHERE id = ?1", SELECT_COLUMNS),
                params![id],
                Self::row_to_bookmark,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => {
                    Error::NotFound(format!("bookmark {} does not exist", id))
                }
                other => Error::from(other),
            })
    }

    fn create(&mut self, fields: &NewBookmark) -> Result<Bookmark, Error> {
        Self::validate(fields)?;
        self.check_category_ref(fields)?;

        let now = Self::now();
        self.conn.execute(
            "INSERT INTO bookmarks (url, title, description, icon, is_private, category_id, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                fields.url,
                fields.title,
                fields.description,
                fields.icon,
                fields.is_private,
                fields.category_id,
                now,
                now
            ],
        )?;

        self.get_by_id(self.conn.last_insert_rowid())
    }

    fn update(&mut self, id: i64, fields: &NewBookmark) -> Result<Bookmark, Error> {
        Self::validate(fields)?;
        self.check_category_ref(fields)?;

        let now = Self::now();
        let affected = self.conn.execute(
            "UPDATE bookmarks \
             SET url = ?1, title = ?2, description = ?3, icon = ?4, is_private = ?5, category_id = ?6, updated_at = ?7 \
             WHERE id = ?8",
            params![
                fields.url,
                fields.title,
                fields.description,
                fields.icon,
                fields.is_private,
                fields.category_id,
                now,
                id
            ],
        )?;

        if affected == 0 {
            return Err(Error::NotFound(format!("bookmark {} does not exist", id)));
        }
        self.get_by_id(id)
    }

    fn delete(&mut self, id: i64) -> Result<bool, Error> {
        let affected = self
            .conn
            .execute("DELETE FROM bookmarks WHERE id = ?1", params![id])?;
        Ok(affected > 0)
    }

    fn export(&self) -> Result<ExportSnapshot, Error> {
        let bookmarks = self.get_all(&BookmarkFilter {
            include_private: true,
            category_id: None,
        })?;
        let categories = CategoryStore::new(self.conn).get_all()?;

        Ok(ExportSnapshot {
            bookmarks,
            categories,
            export_date: Self::now(),
        })
    }

    /// Imports a snapshot produced by [`export`](BookmarkStoreTrait::export),
    /// or any payload of the same shape.
    ///
    /// Payload categories are inserted as new rows (original ids stripped,
    /// duplicate names allowed). Each bookmark's `category_id` is then
    /// remapped: original id -> payload category name -> first-inserted
    /// current category with that name. Any miss clears the reference.
    ///
    /// The whole operation runs in one transaction; a failure partway through
    /// leaves the store untouched.
    fn import(&mut self, payload: &ImportPayload) -> Result<usize, Error> {
        let entries = payload.bookmarks.as_ref().ok_or_else(|| {
            Error::Validation("import payload must contain a bookmarks array".to_string())
        })?;

        let tx = self.conn.unchecked_transaction()?;

        {
            let mut categories = CategoryStore::new(self.conn);
            for cat in &payload.categories {
                categories.create(&NewCategory {
                    name: cat.name.clone(),
                    description: cat.description.clone(),
                })?;
            }
        }

        let current = self.categories_by_insertion()?;

        let mut imported = 0;
        for entry in entries {
            let category_id = entry.category_id.and_then(|original_id| {
                payload
                    .categories
                    .iter()
                    .find(|c| c.id == Some(original_id))
                    .and_then(|original| current.iter().find(|c| c.name == original.name))
                    .map(|c| c.id)
            });

            self.create(&NewBookmark {
                url: entry.url.clone(),
                title: entry.title.clone(),
                description: entry.description.clone(),
                icon: entry.icon.clone(),
                is_private: entry.is_private,
                category_id,
            })?;
            imported += 1;
        }

        tx.commit()?;
        Ok(imported)
    }
}
