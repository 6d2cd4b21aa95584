// linkstash persistence stores
// Stores own the SQL for one record type each: bookmarks (including
// export/import) and categories.

pub mod bookmark_store;
pub mod category_store;
