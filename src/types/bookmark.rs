use serde::{Deserialize, Serialize};

/// A saved bookmark row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bookmark {
    pub id: i64,
    pub url: String,
    pub title: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub is_private: bool,
    pub category_id: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// The mutable bookmark fields as submitted by callers.
///
/// Used for both create and update; update is a full replace of these fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewBookmark {
    pub url: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub is_private: bool,
    #[serde(default)]
    pub category_id: Option<i64>,
}

/// Listing predicates. Both compose with logical AND.
#[derive(Debug, Clone, Copy, Default)]
pub struct BookmarkFilter {
    pub include_private: bool,
    pub category_id: Option<i64>,
}
