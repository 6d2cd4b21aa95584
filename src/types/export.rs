use serde::{Deserialize, Serialize};

use super::bookmark::Bookmark;
use super::category::Category;

/// Full point-in-time dump of bookmarks and categories.
///
/// Private bookmarks are included; export requires authentication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportSnapshot {
    pub bookmarks: Vec<Bookmark>,
    pub categories: Vec<Category>,
    /// UNIX seconds at the time the snapshot was taken.
    #[serde(rename = "exportDate")]
    pub export_date: i64,
}

/// Payload accepted by import.
///
/// Ids in the payload refer to the snapshot they were exported from, not to
/// this store; they are only used to cross-reference categories by name
/// during the remap step.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportPayload {
    pub bookmarks: Option<Vec<ImportBookmark>>,
    #[serde(default)]
    pub categories: Vec<ImportCategory>,
}

/// A bookmark entry inside an import payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportBookmark {
    /// Original id from the exported snapshot. Ignored on insert.
    #[serde(default)]
    pub id: Option<i64>,
    pub url: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub is_private: bool,
    /// Category reference in the *original* snapshot's id space.
    #[serde(default)]
    pub category_id: Option<i64>,
}

/// A category entry inside an import payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportCategory {
    /// Original id from the exported snapshot. Used only for the name remap.
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}
