//! Unit tests for export snapshots and the import remap algorithm.
//!
//! Import is the one multi-step operation in the system: payload categories
//! are re-inserted with fresh ids, and bookmark category references are
//! remapped through the category *name*, never the original id.

use linkstash::database::Database;
use linkstash::stores::bookmark_store::{BookmarkStore, BookmarkStoreTrait};
use linkstash::stores::category_store::{CategoryStore, CategoryStoreTrait};
use linkstash::types::bookmark::{BookmarkFilter, NewBookmark};
use linkstash::types::category::NewCategory;
use linkstash::types::errors::Error;
use linkstash::types::export::{ImportBookmark, ImportCategory, ImportPayload};

fn setup() -> Database {
    Database::open_in_memory().expect("Failed to open in-memory database")
}

fn entry(url: &str, title: &str, category_id: Option<i64>) -> ImportBookmark {
    ImportBookmark {
        id: None,
        url: url.to_string(),
        title: title.to_string(),
        description: None,
        icon: None,
        is_private: false,
        category_id,
    }
}

fn payload_category(id: i64, name: &str) -> ImportCategory {
    ImportCategory {
        id: Some(id),
        name: name.to_string(),
        description: None,
    }
}

const ALL: BookmarkFilter = BookmarkFilter {
    include_private: true,
    category_id: None,
};

#[test]
fn test_export_includes_everything() {
    let db = setup();

    let cat_id = CategoryStore::new(db.connection())
        .create(&NewCategory {
            name: "Work".to_string(),
            description: None,
        })
        .unwrap()
        .id;

    let mut store = BookmarkStore::new(db.connection());
    store
        .create(&NewBookmark {
            url: "https://public.example".to_string(),
            title: "Public".to_string(),
            category_id: Some(cat_id),
            ..NewBookmark::default()
        })
        .unwrap();
    store
        .create(&NewBookmark {
            url: "https://private.example".to_string(),
            title: "Private".to_string(),
            is_private: true,
            ..NewBookmark::default()
        })
        .unwrap();

    let snapshot = store.export().unwrap();
    assert_eq!(snapshot.bookmarks.len(), 2, "export includes private rows");
    assert_eq!(snapshot.categories.len(), 1);
    assert!(snapshot.export_date > 0);
}

#[test]
fn test_import_requires_bookmarks_array() {
    let db = setup();
    let mut store = BookmarkStore::new(db.connection());

    let payload = ImportPayload {
        bookmarks: None,
        categories: vec![payload_category(1, "Work")],
    };
    match store.import(&payload) {
        Err(Error::Validation(_)) => {}
        other => panic!("expected Validation error, got {:?}", other),
    }

    // Nothing was inserted: the transaction rolled back the categories too
    assert!(CategoryStore::new(db.connection()).get_all().unwrap().is_empty());
}

#[test]
fn test_import_remaps_category_by_name() {
    // The §8-style scenario: snapshot category {id:1, name:"Work"} and a
    // bookmark referencing it; the fresh store assigns a new category id and
    // the imported bookmark must point at that, not at 1.
    let db = setup();
    let mut store = BookmarkStore::new(db.connection());

    // Burn category id 1 so the remapped id cannot accidentally equal the
    // original payload id (AUTOINCREMENT never reuses it)
    {
        let mut categories = CategoryStore::new(db.connection());
        let placeholder = categories
            .create(&NewCategory {
                name: "Placeholder".to_string(),
                description: None,
            })
            .unwrap();
        categories.delete(placeholder.id).unwrap();
    }

    let payload = ImportPayload {
        bookmarks: Some(vec![entry("https://work.example", "Work thing", Some(1))]),
        categories: vec![payload_category(1, "Work")],
    };

    let imported = store.import(&payload).unwrap();
    assert_eq!(imported, 1);

    let categories = CategoryStore::new(db.connection()).get_all().unwrap();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].name, "Work");

    let bookmarks = store.get_all(&ALL).unwrap();
    assert_eq!(bookmarks.len(), 1);
    assert_eq!(bookmarks[0].category_id, Some(categories[0].id));
}

#[test]
fn test_import_unmatched_reference_becomes_null() {
    let db = setup();
    let mut store = BookmarkStore::new(db.connection());

    let payload = ImportPayload {
        bookmarks: Some(vec![
            // References an id absent from the payload category list
            entry("https://a.example", "A", Some(42)),
            // No reference at all
            entry("https://b.example", "B", None),
        ]),
        categories: vec![payload_category(1, "Work")],
    };

    assert_eq!(store.import(&payload).unwrap(), 2);
    for bm in store.get_all(&ALL).unwrap() {
        assert_eq!(bm.category_id, None);
    }
}

#[test]
fn test_import_does_not_deduplicate_categories() {
    let db = setup();

    CategoryStore::new(db.connection())
        .create(&NewCategory {
            name: "Work".to_string(),
            description: None,
        })
        .unwrap();

    let mut store = BookmarkStore::new(db.connection());
    let payload = ImportPayload {
        bookmarks: Some(vec![]),
        categories: vec![payload_category(1, "Work")],
    };
    store.import(&payload).unwrap();

    // The destination already had a "Work"; import adds another
    assert_eq!(CategoryStore::new(db.connection()).get_all().unwrap().len(), 2);
}

#[test]
fn test_import_duplicate_names_first_inserted_wins() {
    let db = setup();

    // Pre-existing "Work" is the first-inserted category with that name
    let existing_id = CategoryStore::new(db.connection())
        .create(&NewCategory {
            name: "Work".to_string(),
            description: None,
        })
        .unwrap()
        .id;

    let mut store = BookmarkStore::new(db.connection());
    let payload = ImportPayload {
        bookmarks: Some(vec![entry("https://work.example", "Work thing", Some(1))]),
        categories: vec![payload_category(1, "Work")],
    };
    store.import(&payload).unwrap();

    let bookmarks = store.get_all(&ALL).unwrap();
    assert_eq!(bookmarks[0].category_id, Some(existing_id));
}

#[test]
fn test_import_ignores_payload_bookmark_ids() {
    let db = setup();
    let mut store = BookmarkStore::new(db.connection());

    let existing = store
        .create(&entry_to_new(&entry("https://keep.example", "Keep", None)))
        .unwrap();

    let mut imported_entry = entry("https://new.example", "New", None);
    imported_entry.id = Some(existing.id);
    let payload = ImportPayload {
        bookmarks: Some(vec![imported_entry]),
        categories: vec![],
    };
    store.import(&payload).unwrap();

    // The pre-existing bookmark is untouched; the import got a fresh id
    let kept = store.get_by_id(existing.id).unwrap();
    assert_eq!(kept.url, "https://keep.example");
    assert_eq!(store.get_all(&ALL).unwrap().len(), 2);
}

#[test]
fn test_export_then_import_into_fresh_store() {
    let source = setup();

    let cat_id = CategoryStore::new(source.connection())
        .create(&NewCategory {
            name: "Reading".to_string(),
            description: Some("articles".to_string()),
        })
        .unwrap()
        .id;
    BookmarkStore::new(source.connection())
        .create(&NewBookmark {
            url: "https://article.example".to_string(),
            title: "Article".to_string(),
            category_id: Some(cat_id),
            ..NewBookmark::default()
        })
        .unwrap();

    let snapshot = BookmarkStore::new(source.connection()).export().unwrap();

    // Serialize through JSON, as a real export/import round trip would
    let payload: ImportPayload =
        serde_json::from_value(serde_json::to_value(&snapshot).unwrap()).unwrap();

    let dest = setup();
    let mut store = BookmarkStore::new(dest.connection());
    assert_eq!(store.import(&payload).unwrap(), 1);

    let categories = CategoryStore::new(dest.connection()).get_all().unwrap();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].name, "Reading");

    let bookmarks = store.get_all(&ALL).unwrap();
    assert_eq!(bookmarks[0].category_id, Some(categories[0].id));
}

#[test]
fn test_failed_import_rolls_back() {
    let db = setup();
    let mut store = BookmarkStore::new(db.connection());

    let payload = ImportPayload {
        bookmarks: Some(vec![
            entry("https://good.example", "Good", None),
            // Empty title fails validation partway through
            entry("https://bad.example", "", None),
        ]),
        categories: vec![payload_category(1, "Work")],
    };

    assert!(store.import(&payload).is_err());
    assert!(store.get_all(&ALL).unwrap().is_empty());
    assert!(CategoryStore::new(db.connection()).get_all().unwrap().is_empty());
}

fn entry_to_new(e: &ImportBookmark) -> NewBookmark {
    NewBookmark {
        url: e.url.clone(),
        title: e.title.clone(),
        description: e.description.clone(),
        icon: e.icon.clone(),
        is_private: e.is_private,
        category_id: e.category_id,
    }
}
