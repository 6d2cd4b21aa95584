//! Property-based tests for bookmark persistence.
//!
//! For any valid field combination, creating a bookmark and fetching it back
//! by id returns a record equal in every caller-supplied field; only the id
//! and timestamps are store-assigned.

use linkstash::database::Database;
use linkstash::stores::bookmark_store::{BookmarkStore, BookmarkStoreTrait};
use linkstash::types::bookmark::NewBookmark;
use proptest::prelude::*;

/// Strategy for generating valid URL strings.
fn arb_url() -> impl Strategy<Value = String> {
    (
        prop_oneof![Just("https"), Just("http")],
        "[a-z][a-z0-9]{2,15}",
        prop_oneof![Just(".com"), Just(".org"), Just(".net"), Just(".io")],
        proptest::option::of("/[a-z0-9]{1,10}"),
    )
        .prop_map(|(scheme, host, tld, path)| {
            format!("{}://{}{}{}", scheme, host, tld, path.unwrap_or_default())
        })
}

/// Strategy for generating non-empty titles of printable ASCII.
fn arb_title() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z0-9 ]{1,30}"
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    #[test]
    fn bookmark_create_then_get_round_trips(
        url in arb_url(),
        title in arb_title(),
        description in proptest::option::of("[a-zA-Z0-9 ]{1,40}"),
        icon in proptest::option::of("[a-z0-9/.]{1,20}"),
        is_private in any::<bool>(),
    ) {
        let db = Database::open_in_memory()
            .expect("Failed to open in-memory database");
        let mut store = BookmarkStore::new(db.connection());

        let input = NewBookmark {
            url: url.clone(),
            title: title.clone(),
            description: description.clone(),
            icon: icon.clone(),
            is_private,
            category_id: None,
        };

        let created = store.create(&input).expect("create should succeed for valid inputs");
        let fetched = store.get_by_id(created.id).expect("created bookmark must be fetchable");

        prop_assert_eq!(&fetched, &created);
        prop_assert_eq!(&fetched.url, &url);
        prop_assert_eq!(&fetched.title, &title);
        prop_assert_eq!(&fetched.description, &description);
        prop_assert_eq!(&fetched.icon, &icon);
        prop_assert_eq!(fetched.is_private, is_private);
        prop_assert_eq!(fetched.category_id, None);
        prop_assert!(fetched.created_at > 0);
        prop_assert_eq!(fetched.created_at, fetched.updated_at);
    }

    #[test]
    fn deleted_bookmark_stays_deleted(
        url in arb_url(),
        title in arb_title(),
    ) {
        let db = Database::open_in_memory()
            .expect("Failed to open in-memory database");
        let mut store = BookmarkStore::new(db.connection());

        let created = store
            .create(&NewBookmark { url, title, ..NewBookmark::default() })
            .expect("create should succeed");

        prop_assert!(store.delete(created.id).unwrap());
        prop_assert!(!store.delete(created.id).unwrap());
        prop_assert!(store.get_by_id(created.id).is_err());
    }
}
