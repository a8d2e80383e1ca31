use std::collections::HashSet;
use std::path::Path;

use bookshelf::db::{ensure_schema, BookStore, KeyValueStorage, SqliteStorage, DEFAULT_STORAGE_KEY};
use bookshelf::models::{BookInput, CoverEdit};
use bookshelf::views::{collection_view, explore_view, home_view, ExploreFilter};

fn open(dir: &Path) -> BookStore<SqliteStorage> {
    let conn = ensure_schema(dir).unwrap();
    BookStore::new(SqliteStorage::new(conn))
}

fn dune() -> BookInput {
    BookInput {
        title: "Dune".into(),
        author: "Frank Herbert".into(),
        year: "1965".into(),
        description: String::new(),
        category: "Fiction".into(),
        is_complete: false,
    }
}

#[test]
fn created_book_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let created = open(dir.path()).create(dune(), None).unwrap();

    let books = open(dir.path()).load();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0], created);
    assert_eq!(books[0].progress, 0);
    assert!(!books[0].is_complete);
}

#[test]
fn toggle_round_trips_progress() {
    let dir = tempfile::tempdir().unwrap();
    let store = open(dir.path());
    let id = store.create(dune(), None).unwrap().id;

    let book = store.toggle_complete(&id).unwrap();
    assert_eq!((book.progress, book.is_complete), (100, true));
    let book = store.toggle_complete(&id).unwrap();
    assert_eq!((book.progress, book.is_complete), (0, false));
}

#[test]
fn slider_commit_recomputes_flag() {
    let dir = tempfile::tempdir().unwrap();
    let store = open(dir.path());
    let id = store.create(dune(), None).unwrap().id;

    store.commit_progress(&id, 100).unwrap();
    let book = open(dir.path()).find_by_id(&id).unwrap();
    assert_eq!((book.progress, book.is_complete), (100, true));

    store.commit_progress(&id, 40).unwrap();
    let book = open(dir.path()).find_by_id(&id).unwrap();
    assert_eq!((book.progress, book.is_complete), (40, false));
}

#[test]
fn flag_and_progress_can_drift() {
    let dir = tempfile::tempdir().unwrap();
    let store = open(dir.path());
    let id = store.create(dune(), None).unwrap().id;
    store.commit_progress(&id, 100).unwrap();

    // An edit without the checkbox keeps the stored progress but clears the flag.
    let book = store.update(&id, dune(), &CoverEdit::Unchanged).unwrap();
    assert_eq!((book.progress, book.is_complete), (100, false));

    // Collection buckets by the flag, the card styling by effective completion.
    let view = collection_view(&store.load());
    assert_eq!(view.incomplete.len(), 1);
    assert_eq!(view.incomplete[0].progress, 100);
    assert_eq!(home_view(&store.load()).stats.completed, 0);
}

#[test]
fn delete_removes_exactly_one() {
    let dir = tempfile::tempdir().unwrap();
    let store = open(dir.path());
    let first = store.create(dune(), None).unwrap();
    store.create(dune(), None).unwrap();
    store.create(dune(), None).unwrap();

    let remaining = store.remove_by_id(&first.id).unwrap();
    assert_eq!(remaining.len(), 2);
    assert_eq!(store.load().len(), 2);
    assert!(store.find_by_id(&first.id).is_none());

    // Unknown ids leave the collection alone.
    assert_eq!(store.remove_by_id("missing").unwrap().len(), 2);
}

#[test]
fn ids_are_unique() {
    let dir = tempfile::tempdir().unwrap();
    let store = open(dir.path());
    for _ in 0..25 {
        store.create(dune(), None).unwrap();
    }
    let ids: HashSet<String> = store.load().into_iter().map(|book| book.id).collect();
    assert_eq!(ids.len(), 25);
}

#[test]
fn corrupt_slot_loads_empty() {
    let dir = tempfile::tempdir().unwrap();
    let storage = SqliteStorage::new(ensure_schema(dir.path()).unwrap());
    storage.set_item(DEFAULT_STORAGE_KEY, "{not json").unwrap();
    let store = BookStore::new(storage);
    assert!(store.load().is_empty());

    // The next save replaces the garbage.
    store.create(dune(), None).unwrap();
    assert_eq!(store.load().len(), 1);
}

#[test]
fn search_without_match_counts_zero() {
    let dir = tempfile::tempdir().unwrap();
    let store = open(dir.path());
    store.create(dune(), None).unwrap();

    let filter = ExploreFilter {
        category: None,
        term: "zzz".into(),
    };
    let view = explore_view(&store.load(), &filter);
    assert!(view.is_empty());
    assert_eq!(view.count_label, "0 books");
}

#[test]
fn missing_record_updates_fail() {
    let dir = tempfile::tempdir().unwrap();
    let store = open(dir.path());
    let err = store.toggle_complete("ghost").unwrap_err();
    assert_eq!(err.to_string(), "Book not found");
    assert!(store.load().is_empty());
}
