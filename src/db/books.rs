use tracing::{error, info, warn};

use crate::error::StoreError;
use crate::models::{Book, BookInput, CoverEdit};

use super::storage::KeyValueStorage;

/// Slot key used when the configuration does not override it.
pub const DEFAULT_STORAGE_KEY: &str = "bookshelf_books_v1";

/// Sole owner of the persisted collection. Every operation loads the full
/// array and every mutation writes the full array back; there is no
/// incremental update. Two processes sharing one slot race with
/// last-write-wins.
pub struct BookStore<S> {
    storage: S,
    key: String,
}

impl<S: KeyValueStorage> BookStore<S> {
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, DEFAULT_STORAGE_KEY)
    }

    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Read the collection. Missing, unreadable, or undecodable content
    /// yields an empty list; the failure is only logged.
    pub fn load(&self) -> Vec<Book> {
        let raw = match self.storage.get_item(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(err) => {
                error!(key = %self.key, %err, "failed to read books");
                return Vec::new();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(books) => books,
            Err(err) => {
                error!(key = %self.key, %err, "failed to decode books, starting empty");
                Vec::new()
            }
        }
    }

    /// Overwrite the slot with the full collection.
    pub fn save(&self, books: &[Book]) -> Result<(), StoreError> {
        let encoded = serde_json::to_string(books)?;
        self.storage.set_item(&self.key, &encoded)?;
        Ok(())
    }

    pub fn find_by_id(&self, id: &str) -> Option<Book> {
        self.load().into_iter().find(|book| book.id == id)
    }

    /// Drop the record with `id` (if any) and return what is left.
    pub fn remove_by_id(&self, id: &str) -> Result<Vec<Book>, StoreError> {
        let mut books = self.load();
        let before = books.len();
        books.retain(|book| book.id != id);
        if books.len() == before {
            warn!(id, "delete requested for unknown book");
        }
        self.save(&books)?;
        info!(id, remaining = books.len(), "book removed");
        Ok(books)
    }

    /// Append a new record built from validated form input.
    pub fn create(&self, input: BookInput, cover: Option<String>) -> Result<Book, StoreError> {
        let mut books = self.load();
        let book = Book::from_input(input, cover);
        books.push(book.clone());
        self.save(&books)?;
        info!(id = %book.id, title = %book.title, "book created");
        Ok(book)
    }

    /// Overwrite the mutable fields of an existing record.
    pub fn update(&self, id: &str, input: BookInput, cover: &CoverEdit) -> Result<Book, StoreError> {
        self.modify(id, |book| book.apply_edit(input, cover))
            .inspect(|book| info!(id = %book.id, "book updated"))
    }

    /// Flip completion the same way the list buttons do.
    pub fn toggle_complete(&self, id: &str) -> Result<Book, StoreError> {
        self.modify(id, |book| {
            book.toggle_complete();
        })
        .inspect(|book| info!(id = %book.id, complete = book.is_complete, "completion toggled"))
    }

    /// Persist a released slider value.
    pub fn commit_progress(&self, id: &str, progress: u8) -> Result<Book, StoreError> {
        self.modify(id, |book| book.commit_progress(progress))
            .inspect(|book| info!(id = %book.id, progress = book.progress, "progress saved"))
    }

    fn modify<F>(&self, id: &str, change: F) -> Result<Book, StoreError>
    where
        F: FnOnce(&mut Book),
    {
        let mut books = self.load();
        let book = books
            .iter_mut()
            .find(|book| book.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        change(book);
        let updated = book.clone();
        self.save(&books)?;
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::db::MemoryStorage;

    fn input(title: &str) -> BookInput {
        BookInput {
            title: title.into(),
            author: "Frank Herbert".into(),
            year: "1965".into(),
            description: String::new(),
            category: "Fiction".into(),
            is_complete: false,
        }
    }

    fn store() -> BookStore<MemoryStorage> {
        BookStore::new(MemoryStorage::new())
    }

    #[test]
    fn empty_slot_loads_empty() {
        assert!(store().load().is_empty());
    }

    #[test]
    fn garbage_slot_loads_empty() {
        let store = BookStore::new(MemoryStorage::with_item(DEFAULT_STORAGE_KEY, "{not json"));
        assert!(store.load().is_empty());
    }

    #[test]
    fn sparse_record_keeps_the_rest_of_the_shelf() {
        let raw = r#"[{"id":"a","title":"Dune","author":"Frank Herbert","year":"1965",
            "createdAt":"2024-01-01T00:00:00.000Z"},{"id":"b","title":null,"year":null}]"#;
        let store = BookStore::new(MemoryStorage::with_item(DEFAULT_STORAGE_KEY, raw));
        let books = store.load();
        assert_eq!(books.len(), 2);
        assert_eq!(books[1].title, "");

        store.toggle_complete("a").unwrap();
        assert_eq!(store.load().len(), 2);
    }

    #[test]
    fn save_then_load_is_identity() {
        let store = store();
        let mut books = vec![
            Book::from_input(input("A"), None),
            Book::from_input(input("B"), Some("data:image/png;base64,AAAA".into())),
        ];
        books[1].mark_complete();
        store.save(&books).unwrap();
        assert_eq!(store.load(), books);
    }

    #[test]
    fn create_edit_delete_sequence_has_unique_ids() {
        let store = store();
        let a = store.create(input("A"), None).unwrap();
        let b = store.create(input("B"), None).unwrap();
        let c = store.create(input("C"), None).unwrap();

        let mut edited = input("B2");
        edited.is_complete = true;
        store.update(&b.id, edited, &CoverEdit::Unchanged).unwrap();
        store.remove_by_id(&a.id).unwrap();

        let books = store.load();
        let titles: Vec<_> = books.iter().map(|book| book.title.as_str()).collect();
        assert_eq!(titles, vec!["B2", "C"]);
        let ids: HashSet<_> = books.iter().map(|book| book.id.as_str()).collect();
        assert_eq!(ids.len(), books.len());
        assert_eq!(books[1].id, c.id);
        assert_eq!(books[0].progress, 100);
    }

    #[test]
    fn remove_unknown_id_keeps_collection() {
        let store = store();
        store.create(input("A"), None).unwrap();
        assert_eq!(store.remove_by_id("missing").unwrap().len(), 1);
    }

    #[test]
    fn mutations_on_unknown_id_fail() {
        let store = store();
        assert!(matches!(
            store.toggle_complete("nope"),
            Err(StoreError::NotFound(id)) if id == "nope"
        ));
        assert!(store.commit_progress("nope", 10).is_err());
    }

    #[test]
    fn find_by_id_sees_latest_write() {
        let store = store();
        let book = store.create(input("A"), None).unwrap();
        store.commit_progress(&book.id, 55).unwrap();
        assert_eq!(store.find_by_id(&book.id).map(|b| b.progress), Some(55));
        assert!(store.find_by_id("other").is_none());
    }

    #[test]
    fn custom_key_is_isolated() {
        let store = BookStore::with_key(MemoryStorage::new(), "shelf_b");
        store.create(input("A"), None).unwrap();
        assert_eq!(store.key(), "shelf_b");
        assert_eq!(store.load().len(), 1);
    }
}
