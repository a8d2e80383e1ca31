//! Domain models persisted in the storage slot and passed throughout the TUI.
//! `Book` mirrors the JSON shape written to disk one-for-one, so the serde
//! attributes here are the on-disk format.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Code stored for books that do not belong to any of the named categories.
pub const DEFAULT_CATEGORY: &str = "Other";

/// A selectable category: `code` is what gets stored, `label` is what the UI
/// shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    pub code: &'static str,
    pub label: &'static str,
}

/// Categories offered by the form, in display order. The catch-all goes last.
pub const CATEGORIES: &[Category] = &[
    Category { code: "Fiction", label: "Fiction" },
    Category { code: "NonFiction", label: "Non-Fiction" },
    Category { code: "Technology", label: "Technology" },
    Category { code: "SelfHelp", label: "Self-Help" },
    Category { code: "History", label: "History" },
    Category { code: "Science", label: "Science" },
    Category { code: "Biography", label: "Biography" },
    Category { code: "Business", label: "Business" },
    Category { code: DEFAULT_CATEGORY, label: "Other" },
];

impl Category {
    /// Find the category whose code or label matches `raw`, ignoring case and
    /// surrounding whitespace.
    pub fn resolve(raw: &str) -> Option<&'static Category> {
        let wanted = raw.trim().to_lowercase();
        if wanted.is_empty() {
            return None;
        }
        CATEGORIES.iter().find(|category| {
            category.code.to_lowercase() == wanted || category.label.to_lowercase() == wanted
        })
    }

    /// Position of the catch-all category inside [`CATEGORIES`].
    pub fn default_index() -> usize {
        CATEGORIES
            .iter()
            .position(|category| category.code == DEFAULT_CATEGORY)
            .unwrap_or(CATEGORIES.len() - 1)
    }
}

/// One library entry. Fields that an older or hand-edited slot leaves out,
/// or writes as `null`, fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: String,
    #[serde(default, deserialize_with = "or_default")]
    pub title: String,
    #[serde(default, deserialize_with = "or_default")]
    pub author: String,
    /// Kept as text: the form accepts whatever the user typed.
    #[serde(default, deserialize_with = "or_default")]
    pub year: String,
    #[serde(default, deserialize_with = "or_default")]
    pub description: String,
    #[serde(default = "default_category", deserialize_with = "category_or_default")]
    pub category: String,
    /// Embedded `data:` URL of the cover image.
    #[serde(default, rename = "coverDataUrl")]
    pub cover: Option<String>,
    #[serde(default, deserialize_with = "or_default")]
    pub is_complete: bool,
    #[serde(default, deserialize_with = "or_default")]
    pub progress: u8,
    #[serde(default, deserialize_with = "or_default")]
    pub created_at: String,
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

/// `null` decodes as the type's default.
fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// `null` decodes as the catch-all category.
fn category_or_default<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_category))
}

/// Validated, trimmed form values ready to become (or overwrite) a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookInput {
    pub title: String,
    pub author: String,
    pub year: String,
    pub description: String,
    pub category: String,
    pub is_complete: bool,
}

/// Cover change carried by an edit submit.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CoverEdit {
    /// Keep whatever the record already has.
    #[default]
    Unchanged,
    Replaced(String),
    Cleared,
}

impl CoverEdit {
    /// Cover to persist given the record's current one.
    pub fn apply(&self, current: Option<String>) -> Option<String> {
        match self {
            CoverEdit::Unchanged => current,
            CoverEdit::Replaced(data) => Some(data.clone()),
            CoverEdit::Cleared => None,
        }
    }
}

/// Generate a record id.
pub fn uid() -> String {
    Uuid::new_v4().to_string()
}

/// Current time in the same shape as a JavaScript `toISOString()`.
pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl Book {
    /// Build a brand new record from validated input. Progress starts at 100
    /// for books added as already finished.
    pub fn from_input(input: BookInput, cover: Option<String>) -> Self {
        Self {
            id: uid(),
            title: input.title,
            author: input.author,
            year: input.year,
            description: input.description,
            category: input.category,
            cover,
            is_complete: input.is_complete,
            progress: if input.is_complete { 100 } else { 0 },
            created_at: timestamp_now(),
        }
    }

    /// Overwrite every mutable field from an edit submit. `id` and
    /// `created_at` never change; progress only moves when the book is
    /// checked as finished.
    pub fn apply_edit(&mut self, input: BookInput, cover: &CoverEdit) {
        self.title = input.title;
        self.author = input.author;
        self.year = input.year;
        self.description = input.description;
        self.category = input.category;
        self.cover = cover.apply(self.cover.take());
        self.is_complete = input.is_complete;
        if input.is_complete {
            self.progress = 100;
        }
    }

    /// Lists and the detail page treat a full progress bar as finished even
    /// when the flag has not caught up yet.
    pub fn is_effectively_complete(&self) -> bool {
        self.is_complete || self.progress >= 100
    }

    pub fn mark_complete(&mut self) {
        self.is_complete = true;
        self.progress = 100;
    }

    pub fn mark_incomplete(&mut self) {
        self.is_complete = false;
        self.progress = 0;
    }

    /// Flip completion based on what the lists display. Returns the new
    /// completion state.
    pub fn toggle_complete(&mut self) -> bool {
        if self.is_effectively_complete() {
            self.mark_incomplete();
        } else {
            self.mark_complete();
        }
        self.is_complete
    }

    /// Commit a slider value: the flag is always recomputed from it.
    pub fn commit_progress(&mut self, progress: u8) {
        self.progress = progress.min(100);
        self.is_complete = self.progress == 100;
    }

    /// `Title - Author`, omitting the hyphen when the author is blank.
    pub fn display_title(&self) -> String {
        if self.author.trim().is_empty() {
            self.title.clone()
        } else {
            format!("{} - {}", self.title, self.author)
        }
    }

    /// Display label for the stored category code.
    pub fn category_label(&self) -> &str {
        Category::resolve(&self.category)
            .map(|category| category.label)
            .unwrap_or(self.category.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(is_complete: bool) -> BookInput {
        BookInput {
            title: "Dune".into(),
            author: "Frank Herbert".into(),
            year: "1965".into(),
            description: String::new(),
            category: "Fiction".into(),
            is_complete,
        }
    }

    #[test]
    fn new_book_progress_follows_checkbox() {
        assert_eq!(Book::from_input(input(false), None).progress, 0);
        let finished = Book::from_input(input(true), None);
        assert_eq!(finished.progress, 100);
        assert!(finished.is_complete);
    }

    #[test]
    fn ids_are_unique() {
        let a = Book::from_input(input(false), None);
        let b = Book::from_input(input(false), None);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn toggle_twice_restores_state() {
        let mut book = Book::from_input(input(false), None);
        assert!(book.toggle_complete());
        assert_eq!((book.is_complete, book.progress), (true, 100));
        assert!(!book.toggle_complete());
        assert_eq!((book.is_complete, book.progress), (false, 0));
    }

    #[test]
    fn full_progress_counts_as_complete_for_toggling() {
        let mut book = Book::from_input(input(false), None);
        book.progress = 100;
        assert!(book.is_effectively_complete());
        assert!(!book.toggle_complete());
        assert_eq!(book.progress, 0);
    }

    #[test]
    fn commit_recomputes_flag() {
        let mut book = Book::from_input(input(true), None);
        book.commit_progress(40);
        assert_eq!((book.is_complete, book.progress), (false, 40));
        book.commit_progress(100);
        assert!(book.is_complete);
    }

    #[test]
    fn edit_keeps_identity_and_prior_progress() {
        let mut book = Book::from_input(input(false), Some("data:image/png;base64,AA".into()));
        book.progress = 35;
        let (id, created_at) = (book.id.clone(), book.created_at.clone());

        let mut changed = input(false);
        changed.title = "Dune Messiah".into();
        book.apply_edit(changed, &CoverEdit::Unchanged);

        assert_eq!(book.id, id);
        assert_eq!(book.created_at, created_at);
        assert_eq!(book.progress, 35);
        assert_eq!(book.title, "Dune Messiah");
        assert!(book.cover.is_some());

        book.apply_edit(input(true), &CoverEdit::Cleared);
        assert_eq!(book.progress, 100);
        assert!(book.cover.is_none());
    }

    #[test]
    fn category_resolves_by_code_or_label() {
        assert_eq!(Category::resolve(" non-fiction ").map(|c| c.code), Some("NonFiction"));
        assert_eq!(Category::resolve("selfhelp").map(|c| c.label), Some("Self-Help"));
        assert!(Category::resolve("Poetry").is_none());
        assert_eq!(CATEGORIES[Category::default_index()].code, DEFAULT_CATEGORY);
    }

    #[test]
    fn decodes_sparse_records() {
        let raw = r#"{"id":"a1","title":"T","author":"A","year":"2001","createdAt":"2024-01-01T00:00:00.000Z"}"#;
        let book: Book = serde_json::from_str(raw).unwrap();
        assert_eq!(book.category, DEFAULT_CATEGORY);
        assert_eq!(book.progress, 0);
        assert!(book.cover.is_none());
        assert!(!book.is_complete);
    }

    #[test]
    fn encodes_camel_case_fields() {
        let book = Book::from_input(input(true), None);
        let json = serde_json::to_value(&book).unwrap();
        assert!(json.get("coverDataUrl").is_some());
        assert_eq!(json["isComplete"], true);
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn sparse_record_decodes_with_defaults() {
        let raw = r#"[{"id":"a1","title":null,"author":"Frank Herbert","year":null,
            "category":null,"coverDataUrl":null,"isComplete":null,"progress":null,
            "createdAt":null},{"id":"b2"}]"#;
        let books: Vec<Book> = serde_json::from_str(raw).unwrap();
        assert_eq!(books.len(), 2);
        assert_eq!(books[0].title, "");
        assert_eq!(books[0].author, "Frank Herbert");
        assert_eq!(books[0].category, DEFAULT_CATEGORY);
        assert_eq!((books[0].is_complete, books[0].progress), (false, 0));
        assert_eq!(books[1].created_at, "");
        assert_eq!(books[1].category, DEFAULT_CATEGORY);
        assert!(books[1].cover.is_none());
    }
}
