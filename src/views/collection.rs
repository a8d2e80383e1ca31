use crate::models::Book;

use super::{count_label, ProgressTone, ToggleAction};

/// Card in one of the two collection buckets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionCard {
    pub id: String,
    pub title: String,
    pub year: String,
    pub author: String,
    pub progress: u8,
    pub tone: ProgressTone,
    pub action: ToggleAction,
}

impl CollectionCard {
    fn from_book(book: &Book) -> Self {
        let complete = book.is_effectively_complete();
        Self {
            id: book.id.clone(),
            title: book.title.clone(),
            year: fallback(&book.year, "-"),
            author: fallback(&book.author, "Unknown"),
            progress: book.progress,
            tone: ProgressTone::for_status(complete),
            action: ToggleAction::for_complete(complete),
        }
    }
}

fn fallback(value: &str, placeholder: &str) -> String {
    if value.trim().is_empty() {
        placeholder.to_string()
    } else {
        value.to_string()
    }
}

/// Shelf split by the stored completion flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionView {
    pub total_label: String,
    pub incomplete: Vec<CollectionCard>,
    pub incomplete_label: String,
    pub complete: Vec<CollectionCard>,
    pub complete_label: String,
}

impl CollectionView {
    /// Cards in display order: unfinished bucket first.
    pub fn cards(&self) -> impl Iterator<Item = &CollectionCard> {
        self.incomplete.iter().chain(self.complete.iter())
    }

    pub fn len(&self) -> usize {
        self.incomplete.len() + self.complete.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub fn collection_view(books: &[Book]) -> CollectionView {
    let (complete, incomplete): (Vec<&Book>, Vec<&Book>) =
        books.iter().partition(|book| book.is_complete);

    let incomplete: Vec<CollectionCard> = incomplete.into_iter().map(CollectionCard::from_book).collect();
    let complete: Vec<CollectionCard> = complete.into_iter().map(CollectionCard::from_book).collect();

    CollectionView {
        total_label: count_label(books.len()),
        incomplete_label: count_label(incomplete.len()),
        complete_label: count_label(complete.len()),
        incomplete,
        complete,
    }
}
