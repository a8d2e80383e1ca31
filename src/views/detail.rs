use crate::models::Book;

use super::ProgressTone;

/// Everything the detail page shows for one book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailView {
    pub id: String,
    pub title: String,
    pub author: String,
    pub description: String,
    pub year: String,
    pub category: String,
    pub has_cover: bool,
    pub complete: bool,
    pub status: &'static str,
    pub progress: u8,
    pub tone: ProgressTone,
}

pub fn status_label(complete: bool) -> &'static str {
    if complete {
        "Finished"
    } else {
        "Not finished"
    }
}

fn or_default(value: &str, placeholder: &str) -> String {
    if value.trim().is_empty() {
        placeholder.to_string()
    } else {
        value.to_string()
    }
}

pub fn detail_view(book: &Book) -> DetailView {
    let complete = book.is_effectively_complete();
    DetailView {
        id: book.id.clone(),
        title: or_default(&book.title, "Untitled"),
        author: or_default(&book.author, "Unknown"),
        description: or_default(&book.description, "No description"),
        year: or_default(&book.year, "-"),
        category: or_default(book.category_label(), "-"),
        has_cover: book.cover.is_some(),
        complete,
        status: status_label(complete),
        progress: book.progress,
        tone: ProgressTone::for_status(complete),
    }
}

/// Text handed to the share target.
pub fn share_text(book: &Book) -> String {
    format!("Read \"{}\" by {}", book.title, book.author)
}

/// Web search for the book's title and author.
pub fn search_url(book: &Book) -> String {
    let query = format!("{} {}", book.title, book.author);
    format!(
        "https://www.google.com/search?q={}",
        urlencoding::encode(&query)
    )
}
