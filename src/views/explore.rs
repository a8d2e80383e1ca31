use crate::models::{Book, CATEGORIES};

use super::{count_label, ProgressTone, ToggleAction};

/// Label of the filter chip that disables category filtering.
pub const ALL_LABEL: &str = "All";

/// Transient explore state. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExploreFilter {
    /// `None` selects every category.
    pub category: Option<&'static str>,
    pub term: String,
}

impl ExploreFilter {
    /// Filter chips in display order: `All` followed by every category code.
    pub fn chips() -> Vec<Option<&'static str>> {
        std::iter::once(None)
            .chain(CATEGORIES.iter().map(|category| Some(category.code)))
            .collect()
    }

    pub fn chip_label(chip: Option<&'static str>) -> &'static str {
        match chip {
            None => ALL_LABEL,
            Some(code) => CATEGORIES
                .iter()
                .find(|category| category.code == code)
                .map(|category| category.label)
                .unwrap_or(code),
        }
    }

    /// Move the active chip by `offset`, wrapping around.
    pub fn cycle_category(&mut self, offset: isize) {
        let chips = Self::chips();
        let len = chips.len() as isize;
        let current = chips
            .iter()
            .position(|chip| *chip == self.category)
            .unwrap_or(0) as isize;
        let next = (current + offset).rem_euclid(len) as usize;
        self.category = chips[next];
    }
}

/// Category first, then title. Both comparisons are case-insensitive
/// substring matches, so the `Fiction` chip also matches `NonFiction`.
pub fn filter_books<'a>(books: &'a [Book], filter: &ExploreFilter) -> Vec<&'a Book> {
    let category = filter.category.map(str::to_lowercase);
    let term = filter.term.to_lowercase();

    books
        .iter()
        .filter(|book| match &category {
            Some(code) => book.category.to_lowercase().contains(code.as_str()),
            None => true,
        })
        .filter(|book| term.is_empty() || book.title.to_lowercase().contains(&term))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExploreRow {
    pub id: String,
    pub title: String,
    pub author: String,
    pub progress: u8,
    /// Finished as far as this list is concerned.
    pub complete: bool,
    pub tone: ProgressTone,
    pub action: ToggleAction,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExploreView {
    pub rows: Vec<ExploreRow>,
    pub count_label: String,
}

impl ExploreView {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

pub fn explore_view(books: &[Book], filter: &ExploreFilter) -> ExploreView {
    let rows: Vec<ExploreRow> = filter_books(books, filter)
        .into_iter()
        .map(|book| {
            let complete = book.is_effectively_complete();
            ExploreRow {
                id: book.id.clone(),
                title: book.title.clone(),
                author: book.author.clone(),
                progress: book.progress,
                complete,
                tone: ProgressTone::for_status(book.progress >= 100),
                action: ToggleAction::for_complete(complete),
            }
        })
        .collect();

    ExploreView {
        count_label: count_label(rows.len()),
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BookInput;

    fn book(title: &str, category: &str) -> Book {
        Book::from_input(
            BookInput {
                title: title.into(),
                author: "Author".into(),
                year: "1999".into(),
                description: String::new(),
                category: category.into(),
                is_complete: false,
            },
            None,
        )
    }

    fn shelf() -> Vec<Book> {
        vec![
            book("Dune", "Fiction"),
            book("Sapiens", "History"),
            book("The Dune Encyclopedia", "NonFiction"),
            book("Clean Code", "Technology"),
        ]
    }

    fn titles(view: &ExploreView) -> Vec<&str> {
        view.rows.iter().map(|row| row.title.as_str()).collect()
    }

    #[test]
    fn default_filter_shows_everything() {
        let view = explore_view(&shelf(), &ExploreFilter::default());
        assert_eq!(view.rows.len(), 4);
        assert_eq!(view.count_label, "4 books");
    }

    #[test]
    fn search_matches_title_case_insensitively() {
        let filter = ExploreFilter {
            category: None,
            term: "DUNE".into(),
        };
        let view = explore_view(&shelf(), &filter);
        assert_eq!(titles(&view), vec!["Dune", "The Dune Encyclopedia"]);
    }

    #[test]
    fn category_is_substring_match() {
        let filter = ExploreFilter {
            category: Some("Fiction"),
            term: String::new(),
        };
        let view = explore_view(&shelf(), &filter);
        assert_eq!(titles(&view), vec!["Dune", "The Dune Encyclopedia"]);
    }

    #[test]
    fn category_then_search() {
        let filter = ExploreFilter {
            category: Some("History"),
            term: "dune".into(),
        };
        assert!(explore_view(&shelf(), &filter).is_empty());
    }

    #[test]
    fn no_match_yields_empty_count() {
        let filter = ExploreFilter {
            category: None,
            term: "zzz".into(),
        };
        let view = explore_view(&shelf(), &filter);
        assert!(view.is_empty());
        assert_eq!(view.count_label, "0 books");
    }

    #[test]
    fn row_action_follows_effective_completion() {
        let mut books = shelf();
        books[0].progress = 100;
        books[1].mark_complete();
        let view = explore_view(&books, &ExploreFilter::default());
        assert_eq!(view.rows[0].action, ToggleAction::MarkIncomplete);
        assert_eq!(view.rows[1].action, ToggleAction::MarkIncomplete);
        assert_eq!(view.rows[2].action, ToggleAction::MarkComplete);
        assert_eq!(view.rows[0].tone, ProgressTone::Green);
    }

    #[test]
    fn chips_cycle_and_wrap() {
        let mut filter = ExploreFilter::default();
        filter.cycle_category(1);
        assert_eq!(filter.category, Some("Fiction"));
        filter.cycle_category(-2);
        assert_eq!(filter.category, Some("Other"));
        filter.cycle_category(1);
        assert_eq!(filter.category, None);
        assert_eq!(ExploreFilter::chip_label(None), ALL_LABEL);
        assert_eq!(ExploreFilter::chip_label(Some("SelfHelp")), "Self-Help");
    }
}
