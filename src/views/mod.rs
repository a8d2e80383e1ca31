//! View models: pure projections of the book list that the terminal adapter
//! draws. Nothing in here touches storage or the terminal, so each page's
//! filtering and labelling can be tested on plain vectors.

pub mod collection;
pub mod detail;
pub mod explore;
pub mod home;

pub use collection::{collection_view, CollectionCard, CollectionView};
pub use detail::{detail_view, search_url, share_text, DetailView};
pub use explore::{explore_view, filter_books, ExploreFilter, ExploreRow, ExploreView};
pub use home::{home_view, BookTile, HomeStats, HomeView, LatestRow};

/// Colour family of a progress bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressTone {
    Orange,
    Blue,
    Green,
}

impl ProgressTone {
    /// Tone of the detail slider while it is being dragged.
    pub fn for_slider(progress: u8) -> Self {
        if progress >= 100 {
            ProgressTone::Green
        } else if progress >= 50 {
            ProgressTone::Blue
        } else {
            ProgressTone::Orange
        }
    }

    /// Tone of a settled bar: finished books are green, the rest orange.
    pub fn for_status(complete: bool) -> Self {
        if complete {
            ProgressTone::Green
        } else {
            ProgressTone::Orange
        }
    }
}

/// The completion button offered next to a book.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleAction {
    MarkComplete,
    MarkIncomplete,
}

impl ToggleAction {
    pub fn for_complete(complete: bool) -> Self {
        if complete {
            ToggleAction::MarkIncomplete
        } else {
            ToggleAction::MarkComplete
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ToggleAction::MarkComplete => "Mark finished",
            ToggleAction::MarkIncomplete => "Mark unread",
        }
    }
}

/// `"1 book"` / `"3 books"`.
pub fn count_label(count: usize) -> String {
    if count == 1 {
        "1 book".to_string()
    } else {
        format!("{count} books")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slider_tone_thresholds() {
        assert_eq!(ProgressTone::for_slider(0), ProgressTone::Orange);
        assert_eq!(ProgressTone::for_slider(49), ProgressTone::Orange);
        assert_eq!(ProgressTone::for_slider(50), ProgressTone::Blue);
        assert_eq!(ProgressTone::for_slider(99), ProgressTone::Blue);
        assert_eq!(ProgressTone::for_slider(100), ProgressTone::Green);
    }

    #[test]
    fn count_labels() {
        assert_eq!(count_label(0), "0 books");
        assert_eq!(count_label(1), "1 book");
        assert_eq!(count_label(12), "12 books");
    }
}
