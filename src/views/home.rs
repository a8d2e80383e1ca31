use crate::models::Book;

/// How many of the most recently added books the dashboard lists.
pub const LATEST_COUNT: usize = 4;

/// Aggregate reading stats shown as the two dashboard bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HomeStats {
    pub total: usize,
    pub completed: usize,
    pub percent_complete: u8,
    pub percent_unread: u8,
}

impl HomeStats {
    /// Percentages are rounded half up. An empty shelf is 0% complete and
    /// 100% unread.
    pub fn from_books(books: &[Book]) -> Self {
        let total = books.len();
        let completed = books.iter().filter(|book| book.is_complete).count();
        let percent_complete = if total == 0 {
            0
        } else {
            ((200 * completed + total) / (2 * total)) as u8
        };
        Self {
            total,
            completed,
            percent_complete,
            percent_unread: 100 - percent_complete,
        }
    }
}

/// Small card in the horizontal collection strip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookTile {
    pub id: String,
    pub title: String,
    pub author: String,
    pub has_cover: bool,
}

/// Row of the "latest" list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatestRow {
    pub id: String,
    pub title: String,
    pub author: String,
    pub progress: u8,
    pub has_cover: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeView {
    pub stats: HomeStats,
    pub collection: Vec<BookTile>,
    pub latest: Vec<LatestRow>,
}

pub fn home_view(books: &[Book]) -> HomeView {
    let collection = books
        .iter()
        .map(|book| BookTile {
            id: book.id.clone(),
            title: book.title.clone(),
            author: book.author.clone(),
            has_cover: book.cover.is_some(),
        })
        .collect();

    let latest = books
        .iter()
        .rev()
        .take(LATEST_COUNT)
        .map(|book| LatestRow {
            id: book.id.clone(),
            title: book.title.clone(),
            author: book.author.clone(),
            progress: book.progress,
            has_cover: book.cover.is_some(),
        })
        .collect();

    HomeView {
        stats: HomeStats::from_books(books),
        collection,
        latest,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BookInput;

    fn book(title: &str, complete: bool) -> Book {
        Book::from_input(
            BookInput {
                title: title.into(),
                author: "Someone".into(),
                year: "2000".into(),
                description: String::new(),
                category: "Other".into(),
                is_complete: complete,
            },
            None,
        )
    }

    #[test]
    fn empty_shelf_is_all_unread() {
        let stats = HomeStats::from_books(&[]);
        assert_eq!(stats.percent_complete, 0);
        assert_eq!(stats.percent_unread, 100);
    }

    #[test]
    fn percentages_round_half_up() {
        let books = vec![book("a", true), book("b", false), book("c", false)];
        let stats = HomeStats::from_books(&books);
        assert_eq!(stats.percent_complete, 33);
        assert_eq!(stats.percent_unread, 67);

        let books = vec![book("a", true), book("b", true), book("c", false)];
        assert_eq!(HomeStats::from_books(&books).percent_complete, 67);

        let books = vec![book("a", true), book("b", false)];
        assert_eq!(HomeStats::from_books(&books).percent_complete, 50);
    }

    #[test]
    fn stats_use_the_flag_not_progress() {
        let mut unfinished = book("a", false);
        unfinished.progress = 100;
        assert_eq!(HomeStats::from_books(&[unfinished]).completed, 0);
    }

    #[test]
    fn latest_is_last_four_newest_first() {
        let books: Vec<Book> = ["1", "2", "3", "4", "5", "6"]
            .iter()
            .map(|title| book(title, false))
            .collect();
        let view = home_view(&books);
        let titles: Vec<_> = view.latest.iter().map(|row| row.title.as_str()).collect();
        assert_eq!(titles, vec!["6", "5", "4", "3"]);
        assert_eq!(view.collection.len(), 6);
        assert_eq!(view.collection[0].title, "1");
    }

    #[test]
    fn latest_with_fewer_books() {
        let books = vec![book("only", false)];
        assert_eq!(home_view(&books).latest.len(), 1);
    }
}
