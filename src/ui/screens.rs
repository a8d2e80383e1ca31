use crate::models::Book;
use crate::views::{
    collection_view, detail_view, explore_view, home_view, CollectionCard, CollectionView,
    DetailView, ExploreFilter, ExploreRow, ExploreView, HomeView, ProgressTone,
};

/// Clamp `selected + offset` into `0..len`.
fn step(selected: usize, offset: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    (selected as isize + offset).clamp(0, len as isize - 1) as usize
}

/// Which dashboard list has focus.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub(crate) enum HomeFocus {
    Strip,
    Latest,
}

pub(crate) struct HomeScreen {
    pub(crate) view: HomeView,
    pub(crate) focus: HomeFocus,
    pub(crate) strip_selected: usize,
    pub(crate) latest_selected: usize,
}

impl HomeScreen {
    pub(crate) fn new(books: &[Book]) -> Self {
        Self {
            view: home_view(books),
            focus: HomeFocus::Strip,
            strip_selected: 0,
            latest_selected: 0,
        }
    }

    pub(crate) fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            HomeFocus::Strip if !self.view.latest.is_empty() => HomeFocus::Latest,
            _ => HomeFocus::Strip,
        };
    }

    pub(crate) fn move_strip(&mut self, offset: isize) {
        self.focus = HomeFocus::Strip;
        self.strip_selected = step(self.strip_selected, offset, self.view.collection.len());
    }

    pub(crate) fn move_latest(&mut self, offset: isize) {
        if self.view.latest.is_empty() {
            return;
        }
        self.focus = HomeFocus::Latest;
        self.latest_selected = step(self.latest_selected, offset, self.view.latest.len());
    }

    pub(crate) fn selected_id(&self) -> Option<&str> {
        match self.focus {
            HomeFocus::Strip => self
                .view
                .collection
                .get(self.strip_selected)
                .map(|tile| tile.id.as_str()),
            HomeFocus::Latest => self
                .view
                .latest
                .get(self.latest_selected)
                .map(|row| row.id.as_str()),
        }
    }
}

/// Explore keeps the array it loaded on entry and works against it until the
/// page is left.
pub(crate) struct ExploreScreen {
    pub(crate) books: Vec<Book>,
    pub(crate) filter: ExploreFilter,
    pub(crate) view: ExploreView,
    pub(crate) selected: usize,
}

impl ExploreScreen {
    pub(crate) fn new(books: Vec<Book>) -> Self {
        let filter = ExploreFilter::default();
        let view = explore_view(&books, &filter);
        Self {
            books,
            filter,
            view,
            selected: 0,
        }
    }

    /// Rebuild the visible rows from the cached array.
    pub(crate) fn refilter(&mut self) {
        self.view = explore_view(&self.books, &self.filter);
        self.selected = step(self.selected, 0, self.view.rows.len());
    }

    pub(crate) fn push_term(&mut self, ch: char) {
        self.filter.term.push(ch);
        self.selected = 0;
        self.refilter();
    }

    pub(crate) fn pop_term(&mut self) {
        self.filter.term.pop();
        self.refilter();
    }

    pub(crate) fn clear_term(&mut self) {
        self.filter.term.clear();
        self.refilter();
    }

    pub(crate) fn cycle_category(&mut self, offset: isize) {
        self.filter.cycle_category(offset);
        self.selected = 0;
        self.refilter();
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        self.selected = step(self.selected, offset, self.view.rows.len());
    }

    pub(crate) fn select_first(&mut self) {
        self.selected = 0;
    }

    pub(crate) fn select_last(&mut self) {
        self.selected = self.view.rows.len().saturating_sub(1);
    }

    pub(crate) fn current_row(&self) -> Option<&ExploreRow> {
        self.view.rows.get(self.selected)
    }

    /// Flip completion on the cached record. Returns the new state, or
    /// `None` when the id is no longer cached.
    pub(crate) fn toggle(&mut self, id: &str) -> Option<bool> {
        let book = self.books.iter_mut().find(|book| book.id == id)?;
        let complete = book.toggle_complete();
        self.refilter();
        Some(complete)
    }

    /// Splice the record out of the cached array.
    pub(crate) fn remove(&mut self, id: &str) -> bool {
        let Some(index) = self.books.iter().position(|book| book.id == id) else {
            return false;
        };
        self.books.remove(index);
        self.refilter();
        true
    }
}

/// Collection rebuilds from a fresh load after every action.
pub(crate) struct CollectionScreen {
    pub(crate) view: CollectionView,
    pub(crate) selected: usize,
}

impl CollectionScreen {
    pub(crate) fn new(books: &[Book]) -> Self {
        Self {
            view: collection_view(books),
            selected: 0,
        }
    }

    /// Re-render from a fresh load, keeping the cursor where it was when
    /// possible.
    pub(crate) fn set_books(&mut self, books: &[Book]) {
        self.view = collection_view(books);
        self.selected = step(self.selected, 0, self.view.len());
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        self.selected = step(self.selected, offset, self.view.len());
    }

    pub(crate) fn select_first(&mut self) {
        self.selected = 0;
    }

    pub(crate) fn select_last(&mut self) {
        self.selected = self.view.len().saturating_sub(1);
    }

    pub(crate) fn current_card(&self) -> Option<&CollectionCard> {
        self.view.cards().nth(self.selected)
    }
}

/// Detail page plus the slider preview, which only reaches the store on
/// commit.
pub(crate) struct DetailScreen {
    pub(crate) book: Book,
    pub(crate) view: DetailView,
    pub(crate) slider: u8,
}

impl DetailScreen {
    pub(crate) fn new(book: Book) -> Self {
        let view = detail_view(&book);
        let slider = book.progress.min(100);
        Self { book, view, slider }
    }

    /// Move the slider without persisting anything.
    pub(crate) fn nudge(&mut self, delta: i16) {
        self.slider = (self.slider as i16 + delta).clamp(0, 100) as u8;
    }

    pub(crate) fn set_slider(&mut self, value: u8) {
        self.slider = value.min(100);
    }

    pub(crate) fn preview_tone(&self) -> ProgressTone {
        if self.is_dirty() {
            ProgressTone::for_slider(self.slider)
        } else {
            self.view.tone
        }
    }

    pub(crate) fn is_dirty(&self) -> bool {
        self.slider != self.book.progress
    }

    /// Adopt the record returned by a commit.
    pub(crate) fn committed(&mut self, book: Book) {
        *self = Self::new(book);
    }
}
