use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::cover::describe_data_url;
use crate::error::FormError;
use crate::models::{Book, BookInput, Category, CoverEdit, CATEGORIES, DEFAULT_CATEGORY};

/// Fields of the add/edit form, in focus order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub(crate) enum FormField {
    Cover,
    #[default]
    Title,
    Author,
    Year,
    Description,
    Category,
    Complete,
}

const FIELD_ORDER: [FormField; 7] = [
    FormField::Cover,
    FormField::Title,
    FormField::Author,
    FormField::Year,
    FormField::Description,
    FormField::Category,
    FormField::Complete,
];

impl FormField {
    fn offset(self, delta: isize) -> Self {
        let len = FIELD_ORDER.len() as isize;
        let current = FIELD_ORDER.iter().position(|f| *f == self).unwrap_or(0) as isize;
        FIELD_ORDER[(current + delta).rem_euclid(len) as usize]
    }

    /// Whether typed characters go into this field.
    pub(crate) fn is_text(self) -> bool {
        matches!(
            self,
            FormField::Cover
                | FormField::Title
                | FormField::Author
                | FormField::Year
                | FormField::Description
        )
    }
}

/// State of the add/edit page.
#[derive(Clone, Debug, Default)]
pub(crate) struct BookForm {
    /// `Some` in edit mode.
    pub(crate) edit_id: Option<String>,
    /// Path typed into the cover picker.
    pub(crate) cover_path: String,
    pub(crate) title: String,
    pub(crate) author: String,
    pub(crate) year: String,
    pub(crate) description: String,
    /// Index into [`CATEGORIES`] of the active control, if any.
    pub(crate) category: Option<usize>,
    pub(crate) complete: bool,
    /// Cover the record had when the form opened.
    pub(crate) original_cover: Option<String>,
    pub(crate) cover: CoverEdit,
    /// Ticket of the cover read in flight.
    pub(crate) pending_cover: Option<u64>,
    pub(crate) active: FormField,
    pub(crate) error: Option<String>,
}

impl BookForm {
    /// Blank add form with the catch-all category selected.
    pub(crate) fn create() -> Self {
        Self {
            category: Some(Category::default_index()),
            ..Self::default()
        }
    }

    /// Edit form pre-filled from a record.
    pub(crate) fn from_book(book: &Book) -> Self {
        Self {
            edit_id: Some(book.id.clone()),
            title: book.title.clone(),
            author: book.author.clone(),
            year: book.year.clone(),
            description: book.description.clone(),
            category: category_index(&book.category),
            complete: book.is_complete,
            original_cover: book.cover.clone(),
            ..Self::default()
        }
    }

    pub(crate) fn is_edit(&self) -> bool {
        self.edit_id.is_some()
    }

    pub(crate) fn title_text(&self) -> &'static str {
        if self.is_edit() {
            "Edit Book"
        } else {
            "Add Book"
        }
    }

    pub(crate) fn submit_label(&self) -> &'static str {
        match (self.is_edit(), self.complete) {
            (true, _) => "Update book",
            (false, true) => "+ Add to shelf (finished)",
            (false, false) => "+ Add to shelf (unread)",
        }
    }

    pub(crate) fn next_field(&mut self) {
        self.active = self.active.offset(1);
    }

    pub(crate) fn previous_field(&mut self) {
        self.active = self.active.offset(-1);
    }

    /// Type into the active text field.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        match self.active {
            FormField::Cover => self.cover_path.push(ch),
            FormField::Title => self.title.push(ch),
            FormField::Author => self.author.push(ch),
            FormField::Year => self.year.push(ch),
            FormField::Description => self.description.push(ch),
            FormField::Category | FormField::Complete => return false,
        }
        true
    }

    pub(crate) fn push_str(&mut self, text: &str) {
        for ch in text.chars() {
            self.push_char(ch);
        }
    }

    pub(crate) fn backspace(&mut self) {
        match self.active {
            FormField::Cover => {
                self.cover_path.pop();
            }
            FormField::Title => {
                self.title.pop();
            }
            FormField::Author => {
                self.author.pop();
            }
            FormField::Year => {
                self.year.pop();
            }
            FormField::Description => {
                self.description.pop();
            }
            FormField::Category | FormField::Complete => {}
        }
    }

    /// Move the active category control, wrapping. With nothing active the
    /// first step lands on the first category.
    pub(crate) fn cycle_category(&mut self, delta: isize) {
        let len = CATEGORIES.len() as isize;
        self.category = Some(match self.category {
            Some(index) => (index as isize + delta).rem_euclid(len) as usize,
            None => 0,
        });
    }

    pub(crate) fn toggle_complete(&mut self) {
        self.complete = !self.complete;
    }

    /// Category code to store: the active control, else the catch-all.
    pub(crate) fn resolved_category(&self) -> String {
        self.category
            .and_then(|index| CATEGORIES.get(index))
            .map(|category| category.code)
            .unwrap_or(DEFAULT_CATEGORY)
            .to_string()
    }

    /// Validate required fields and produce trimmed input.
    pub(crate) fn parse_inputs(&self) -> Result<BookInput, FormError> {
        let title = self.title.trim();
        let author = self.author.trim();
        let year = self.year.trim();
        if title.is_empty() || author.is_empty() || year.is_empty() {
            return Err(FormError::MissingRequired);
        }
        Ok(BookInput {
            title: title.to_string(),
            author: author.to_string(),
            year: year.to_string(),
            description: self.description.trim().to_string(),
            category: self.resolved_category(),
            is_complete: self.complete,
        })
    }

    /// Cover currently shown in the preview.
    pub(crate) fn preview(&self) -> Option<&str> {
        match &self.cover {
            CoverEdit::Unchanged => self.original_cover.as_deref(),
            CoverEdit::Replaced(data) => Some(data.as_str()),
            CoverEdit::Cleared => None,
        }
    }

    /// Cover for a brand new record.
    pub(crate) fn new_cover(&self) -> Option<String> {
        self.preview().map(str::to_string)
    }

    pub(crate) fn set_cover(&mut self, data_url: String) {
        self.cover = CoverEdit::Replaced(data_url);
        self.pending_cover = None;
        self.error = None;
    }

    /// Drop the preview. Edit forms remember the explicit clear; add forms
    /// simply go back to having no cover.
    pub(crate) fn clear_cover(&mut self) {
        self.cover = if self.is_edit() {
            CoverEdit::Cleared
        } else {
            CoverEdit::Unchanged
        };
        self.cover_path.clear();
    }

    fn cover_line(&self, is_active: bool) -> Line<'static> {
        let label_style = field_style(is_active, false);
        let mut spans = vec![Span::raw("Cover: ")];
        if self.cover_path.is_empty() && !is_active {
            spans.push(Span::styled(
                "<file path, or drop a file here>",
                Style::default().fg(Color::DarkGray),
            ));
        } else {
            spans.push(Span::styled(self.cover_path.clone(), label_style));
        }
        let preview = if self.pending_cover.is_some() {
            " [loading...]".to_string()
        } else {
            match self.preview() {
                Some(data) => format!(" [{}]", describe_data_url(data)),
                None => " [no cover]".to_string(),
            }
        };
        spans.push(Span::styled(preview, Style::default().fg(Color::Gray)));
        Line::from(spans)
    }

    fn category_line(&self, is_active: bool) -> Line<'static> {
        let mut spans = vec![Span::raw("Category: ")];
        for (index, category) in CATEGORIES.iter().enumerate() {
            if index > 0 {
                spans.push(Span::raw(" "));
            }
            let selected = self.category == Some(index);
            let mut style = if selected {
                Style::default().fg(Color::Black).bg(Color::Cyan)
            } else {
                Style::default().fg(Color::Gray)
            };
            if selected && is_active {
                style = style.add_modifier(Modifier::BOLD).bg(Color::Yellow);
            }
            spans.push(Span::styled(format!(" {} ", category.label), style));
        }
        Line::from(spans)
    }

    fn complete_line(&self, is_active: bool) -> Line<'static> {
        let mark = if self.complete { "[x]" } else { "[ ]" };
        Line::from(vec![
            Span::styled(mark.to_string(), field_style(is_active, false)),
            Span::raw(" Finished reading"),
        ])
    }

    /// Render a single line for the form widget.
    pub(crate) fn build_line(&self, field: FormField) -> Line<'static> {
        let is_active = self.active == field;
        let (name, value, required) = match field {
            FormField::Cover => return self.cover_line(is_active),
            FormField::Category => return self.category_line(is_active),
            FormField::Complete => return self.complete_line(is_active),
            FormField::Title => ("Title", &self.title, true),
            FormField::Author => ("Author", &self.author, true),
            FormField::Year => ("Year", &self.year, true),
            FormField::Description => ("Description", &self.description, false),
        };

        let display = if value.is_empty() {
            let placeholder = if required { "<required>" } else { "<optional>" };
            placeholder.to_string()
        } else {
            value.clone()
        };

        Line::from(vec![
            Span::raw(format!("{name}: ")),
            Span::styled(display, field_style(is_active, value.is_empty())),
        ])
    }

    /// Cursor column offset within the active field's line, if it is a text
    /// field.
    pub(crate) fn cursor_offset(&self) -> Option<u16> {
        let (prefix, value) = match self.active {
            FormField::Cover => ("Cover: ", &self.cover_path),
            FormField::Title => ("Title: ", &self.title),
            FormField::Author => ("Author: ", &self.author),
            FormField::Year => ("Year: ", &self.year),
            FormField::Description => ("Description: ", &self.description),
            FormField::Category | FormField::Complete => return None,
        };
        Some((prefix.len() + value.chars().count()) as u16)
    }

    pub(crate) fn field_row(field: FormField) -> u16 {
        FIELD_ORDER.iter().position(|f| *f == field).unwrap_or(0) as u16
    }

    pub(crate) fn fields() -> &'static [FormField] {
        &FIELD_ORDER
    }
}

fn field_style(is_active: bool, is_empty: bool) -> Style {
    if is_active {
        Style::default().fg(Color::Yellow)
    } else if is_empty {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
    }
}

/// Category control matching a stored value by code or label.
fn category_index(raw: &str) -> Option<usize> {
    let resolved = Category::resolve(raw)?;
    CATEGORIES.iter().position(|category| category.code == resolved.code)
}

/// Which page asked for a delete, since the two pages persist differently.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum DeleteOrigin {
    Explore,
    Collection,
}

#[derive(Clone, Debug)]
pub(crate) struct ConfirmBookDelete {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) origin: DeleteOrigin,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Book;

    fn filled() -> BookForm {
        let mut form = BookForm::create();
        form.title = "  Dune ".into();
        form.author = "Frank Herbert".into();
        form.year = "1965".into();
        form
    }

    fn stored(category: &str, cover: Option<&str>) -> Book {
        let mut book = Book::from_input(filled().parse_inputs().unwrap(), cover.map(String::from));
        book.category = category.into();
        book
    }

    #[test]
    fn create_defaults() {
        let form = BookForm::create();
        assert_eq!(form.resolved_category(), DEFAULT_CATEGORY);
        assert_eq!(form.submit_label(), "+ Add to shelf (unread)");
        assert_eq!(form.title_text(), "Add Book");
        assert!(form.preview().is_none());
    }

    #[test]
    fn submit_label_tracks_checkbox() {
        let mut form = BookForm::create();
        form.toggle_complete();
        assert_eq!(form.submit_label(), "+ Add to shelf (finished)");
        let edit = BookForm::from_book(&stored("Fiction", None));
        assert_eq!(edit.submit_label(), "Update book");
    }

    #[test]
    fn rejects_blank_required_fields() {
        let mut form = filled();
        form.title = "   ".into();
        assert_eq!(form.parse_inputs(), Err(FormError::MissingRequired));
        let mut form = filled();
        form.year.clear();
        assert_eq!(form.parse_inputs(), Err(FormError::MissingRequired));
    }

    #[test]
    fn trims_inputs() {
        let input = filled().parse_inputs().unwrap();
        assert_eq!(input.title, "Dune");
        assert_eq!(input.category, DEFAULT_CATEGORY);
    }

    #[test]
    fn edit_preselects_category_by_code_or_label() {
        let by_code = BookForm::from_book(&stored(" selfhelp", None));
        assert_eq!(by_code.resolved_category(), "SelfHelp");
        let by_label = BookForm::from_book(&stored("Non-Fiction", None));
        assert_eq!(by_label.resolved_category(), "NonFiction");
    }

    #[test]
    fn unknown_category_falls_back_to_other_on_submit() {
        let form = BookForm::from_book(&stored("Poetry", None));
        assert_eq!(form.category, None);
        assert_eq!(form.parse_inputs().unwrap().category, DEFAULT_CATEGORY);
    }

    #[test]
    fn cover_is_tri_state_in_edit_mode() {
        let mut form = BookForm::from_book(&stored("Fiction", Some("data:image/png;base64,AA")));
        assert_eq!(form.cover, CoverEdit::Unchanged);
        assert!(form.preview().is_some());

        form.set_cover("data:image/gif;base64,BB".into());
        assert_eq!(form.preview(), Some("data:image/gif;base64,BB"));

        form.clear_cover();
        assert_eq!(form.cover, CoverEdit::Cleared);
        assert!(form.preview().is_none());
    }

    #[test]
    fn add_form_cover() {
        let mut form = BookForm::create();
        form.set_cover("data:image/png;base64,AA".into());
        assert_eq!(form.new_cover().as_deref(), Some("data:image/png;base64,AA"));
        form.clear_cover();
        assert_eq!(form.new_cover(), None);
    }

    #[test]
    fn typing_goes_to_active_text_field_only() {
        let mut form = BookForm::create();
        form.active = FormField::Author;
        form.push_str("Le Guin");
        form.active = FormField::Category;
        assert!(!form.push_char('x'));
        form.cycle_category(1);
        assert_eq!(form.resolved_category(), "Fiction");
        assert_eq!(form.author, "Le Guin");
    }

    #[test]
    fn focus_wraps() {
        let mut form = BookForm::create();
        form.active = FormField::Complete;
        form.next_field();
        assert_eq!(form.active, FormField::Cover);
        form.previous_field();
        assert_eq!(form.active, FormField::Complete);
    }
}
