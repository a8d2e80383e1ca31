use std::cmp::min;

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::route::Route;
use crate::views::{CollectionCard, ExploreFilter};

use super::{Alert, App, Mode, Screen, FOOTER_HEIGHT};
use crate::ui::forms::{BookForm, ConfirmBookDelete};
use crate::ui::helpers::{
    centered_rect, cover_marker, progress_line, progress_spans, tone_color, truncate,
};
use crate::ui::screens::{
    CollectionScreen, DetailScreen, ExploreScreen, HomeFocus, HomeScreen,
};

const HEADER_HEIGHT: u16 = 2;
const TILE_WIDTH: u16 = 24;
const TILE_HEIGHT: u16 = 4;
const CARD_HEIGHT: u16 = 4;
const BAR_WIDTH: usize = 20;

/// First and one-past-last index of a scrolled window that keeps `selected`
/// visible.
fn window(selected: usize, capacity: usize, len: usize) -> (usize, usize) {
    let capacity = capacity.max(1);
    let mut start = if selected >= capacity {
        selected + 1 - capacity
    } else {
        0
    };
    if start + capacity > len {
        start = len.saturating_sub(capacity);
    }
    (start, min(start + capacity, len))
}

fn key_style() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

fn hint(keys: &[(&'static str, &'static str)]) -> Line<'static> {
    let mut spans = Vec::with_capacity(keys.len() * 2);
    for (index, (key, label)) in keys.iter().enumerate() {
        spans.push(Span::styled(*key, key_style()));
        let separator = if index + 1 == keys.len() { "" } else { "   " };
        spans.push(Span::raw(format!(" {label}{separator}")));
    }
    Line::from(spans)
}

fn empty_message(frame: &mut Frame, area: Rect, title: &str, text: &str) {
    let message = Paragraph::new(text.to_string())
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(title.to_string()));
    frame.render_widget(message, area);
}

impl<S> App<S> {
    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);
        let header_height = HEADER_HEIGHT.min(area.height.saturating_sub(footer_height));

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(header_height),
                Constraint::Min(0),
                Constraint::Length(footer_height),
            ])
            .split(area);
        let (header_area, content_area, footer_area) = (chunks[0], chunks[1], chunks[2]);

        self.draw_header(frame, header_area);

        match &self.screen {
            Screen::Home(home) => self.draw_home(frame, content_area, home),
            Screen::Explore(explore) => self.draw_explore(frame, content_area, explore),
            Screen::Collection(collection) => {
                self.draw_collection(frame, content_area, collection)
            }
            Screen::Form(form) => self.draw_form(frame, content_area, form),
            Screen::Detail(detail) => self.draw_detail(frame, content_area, detail),
        }

        self.draw_footer(frame, footer_area);

        match &self.mode {
            Mode::ConfirmDelete(confirm) => self.draw_confirm_delete(frame, area, confirm),
            Mode::ConfirmClearCover => self.draw_confirm_clear_cover(frame, area),
            Mode::Alert(alert) => self.draw_alert(frame, area, alert),
            Mode::Searching => {
                if let Screen::Explore(explore) = &self.screen {
                    self.draw_search_bar(frame, content_area, explore);
                }
            }
            Mode::Normal => {}
        }
    }

    fn draw_header(&self, frame: &mut Frame, area: Rect) {
        if area.height == 0 {
            return;
        }
        let tabs = [
            ("[1]", "Home", Route::Home),
            ("[2]", "Explore", Route::Explore),
            ("[3]", "Collection", Route::Collection),
            ("[+]", "Add", Route::add()),
        ];
        let current = self.route.page_name();
        let mut spans = vec![Span::styled(
            "Bookshelf  ",
            Style::default().add_modifier(Modifier::BOLD),
        )];
        for (key, label, route) in tabs {
            let style = if route.page_name() == current {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            spans.push(Span::styled(key, key_style()));
            spans.push(Span::styled(format!(" {label}  "), style));
        }
        let header = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::BOTTOM));
        frame.render_widget(header, area);
    }

    fn draw_home(&self, frame: &mut Frame, area: Rect, home: &HomeScreen) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(6),
                Constraint::Length(TILE_HEIGHT + 2),
                Constraint::Min(0),
            ])
            .split(area);

        let stats = &home.view.stats;
        let stats_lines = vec![
            Line::from(vec![
                Span::raw("Total books: "),
                Span::styled(
                    stats.total.to_string(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw("   Finished: "),
                Span::styled(
                    stats.completed.to_string(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(
                [
                    vec![Span::raw("Complete ")],
                    progress_spans(stats.percent_complete, BAR_WIDTH, Color::Green),
                ]
                .concat(),
            ),
            Line::from(
                [
                    vec![Span::raw("Unread   ")],
                    progress_spans(stats.percent_unread, BAR_WIDTH, Color::LightRed),
                ]
                .concat(),
            ),
        ];
        let stats_block = Paragraph::new(stats_lines)
            .block(Block::default().borders(Borders::ALL).title("Reading Stats"));
        frame.render_widget(stats_block, chunks[0]);

        self.draw_home_strip(frame, chunks[1], home);
        self.draw_home_latest(frame, chunks[2], home);
    }

    fn draw_home_strip(&self, frame: &mut Frame, area: Rect, home: &HomeScreen) {
        let tiles = &home.view.collection;
        if tiles.is_empty() {
            empty_message(frame, area, "My Collection", "No books yet, add one with +");
            return;
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!("My Collection ({})", tiles.len()));
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let capacity = (inner.width / TILE_WIDTH).max(1) as usize;
        let (start, end) = window(home.strip_selected, capacity, tiles.len());
        let constraints: Vec<Constraint> = (start..end)
            .map(|_| Constraint::Length(TILE_WIDTH))
            .collect();
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(constraints)
            .split(inner);

        let focused = home.focus == HomeFocus::Strip;
        let text_width = TILE_WIDTH.saturating_sub(4) as usize;
        for (cell, index) in cells.iter().zip(start..end) {
            let tile = &tiles[index];
            let selected = focused && index == home.strip_selected;
            let mut block = Block::default().borders(Borders::ALL);
            if selected {
                block = block.style(Style::default().fg(Color::Yellow));
            }
            let lines = vec![
                Line::from(Span::styled(
                    format!("{} {}", cover_marker(tile.has_cover), truncate(&tile.title, text_width)),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    truncate(&tile.author, text_width),
                    Style::default().fg(Color::Gray),
                )),
            ];
            frame.render_widget(Paragraph::new(lines).block(block), *cell);
        }
    }

    fn draw_home_latest(&self, frame: &mut Frame, area: Rect, home: &HomeScreen) {
        let rows = &home.view.latest;
        let block = Block::default().borders(Borders::ALL).title("Latest Added");
        if rows.is_empty() {
            frame.render_widget(block, area);
            return;
        }

        let focused = home.focus == HomeFocus::Latest;
        let text_width = (area.width as usize).saturating_sub(BAR_WIDTH + 16);
        let lines: Vec<Line> = rows
            .iter()
            .enumerate()
            .map(|(index, row)| {
                let selected = focused && index == home.latest_selected;
                let marker = if selected { "▶ " } else { "  " };
                let title_style = if selected {
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().add_modifier(Modifier::BOLD)
                };
                let label = truncate(&format!("{}  {}", row.title, row.author), text_width);
                let padding = text_width.saturating_sub(label.chars().count());
                let mut spans = vec![
                    Span::raw(marker),
                    Span::raw(format!("{} ", cover_marker(row.has_cover))),
                    Span::styled(label, title_style),
                    Span::raw(" ".repeat(padding + 2)),
                ];
                spans.extend(progress_spans(row.progress, BAR_WIDTH, Color::Blue));
                Line::from(spans)
            })
            .collect();

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn draw_explore(&self, frame: &mut Frame, area: Rect, explore: &ExploreScreen) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(area);

        let mut chip_spans = Vec::new();
        for chip in ExploreFilter::chips() {
            let style = if chip == explore.filter.category {
                Style::default().fg(Color::Black).bg(Color::Cyan)
            } else {
                Style::default().fg(Color::Gray)
            };
            chip_spans.push(Span::styled(
                format!(" {} ", ExploreFilter::chip_label(chip)),
                style,
            ));
            chip_spans.push(Span::raw(" "));
        }
        let search = if explore.filter.term.is_empty() {
            Span::styled("(press / to search)", Style::default().fg(Color::DarkGray))
        } else {
            Span::styled(
                format!("\"{}\"", explore.filter.term),
                Style::default().fg(Color::Yellow),
            )
        };
        let filter_lines = vec![
            Line::from(chip_spans),
            Line::from(vec![Span::raw("Search: "), search]),
        ];
        let filters = Paragraph::new(filter_lines)
            .block(Block::default().borders(Borders::BOTTOM).title(format!(
                "Explore - {}",
                explore.view.count_label
            )));
        frame.render_widget(filters, chunks[0]);

        let list_area = chunks[1];
        if list_area.height == 0 {
            return;
        }
        if explore.books.is_empty() {
            empty_message(frame, list_area, "Books", "No books yet, add one with +");
            return;
        }
        if explore.view.is_empty() {
            empty_message(frame, list_area, "Books", "No results.");
            return;
        }

        let capacity = (list_area.height / CARD_HEIGHT).max(1) as usize;
        let (start, end) = window(explore.selected, capacity, explore.view.rows.len());
        let constraints: Vec<Constraint> = (start..end)
            .map(|_| Constraint::Length(CARD_HEIGHT))
            .collect();
        let cells = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(list_area);

        for (cell, index) in cells.iter().zip(start..end) {
            let row = &explore.view.rows[index];
            let selected = index == explore.selected;
            let mut block = Block::default().borders(Borders::ALL);
            if selected {
                block = block.style(Style::default().fg(Color::Yellow));
            }
            let title = if selected {
                format!("▶ {}", row.title)
            } else {
                row.title.clone()
            };
            let mut bar = progress_line(row.progress, BAR_WIDTH, row.tone);
            bar.spans.push(Span::raw("   "));
            bar.spans.push(Span::styled(
                format!("[c] {}", row.action.label()),
                Style::default().fg(Color::Gray),
            ));
            let lines = vec![
                Line::from(vec![
                    Span::styled(title, Style::default().add_modifier(Modifier::BOLD)),
                    Span::styled(format!("  {}", row.author), Style::default().fg(Color::Gray)),
                ]),
                bar,
            ];
            frame.render_widget(Paragraph::new(lines).block(block), *cell);
        }
    }

    fn draw_search_bar(&self, frame: &mut Frame, area: Rect, explore: &ExploreScreen) {
        let height = 3u16.min(area.height);
        let popup_area = Rect {
            x: area.x,
            y: area.y,
            width: area.width,
            height,
        };
        frame.render_widget(Clear, popup_area);

        let block = Block::default().borders(Borders::ALL).title("Search titles");
        let paragraph = Paragraph::new(Span::raw(format!("Search: {}", explore.filter.term)))
            .block(block.clone())
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup_area);

        let inner = block.inner(popup_area);
        let cursor_x =
            inner.x + "Search: ".len() as u16 + explore.filter.term.chars().count() as u16;
        frame.set_cursor_position((cursor_x, inner.y));
    }

    fn draw_collection(&self, frame: &mut Frame, area: Rect, collection: &CollectionScreen) {
        let view = &collection.view;
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(area);
        let total = Paragraph::new(Line::from(vec![
            Span::styled("My Collection  ", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(view.total_label.clone(), Style::default().fg(Color::Gray)),
        ]));
        frame.render_widget(total, chunks[0]);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[1]);

        let split = view.incomplete.len();
        let (left_selected, right_selected) = if collection.selected < split {
            (Some(collection.selected), None)
        } else {
            (None, Some(collection.selected - split))
        };

        self.draw_bucket(
            frame,
            columns[0],
            &format!("Still reading ({})", view.incomplete_label),
            &view.incomplete,
            left_selected,
            "No unfinished books.",
        );
        self.draw_bucket(
            frame,
            columns[1],
            &format!("Finished ({})", view.complete_label),
            &view.complete,
            right_selected,
            "No finished books.",
        );
    }

    fn draw_bucket(
        &self,
        frame: &mut Frame,
        area: Rect,
        title: &str,
        cards: &[CollectionCard],
        selected: Option<usize>,
        empty: &str,
    ) {
        if cards.is_empty() {
            empty_message(frame, area, title, empty);
            return;
        }

        let block = Block::default().borders(Borders::ALL).title(title.to_string());
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);
        if inner.height == 0 {
            return;
        }

        let capacity = (inner.height / CARD_HEIGHT).max(1) as usize;
        let (start, end) = window(selected.unwrap_or(0), capacity, cards.len());
        let constraints: Vec<Constraint> = (start..end)
            .map(|_| Constraint::Length(CARD_HEIGHT))
            .collect();
        let cells = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(inner);

        let bar_width = (inner.width as usize).saturating_sub(10).min(BAR_WIDTH);
        for (cell, index) in cells.iter().zip(start..end) {
            let card = &cards[index];
            let is_selected = selected == Some(index);
            let mut block = Block::default().borders(Borders::ALL);
            if is_selected {
                block = block.style(Style::default().fg(Color::Yellow));
            }
            let title = if is_selected {
                format!("▶ {} ({})", card.title, card.year)
            } else {
                format!("{} ({})", card.title, card.year)
            };
            let mut bar = progress_line(card.progress, bar_width, card.tone);
            bar.spans.push(Span::styled(
                format!("  [c] {}", card.action.label()),
                Style::default().fg(Color::Gray),
            ));
            let lines = vec![
                Line::from(vec![
                    Span::styled(title, Style::default().add_modifier(Modifier::BOLD)),
                    Span::styled(format!("  {}", card.author), Style::default().fg(Color::Gray)),
                ]),
                bar,
            ];
            frame.render_widget(Paragraph::new(lines).block(block), *cell);
        }
    }

    fn draw_form(&self, frame: &mut Frame, area: Rect, form: &BookForm) {
        let block = Block::default()
            .title(form.title_text())
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);
        if inner.height == 0 {
            return;
        }

        let mut lines: Vec<Line> = BookForm::fields()
            .iter()
            .map(|field| form.build_line(*field))
            .collect();
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("[ {} ]", form.submit_label()),
            Style::default()
                .fg(Color::Black)
                .bg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(""));

        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter or Ctrl+S to save • Tab to switch • Esc to cancel",
                Style::default().fg(Color::Gray),
            )));
        }

        frame.render_widget(Paragraph::new(lines), inner);

        if let Some(offset) = form.cursor_offset() {
            let row = BookForm::field_row(form.active);
            let cursor_x = (inner.x + offset).min(inner.x + inner.width.saturating_sub(1));
            frame.set_cursor_position((cursor_x, inner.y + row));
        }
    }

    fn draw_detail(&self, frame: &mut Frame, area: Rect, detail: &DetailScreen) {
        let view = &detail.view;
        let block = Block::default()
            .borders(Borders::ALL)
            .title("Book Detail");
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let label = Style::default().fg(Color::Gray);
        let status_style = Style::default().fg(tone_color(view.tone));
        let mut slider = vec![Span::styled("Progress  ", label)];
        slider.extend(progress_spans(
            detail.slider,
            BAR_WIDTH * 2,
            tone_color(detail.preview_tone()),
        ));
        if detail.is_dirty() {
            slider.push(Span::styled(
                "  (Enter to save)",
                Style::default().fg(Color::Yellow),
            ));
        }

        let lines = vec![
            Line::from(vec![
                Span::raw(format!("{} ", cover_marker(view.has_cover))),
                Span::styled(
                    view.title.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![Span::styled("Author    ", label), Span::raw(view.author.clone())]),
            Line::from(vec![Span::styled("Year      ", label), Span::raw(view.year.clone())]),
            Line::from(vec![
                Span::styled("Category  ", label),
                Span::raw(view.category.clone()),
            ]),
            Line::from(vec![
                Span::styled("Status    ", label),
                Span::styled(view.status, status_style),
            ]),
            Line::from(""),
            Line::from(slider),
            Line::from(""),
            Line::from(Span::styled("Description", label)),
            Line::from(view.description.clone()),
        ];

        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        if area.height == 0 {
            return;
        }
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let instructions = self.footer_instructions();

        let paragraph = Paragraph::new(vec![status_line, instructions]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        match (&self.screen, &self.mode) {
            (_, Mode::Alert(_)) => hint(&[("[Enter]", "OK")]),
            (_, Mode::ConfirmDelete(_)) | (_, Mode::ConfirmClearCover) => {
                hint(&[("[y]", "Confirm"), ("[n/Esc]", "Cancel")])
            }
            (_, Mode::Searching) => hint(&[
                ("[type]", "Filter titles"),
                ("[Enter]", "Done"),
                ("[Esc]", "Clear"),
            ]),
            (Screen::Form(_), _) => hint(&[
                ("[Tab]", "Next field"),
                ("[←→]", "Category"),
                ("[Space]", "Finished"),
                ("[Del]", "Remove cover"),
                ("[Ctrl+S]", "Save"),
                ("[Esc]", "Cancel"),
            ]),
            (Screen::Home(_), _) => hint(&[
                ("[←→]", "Collection"),
                ("[↑↓]", "Latest"),
                ("[Enter]", "Open"),
                ("[+]", "Add"),
                ("[q]", "Quit"),
            ]),
            (Screen::Explore(_), _) => hint(&[
                ("[↑↓]", "Select"),
                ("[←→]", "Category"),
                ("[/]", "Search"),
                ("[Enter]", "Open"),
                ("[c]", "Toggle finished"),
                ("[e]", "Edit"),
                ("[d]", "Delete"),
                ("[Esc]", "Back"),
            ]),
            (Screen::Collection(_), _) => hint(&[
                ("[↑↓]", "Select"),
                ("[Enter]", "Open"),
                ("[c]", "Toggle finished"),
                ("[e]", "Edit"),
                ("[d]", "Delete"),
                ("[Esc]", "Back"),
            ]),
            (Screen::Detail(_), _) => hint(&[
                ("[←→]", "Progress"),
                ("[Enter]", "Save progress"),
                ("[e]", "Edit"),
                ("[f]", "Favourite"),
                ("[s]", "Share"),
                ("[o]", "Search web"),
                ("[Esc]", "Back"),
            ]),
        }
    }

    fn draw_confirm_delete(&self, frame: &mut Frame, area: Rect, confirm: &ConfirmBookDelete) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("Delete Book").borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from(format!("Are you sure you want to delete '{}'?", confirm.title)),
            Line::from(""),
            Line::from(Span::styled(
                "Press Y to confirm or N / Esc to cancel.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn draw_confirm_clear_cover(&self, frame: &mut Frame, area: Rect) {
        let popup_area = centered_rect(50, 25, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("Remove Cover").borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from("Remove the cover image?"),
            Line::from(""),
            Line::from(Span::styled(
                "Press Y to confirm or N / Esc to cancel.",
                Style::default().fg(Color::Gray),
            )),
        ];
        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn draw_alert(&self, frame: &mut Frame, area: Rect, alert: &Alert) {
        let popup_area = centered_rect(50, 25, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Notice")
            .borders(Borders::ALL)
            .style(Style::default().fg(Color::Red));
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from(Span::styled(
                alert.message.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                format!("Press Enter to go to {}.", alert.redirect.page_name()),
                Style::default().fg(Color::Gray),
            )),
        ];
        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }
}

#[cfg(test)]
mod tests {
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    use super::*;
    use crate::db::{BookStore, MemoryStorage};
    use crate::models::BookInput;

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn render(app: &App<MemoryStorage>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|frame| app.draw(frame)).unwrap();
        buffer_text(&terminal)
    }

    #[test]
    fn window_keeps_selection_visible() {
        assert_eq!(window(0, 3, 10), (0, 3));
        assert_eq!(window(5, 3, 10), (3, 6));
        assert_eq!(window(9, 3, 10), (7, 10));
        assert_eq!(window(0, 3, 2), (0, 2));
        assert_eq!(window(0, 0, 0), (0, 0));
    }

    #[test]
    fn empty_home_invites_adding() {
        let app = App::new(BookStore::new(MemoryStorage::new()));
        let text = render(&app);
        assert!(text.contains("No books yet, add one with +"));
        assert!(text.contains("Total books: 0"));
    }

    #[test]
    fn collection_shows_both_buckets() {
        let store = BookStore::new(MemoryStorage::new());
        store
            .create(
                BookInput {
                    title: "Dune".into(),
                    author: "Frank Herbert".into(),
                    year: "1965".into(),
                    description: String::new(),
                    category: "Fiction".into(),
                    is_complete: false,
                },
                None,
            )
            .unwrap();
        let mut app = App::new(store);
        app.open(Route::Collection).unwrap();
        let text = render(&app);
        assert!(text.contains("Dune (1965)"));
        assert!(text.contains("No finished books."));
    }
}
