use std::mem;
use std::path::PathBuf;

use anyhow::{Context, Result};
use crossterm::event::KeyCode;
use open::that as open_link;
use ratatui::style::{Color, Style};
use tracing::{debug, info, warn};

use crate::cover::{clean_dropped_path, CoverLoader};
use crate::db::{BookStore, KeyValueStorage};
use crate::error::StoreError;
use crate::route::Route;
use crate::views::{search_url, share_text};

use super::forms::{BookForm, ConfirmBookDelete, DeleteOrigin, FormField};
use super::helpers::surface_error;
use super::screens::{CollectionScreen, DetailScreen, ExploreScreen, HomeScreen};

mod draw;

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Rows skipped by PageUp/PageDown in lists.
const PAGE_STEP: isize = 5;
/// Slider step for PageUp/PageDown on the detail page.
const SLIDER_PAGE: i16 = 10;

/// The page currently on screen, rebuilt from the store on every visit.
enum Screen {
    Home(HomeScreen),
    Explore(ExploreScreen),
    Collection(CollectionScreen),
    Form(BookForm),
    Detail(DetailScreen),
}

/// Overlays and input modes scoped to the current screen.
enum Mode {
    Normal,
    /// Typing into the explore search box.
    Searching,
    ConfirmDelete(ConfirmBookDelete),
    ConfirmClearCover,
    Alert(Alert),
}

/// Blocking message that sends the user elsewhere once dismissed.
struct Alert {
    message: String,
    redirect: Route,
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state shared across the TUI.
pub struct App<S> {
    store: BookStore<S>,
    route: Route,
    history: Vec<Route>,
    screen: Screen,
    mode: Mode,
    status: Option<StatusMessage>,
    covers: CoverLoader,
    next_ticket: u64,
}

impl<S: KeyValueStorage> App<S> {
    /// Start on the home page.
    pub fn new(store: BookStore<S>) -> Self {
        let screen = Screen::Home(HomeScreen::new(&store.load()));
        Self {
            store,
            route: Route::Home,
            history: Vec::new(),
            screen,
            mode: Mode::Normal,
            status: None,
            covers: CoverLoader::new(),
            next_ticket: 0,
        }
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn store(&self) -> &BookStore<S> {
        &self.store
    }

    /// Message of the alert currently shown, if any.
    pub fn alert(&self) -> Option<&str> {
        match &self.mode {
            Mode::Alert(alert) => Some(alert.message.as_str()),
            _ => None,
        }
    }

    pub fn status_text(&self) -> Option<&str> {
        self.status.as_ref().map(|status| status.text.as_str())
    }

    /// Navigate to `route`, keeping the current page in the history.
    pub fn open(&mut self, route: Route) -> Result<()> {
        self.mode = self.go(route, true)?;
        Ok(())
    }

    /// Page dispatcher: build the screen for `route` from the store. A
    /// missing record raises an alert that redirects home and leaves the
    /// current page in place.
    fn go(&mut self, route: Route, push: bool) -> Result<Mode> {
        debug!(%route, "navigate");
        let screen = match &route {
            Route::Home => Screen::Home(HomeScreen::new(&self.store.load())),
            Route::Explore => Screen::Explore(ExploreScreen::new(self.store.load())),
            Route::Collection => Screen::Collection(CollectionScreen::new(&self.store.load())),
            Route::Form { id: None } => Screen::Form(BookForm::create()),
            Route::Form { id: Some(id) } => match self.store.find_by_id(id) {
                Some(book) => Screen::Form(BookForm::from_book(&book)),
                None => return Ok(not_found(id)),
            },
            Route::Detail { id: Some(id) } => match self.store.find_by_id(id) {
                Some(book) => Screen::Detail(DetailScreen::new(book)),
                None => return Ok(not_found(id)),
            },
            Route::Detail { id: None } => return Ok(not_found("")),
        };

        if push {
            let previous = mem::replace(&mut self.route, route);
            self.history.push(previous);
        } else {
            self.route = route;
        }
        self.screen = screen;
        Ok(Mode::Normal)
    }

    /// Replace the current page without growing the history.
    fn redirect(&mut self, route: Route) -> Result<Mode> {
        self.go(route, false)
    }

    fn go_back(&mut self) -> Result<Mode> {
        match self.history.pop() {
            Some(previous) => self.go(previous, false),
            None => Ok(Mode::Normal),
        }
    }

    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        let mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit)?,
            Mode::Searching => self.handle_search(code)?,
            Mode::ConfirmDelete(confirm) => self.handle_confirm_delete(code, confirm)?,
            Mode::ConfirmClearCover => self.handle_confirm_clear_cover(code),
            Mode::Alert(alert) => self.handle_alert(code, alert)?,
        };

        self.mode = mode;
        Ok(exit)
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        if matches!(self.screen, Screen::Form(_)) {
            return self.handle_form_key(code);
        }

        match code {
            KeyCode::Char('q') => {
                *exit = true;
                return Ok(Mode::Normal);
            }
            KeyCode::Esc => {
                self.clear_status();
                return self.go_back();
            }
            KeyCode::Char('1') => return self.go(Route::Home, true),
            KeyCode::Char('2') => return self.go(Route::Explore, true),
            KeyCode::Char('3') => return self.go(Route::Collection, true),
            KeyCode::Char('+') => {
                self.clear_status();
                return self.go(Route::add(), true);
            }
            _ => {}
        }

        match self.screen {
            Screen::Home(_) => self.handle_home_key(code),
            Screen::Explore(_) => self.handle_explore_key(code),
            Screen::Collection(_) => self.handle_collection_key(code),
            Screen::Detail(_) => self.handle_detail_key(code),
            Screen::Form(_) => Ok(Mode::Normal),
        }
    }

    fn handle_home_key(&mut self, code: KeyCode) -> Result<Mode> {
        let Screen::Home(home) = &mut self.screen else {
            return Ok(Mode::Normal);
        };
        match code {
            KeyCode::Left => home.move_strip(-1),
            KeyCode::Right => home.move_strip(1),
            KeyCode::Up => home.move_latest(-1),
            KeyCode::Down => home.move_latest(1),
            KeyCode::Tab | KeyCode::BackTab => home.toggle_focus(),
            KeyCode::Enter => {
                if let Some(id) = home.selected_id().map(str::to_string) {
                    return self.go(Route::detail(id), true);
                }
                self.set_status("No books yet. Press '+' to add one.", StatusKind::Error);
            }
            _ => {}
        }
        Ok(Mode::Normal)
    }

    fn handle_explore_key(&mut self, code: KeyCode) -> Result<Mode> {
        let Screen::Explore(explore) = &mut self.screen else {
            return Ok(Mode::Normal);
        };
        let selected = explore.current_row().map(|row| (row.id.clone(), row.title.clone()));

        match code {
            KeyCode::Up => explore.move_selection(-1),
            KeyCode::Down => explore.move_selection(1),
            KeyCode::PageUp => explore.move_selection(-PAGE_STEP),
            KeyCode::PageDown => explore.move_selection(PAGE_STEP),
            KeyCode::Home => explore.select_first(),
            KeyCode::End => explore.select_last(),
            KeyCode::Left | KeyCode::Char('[') => explore.cycle_category(-1),
            KeyCode::Right | KeyCode::Char(']') => explore.cycle_category(1),
            KeyCode::Char('/') | KeyCode::Char('f') => {
                self.clear_status();
                return Ok(Mode::Searching);
            }
            KeyCode::Enter => {
                if let Some((id, _)) = selected {
                    return self.go(Route::detail(id), true);
                }
            }
            KeyCode::Char('c') | KeyCode::Char(' ') => {
                if let Some((id, title)) = selected {
                    self.toggle_in_explore(&id, &title);
                }
            }
            KeyCode::Char('e') => {
                if let Some((id, _)) = selected {
                    return self.go(Route::edit(id), true);
                }
            }
            KeyCode::Char('d') | KeyCode::Char('-') => {
                if let Some((id, title)) = selected {
                    return Ok(Mode::ConfirmDelete(ConfirmBookDelete {
                        id,
                        title,
                        origin: DeleteOrigin::Explore,
                    }));
                }
                self.set_status("No book selected to delete.", StatusKind::Error);
            }
            _ => {}
        }
        Ok(Mode::Normal)
    }

    /// Toggle on the explore page's cached array and save that array whole.
    fn toggle_in_explore(&mut self, id: &str, title: &str) {
        let Screen::Explore(explore) = &mut self.screen else {
            return;
        };
        let Some(complete) = explore.toggle(id) else {
            return;
        };
        let saved = self.store.save(&explore.books);
        match saved {
            Ok(()) => {
                info!(id, complete, "completion toggled");
                self.set_status(completion_message(title, complete), StatusKind::Info);
            }
            Err(err) => self.report(err.into()),
        }
    }

    fn handle_search(&mut self, code: KeyCode) -> Result<Mode> {
        let Screen::Explore(explore) = &mut self.screen else {
            return Ok(Mode::Normal);
        };
        match code {
            KeyCode::Esc => {
                explore.clear_term();
                return Ok(Mode::Normal);
            }
            KeyCode::Enter => return Ok(Mode::Normal),
            KeyCode::Up => explore.move_selection(-1),
            KeyCode::Down => explore.move_selection(1),
            KeyCode::Backspace => explore.pop_term(),
            KeyCode::Char(ch) if !ch.is_control() => explore.push_term(ch),
            _ => {}
        }
        Ok(Mode::Searching)
    }

    fn handle_collection_key(&mut self, code: KeyCode) -> Result<Mode> {
        let Screen::Collection(collection) = &mut self.screen else {
            return Ok(Mode::Normal);
        };
        let selected = collection
            .current_card()
            .map(|card| (card.id.clone(), card.title.clone()));

        match code {
            KeyCode::Up => collection.move_selection(-1),
            KeyCode::Down => collection.move_selection(1),
            KeyCode::PageUp => collection.move_selection(-PAGE_STEP),
            KeyCode::PageDown => collection.move_selection(PAGE_STEP),
            KeyCode::Home => collection.select_first(),
            KeyCode::End => collection.select_last(),
            KeyCode::Enter => {
                if let Some((id, _)) = selected {
                    return self.go(Route::detail(id), true);
                }
            }
            KeyCode::Char('c') | KeyCode::Char(' ') => {
                if let Some((id, title)) = selected {
                    match self.store.toggle_complete(&id) {
                        Ok(book) => self.set_status(
                            completion_message(&title, book.is_complete),
                            StatusKind::Info,
                        ),
                        Err(err) => self.report(err.into()),
                    }
                    self.reload_collection();
                }
            }
            KeyCode::Char('e') => {
                if let Some((id, _)) = selected {
                    return self.go(Route::edit(id), true);
                }
            }
            KeyCode::Char('d') | KeyCode::Char('-') => {
                if let Some((id, title)) = selected {
                    return Ok(Mode::ConfirmDelete(ConfirmBookDelete {
                        id,
                        title,
                        origin: DeleteOrigin::Collection,
                    }));
                }
                self.set_status("No book selected to delete.", StatusKind::Error);
            }
            _ => {}
        }
        Ok(Mode::Normal)
    }

    /// Collection always re-renders from a fresh load.
    fn reload_collection(&mut self) {
        let books = self.store.load();
        if let Screen::Collection(collection) = &mut self.screen {
            collection.set_books(&books);
        }
    }

    fn handle_confirm_delete(&mut self, code: KeyCode, confirm: ConfirmBookDelete) -> Result<Mode> {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_status("Deletion cancelled.", StatusKind::Info);
                Ok(Mode::Normal)
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                match self.perform_delete(&confirm) {
                    Ok(()) => {
                        self.set_status(format!("Deleted '{}'.", confirm.title), StatusKind::Info);
                    }
                    Err(err) => self.report(err),
                }
                Ok(Mode::Normal)
            }
            _ => Ok(Mode::ConfirmDelete(confirm)),
        }
    }

    fn perform_delete(&mut self, confirm: &ConfirmBookDelete) -> Result<()> {
        match confirm.origin {
            DeleteOrigin::Explore => {
                if let Screen::Explore(explore) = &mut self.screen {
                    if explore.remove(&confirm.id) {
                        self.store
                            .save(&explore.books)
                            .context("failed to delete book")?;
                        info!(id = %confirm.id, "book removed");
                    }
                }
            }
            DeleteOrigin::Collection => {
                self.store
                    .remove_by_id(&confirm.id)
                    .context("failed to delete book")?;
                self.reload_collection();
            }
        }
        Ok(())
    }

    fn handle_detail_key(&mut self, code: KeyCode) -> Result<Mode> {
        let Screen::Detail(detail) = &mut self.screen else {
            return Ok(Mode::Normal);
        };
        match code {
            KeyCode::Left => detail.nudge(-1),
            KeyCode::Right => detail.nudge(1),
            KeyCode::PageDown => detail.nudge(-SLIDER_PAGE),
            KeyCode::PageUp => detail.nudge(SLIDER_PAGE),
            KeyCode::Home => detail.set_slider(0),
            KeyCode::End => detail.set_slider(100),
            KeyCode::Enter => return self.commit_slider(),
            KeyCode::Char('e') => {
                let id = detail.book.id.clone();
                return self.go(Route::edit(id), true);
            }
            KeyCode::Char('f') => {
                self.set_status("Added to favourites!", StatusKind::Info);
            }
            KeyCode::Char('s') => {
                let text = share_text(&detail.book);
                self.share(&text);
            }
            KeyCode::Char('o') => {
                let url = search_url(&detail.book);
                match open_link(&url) {
                    Ok(()) => self.set_status("Opened web search.", StatusKind::Info),
                    Err(err) => self.set_status(
                        format!("Failed to open browser: {err}"),
                        StatusKind::Error,
                    ),
                }
            }
            _ => {}
        }
        Ok(Mode::Normal)
    }

    /// Slider "release": persist the value and recompute the flag from it.
    fn commit_slider(&mut self) -> Result<Mode> {
        let Screen::Detail(detail) = &mut self.screen else {
            return Ok(Mode::Normal);
        };
        let id = detail.book.id.clone();
        let value = detail.slider;
        match self.store.commit_progress(&id, value) {
            Ok(book) => {
                detail.committed(book);
                self.set_status(format!("Progress saved ({value}%)."), StatusKind::Info);
                Ok(Mode::Normal)
            }
            Err(StoreError::NotFound(id)) => Ok(not_found(&id)),
            Err(err) => {
                self.report(err.into());
                Ok(Mode::Normal)
            }
        }
    }

    fn share(&mut self, text: &str) {
        let copied = arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text));
        match copied {
            Ok(()) => self.set_status("Share text copied to clipboard.", StatusKind::Info),
            Err(err) => {
                warn!(%err, "clipboard unavailable");
                self.set_status("Sharing is not supported here.", StatusKind::Error);
            }
        }
    }

    fn handle_form_key(&mut self, code: KeyCode) -> Result<Mode> {
        let Screen::Form(form) = &mut self.screen else {
            return Ok(Mode::Normal);
        };
        match code {
            KeyCode::Esc => {
                let message = if form.is_edit() {
                    "Edit cancelled."
                } else {
                    "Add cancelled."
                };
                self.set_status(message, StatusKind::Info);
                return self.go_back();
            }
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.previous_field(),
            KeyCode::Left if form.active == FormField::Category => form.cycle_category(-1),
            KeyCode::Right if form.active == FormField::Category => form.cycle_category(1),
            KeyCode::Char(' ') if form.active == FormField::Complete => form.toggle_complete(),
            KeyCode::Delete if form.active == FormField::Cover => {
                if form.preview().is_some() {
                    return Ok(Mode::ConfirmClearCover);
                }
            }
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter if form.active == FormField::Cover => {
                let path = PathBuf::from(form.cover_path.trim());
                self.request_cover(path);
            }
            KeyCode::Enter => return self.submit_form(),
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }
        Ok(Mode::Normal)
    }

    fn handle_confirm_clear_cover(&mut self, code: KeyCode) -> Mode {
        match code {
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                if let Screen::Form(form) = &mut self.screen {
                    form.clear_cover();
                }
                self.set_status("Cover removed.", StatusKind::Info);
                Mode::Normal
            }
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => Mode::Normal,
            _ => Mode::ConfirmClearCover,
        }
    }

    /// Start a background read of a cover file for the open form.
    fn request_cover(&mut self, path: PathBuf) {
        let Screen::Form(form) = &mut self.screen else {
            return;
        };
        if path.as_os_str().is_empty() {
            form.error = Some("Type a file path first.".to_string());
            return;
        }
        self.next_ticket += 1;
        form.pending_cover = Some(self.next_ticket);
        form.cover_path = path.display().to_string();
        self.covers.request(self.next_ticket, path);
    }

    pub fn handle_ctrl_s(&mut self) -> Result<()> {
        if matches!(self.mode, Mode::Normal) && matches!(self.screen, Screen::Form(_)) {
            self.mode = self.submit_form()?;
        }
        Ok(())
    }

    fn submit_form(&mut self) -> Result<Mode> {
        let Screen::Form(form) = &mut self.screen else {
            return Ok(Mode::Normal);
        };
        let input = match form.parse_inputs() {
            Ok(input) => input,
            Err(err) => {
                let message = err.to_string();
                form.error = Some(message.clone());
                self.set_status(message, StatusKind::Error);
                return Ok(Mode::Normal);
            }
        };

        match form.edit_id.clone() {
            None => {
                let cover = form.new_cover();
                match self.store.create(input, cover) {
                    Ok(book) => {
                        self.set_status(format!("Added '{}'.", book.title), StatusKind::Info);
                        self.redirect(Route::Home)
                    }
                    Err(err) => Ok(self.form_failed(err.into())),
                }
            }
            Some(id) => {
                let cover = form.cover.clone();
                match self.store.update(&id, input, &cover) {
                    Ok(book) => {
                        self.set_status(format!("Updated '{}'.", book.title), StatusKind::Info);
                        self.redirect(Route::Explore)
                    }
                    Err(StoreError::NotFound(id)) => Ok(not_found(&id)),
                    Err(err) => Ok(self.form_failed(err.into())),
                }
            }
        }
    }

    fn form_failed(&mut self, err: anyhow::Error) -> Mode {
        let message = surface_error(&err);
        if let Screen::Form(form) = &mut self.screen {
            form.error = Some(message.clone());
        }
        self.set_status(message, StatusKind::Error);
        Mode::Normal
    }

    fn handle_alert(&mut self, code: KeyCode, alert: Alert) -> Result<Mode> {
        match code {
            KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') => self.redirect(alert.redirect),
            _ => Ok(Mode::Alert(alert)),
        }
    }

    /// Bracketed paste. Terminals deliver dropped files this way, so on the
    /// form a pasted path to an existing file is taken as a cover drop.
    pub fn handle_paste(&mut self, text: &str) {
        let searching = matches!(self.mode, Mode::Searching);
        let normal = matches!(self.mode, Mode::Normal);
        match &mut self.screen {
            Screen::Form(form) if normal => {
                let on_cover = form.active == FormField::Cover;
                let dropped = clean_dropped_path(text).filter(|path| on_cover || path.is_file());
                if let Some(path) = dropped {
                    self.request_cover(path);
                } else if form.active.is_text() {
                    form.push_str(text.trim_end_matches('\n'));
                }
            }
            Screen::Explore(explore) if searching => {
                for ch in text.chars().filter(|ch| !ch.is_control()) {
                    explore.push_term(ch);
                }
            }
            _ => {}
        }
    }

    /// Apply finished cover reads. Reads for a form that is gone are dropped.
    pub fn on_tick(&mut self) {
        while let Some(loaded) = self.covers.poll() {
            let Screen::Form(form) = &mut self.screen else {
                debug!(ticket = loaded.ticket, "dropping cover for a closed form");
                continue;
            };
            if form.pending_cover != Some(loaded.ticket) {
                debug!(ticket = loaded.ticket, "dropping stale cover");
                continue;
            }
            match loaded.result {
                Ok(data_url) => {
                    form.set_cover(data_url);
                    self.set_status("Cover loaded.", StatusKind::Info);
                }
                Err(err) => {
                    warn!(path = %loaded.path.display(), %err, "cover read failed");
                    form.pending_cover = None;
                    form.error = Some(err.to_string());
                    self.set_status(err.to_string(), StatusKind::Error);
                }
            }
        }
    }

    fn set_status<T: Into<String>>(&mut self, text: T, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    fn report(&mut self, err: anyhow::Error) {
        warn!(err = %format!("{err:#}"), "action failed");
        let message = surface_error(&err);
        self.set_status(message, StatusKind::Error);
    }
}

fn not_found(id: &str) -> Mode {
    warn!(id, "book not found");
    Mode::Alert(Alert {
        message: "Book not found".to_string(),
        redirect: Route::Home,
    })
}

fn completion_message(title: &str, complete: bool) -> String {
    if complete {
        format!("Marked '{title}' as finished.")
    } else {
        format!("Marked '{title}' as unread.")
    }
}
