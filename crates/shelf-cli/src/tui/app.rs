//! Application state and logic

use rand::Rng;
use tokio::sync::watch;
use tracing::debug;

use shelf_core::{
    Book, Catalog, CatalogResult, CatalogState, Config, ReadingList, ReadingListSnapshot,
};

/// Input mode for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Normal navigation mode
    Normal,
    /// Typing a search term (after pressing /)
    Search,
}

/// Which pane has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivePane {
    Catalog,
    ReadingList,
    Detail,
}

impl ActivePane {
    /// Move to the next pane (wrapping)
    pub fn next(self) -> Self {
        match self {
            ActivePane::Catalog => ActivePane::ReadingList,
            ActivePane::ReadingList => ActivePane::Detail,
            ActivePane::Detail => ActivePane::Catalog,
        }
    }

    /// Move to the previous pane (wrapping)
    pub fn prev(self) -> Self {
        match self {
            ActivePane::Catalog => ActivePane::Detail,
            ActivePane::ReadingList => ActivePane::Catalog,
            ActivePane::Detail => ActivePane::ReadingList,
        }
    }
}

/// What the catalog pane shows when no search is active
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogView {
    /// A random selection of books
    Picks,
    /// The whole catalog, one page at a time
    Pages,
    /// The configured favorite titles
    Featured,
}

impl CatalogView {
    /// Cycle to the next view
    pub fn next(self) -> Self {
        match self {
            CatalogView::Picks => CatalogView::Pages,
            CatalogView::Pages => CatalogView::Featured,
            CatalogView::Featured => CatalogView::Picks,
        }
    }

    /// Pane title for this view
    pub fn label(self) -> &'static str {
        match self {
            CatalogView::Picks => "Picks",
            CatalogView::Pages => "All Books",
            CatalogView::Featured => "Teacher Favorites",
        }
    }
}

/// Application state
pub struct App {
    /// Whether the app should exit
    pub should_quit: bool,
    /// Current input mode
    pub input_mode: InputMode,
    /// Which pane has focus
    pub active_pane: ActivePane,
    /// Result of the catalog fetch
    pub catalog: CatalogState,
    /// Current catalog view
    pub view: CatalogView,
    /// Random selection shown in the picks view
    pub picks: Vec<Book>,
    /// How many random picks to draw
    pub random_picks: usize,
    /// Current page in the pages view
    pub page_index: usize,
    /// Books per page
    pub page_size: usize,
    /// Titles for the featured view
    pub favorite_titles: Vec<String>,
    /// Search term (empty means no search)
    pub search_term: String,
    /// Cursor position in the search term, in characters
    pub search_cursor: usize,
    /// Selected row in the catalog pane
    pub catalog_index: usize,
    /// The reading list (single owner: the event loop)
    pub reading_list: ReadingList,
    /// Subscription to reading list snapshots
    reading_list_rx: watch::Receiver<ReadingListSnapshot>,
    /// Latest reading list snapshot, used for rendering
    pub reading_list_view: ReadingListSnapshot,
    /// Selected row in the reading list pane
    pub reading_index: usize,
    /// Status message to display temporarily
    pub status_message: Option<String>,
    /// When the status message was set (for auto-dismiss)
    pub status_message_time: Option<std::time::Instant>,
    /// Error shown in a modal until a key is pressed
    pub error_message: Option<String>,
    /// Whether help overlay is visible
    pub show_help: bool,
    /// Scroll offset for detail pane
    pub detail_scroll: u16,
    /// Pending 'g' keypress for gg sequence (with timestamp)
    pub pending_g: Option<std::time::Instant>,
}

impl App {
    /// Create a new app waiting for the catalog
    pub fn new(config: &Config) -> Self {
        let reading_list = ReadingList::new();
        let reading_list_rx = reading_list.subscribe();
        let reading_list_view = reading_list.snapshot();

        Self {
            should_quit: false,
            input_mode: InputMode::Normal,
            active_pane: ActivePane::Catalog,
            catalog: CatalogState::Loading,
            view: CatalogView::Picks,
            picks: Vec::new(),
            random_picks: config.random_picks,
            page_index: 0,
            page_size: config.page_size.max(1),
            favorite_titles: config.favorite_titles.clone(),
            search_term: String::new(),
            search_cursor: 0,
            catalog_index: 0,
            reading_list,
            reading_list_rx,
            reading_list_view,
            reading_index: 0,
            status_message: None,
            status_message_time: None,
            error_message: None,
            show_help: false,
            detail_scroll: 0,
            pending_g: None,
        }
    }

    // ==================== Catalog ====================

    /// Record the result of the catalog fetch
    pub fn set_catalog<R: Rng + ?Sized>(&mut self, result: CatalogResult<Catalog>, rng: &mut R) {
        match result {
            Ok(catalog) => {
                debug!(count = catalog.len(), "catalog ready");
                self.picks = catalog.random_picks(self.random_picks, rng);
                self.catalog = CatalogState::Ready(catalog);
            }
            Err(e) => {
                self.catalog = CatalogState::Failed(e.to_string());
            }
        }
        self.catalog_index = 0;
    }

    /// Draw a new random selection
    pub fn reshuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if let Some(catalog) = self.catalog.catalog() {
            self.picks = catalog.random_picks(self.random_picks, rng);
            self.view = CatalogView::Picks;
            self.catalog_index = 0;
            self.set_status("Shuffled picks");
        }
    }

    /// Whether a search is active
    pub fn is_searching(&self) -> bool {
        !self.search_term.is_empty()
    }

    /// Books currently listed in the catalog pane
    pub fn visible_books(&self) -> Vec<&Book> {
        let Some(catalog) = self.catalog.catalog() else {
            return Vec::new();
        };

        if self.is_searching() {
            return catalog.filter_by_title(&self.search_term);
        }

        match self.view {
            CatalogView::Picks => self.picks.iter().collect(),
            CatalogView::Pages => catalog
                .page(self.page_index, self.page_size)
                .books
                .iter()
                .collect(),
            CatalogView::Featured => catalog.featured(&self.favorite_titles),
        }
    }

    /// Total pages in the pages view
    pub fn total_pages(&self) -> usize {
        self.catalog
            .catalog()
            .map(|c| c.page(0, self.page_size).total_pages)
            .unwrap_or(1)
    }

    /// Switch to the next catalog view
    pub fn cycle_view(&mut self) {
        self.view = self.view.next();
        self.catalog_index = 0;
    }

    /// Go to the next page (switches to the pages view)
    pub fn next_page(&mut self) {
        if self.view == CatalogView::Pages && self.page_index + 1 < self.total_pages() {
            self.page_index += 1;
        }
        self.view = CatalogView::Pages;
        self.catalog_index = 0;
    }

    /// Go to the previous page (switches to the pages view)
    pub fn prev_page(&mut self) {
        if self.view == CatalogView::Pages {
            self.page_index = self.page_index.saturating_sub(1);
        }
        self.view = CatalogView::Pages;
        self.catalog_index = 0;
    }

    /// Get the book selected in the catalog pane
    pub fn current_catalog_book(&self) -> Option<&Book> {
        self.visible_books().get(self.catalog_index).copied()
    }

    /// Get the book selected in the reading list pane
    pub fn current_reading_book(&self) -> Option<&Book> {
        self.reading_list_view.books.get(self.reading_index)
    }

    /// Book shown in the detail pane
    pub fn detail_book(&self) -> Option<&Book> {
        match self.active_pane {
            ActivePane::ReadingList => self.current_reading_book(),
            _ => self
                .current_catalog_book()
                .or_else(|| self.current_reading_book()),
        }
    }

    // ==================== Reading list ====================

    /// Add the selected catalog book to the reading list
    pub fn add_selected(&mut self) {
        let Some(book) = self.current_catalog_book().cloned() else {
            return;
        };

        let title = book.title.clone();
        if self.reading_list.add_book(book) {
            self.set_status(format!("Added '{}' to reading list", title));
        } else {
            self.set_status(format!("'{}' is already on your reading list", title));
        }
    }

    /// Remove the selected reading list book
    pub fn remove_selected(&mut self) {
        let Some(title) = self.current_reading_book().map(|b| b.title.clone()) else {
            return;
        };

        if self.reading_list.remove_book(&title) {
            self.set_status(format!("Removed '{}'", title));
        }
    }

    /// Pull the latest reading list snapshot if one was published
    ///
    /// Returns whether the view changed.
    pub fn sync_reading_list(&mut self) -> bool {
        if !self.reading_list_rx.has_changed().unwrap_or(false) {
            return false;
        }

        self.reading_list_view = self.reading_list_rx.borrow_and_update().clone();
        let count = self.reading_list_view.count();
        if count == 0 {
            self.reading_index = 0;
        } else {
            self.reading_index = self.reading_index.min(count - 1);
        }
        true
    }

    /// Whether a book is already on the reading list
    pub fn is_on_reading_list(&self, book: &Book) -> bool {
        self.reading_list_view.contains(&book.title)
    }

    // ==================== Status and overlays ====================

    /// Set a status message (will auto-dismiss after 3 seconds)
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.status_message_time = Some(std::time::Instant::now());
    }

    /// Check and clear expired status message
    pub fn check_status_timeout(&mut self) {
        if let Some(time) = self.status_message_time {
            if time.elapsed() > std::time::Duration::from_secs(3) {
                self.status_message = None;
                self.status_message_time = None;
            }
        }
    }

    /// Show an error modal
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error_message = Some(message.into());
    }

    /// Whether an error modal is showing
    pub fn has_error(&self) -> bool {
        self.error_message.is_some()
    }

    /// Dismiss the error modal
    pub fn clear_error(&mut self) {
        self.error_message = None;
    }

    /// Toggle help overlay
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    // ==================== Navigation ====================

    fn catalog_len(&self) -> usize {
        self.visible_books().len()
    }

    /// Move selection up in the current pane
    pub fn move_up(&mut self) {
        match self.active_pane {
            ActivePane::Catalog => {
                if self.catalog_index > 0 {
                    self.catalog_index -= 1;
                    self.detail_scroll = 0;
                }
            }
            ActivePane::ReadingList => {
                if self.reading_index > 0 {
                    self.reading_index -= 1;
                    self.detail_scroll = 0;
                }
            }
            ActivePane::Detail => {
                self.detail_scroll = self.detail_scroll.saturating_sub(1);
            }
        }
    }

    /// Move selection down in the current pane
    pub fn move_down(&mut self) {
        match self.active_pane {
            ActivePane::Catalog => {
                if self.catalog_index < self.catalog_len().saturating_sub(1) {
                    self.catalog_index += 1;
                    self.detail_scroll = 0;
                }
            }
            ActivePane::ReadingList => {
                if self.reading_index < self.reading_list_view.count().saturating_sub(1) {
                    self.reading_index += 1;
                    self.detail_scroll = 0;
                }
            }
            ActivePane::Detail => {
                self.detail_scroll = self.detail_scroll.saturating_add(1);
            }
        }
    }

    /// Move selection to first item in the current pane (vim 'gg')
    pub fn move_to_first(&mut self) {
        match self.active_pane {
            ActivePane::Catalog => self.catalog_index = 0,
            ActivePane::ReadingList => self.reading_index = 0,
            ActivePane::Detail => {}
        }
        self.detail_scroll = 0;
    }

    /// Move selection to last item in the current pane (vim 'G')
    pub fn move_to_last(&mut self) {
        match self.active_pane {
            ActivePane::Catalog => {
                self.catalog_index = self.catalog_len().saturating_sub(1);
                self.detail_scroll = 0;
            }
            ActivePane::ReadingList => {
                self.reading_index = self.reading_list_view.count().saturating_sub(1);
                self.detail_scroll = 0;
            }
            ActivePane::Detail => {
                // The UI clamps this to the content height
                self.detail_scroll = u16::MAX;
            }
        }
    }

    /// Move focus to the next pane
    pub fn next_pane(&mut self) {
        self.active_pane = self.active_pane.next();
    }

    /// Move focus to the previous pane
    pub fn prev_pane(&mut self) {
        self.active_pane = self.active_pane.prev();
    }

    /// Handle Enter key in current pane
    pub fn handle_enter(&mut self) {
        match self.active_pane {
            ActivePane::Catalog => self.add_selected(),
            ActivePane::ReadingList | ActivePane::Detail => self.open_cover(),
        }
    }

    /// Open the cover photo of the detail book in the browser
    pub fn open_cover(&mut self) {
        let Some(book) = self.detail_book() else {
            return;
        };

        if book.cover_photo_url.is_empty() {
            let title = book.title.clone();
            self.set_status(format!("'{}' has no cover photo", title));
            return;
        }

        let url = book.cover_photo_url.clone();
        let title = book.title.clone();
        match open::that(&url) {
            Ok(()) => self.set_status(format!("Opened cover for '{}'", title)),
            Err(e) => self.set_status(format!("Failed to open: {}", e)),
        }
    }

    // ==================== Search input ====================

    /// Enter search mode, keeping any existing term
    pub fn enter_search_mode(&mut self) {
        self.input_mode = InputMode::Search;
        self.active_pane = ActivePane::Catalog;
        self.search_cursor = self.search_term.chars().count();
    }

    /// Leave search mode, keeping the results
    pub fn exit_input_mode(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    /// Clear the search term and leave search mode
    pub fn clear_search(&mut self) {
        self.search_term.clear();
        self.search_cursor = 0;
        self.catalog_index = 0;
        self.input_mode = InputMode::Normal;
    }

    /// Insert character at cursor position
    pub fn insert_char(&mut self, c: char) {
        let at = self.cursor_byte_offset();
        self.search_term.insert(at, c);
        self.search_cursor += 1;
        self.catalog_index = 0;
    }

    /// Delete character before cursor
    pub fn delete_char(&mut self) {
        if self.search_cursor > 0 {
            self.search_cursor -= 1;
            let at = self.cursor_byte_offset();
            self.search_term.remove(at);
            self.catalog_index = 0;
        }
    }

    /// Move cursor left
    pub fn cursor_left(&mut self) {
        self.search_cursor = self.search_cursor.saturating_sub(1);
    }

    /// Move cursor right
    pub fn cursor_right(&mut self) {
        if self.search_cursor < self.search_term.chars().count() {
            self.search_cursor += 1;
        }
    }

    fn cursor_byte_offset(&self) -> usize {
        self.search_term
            .char_indices()
            .nth(self.search_cursor)
            .map(|(i, _)| i)
            .unwrap_or(self.search_term.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use shelf_core::CatalogError;

    fn ready_app(titles: &[&str]) -> App {
        let mut app = App::new(&Config::default());
        let catalog = Catalog::new(titles.iter().map(|t| Book::new(*t, "Author")).collect());
        app.set_catalog(Ok(catalog), &mut StdRng::seed_from_u64(3));
        app
    }

    #[test]
    fn test_active_pane_cycle() {
        assert_eq!(ActivePane::Catalog.next(), ActivePane::ReadingList);
        assert_eq!(ActivePane::Detail.next(), ActivePane::Catalog);
        assert_eq!(ActivePane::Catalog.prev(), ActivePane::Detail);
        assert_eq!(ActivePane::ReadingList.prev(), ActivePane::Catalog);
    }

    #[test]
    fn test_catalog_view_cycle() {
        assert_eq!(CatalogView::Picks.next(), CatalogView::Pages);
        assert_eq!(CatalogView::Pages.next(), CatalogView::Featured);
        assert_eq!(CatalogView::Featured.next(), CatalogView::Picks);
    }

    #[test]
    fn test_new_app_is_loading() {
        let app = App::new(&Config::default());
        assert!(app.catalog.is_loading());
        assert!(app.visible_books().is_empty());
        assert_eq!(app.reading_list_view.count(), 0);
    }

    #[test]
    fn test_set_catalog_draws_picks() {
        let app = ready_app(&["A", "B", "C", "D", "E", "F", "G", "H", "I", "J"]);
        assert_eq!(app.picks.len(), 9);
        assert_eq!(app.visible_books().len(), 9);
    }

    #[test]
    fn test_set_catalog_failure() {
        let mut app = App::new(&Config::default());
        app.set_catalog(Err(CatalogError::MissingData), &mut StdRng::seed_from_u64(1));
        assert!(app.catalog.is_error());
        assert!(app.visible_books().is_empty());
    }

    #[test]
    fn test_search_filters_catalog() {
        let mut app = ready_app(&["Cats", "Dogs", "Catalog"]);
        app.enter_search_mode();
        for c in "CAT".chars() {
            app.insert_char(c);
        }

        let titles: Vec<_> = app.visible_books().iter().map(|b| b.title.clone()).collect();
        assert_eq!(titles, vec!["Cats", "Catalog"]);

        app.clear_search();
        assert!(!app.is_searching());
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.visible_books().len(), 3);
    }

    #[test]
    fn test_search_editing_with_multibyte_chars() {
        let mut app = ready_app(&["Señor"]);
        app.enter_search_mode();
        for c in "ñr".chars() {
            app.insert_char(c);
        }
        app.cursor_left();
        app.insert_char('o');
        assert_eq!(app.search_term, "ñor");

        app.delete_char();
        app.delete_char();
        assert_eq!(app.search_term, "r");
    }

    #[test]
    fn test_add_selected_and_duplicate() {
        let mut app = ready_app(&["Cats"]);
        app.add_selected();
        assert!(app.sync_reading_list());
        assert_eq!(app.reading_list_view.count(), 1);

        app.add_selected();
        assert!(!app.sync_reading_list());
        assert_eq!(app.reading_list_view.count(), 1);
        assert!(app
            .status_message
            .as_deref()
            .unwrap()
            .contains("already on your reading list"));
    }

    #[test]
    fn test_remove_selected() {
        let mut app = ready_app(&["Cats", "Dogs"]);
        app.view = CatalogView::Pages;
        app.add_selected();
        app.move_down();
        app.add_selected();
        app.sync_reading_list();
        assert_eq!(app.reading_list_view.count(), 2);

        app.active_pane = ActivePane::ReadingList;
        app.move_to_last();
        app.remove_selected();
        assert!(app.sync_reading_list());

        let titles: Vec<_> = app
            .reading_list_view
            .books
            .iter()
            .map(|b| b.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Cats"]);
        assert_eq!(app.reading_index, 0);
    }

    #[test]
    fn test_is_on_reading_list_marker() {
        let mut app = ready_app(&["Cats", "Dogs"]);
        app.view = CatalogView::Pages;
        app.add_selected();
        app.sync_reading_list();

        assert!(app.is_on_reading_list(&Book::new("Cats", "anyone")));
        assert!(!app.is_on_reading_list(&Book::new("Dogs", "Author")));
    }

    #[test]
    fn test_paging() {
        let mut app = ready_app(&["A", "B", "C", "D", "E"]);
        app.page_size = 2;

        app.next_page();
        assert_eq!(app.view, CatalogView::Pages);
        assert_eq!(app.page_index, 0);

        app.next_page();
        app.next_page();
        app.next_page();
        assert_eq!(app.page_index, 2);
        assert_eq!(app.visible_books().len(), 1);

        app.prev_page();
        assert_eq!(app.page_index, 1);
    }

    #[test]
    fn test_featured_view() {
        let mut app = ready_app(&["Cats", "Dogs", "Fish"]);
        app.favorite_titles = vec!["Fish".to_string(), "Cats".to_string()];
        app.view = CatalogView::Featured;

        let titles: Vec<_> = app.visible_books().iter().map(|b| b.title.clone()).collect();
        assert_eq!(titles, vec!["Fish", "Cats"]);
    }

    #[test]
    fn test_navigation_bounds() {
        let mut app = ready_app(&["A", "B"]);
        app.move_up();
        assert_eq!(app.catalog_index, 0);

        app.move_down();
        app.move_down();
        assert_eq!(app.catalog_index, 1);

        app.active_pane = ActivePane::ReadingList;
        app.move_down();
        assert_eq!(app.reading_index, 0);
    }

    #[test]
    fn test_error_modal() {
        let mut app = App::new(&Config::default());
        assert!(!app.has_error());
        app.set_error("boom");
        assert!(app.has_error());
        app.clear_error();
        assert!(!app.has_error());
    }
}
