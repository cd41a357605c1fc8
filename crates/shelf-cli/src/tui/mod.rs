//! Shelf TUI
//!
//! Terminal user interface for browsing the catalog and keeping a reading
//! list.
//!
//! ## Layout
//!
//! Header with the reading list badge, then three panes:
//! - Left: Catalog (random picks, pages, favorites, or search results)
//! - Middle: Reading list
//! - Right: Detail of the selected book
//!
//! ## Navigation
//!
//! - j/k or ↑/↓: Move selection up/down
//! - h/l or ←/→: Switch focus between panes
//! - Tab: Cycle through panes
//! - q: Quit
//!
//! ## Commands
//!
//! - a / Enter: Add selected book to the reading list
//! - d / x: Remove selected book from the reading list
//! - /: Search titles, Esc clears
//! - r: Shuffle picks
//! - n / p: Next / previous page
//! - v: Switch catalog view
//! - o: Open cover photo

mod app;
mod ui;

use std::fs::File;
use std::io::stdout;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use rand::rng;
use ratatui::prelude::*;
use shelf_core::{Catalog, CatalogClient, CatalogResult, Config};
use tokio::sync::oneshot;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use app::{ActivePane, App, InputMode};

/// Run the TUI application
pub async fn run(config: Config) -> Result<()> {
    init_tui_logging(&config);

    // Fetch the catalog in the background; the UI shows placeholders meanwhile
    let catalog_rx = spawn_catalog_fetch(config.clone());

    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let mut app = App::new(&config);

    let result = run_app(&mut terminal, &mut app, catalog_rx).await;

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

/// Start the one-shot catalog fetch
fn spawn_catalog_fetch(config: Config) -> oneshot::Receiver<CatalogResult<Catalog>> {
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let result = match CatalogClient::new(&config) {
            Ok(client) => client.fetch_catalog().await,
            Err(e) => Err(e),
        };
        if let Err(e) = &result {
            warn!(error = %e, recoverable = e.is_recoverable(), "catalog fetch failed");
        }
        // The UI may already have quit
        let _ = tx.send(result);
    });

    rx
}

async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    mut catalog_rx: oneshot::Receiver<CatalogResult<Catalog>>,
) -> Result<()> {
    loop {
        app.check_status_timeout();
        app.sync_reading_list();

        terminal.draw(|frame| ui::draw(frame, app))?;

        tokio::select! {
            biased;

            fetched = &mut catalog_rx, if app.catalog.is_loading() => {
                match fetched {
                    Ok(result) => app.set_catalog(result, &mut rng()),
                    Err(_) => app.set_error("Catalog fetch stopped unexpectedly"),
                }
            }

            // Poll for terminal events
            _ = tokio::time::sleep(Duration::from_millis(50)) => {
                if event::poll(Duration::from_millis(0))? {
                    if let Event::Key(key) = event::read()? {
                        // Only handle key press events (not release)
                        if key.kind != KeyEventKind::Press {
                            continue;
                        }

                        // If error modal is showing, any key dismisses it
                        if app.has_error() {
                            app.clear_error();
                            continue;
                        }

                        // If help is showing, any key dismisses it
                        if app.show_help {
                            app.show_help = false;
                            continue;
                        }

                        match app.input_mode {
                            InputMode::Normal => handle_normal_mode(app, key.code, key.modifiers),
                            InputMode::Search => handle_search_mode(app, key.code, key.modifiers),
                        }
                    }
                }
            }
        }

        if app.should_quit {
            info!("quitting");
            break;
        }
    }

    Ok(())
}

/// Handle key events in normal mode
fn handle_normal_mode(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    // Clear status message on navigation keys
    if matches!(
        code,
        KeyCode::Char('j')
            | KeyCode::Char('k')
            | KeyCode::Up
            | KeyCode::Down
            | KeyCode::Char('h')
            | KeyCode::Char('l')
            | KeyCode::Left
            | KeyCode::Right
            | KeyCode::Tab
            | KeyCode::BackTab
    ) {
        app.status_message = None;
    }

    // Clear pending 'g' if timeout expired (500ms)
    if let Some(time) = app.pending_g {
        if time.elapsed() > Duration::from_millis(500) {
            app.pending_g = None;
        }
    }

    match code {
        // Quit
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
        }

        // Navigation
        KeyCode::Char('k') | KeyCode::Up => app.move_up(),
        KeyCode::Char('j') | KeyCode::Down => app.move_down(),
        KeyCode::Char('h') | KeyCode::Left | KeyCode::BackTab => app.prev_pane(),
        KeyCode::Char('l') | KeyCode::Right | KeyCode::Tab => app.next_pane(),

        // Reading list
        KeyCode::Enter => app.handle_enter(),
        KeyCode::Char('a') => {
            if app.active_pane == ActivePane::Catalog {
                app.add_selected();
            }
        }
        KeyCode::Char('d') | KeyCode::Char('x') | KeyCode::Delete => {
            if app.active_pane == ActivePane::ReadingList {
                app.remove_selected();
            }
        }

        // Catalog
        KeyCode::Char('/') => app.enter_search_mode(),
        KeyCode::Esc => app.clear_search(),
        KeyCode::Char('r') => app.reshuffle(&mut rng()),
        KeyCode::Char('n') => app.next_page(),
        KeyCode::Char('p') => app.prev_page(),
        KeyCode::Char('v') => app.cycle_view(),
        KeyCode::Char('o') => app.open_cover(),

        // Help
        KeyCode::Char('?') => app.toggle_help(),

        // Vim navigation: G (go to last)
        KeyCode::Char('G') => {
            app.pending_g = None;
            app.move_to_last();
        }

        // Vim navigation: g (start of gg sequence)
        KeyCode::Char('g') => {
            if app.pending_g.is_some() {
                app.pending_g = None;
                app.move_to_first();
            } else {
                app.pending_g = Some(std::time::Instant::now());
            }
        }

        _ => {
            app.pending_g = None;
        }
    }
}

/// Handle key events in search mode
fn handle_search_mode(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    match code {
        // Quit
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
        }

        // Cancel search
        KeyCode::Esc => app.clear_search(),

        // Confirm search (stay on results)
        KeyCode::Enter => app.exit_input_mode(),

        // Move through results while typing
        KeyCode::Up => app.move_up(),
        KeyCode::Down => app.move_down(),

        // Text input
        KeyCode::Char(c) => app.insert_char(c),
        KeyCode::Backspace => app.delete_char(),
        KeyCode::Left => app.cursor_left(),
        KeyCode::Right => app.cursor_right(),

        _ => {}
    }
}

/// Initialize logging for TUI mode
///
/// Only initializes if SHELF_LOG environment variable is set.
/// Logs to file (config.log_file or default {data_dir}/debug.log).
fn init_tui_logging(config: &Config) {
    let Ok(log_level) = std::env::var("SHELF_LOG") else {
        return;
    };

    let log_path = config.log_path();
    if let Some(parent) = log_path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            eprintln!("Warning: Could not create log directory {:?}: {}", parent, e);
            return;
        }
    }

    let log_file = match File::create(&log_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Could not create log file {:?}: {}", log_path, e);
            return;
        }
    };

    let env_filter = EnvFilter::new(format!("shelf_core={},shelf_cli={}", log_level, log_level));

    // Ignore error if already initialized
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(log_file)
        .try_init();

    info!("TUI logging initialized to {:?}", log_path);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use shelf_core::Book;

    fn ready_app() -> App {
        let mut app = App::new(&Config::default());
        let catalog = Catalog::new(vec![Book::new("Cats", "Jane"), Book::new("Catalog", "John")]);
        app.set_catalog(Ok(catalog), &mut StdRng::seed_from_u64(5));
        app
    }

    #[test]
    fn test_add_key_only_in_catalog_pane() {
        let mut app = ready_app();
        app.active_pane = ActivePane::ReadingList;
        handle_normal_mode(&mut app, KeyCode::Char('a'), KeyModifiers::NONE);
        assert!(app.reading_list.is_empty());

        app.active_pane = ActivePane::Catalog;
        handle_normal_mode(&mut app, KeyCode::Char('a'), KeyModifiers::NONE);
        assert_eq!(app.reading_list.count(), 1);
    }

    #[test]
    fn test_remove_key_in_reading_list_pane() {
        let mut app = ready_app();
        handle_normal_mode(&mut app, KeyCode::Enter, KeyModifiers::NONE);
        app.sync_reading_list();

        handle_normal_mode(&mut app, KeyCode::Tab, KeyModifiers::NONE);
        assert_eq!(app.active_pane, ActivePane::ReadingList);
        handle_normal_mode(&mut app, KeyCode::Char('d'), KeyModifiers::NONE);
        assert!(app.reading_list.is_empty());
    }

    #[test]
    fn test_search_mode_keys() {
        let mut app = ready_app();
        handle_normal_mode(&mut app, KeyCode::Char('/'), KeyModifiers::NONE);
        assert_eq!(app.input_mode, InputMode::Search);

        for c in "log".chars() {
            handle_search_mode(&mut app, KeyCode::Char(c), KeyModifiers::NONE);
        }
        assert_eq!(app.visible_books().len(), 1);

        handle_search_mode(&mut app, KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(app.is_searching());

        handle_normal_mode(&mut app, KeyCode::Esc, KeyModifiers::NONE);
        assert!(!app.is_searching());
    }

    #[test]
    fn test_quit_keys() {
        let mut app = ready_app();
        handle_normal_mode(&mut app, KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(app.should_quit);
    }

    #[test]
    fn test_ctrl_c_quits_while_searching() {
        let mut app = ready_app();
        handle_normal_mode(&mut app, KeyCode::Char('/'), KeyModifiers::NONE);
        handle_search_mode(&mut app, KeyCode::Char('c'), KeyModifiers::CONTROL);

        assert!(app.should_quit);
        assert!(app.search_term.is_empty());

        // A plain 'c' is still typed
        let mut app = ready_app();
        handle_normal_mode(&mut app, KeyCode::Char('/'), KeyModifiers::NONE);
        handle_search_mode(&mut app, KeyCode::Char('c'), KeyModifiers::NONE);
        assert!(!app.should_quit);
        assert_eq!(app.search_term, "c");
    }

    #[test]
    fn test_gg_sequence() {
        let mut app = ready_app();
        handle_normal_mode(&mut app, KeyCode::Char('G'), KeyModifiers::NONE);
        assert_eq!(app.catalog_index, 1);

        handle_normal_mode(&mut app, KeyCode::Char('g'), KeyModifiers::NONE);
        handle_normal_mode(&mut app, KeyCode::Char('g'), KeyModifiers::NONE);
        assert_eq!(app.catalog_index, 0);
    }
}
