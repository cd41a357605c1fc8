//! UI rendering

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};
use shelf_core::{CatalogState, FETCH_FAILED_MESSAGE};

use crate::output::truncate;

use super::app::{ActivePane, App, CatalogView, InputMode};

/// Placeholder rows shown while the catalog loads
const SKELETON_ROWS: usize = 9;

/// Main UI rendering function
pub fn draw(frame: &mut Frame, app: &App) {
    // Header, panes, status bar
    let outer_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(frame.area());

    let pane_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Percentage(30),
            Constraint::Percentage(30),
        ])
        .split(outer_chunks[1]);

    draw_header(frame, app, outer_chunks[0]);
    draw_catalog_pane(frame, app, pane_chunks[0]);
    draw_reading_list_pane(frame, app, pane_chunks[1]);
    draw_detail_pane(frame, app, pane_chunks[2]);

    match app.input_mode {
        InputMode::Normal => draw_status_bar(frame, app, outer_chunks[2]),
        InputMode::Search => draw_search_input(frame, app, outer_chunks[2]),
    }

    if app.show_help {
        draw_help_overlay(frame);
    }

    if let Some(msg) = &app.error_message {
        draw_error_modal(frame, msg);
    }
}

fn pane_styles(is_active: bool) -> (Style, Style) {
    let border_style = if is_active {
        Style::default().add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };

    let highlight_style = if is_active {
        Style::default()
            .add_modifier(Modifier::BOLD)
            .add_modifier(Modifier::REVERSED)
    } else {
        Style::default().add_modifier(Modifier::REVERSED)
    };

    (border_style, highlight_style)
}

/// Draw the title bar with the reading list badge
fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let badge = format!(" ☰ {} ", app.reading_list_view.count());
    let title = Span::styled(
        " Books List",
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    );

    let padding = area
        .width
        .saturating_sub(title.width() as u16 + badge.chars().count() as u16 + 1);

    let line = Line::from(vec![
        title,
        Span::raw(" ".repeat(padding as usize)),
        Span::styled(badge, Style::default().fg(Color::Black).bg(Color::Yellow)),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

/// Draw the catalog pane (left)
fn draw_catalog_pane(frame: &mut Frame, app: &App, area: Rect) {
    let is_active = app.active_pane == ActivePane::Catalog;
    let (border_style, highlight_style) = pane_styles(is_active);
    let max_len = area.width.saturating_sub(6) as usize;

    let title = match (&app.catalog, app.is_searching()) {
        (CatalogState::Ready(_), true) => format!(" Search: \"{}\" ", app.search_term),
        (CatalogState::Ready(_), false) if app.view == CatalogView::Pages => format!(
            " {} (page {}/{}) ",
            app.view.label(),
            app.page_index + 1,
            app.total_pages()
        ),
        _ => format!(" {} ", app.view.label()),
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style);

    match &app.catalog {
        CatalogState::Loading => {
            let rows: Vec<ListItem> = (0..SKELETON_ROWS)
                .map(|_| {
                    ListItem::new(vec![
                        Line::from(Span::styled(
                            "░".repeat(max_len.min(24)),
                            Style::default().add_modifier(Modifier::DIM),
                        )),
                        Line::from(Span::styled(
                            "░".repeat(max_len.min(12)),
                            Style::default().add_modifier(Modifier::DIM),
                        )),
                    ])
                })
                .collect();
            frame.render_widget(List::new(rows).block(block), area);
        }
        CatalogState::Failed(cause) => {
            let lines = vec![
                Line::from(""),
                Line::from(Span::styled(
                    FETCH_FAILED_MESSAGE,
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from(Span::styled(
                    cause.as_str(),
                    Style::default().add_modifier(Modifier::DIM),
                )),
            ];
            let paragraph = Paragraph::new(lines)
                .block(block)
                .wrap(Wrap { trim: true });
            frame.render_widget(paragraph, area);
        }
        CatalogState::Ready(_) => {
            let books = app.visible_books();
            if books.is_empty() {
                let hint = if app.is_searching() {
                    "No books match your search"
                } else if app.view == CatalogView::Featured {
                    "No favorites configured (favorite_titles)"
                } else {
                    "The catalog is empty"
                };
                let paragraph = Paragraph::new(vec![
                    Line::from(""),
                    Line::from(Span::styled(
                        hint,
                        Style::default().add_modifier(Modifier::DIM),
                    )),
                ])
                .block(block);
                frame.render_widget(paragraph, area);
                return;
            }

            let items: Vec<ListItem> = books
                .iter()
                .map(|book| {
                    let marker = if app.is_on_reading_list(book) {
                        Span::styled("✓ ", Style::default().fg(Color::Green))
                    } else {
                        Span::styled("+ ", Style::default().fg(Color::Yellow))
                    };
                    let title = Line::from(vec![marker, Span::raw(truncate(&book.title, max_len))]);
                    let author = Line::from(Span::styled(
                        format!("  Author: {}", truncate(&book.author, max_len)),
                        Style::default().add_modifier(Modifier::DIM),
                    ));
                    ListItem::new(vec![title, author])
                })
                .collect();

            let list = List::new(items)
                .block(block)
                .highlight_style(highlight_style);

            let mut state = ListState::default();
            state.select(Some(app.catalog_index));
            frame.render_stateful_widget(list, area, &mut state);
        }
    }
}

/// Draw the reading list pane (middle)
fn draw_reading_list_pane(frame: &mut Frame, app: &App, area: Rect) {
    let is_active = app.active_pane == ActivePane::ReadingList;
    let (border_style, highlight_style) = pane_styles(is_active);
    let max_len = area.width.saturating_sub(6) as usize;

    let block = Block::default()
        .title(format!(" Reading List ({}) ", app.reading_list_view.count()))
        .borders(Borders::ALL)
        .border_style(border_style);

    if app.reading_list_view.is_empty() {
        let paragraph = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "Press a to add the selected book",
                Style::default().add_modifier(Modifier::DIM),
            )),
        ])
        .block(block)
        .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = app
        .reading_list_view
        .books
        .iter()
        .enumerate()
        .map(|(i, book)| {
            ListItem::new(vec![
                Line::from(format!("{}. {}", i + 1, truncate(&book.title, max_len))),
                Line::from(Span::styled(
                    format!("   Author: {}", truncate(&book.author, max_len)),
                    Style::default().fg(Color::Cyan),
                )),
            ])
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(highlight_style);

    let mut state = ListState::default();
    state.select(Some(app.reading_index));
    frame.render_stateful_widget(list, area, &mut state);
}

/// Draw the detail pane (right)
fn draw_detail_pane(frame: &mut Frame, app: &App, area: Rect) {
    let is_active = app.active_pane == ActivePane::Detail;
    let (border_style, _) = pane_styles(is_active);

    let block = Block::default()
        .title(" Detail ")
        .borders(Borders::ALL)
        .border_style(border_style);

    let bold = Style::default().add_modifier(Modifier::BOLD);

    let content = if let Some(book) = app.detail_book() {
        let on_list = if app.is_on_reading_list(book) {
            Span::styled("On your reading list", Style::default().fg(Color::Green))
        } else {
            Span::styled("Not on your reading list", Style::default().add_modifier(Modifier::DIM))
        };

        vec![
            Line::from(vec![Span::styled("Title: ", bold), Span::raw(&book.title)]),
            Line::from(""),
            Line::from(vec![Span::styled("Author: ", bold), Span::raw(&book.author)]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Reading level: ", bold),
                Span::raw(or_dash(&book.reading_level)),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Cover: ", bold),
                Span::raw(or_dash(&book.cover_photo_url)),
            ]),
            Line::from(""),
            Line::from(on_list),
        ]
    } else {
        vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "Select a book to view details",
                Style::default().add_modifier(Modifier::DIM),
            )]),
        ]
    };

    let max_scroll = content.len().saturating_sub(1) as u16;
    let paragraph = Paragraph::new(content)
        .block(block)
        .wrap(Wrap { trim: true })
        .scroll((app.detail_scroll.min(max_scroll), 0));

    frame.render_widget(paragraph, area);
}

/// Draw the status bar at the bottom
fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let content = if app.catalog.is_loading() {
        "Loading books...".to_string()
    } else if let Some(msg) = &app.status_message {
        msg.clone()
    } else {
        "a:add  d:remove  /:search  r:shuffle  n/p:page  v:view  o:cover  ?:help  q:quit"
            .to_string()
    };

    let paragraph = Paragraph::new(content).style(Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(paragraph, area);
}

/// Draw search input at the bottom
fn draw_search_input(frame: &mut Frame, app: &App, area: Rect) {
    let prefix = "/";
    let matches = app.visible_books().len();

    let line = Line::from(vec![
        Span::styled(prefix, Style::default().fg(Color::Cyan)),
        Span::raw(app.search_term.as_str()),
        Span::styled(
            format!("  ({} matches)", matches),
            Style::default().add_modifier(Modifier::DIM),
        ),
    ]);

    frame.render_widget(Paragraph::new(line), area);

    let cursor_x = area.x + prefix.len() as u16 + app.search_cursor as u16;
    frame.set_cursor_position((cursor_x, area.y));
}

/// Centered popup area of at most `width` x `height`
fn popup_area(area: Rect, width: u16, height: u16) -> Rect {
    let popup_width = width.min(area.width.saturating_sub(4));
    let popup_height = height.min(area.height.saturating_sub(4));
    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;
    Rect::new(popup_x, popup_y, popup_width, popup_height)
}

/// Draw help overlay
fn draw_help_overlay(frame: &mut Frame) {
    let area = popup_area(frame.area(), 50, 24);
    frame.render_widget(Clear, area);

    let help_text = vec![
        Line::from(vec![Span::styled(
            "Keyboard Shortcuts",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        Line::from("Navigation:"),
        Line::from("  j/k, ↑/↓    Move up/down"),
        Line::from("  gg          Jump to first item"),
        Line::from("  G           Jump to last item"),
        Line::from("  h/l, ←/→    Switch panes"),
        Line::from("  Tab         Cycle panes"),
        Line::from(""),
        Line::from("Reading list:"),
        Line::from("  a, Enter    Add selected book"),
        Line::from("  d, x        Remove selected book"),
        Line::from(""),
        Line::from("Catalog:"),
        Line::from("  /           Search titles"),
        Line::from("  Esc         Clear search"),
        Line::from("  r           Shuffle picks"),
        Line::from("  n/p         Next/previous page"),
        Line::from("  v           Switch view"),
        Line::from("  o           Open cover photo"),
        Line::from("  q           Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().add_modifier(Modifier::BOLD));

    frame.render_widget(Paragraph::new(help_text).block(block), area);
}

/// Draw error modal
fn draw_error_modal(frame: &mut Frame, message: &str) {
    let area = popup_area(frame.area(), 60, 7);
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Error ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));

    let paragraph = Paragraph::new(vec![
        Line::from(message.to_string()),
        Line::from(""),
        Line::from(Span::styled(
            "Press any key to dismiss",
            Style::default().add_modifier(Modifier::DIM),
        )),
    ])
    .block(block)
    .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, area);
}

fn or_dash(s: &str) -> &str {
    if s.is_empty() {
        "-"
    } else {
        s
    }
}
