//! Item list view: search bar, results, and pagination.

use super::format_price;
use crate::keys::InputMode;
use crate::state::App;
use crate::widgets::SearchBar;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};
use vitrine_core::Item;

/// `name - category - $price`
pub fn format_item_line(item: &Item) -> String {
    format!(
        "{} - {} - {}",
        item.name,
        item.category.as_deref().unwrap_or(""),
        format_price(item.price)
    )
}

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let view = &app.items_view;
    let results_line = view.results_line();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(if results_line.is_some() { 1 } else { 0 }),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    let editing = app.input_mode == InputMode::Search;
    let search = SearchBar {
        value: if editing { &view.search_input } else { &view.search_term },
        editing,
        style: Style::default().fg(app.theme.text),
        placeholder_style: Style::default().fg(app.theme.text_dim),
    };
    search.render(f, chunks[0]);

    if let Some(line) = results_line {
        f.render_widget(
            Paragraph::new(line).style(Style::default().fg(app.theme.text_dim)),
            chunks[1],
        );
    }

    let block = Block::default().title("Items").borders(Borders::ALL);
    if view.loading {
        f.render_widget(Paragraph::new("Loading...").block(block), chunks[2]);
    } else if view.items.is_empty() {
        f.render_widget(Paragraph::new("No items found.").block(block), chunks[2]);
    } else {
        let rows: Vec<ListItem> = view
            .items
            .iter()
            .map(|item| ListItem::new(format_item_line(item)))
            .collect();
        let mut state = ListState::default();
        state.select(view.selected);
        let list = List::new(rows).block(block).highlight_style(
            Style::default()
                .fg(app.theme.primary)
                .bg(app.theme.bg_highlight)
                .add_modifier(Modifier::BOLD),
        );
        f.render_stateful_widget(list, chunks[2], &mut state);
    }

    if let Some(footer) = view.pagination_footer() {
        let mut nav = String::new();
        if view.has_prev_page() {
            nav.push_str("← Previous  ");
        }
        nav.push_str(&footer);
        if view.has_next_page() {
            nav.push_str("  Next →");
        }
        f.render_widget(
            Paragraph::new(nav).style(Style::default().fg(app.theme.primary_dim)),
            chunks[3],
        );
    }
}
