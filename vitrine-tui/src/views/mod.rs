//! View rendering dispatch.

pub mod detail;
pub mod items;
pub mod stats;

use crate::keys::InputMode;
use crate::state::{App, View};
use crate::theme::notification_color;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::Span,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render_view(f: &mut Frame<'_>, app: &App) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.size());

    render_header(f, app, layout[0]);

    match app.active_view {
        View::Items => items::render(f, app, layout[1]),
        View::Detail => detail::render(f, app, layout[1]),
        View::Stats => stats::render(f, app, layout[1]),
    }

    render_footer(f, app, layout[2]);
}

fn render_header(f: &mut Frame<'_>, app: &App, area: Rect) {
    let title = format!("VITRINE | {} | {}", app.active_view.title(), app.config.api_base_url);
    let block = Block::default().borders(Borders::ALL).title(Span::styled(
        title,
        Style::default().fg(app.theme.primary),
    ));
    f.render_widget(block, area);
}

fn footer_help(app: &App) -> &'static str {
    match (app.input_mode, app.active_view) {
        (InputMode::Search, _) => "type to search • Enter submit • Esc cancel",
        (_, View::Items) => "j/k move • Enter open • n/p page • / search • c clear • s stats • q quit",
        (_, View::Detail) => "Esc back • r reload • s stats • q quit",
        (_, View::Stats) => "r refresh cache • Esc back • q quit",
    }
}

fn render_footer(f: &mut Frame<'_>, app: &App, area: Rect) {
    let (text, style) = match app.notifications.last() {
        Some(note) => (
            format!("{}: {} (x dismiss)", note.level.label(), note.message),
            Style::default().fg(notification_color(note.level, &app.theme)),
        ),
        None => (
            footer_help(app).to_string(),
            Style::default().fg(app.theme.text_dim),
        ),
    };
    let footer = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL))
        .style(style);
    f.render_widget(footer, area);
}

/// A price as the listing shows it: `2499`, `45.5`.
pub fn format_price(price: Option<f64>) -> String {
    match price {
        Some(value) => format!("${}", value),
        None => "$-".to_string(),
    }
}

/// A price with thousands separators and at most three decimals: `2,499`, `1,234.5`.
pub fn format_grouped(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    let raw = rounded.abs().to_string();
    let (int_part, frac_part) = match raw.split_once('.') {
        Some((int_part, frac)) => (int_part, Some(frac)),
        None => (raw.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if let Some(frac) = frac_part {
        grouped.push('.');
        grouped.push_str(frac);
    }
    if rounded < 0.0 {
        grouped.insert(0, '-');
    }
    grouped
}
