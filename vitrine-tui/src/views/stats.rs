//! Dataset statistics view.

use super::format_grouped;
use crate::state::App;
use crate::theme::cache_status_color;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};
use vitrine_core::StatsSummary;

/// Summary lines: total, average price, and price range.
pub fn summary_lines(summary: &StatsSummary) -> Vec<String> {
    let mut lines = vec![
        format!("Total items: {}", summary.total),
        format!("Average price: ${}", format_grouped(summary.average_price)),
    ];
    if let Some(range) = summary.price_range {
        lines.push(format!(
            "Price range: ${} - ${}",
            format_grouped(range.min),
            format_grouped(range.max)
        ));
    }
    lines
}

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let view = &app.stats_view;
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);
    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(chunks[0]);

    let Some(summary) = view.summary.as_ref() else {
        let message = if view.loading { "Loading..." } else { "No stats loaded. Press r to refresh." };
        f.render_widget(
            Paragraph::new(message).block(Block::default().title("Stats").borders(Borders::ALL)),
            chunks[0],
        );
        return;
    };

    let lines: Vec<Line> = summary_lines(summary).into_iter().map(Line::from).collect();
    f.render_widget(
        Paragraph::new(lines).block(Block::default().title("Summary").borders(Borders::ALL)),
        left[0],
    );

    let status = view.cache_status.as_deref();
    let mut cache_line = vec![Span::styled(
        status.unwrap_or("refreshed"),
        Style::default().fg(cache_status_color(status, &app.theme)),
    )];
    if let Some(loaded_at) = view.loaded_at {
        cache_line.push(Span::raw(format!("  at {}", loaded_at.format("%H:%M:%S"))));
    }
    f.render_widget(
        Paragraph::new(Line::from(cache_line))
            .block(Block::default().title("Cache").borders(Borders::ALL)),
        left[1],
    );

    let categories: Vec<ListItem> = summary
        .categories
        .iter()
        .flatten()
        .map(|(name, count)| ListItem::new(format!("{}: {}", name, count)))
        .collect();
    f.render_widget(
        List::new(categories).block(Block::default().title("Categories").borders(Borders::ALL)),
        chunks[1],
    );
}
