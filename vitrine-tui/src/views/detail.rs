//! Item detail view.

use super::format_grouped;
use crate::state::App;
use crate::widgets::DetailPanel;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use vitrine_core::Item;

/// Label/value pairs shown for an item. Description only when present.
pub fn detail_fields(item: &Item) -> Vec<(&'static str, String)> {
    let mut fields = vec![
        ("Category", item.category.clone().unwrap_or_default()),
        (
            "Price",
            item.price
                .map(|p| format!("${}", format_grouped(p)))
                .unwrap_or_default(),
        ),
    ];
    if let Some(description) = item.description.as_ref().filter(|d| !d.is_empty()) {
        fields.push(("Description", description.clone()));
    }
    fields
}

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let view = &app.detail_view;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    f.render_widget(
        Paragraph::new(view.breadcrumb()).style(Style::default().fg(app.theme.text_dim)),
        chunks[0],
    );

    let Some(item) = view.item.as_ref() else {
        let message = if view.loading { "Loading..." } else { "Item Not Found" };
        f.render_widget(
            Paragraph::new(message).block(Block::default().borders(Borders::ALL)),
            chunks[1],
        );
        return;
    };

    f.render_widget(
        Paragraph::new(item.name.as_str())
            .style(
                Style::default()
                    .fg(app.theme.text)
                    .add_modifier(Modifier::BOLD),
            )
            .block(Block::default().borders(Borders::ALL)),
        chunks[1],
    );

    let panel = DetailPanel {
        title: "Details",
        fields: detail_fields(item),
        label_style: Style::default().fg(app.theme.secondary),
    };
    panel.render(f, chunks[2]);
}
