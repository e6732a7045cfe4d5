//! Search box widget.

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub struct SearchBar<'a> {
    pub value: &'a str,
    pub editing: bool,
    pub style: Style,
    pub placeholder_style: Style,
}

impl<'a> SearchBar<'a> {
    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let line = if self.value.is_empty() && !self.editing {
            Line::from(Span::styled("Search items...", self.placeholder_style))
        } else if self.editing {
            Line::from(vec![Span::styled(self.value, self.style), Span::styled("_", self.style)])
        } else {
            Line::from(Span::styled(self.value, self.style))
        };

        let title = if self.editing {
            "Search [Enter submit, Esc cancel]"
        } else {
            "Search [/ edit, c clear]"
        };
        let paragraph = Paragraph::new(line).block(Block::default().title(title).borders(Borders::ALL));
        f.render_widget(paragraph, area);
    }
}
