//! Reserved areas for widgets that are not wired up yet.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::Span;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::theme;

pub const HEIGHT: u16 = 3;

const LABELS: [&str; 3] = [
    "Ticker Cards (placeholder)",
    "Mini-chart (placeholder)",
    "IVR Meter (placeholder)",
];

pub fn render(f: &mut Frame, area: Rect) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    for (label, col) in LABELS.iter().zip(cols.iter()) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme::muted());
        let para = Paragraph::new(Span::styled(*label, theme::neutral())).block(block);
        f.render_widget(para, *col);
    }
}
