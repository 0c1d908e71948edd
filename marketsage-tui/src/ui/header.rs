//! Disclaimer banner and page title with the API health line.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use crate::app::AppState;
use crate::theme;

pub const BANNER_HEIGHT: u16 = 4;
pub const TITLE_HEIGHT: u16 = 2;

/// Warning banner shown above everything else.
pub fn render_banner(f: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::LEFT | Borders::TOP | Borders::BOTTOM)
        .border_type(BorderType::Thick)
        .border_style(theme::warning());

    let text = vec![
        Line::from(Span::styled(" No Financial Advice", theme::warning_bold())),
        Line::from(Span::styled(" Trade at Your Own Risk.", theme::text())),
    ];

    f.render_widget(Paragraph::new(text).block(block), area);
}

/// Title line plus "API health: <status>".
pub fn render_title(f: &mut Frame, area: Rect, app: &AppState) {
    let text = vec![
        Line::from(vec![
            Span::styled(" MarketSage-Pro", theme::accent_bold()),
            Span::styled(format!("  {}", app.base_url), theme::muted()),
        ]),
        Line::from(vec![
            Span::styled(" API health: ", theme::text()),
            Span::styled(app.health.display(), theme::health(&app.health)),
        ]),
    ];

    f.render_widget(Paragraph::new(text), area);
}
