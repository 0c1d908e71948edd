//! Backtest result panel: pretty-printed JSON, wrapped and scrollable.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::Span;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::app::AppState;
use crate::theme;
use crate::view_state::ViewState;

fn document_paragraph(text: &str) -> Paragraph<'_> {
    Paragraph::new(text)
        .style(theme::text())
        .wrap(Wrap { trim: false })
}

/// Largest scroll offset that still fills a `width` x `height` viewport,
/// counting wrapped rows.
pub fn max_scroll(text: &str, width: u16, height: u16) -> u16 {
    let rows = document_paragraph(text).line_count(width);
    u16::try_from(rows.saturating_sub(usize::from(height))).unwrap_or(u16::MAX)
}

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    match &app.view {
        ViewState::Loaded(doc) => {
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(theme::positive())
                .title(" Backtest Results [Up/Down/PgUp/PgDn]scroll ")
                .title_style(theme::accent_bold());

            let inner = block.inner(area);
            app.results_viewport.set((inner.width, inner.height));

            let text = doc.to_display_text();
            // The viewport can grow after scrolling, e.g. on resize.
            let scroll = app
                .results_scroll
                .min(max_scroll(&text, inner.width, inner.height));
            let para = document_paragraph(&text).block(block).scroll((scroll, 0));
            f.render_widget(para, area);
        }
        ViewState::Loading => {
            let text = Span::styled(
                format!(" Waiting for {}...", app.base_url),
                theme::muted(),
            );
            f.render_widget(Paragraph::new(text), area);
        }
        ViewState::Idle | ViewState::Error(_) => {}
    }
}
