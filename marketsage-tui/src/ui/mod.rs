//! Top-level UI layout: single dashboard page with status bar.
//!
//! ```text
//! ┃ No Financial Advice          ← disclaimer banner
//! MarketSage-Pro / API health    ← header
//! [Ticker] [Mini-chart] [IVR]    ← placeholders
//! ┌ Backtest ┐                   ← form + inline error
//! ┌ Backtest Results ┐           ← only when loaded
//! status bar
//! ```

pub mod form_panel;
pub mod header;
pub mod overlays;
pub mod placeholders;
pub mod results_panel;
pub mod status_bar;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::Frame;

use crate::app::{AppState, Overlay};

/// Draw the entire UI.
pub fn draw(f: &mut Frame, app: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(header::BANNER_HEIGHT),
            Constraint::Length(header::TITLE_HEIGHT),
            Constraint::Length(placeholders::HEIGHT),
            Constraint::Length(form_panel::HEIGHT),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(f.area());

    header::render_banner(f, chunks[0]);
    header::render_title(f, chunks[1], app);
    placeholders::render(f, chunks[2]);
    form_panel::render(f, chunks[3], app);
    results_panel::render(f, chunks[4], app);
    status_bar::render(f, chunks[5], app);

    let page = f.area();
    match app.overlay {
        Overlay::Help => overlays::render_help(f, page),
        Overlay::ErrorHistory => overlays::render_error_history(f, page, app),
        Overlay::None => {}
    }
}

/// Compute a centered rect for overlays.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
pub(crate) mod test_support {
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    use crate::app::AppState;

    /// Render the whole UI and return the screen as one string per row.
    pub fn render_screen(app: &AppState, width: u16, height: u16) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| super::draw(f, app)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content
            .chunks(width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect()
    }

    pub fn screen_contains(screen: &[String], needle: &str) -> bool {
        screen.iter().any(|row| row.contains(needle))
    }
}
