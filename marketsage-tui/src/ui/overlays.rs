//! Overlay widgets: keyboard help, error history.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::app::AppState;
use crate::theme;
use crate::ui::centered_rect;

/// Keyboard shortcut overlay.
pub fn render_help(f: &mut Frame, area: Rect) {
    let popup = centered_rect(60, 70, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::accent())
        .title(" Keyboard Shortcuts [Esc]close ")
        .title_style(theme::accent_bold());

    let mut lines: Vec<Line> = Vec::new();

    section(&mut lines, "Form");
    key(&mut lines, "Tab / Shift+Tab", "Next / previous field");
    key(&mut lines, "Backspace", "Delete last character");
    key(&mut lines, "Ctrl+U", "Clear field");
    key(&mut lines, "Enter", "Run backtest");
    key(&mut lines, "Space", "Press focused button");
    lines.push(Line::from(""));

    section(&mut lines, "Results");
    key(&mut lines, "Up / Down", "Scroll one line");
    key(&mut lines, "PgUp / PgDn", "Scroll one page");
    lines.push(Line::from(""));

    section(&mut lines, "General");
    key(&mut lines, "F1", "Toggle this help");
    key(&mut lines, "F2", "Error history");
    key(&mut lines, "Esc / Ctrl+C", "Quit");

    let para = Paragraph::new(lines).block(block);
    f.render_widget(para, popup);
}

fn section<'a>(lines: &mut Vec<Line<'a>>, title: &str) {
    lines.push(Line::from(Span::styled(title.to_string(), theme::accent_bold())));
}

fn key<'a>(lines: &mut Vec<Line<'a>>, keys: &str, desc: &str) {
    lines.push(Line::from(vec![
        Span::styled(format!("  {:>16}  ", keys), theme::accent()),
        Span::styled(desc.to_string(), theme::muted()),
    ]));
}

/// Error history overlay.
pub fn render_error_history(f: &mut Frame, area: Rect, app: &AppState) {
    let popup = centered_rect(80, 70, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::negative())
        .title(format!(
            " Error History ({}) [Esc]close [j/k]scroll ",
            app.error_history.len()
        ))
        .title_style(theme::negative());

    let inner = block.inner(popup);
    f.render_widget(block, popup);

    if app.error_history.is_empty() {
        let text = Paragraph::new(Span::styled("No errors recorded.", theme::muted()));
        f.render_widget(text, inner);
        return;
    }

    let mut lines: Vec<Line> = Vec::new();
    for (i, err) in app.error_history.iter().enumerate().skip(app.error_scroll) {
        if lines.len() >= inner.height as usize {
            break;
        }
        let style = if i == app.error_scroll {
            theme::negative().add_modifier(Modifier::BOLD)
        } else {
            theme::muted()
        };

        lines.push(Line::from(vec![
            Span::styled(
                format!("[{}] ", err.timestamp.format("%H:%M:%S")),
                theme::muted(),
            ),
            Span::styled(format!("[{}] ", err.category.label()), theme::warning()),
            Span::styled(err.message.as_str(), style),
        ]));

        if !err.context.is_empty() {
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled(err.context.as_str(), theme::muted()),
            ]));
        }
    }

    f.render_widget(Paragraph::new(lines), inner);
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use crate::app::{AppState, ErrorCategory, Overlay};
    use crate::ui::test_support::{render_screen, screen_contains};

    #[test]
    fn error_history_lists_newest_first() {
        let (cmd_tx, _cmd_rx) = mpsc::channel();
        let (_resp_tx, resp_rx) = mpsc::channel();
        let mut app = AppState::new(cmd_tx, resp_rx, "http://localhost:8000");
        app.push_error(ErrorCategory::Network, "connection refused".into(), "health check".into());
        app.push_error(ErrorCategory::Http, "Request failed".into(), "backtest (HTTP 500)".into());
        app.overlay = Overlay::ErrorHistory;

        let screen = render_screen(&app, 100, 40);
        assert!(screen_contains(&screen, "Error History (2)"));
        let http = screen.iter().position(|r| r.contains("[HTTP] Request failed")).unwrap();
        let net = screen.iter().position(|r| r.contains("[NET] connection refused")).unwrap();
        assert!(http < net);
        assert!(screen_contains(&screen, "backtest (HTTP 500)"));
    }
}
