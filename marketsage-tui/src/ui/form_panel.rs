//! Backtest form: three inputs, the submit button, and the inline error line.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::app::{AppState, Focus};
use crate::theme;

/// Three label/input pairs plus the button row.
const CONTROL_ROWS: u16 = 7;

/// Long transport errors carry the URL and source chain.
const ERROR_ROWS: u16 = 3;

pub const HEIGHT: u16 = CONTROL_ROWS + ERROR_ROWS + 2;

const INPUTS: [(Focus, bool, &str); 3] = [
    (Focus::FromDate, true, "YYYY-MM-DD"),
    (Focus::ToDate, false, "YYYY-MM-DD (blank = today)"),
    (Focus::Symbols, true, "AAPL, TSLA"),
];

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(true))
        .title(" Backtest ")
        .title_style(theme::panel_title(true));

    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(CONTROL_ROWS), Constraint::Min(0)])
        .split(inner);

    let mut lines: Vec<Line> = Vec::with_capacity(CONTROL_ROWS as usize);

    for (focus, required, placeholder) in INPUTS {
        let focused = app.focus == focus;
        let mut label = vec![Span::styled(
            format!(" {}", focus.label()),
            theme::panel_title(focused),
        )];
        if required {
            label.push(Span::styled(" *", theme::warning()));
        }
        lines.push(Line::from(label));
        lines.push(input_line(app.field(focus), placeholder, focused));
    }

    lines.push(button_line(app));
    f.render_widget(Paragraph::new(lines), rows[0]);

    if let Some(message) = app.view.error() {
        let error = Paragraph::new(Span::styled(format!(" {message}"), theme::negative()))
            .wrap(Wrap { trim: true });
        f.render_widget(error, rows[1]);
    }
}

fn input_line<'a>(value: &'a str, placeholder: &'a str, focused: bool) -> Line<'a> {
    let prompt_style = if focused { theme::accent() } else { theme::muted() };
    let mut spans = vec![Span::styled("   > ", prompt_style)];
    if value.is_empty() && !focused {
        spans.push(Span::styled(placeholder, theme::muted()));
    } else {
        spans.push(Span::styled(value, theme::text()));
    }
    if focused {
        spans.push(Span::styled("_", theme::accent()));
    }
    Line::from(spans)
}

fn button_line(app: &AppState) -> Line<'static> {
    let loading = app.view.is_loading();
    let label = if loading { "[ Running... ]" } else { "[ Run Backtest ]" };
    let style = theme::button(app.focus == Focus::Submit, loading);
    Line::from(vec![Span::raw(" "), Span::styled(label, style)])
}
