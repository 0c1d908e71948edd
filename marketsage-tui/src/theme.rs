//! Parrot/neon theme tokens for the dashboard.
//!
//! # Color Palette
//! - **Accent**: Electric cyan (focus, titles)
//! - **Positive**: Neon green (healthy service, results)
//! - **Negative**: Hot pink (errors)
//! - **Warning**: Neon orange (disclaimer banner, blocked submissions)
//! - **Neutral**: Cool purple (placeholders)
//! - **Muted**: Steel blue (hints, unfocused borders)

use ratatui::style::{Color, Modifier, Style};

use crate::app::HealthStatus;

pub const BACKGROUND: Color = Color::Rgb(18, 18, 20);
pub const ACCENT: Color = Color::Rgb(0, 255, 255);
pub const POSITIVE: Color = Color::Rgb(0, 255, 128);
pub const NEGATIVE: Color = Color::Rgb(255, 20, 147);
pub const WARNING: Color = Color::Rgb(255, 140, 0);
pub const NEUTRAL: Color = Color::Rgb(147, 112, 219);
pub const MUTED: Color = Color::Rgb(100, 149, 237);
pub const TEXT_PRIMARY: Color = Color::White;

pub fn accent() -> Style {
    Style::default().fg(ACCENT)
}

pub fn accent_bold() -> Style {
    accent().add_modifier(Modifier::BOLD)
}

pub fn positive() -> Style {
    Style::default().fg(POSITIVE)
}

pub fn negative() -> Style {
    Style::default().fg(NEGATIVE)
}

pub fn warning() -> Style {
    Style::default().fg(WARNING)
}

pub fn warning_bold() -> Style {
    warning().add_modifier(Modifier::BOLD)
}

pub fn neutral() -> Style {
    Style::default().fg(NEUTRAL)
}

pub fn muted() -> Style {
    Style::default().fg(MUTED)
}

pub fn text() -> Style {
    Style::default().fg(TEXT_PRIMARY)
}

pub fn panel_border(active: bool) -> Style {
    if active {
        accent()
    } else {
        muted()
    }
}

pub fn panel_title(active: bool) -> Style {
    if active {
        accent_bold()
    } else {
        muted()
    }
}

/// Submit button: reversed when focused, dimmed while a request runs.
pub fn button(focused: bool, disabled: bool) -> Style {
    let base = if disabled {
        muted()
    } else {
        Style::default().fg(BACKGROUND).bg(ACCENT)
    };
    if focused {
        base.add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
    } else {
        base
    }
}

/// Color of the value after "API health:".
pub fn health(status: &HealthStatus) -> Style {
    match status {
        HealthStatus::Pending => muted(),
        HealthStatus::Reported(s) if s.eq_ignore_ascii_case("ok") => positive(),
        HealthStatus::Reported(_) => warning(),
        HealthStatus::Unreachable(_) => negative(),
    }
}
