//! Keyboard input dispatch: quit keys → overlays → global keys → form editing.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{AppState, Focus, Overlay};

/// Longest text a date input accepts (`YYYY-MM-DD`).
const DATE_INPUT_LEN: usize = 10;

const PAGE: i32 = 10;

/// Handle a key event.
pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    // Only handle key press events (Windows sends both Press and Release).
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.running = false;
        return;
    }

    // 1. Overlays consume input first.
    match app.overlay {
        Overlay::Help => {
            if matches!(key.code, KeyCode::Esc | KeyCode::F(1) | KeyCode::Enter) {
                app.overlay = Overlay::None;
            }
            return;
        }
        Overlay::ErrorHistory => {
            handle_error_overlay(app, key);
            return;
        }
        Overlay::None => {}
    }

    // 2. Global keys.
    match key.code {
        KeyCode::Esc => {
            app.running = false;
            return;
        }
        KeyCode::F(1) => {
            app.overlay = Overlay::Help;
            return;
        }
        KeyCode::F(2) => {
            app.overlay = Overlay::ErrorHistory;
            app.error_scroll = 0;
            return;
        }
        KeyCode::Tab => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.focus = app.focus.prev();
            } else {
                app.focus = app.focus.next();
            }
            return;
        }
        KeyCode::BackTab => {
            app.focus = app.focus.prev();
            return;
        }
        KeyCode::Enter => {
            app.submit();
            return;
        }
        KeyCode::Up => {
            app.scroll_results(-1);
            return;
        }
        KeyCode::Down => {
            app.scroll_results(1);
            return;
        }
        KeyCode::PageUp => {
            app.scroll_results(-PAGE);
            return;
        }
        KeyCode::PageDown => {
            app.scroll_results(PAGE);
            return;
        }
        _ => {}
    }

    // 3. Focused control.
    if app.focus == Focus::Submit {
        if key.code == KeyCode::Char(' ') {
            app.submit();
        }
        return;
    }
    edit_field(app, key);
}

fn edit_field(app: &mut AppState, key: KeyEvent) {
    let is_date = app.focus.is_date();
    let Some(field) = app.focused_field_mut() else {
        return;
    };

    match key.code {
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => field.clear(),
        KeyCode::Backspace => {
            field.pop();
        }
        KeyCode::Char(_) if key.modifiers.contains(KeyModifiers::CONTROL) => {}
        KeyCode::Char(c) if is_date => {
            if (c.is_ascii_digit() || c == '-') && field.len() < DATE_INPUT_LEN {
                field.push(c);
            }
        }
        KeyCode::Char(c) => field.push(c),
        _ => {}
    }
}

fn handle_error_overlay(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::F(2) => {
            app.overlay = Overlay::None;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            if app.error_scroll + 1 < app.error_history.len() {
                app.error_scroll += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.error_scroll = app.error_scroll.saturating_sub(1);
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    use crate::worker::WorkerCommand;

    fn new_app() -> (AppState, mpsc::Receiver<WorkerCommand>) {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (_resp_tx, resp_rx) = mpsc::channel();
        (AppState::new(cmd_tx, resp_rx, "http://localhost:8000"), cmd_rx)
    }

    fn press(app: &mut AppState, code: KeyCode) {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_text(app: &mut AppState, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn typing_fills_focused_field() {
        let (mut app, _rx) = new_app();
        type_text(&mut app, "2024-01-01");
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "AAPL, TSLA");

        assert_eq!(app.form.from_date, "2024-01-01");
        assert_eq!(app.form.to_date, "");
        assert_eq!(app.form.symbols, "AAPL, TSLA");
    }

    #[test]
    fn date_fields_reject_letters_and_overflow() {
        let (mut app, _rx) = new_app();
        type_text(&mut app, "2024x-01-01999");
        assert_eq!(app.form.from_date, "2024-01-01");
    }

    #[test]
    fn backspace_and_clear() {
        let (mut app, _rx) = new_app();
        app.focus = Focus::Symbols;
        type_text(&mut app, "SPY");
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.form.symbols, "SP");

        handle_key(&mut app, KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL));
        assert!(app.form.symbols.is_empty());
    }

    #[test]
    fn enter_submits_from_any_field() {
        let (mut app, rx) = new_app();
        type_text(&mut app, "2024-01-01");
        app.focus = Focus::Symbols;
        type_text(&mut app, "SPY");
        press(&mut app, KeyCode::Enter);

        assert!(app.view.is_loading());
        assert!(rx.try_recv().is_ok());
    }

    #[test]
    fn space_on_button_submits() {
        let (mut app, rx) = new_app();
        app.form.from_date = "2024-01-01".into();
        app.form.symbols = "SPY".into();
        app.focus = Focus::Submit;
        press(&mut app, KeyCode::Char(' '));
        assert!(rx.try_recv().is_ok());
    }

    #[test]
    fn shift_tab_moves_back() {
        let (mut app, _rx) = new_app();
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.focus, Focus::Submit);
    }

    #[test]
    fn overlays_open_and_close() {
        let (mut app, _rx) = new_app();
        press(&mut app, KeyCode::F(1));
        assert_eq!(app.overlay, Overlay::Help);
        // Typing while the overlay is up does not reach the form.
        press(&mut app, KeyCode::Char('1'));
        assert!(app.form.from_date.is_empty());
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.overlay, Overlay::None);
        assert!(app.running);

        press(&mut app, KeyCode::F(2));
        assert_eq!(app.overlay, Overlay::ErrorHistory);
        press(&mut app, KeyCode::F(2));
        assert_eq!(app.overlay, Overlay::None);
    }

    #[test]
    fn esc_and_ctrl_c_quit() {
        let (mut app, _rx) = new_app();
        press(&mut app, KeyCode::Esc);
        assert!(!app.running);

        let (mut app, _rx) = new_app();
        handle_key(&mut app, KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(!app.running);
    }

    #[test]
    fn release_events_are_ignored() {
        let (mut app, _rx) = new_app();
        let mut key = KeyEvent::new(KeyCode::Char('2'), KeyModifiers::NONE);
        key.kind = KeyEventKind::Release;
        handle_key(&mut app, key);
        assert!(app.form.from_date.is_empty());
    }
}
