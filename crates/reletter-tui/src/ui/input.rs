//! Keyboard input handling for the TUI.
//!
//! This module handles all keyboard events and translates them into
//! application state changes.

use crossterm::event::{KeyCode, KeyEvent};
use reletter_core::View;

use crate::app::{App, AppState, LoginFocus};

/// Handle keyboard input. Returns true if the app should quit.
pub fn handle_input(app: &mut App, key: KeyEvent) -> bool {
    // A notice blocks everything until it is dismissed
    if matches!(app.state, AppState::ShowingNotice) {
        if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
            app.dismiss_notice();
        }
        return false;
    }

    match app.view {
        View::Login => handle_login_input(app, key),
        View::Home => handle_home_input(app, key),
        View::Signup => handle_signup_input(app, key),
        View::Main => handle_main_input(app, key),
    }

    matches!(app.state, AppState::Quitting)
}

fn handle_login_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            // Quit if on login screen
            app.quit();
        }
        KeyCode::Down | KeyCode::Tab => {
            app.login_focus = app.login_focus.next();
        }
        KeyCode::Up | KeyCode::BackTab => {
            app.login_focus = app.login_focus.prev();
        }
        KeyCode::Enter => match app.login_focus {
            LoginFocus::Email | LoginFocus::Password => {
                app.login_focus = app.login_focus.next();
            }
            LoginFocus::Submit => app.submit(),
            LoginFocus::Return => app.go_home(),
            LoginFocus::Signup => app.go_signup(),
        },
        KeyCode::Backspace => {
            if let Some(field) = app.login_focus.field() {
                app.form.pop_char(field);
            }
        }
        KeyCode::Char(c) => {
            // Ignore character input on buttons
            if let Some(field) = app.login_focus.field() {
                app.form.push_char(field, c);
            }
        }
        _ => {}
    }
}

fn handle_home_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('l') | KeyCode::Enter => app.open_login(),
        KeyCode::Char('s') => app.go_signup(),
        KeyCode::Char('q') | KeyCode::Esc => app.quit(),
        _ => {}
    }
}

fn handle_signup_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('l') => app.open_login(),
        KeyCode::Char('q') => app.quit(),
        _ => {}
    }
}

fn handle_main_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.go_home(),
        KeyCode::Char('q') => app.quit(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crossterm::event::KeyModifiers;
    use reletter_core::{AuthClient, Field, MemoryStore};

    use super::*;

    fn app() -> App {
        let api = AuthClient::new("http://127.0.0.1:9").unwrap();
        App::with_services(api, Arc::new(MemoryStore::new()))
    }

    fn press(app: &mut App, code: KeyCode) -> bool {
        handle_input(app, KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_typing_fills_focused_field() {
        let mut app = app();
        type_str(&mut app, "user@example.com");
        press(&mut app, KeyCode::Tab);
        type_str(&mut app, "secret");

        assert_eq!(app.form.email(), "user@example.com");
        assert_eq!(app.form.password(), "secret");
        assert!(app.can_submit());
    }

    #[test]
    fn test_letters_are_typed_not_shortcuts_on_login() {
        let mut app = app();
        let quit = press(&mut app, KeyCode::Char('q'));
        assert!(!quit);
        assert_eq!(app.form.email(), "q");
        assert_eq!(app.view, View::Login);
    }

    #[test]
    fn test_backspace_revalidates() {
        let mut app = app();
        press(&mut app, KeyCode::Tab);
        type_str(&mut app, "x");
        press(&mut app, KeyCode::Backspace);

        assert_eq!(app.form.password(), "");
        assert_eq!(
            app.form.error(Field::Password),
            Some("Password is required.")
        );
        assert!(!app.can_submit());
    }

    #[test]
    fn test_enter_on_invalid_submit_does_nothing() {
        let mut app = app();
        type_str(&mut app, "bad-email");
        app.login_focus = LoginFocus::Submit;

        let quit = press(&mut app, KeyCode::Enter);

        assert!(!quit);
        assert_eq!(app.view, View::Login);
        assert!(app.notice().is_none());
    }

    #[test]
    fn test_enter_on_fields_advances_focus() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.login_focus, LoginFocus::Password);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.login_focus, LoginFocus::Submit);
    }

    #[test]
    fn test_return_button_goes_home() {
        let mut app = app();
        app.login_focus = LoginFocus::Return;
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.view, View::Home);
    }

    #[test]
    fn test_signup_link_goes_to_signup_and_back() {
        let mut app = app();
        app.login_focus = LoginFocus::Signup;
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.view, View::Signup);

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.view, View::Login);
    }

    #[test]
    fn test_home_shortcuts() {
        let mut app = app();
        app.go_home();
        press(&mut app, KeyCode::Char('s'));
        assert_eq!(app.view, View::Signup);

        app.go_home();
        press(&mut app, KeyCode::Char('l'));
        assert_eq!(app.view, View::Login);

        app.go_home();
        assert!(press(&mut app, KeyCode::Char('q')));
    }

    #[test]
    fn test_esc_on_login_quits() {
        let mut app = app();
        assert!(press(&mut app, KeyCode::Esc));
        assert_eq!(app.state, AppState::Quitting);
    }

    #[test]
    fn test_notice_blocks_input_until_dismissed() {
        let mut app = app();
        app.show_notice("Login failed.");

        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.form.email(), "");
        assert!(app.notice().is_some());

        press(&mut app, KeyCode::Enter);
        assert!(app.notice().is_none());
        assert_eq!(app.state, AppState::Normal);

        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.form.email(), "a");
    }

    #[test]
    fn test_queued_notices_are_dismissed_one_at_a_time() {
        let mut app = app();
        app.show_notice("Invalid credentials");
        app.show_notice("Login successful!");

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.notice(), Some("Login successful!"));
        assert_eq!(app.state, AppState::ShowingNotice);

        press(&mut app, KeyCode::Esc);
        assert!(app.notice().is_none());
        assert_eq!(app.state, AppState::Normal);
    }
}
