//! TUI event handling
//!
//! Handles keyboard input using crossterm and dispatches actions to the application.

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use std::time::Duration;

use super::app::{App, AppAction, InputMode, SettingsField};

/// Event handler for TUI input
pub struct EventHandler {
    /// Tick rate for polling events
    tick_rate: Duration,
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl EventHandler {
    /// Create a new event handler
    pub fn new() -> Self {
        Self {
            tick_rate: Duration::from_millis(100),
        }
    }

    /// Create event handler with custom tick rate
    pub fn with_tick_rate(tick_rate: Duration) -> Self {
        Self { tick_rate }
    }

    /// Poll for next event
    ///
    /// Returns Some(Event) if an event occurred, None if tick timeout elapsed.
    pub fn poll(&self) -> Result<Option<Event>> {
        if event::poll(self.tick_rate)? {
            Ok(Some(event::read()?))
        } else {
            Ok(None)
        }
    }

    /// Handle a key event and return the resulting action
    pub fn handle_key(&self, app: &mut App, key: KeyEvent) -> AppAction {
        // Handle based on current input mode
        match &app.input_mode {
            InputMode::Normal => self.handle_normal_mode(app, key),
            InputMode::Filter => self.handle_filter_mode(app, key),
            InputMode::Search { .. } => self.handle_search_mode(app, key),
            InputMode::NewServer { .. } => self.handle_new_server_mode(app, key),
            InputMode::Settings { .. } => self.handle_settings_mode(app, key),
            InputMode::ConfirmStop { .. } => self.handle_confirm_stop_mode(app, key),
            InputMode::Help => self.handle_help_mode(app, key),
            InputMode::ConfirmQuit => self.handle_confirm_quit_mode(app, key),
        }
    }

    /// Handle key events in normal navigation mode
    fn handle_normal_mode(&self, app: &mut App, key: KeyEvent) -> AppAction {
        match key.code {
            // Quit
            KeyCode::Char('q') => {
                app.show_quit_confirm();
                AppAction::None
            }
            // Ctrl+C for immediate quit
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => AppAction::Quit,

            // Navigation
            KeyCode::Tab => {
                app.toggle_pane();
                AppAction::None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                app.navigate_up();
                AppAction::None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                app.navigate_down();
                AppAction::None
            }

            // Actions
            KeyCode::Enter => app.handle_enter(),
            KeyCode::Char('r') => AppAction::Refresh,
            KeyCode::Char('s') => {
                app.request_stop();
                AppAction::None
            }
            KeyCode::Char('p') => AppAction::ToggleAutoRefresh,
            KeyCode::Char('f') => {
                app.input_mode = InputMode::Filter;
                AppAction::None
            }
            KeyCode::Char('/') => {
                app.start_search();
                AppAction::None
            }
            KeyCode::Char('n') => {
                app.start_new_server();
                AppAction::None
            }
            KeyCode::Char('o') => {
                app.open_settings();
                AppAction::None
            }

            // Help
            KeyCode::Char('?') => {
                app.show_help();
                AppAction::None
            }

            _ => AppAction::None,
        }
    }

    /// Handle key events while live-editing the card filter
    fn handle_filter_mode(&self, app: &mut App, key: KeyEvent) -> AppAction {
        match key.code {
            // The filter stays applied after leaving the mode
            KeyCode::Esc | KeyCode::Enter => {
                app.cancel_input();
            }
            KeyCode::Backspace => {
                app.filter.pop();
            }
            KeyCode::Char(c) => {
                app.filter.push(c);
            }
            _ => {}
        }
        app.selected_server = 0;
        AppAction::None
    }

    /// Handle key events in the registry search dialog
    fn handle_search_mode(&self, app: &mut App, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Esc => {
                app.cancel_input();
                AppAction::None
            }
            KeyCode::Enter => app.confirm_search(),
            KeyCode::Backspace => {
                if let InputMode::Search { input } = &mut app.input_mode {
                    input.pop();
                }
                AppAction::None
            }
            KeyCode::Char(c) => {
                if let InputMode::Search { input } = &mut app.input_mode {
                    input.push(c);
                }
                AppAction::None
            }
            _ => AppAction::None,
        }
    }

    /// Handle key events in the new-server command dialog
    fn handle_new_server_mode(&self, app: &mut App, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Esc => {
                app.close_new_server();
                AppAction::None
            }
            KeyCode::Enter => app.confirm_new_server(),
            KeyCode::Backspace => {
                if let InputMode::NewServer { input } = &mut app.input_mode {
                    input.pop();
                }
                AppAction::None
            }
            KeyCode::Char(c) => {
                if let InputMode::NewServer { input } = &mut app.input_mode {
                    input.push(c);
                }
                AppAction::None
            }
            _ => AppAction::None,
        }
    }

    /// Handle key events in the settings form
    fn handle_settings_mode(&self, app: &mut App, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Esc => {
                app.cancel_input();
                AppAction::None
            }
            KeyCode::Enter => app.confirm_settings(),
            KeyCode::Tab | KeyCode::Down => {
                if let InputMode::Settings { field, .. } = &mut app.input_mode {
                    *field = field.next();
                }
                AppAction::None
            }
            KeyCode::BackTab | KeyCode::Up => {
                if let InputMode::Settings { field, .. } = &mut app.input_mode {
                    *field = field.prev();
                }
                AppAction::None
            }
            KeyCode::Backspace => {
                if let InputMode::Settings {
                    token,
                    interval,
                    field,
                    ..
                } = &mut app.input_mode
                {
                    match field {
                        SettingsField::AuthToken => {
                            token.pop();
                        }
                        SettingsField::RefreshInterval => {
                            interval.pop();
                        }
                        SettingsField::AutoRefresh => {}
                    }
                }
                AppAction::None
            }
            KeyCode::Char(c) => {
                if let InputMode::Settings {
                    token,
                    interval,
                    auto_refresh,
                    field,
                } = &mut app.input_mode
                {
                    match field {
                        SettingsField::AuthToken => token.push(c),
                        SettingsField::RefreshInterval => {
                            if c.is_ascii_digit() {
                                interval.push(c);
                            }
                        }
                        SettingsField::AutoRefresh => {
                            if c == ' ' {
                                *auto_refresh = !*auto_refresh;
                            }
                        }
                    }
                }
                AppAction::None
            }
            _ => AppAction::None,
        }
    }

    /// Handle key events in the stop confirmation dialog
    fn handle_confirm_stop_mode(&self, app: &mut App, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => app.confirm_stop(),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.cancel_input();
                AppAction::None
            }
            _ => AppAction::None,
        }
    }

    /// Handle key events in help overlay mode
    fn handle_help_mode(&self, app: &mut App, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Esc | KeyCode::Char('?') | KeyCode::Enter | KeyCode::Char('q') => {
                app.cancel_input();
                AppAction::None
            }
            _ => AppAction::None,
        }
    }

    /// Handle key events in quit confirmation mode
    fn handle_confirm_quit_mode(&self, app: &mut App, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.confirm_quit();
                AppAction::Quit
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.cancel_input();
                AppAction::None
            }
            _ => AppAction::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::UiSettings;
    use common::test_utils::{mock_registry_server, mock_server_info};

    fn app() -> App {
        App::new(UiSettings::default())
    }

    fn press(handler: &EventHandler, app: &mut App, code: KeyCode) -> AppAction {
        handler.handle_key(app, KeyEvent::new(code, KeyModifiers::empty()))
    }

    #[test]
    fn test_event_handler_creation() {
        let handler = EventHandler::new();
        assert_eq!(handler.tick_rate, Duration::from_millis(100));
    }

    #[test]
    fn test_navigation_keys() {
        let handler = EventHandler::new();
        let mut app = app();
        app.refresh_succeeded(vec![
            mock_server_info("a"),
            mock_server_info("b"),
            mock_server_info("c"),
        ]);

        let action = press(&handler, &mut app, KeyCode::Down);
        assert!(matches!(action, AppAction::None));
        assert_eq!(app.selected_server, 1);

        press(&handler, &mut app, KeyCode::Char('j'));
        assert_eq!(app.selected_server, 2);

        press(&handler, &mut app, KeyCode::Up);
        assert_eq!(app.selected_server, 1);

        press(&handler, &mut app, KeyCode::Char('k'));
        assert_eq!(app.selected_server, 0);
    }

    #[test]
    fn test_tab_toggle() {
        let handler = EventHandler::new();
        let mut app = app();

        use super::super::app::ActivePane;
        assert_eq!(app.active_pane, ActivePane::Servers);

        press(&handler, &mut app, KeyCode::Tab);
        assert_eq!(app.active_pane, ActivePane::Registry);

        press(&handler, &mut app, KeyCode::Tab);
        assert_eq!(app.active_pane, ActivePane::Servers);
    }

    #[test]
    fn test_refresh_and_pause_keys() {
        let handler = EventHandler::new();
        let mut app = app();

        let action = press(&handler, &mut app, KeyCode::Char('r'));
        assert!(matches!(action, AppAction::Refresh));

        let action = press(&handler, &mut app, KeyCode::Char('p'));
        assert!(matches!(action, AppAction::ToggleAutoRefresh));
    }

    #[test]
    fn test_stop_key_requires_confirmation() {
        let handler = EventHandler::new();
        let mut app = app();
        app.refresh_succeeded(vec![mock_server_info("fetch")]);

        press(&handler, &mut app, KeyCode::Char('s'));
        assert!(matches!(app.input_mode, InputMode::ConfirmStop { .. }));

        // 'n' cancels without an action
        let action = press(&handler, &mut app, KeyCode::Char('n'));
        assert!(matches!(action, AppAction::None));
        assert!(matches!(app.input_mode, InputMode::Normal));

        press(&handler, &mut app, KeyCode::Char('s'));
        let action = press(&handler, &mut app, KeyCode::Char('y'));
        match action {
            AppAction::StopServer(name) => assert_eq!(name, "fetch"),
            other => panic!("expected StopServer, got {:?}", other),
        }
    }

    #[test]
    fn test_filter_mode_edits_live() {
        let handler = EventHandler::new();
        let mut app = app();
        app.refresh_succeeded(vec![
            mock_server_info("fetch"),
            mock_server_info("github"),
        ]);

        press(&handler, &mut app, KeyCode::Char('f'));
        assert!(matches!(app.input_mode, InputMode::Filter));

        press(&handler, &mut app, KeyCode::Char('g'));
        press(&handler, &mut app, KeyCode::Char('i'));
        assert_eq!(app.filter, "gi");
        assert_eq!(app.visible_servers().len(), 1);

        press(&handler, &mut app, KeyCode::Backspace);
        assert_eq!(app.filter, "g");

        // Esc leaves the mode but keeps the filter applied
        press(&handler, &mut app, KeyCode::Esc);
        assert!(matches!(app.input_mode, InputMode::Normal));
        assert_eq!(app.filter, "g");
    }

    #[test]
    fn test_search_dialog_typing_and_submit() {
        let handler = EventHandler::new();
        let mut app = app();

        press(&handler, &mut app, KeyCode::Char('/'));
        assert!(matches!(app.input_mode, InputMode::Search { .. }));

        for c in "github".chars() {
            press(&handler, &mut app, KeyCode::Char(c));
        }
        let action = press(&handler, &mut app, KeyCode::Enter);
        match action {
            AppAction::Search(q) => assert_eq!(q, "github"),
            other => panic!("expected Search, got {:?}", other),
        }
    }

    #[test]
    fn test_enter_runs_selected_registry_entry() {
        let handler = EventHandler::new();
        let mut app = app();
        app.active_pane = super::super::app::ActivePane::Registry;
        app.set_search_results(vec![mock_registry_server("fetch")]);

        let action = press(&handler, &mut app, KeyCode::Enter);
        match action {
            AppAction::RunFromRegistry(name) => assert_eq!(name, "fetch"),
            other => panic!("expected RunFromRegistry, got {:?}", other),
        }
    }

    #[test]
    fn test_settings_field_cycling_and_toggle() {
        let handler = EventHandler::new();
        let mut app = app();

        press(&handler, &mut app, KeyCode::Char('o'));
        assert!(matches!(app.input_mode, InputMode::Settings { .. }));

        // Token field accepts arbitrary characters
        press(&handler, &mut app, KeyCode::Char('a'));
        press(&handler, &mut app, KeyCode::Char('1'));

        // Interval field accepts digits only
        press(&handler, &mut app, KeyCode::Tab);
        press(&handler, &mut app, KeyCode::Char('x'));
        press(&handler, &mut app, KeyCode::Char('9'));

        // Space toggles auto-refresh
        press(&handler, &mut app, KeyCode::Tab);
        press(&handler, &mut app, KeyCode::Char(' '));

        let action = press(&handler, &mut app, KeyCode::Enter);
        match action {
            AppAction::ApplySettings(s) => {
                assert_eq!(s.auth_token, "a1");
                assert_eq!(s.refresh_interval, "59");
                assert!(!s.is_auto_refresh_enabled);
            }
            other => panic!("expected ApplySettings, got {:?}", other),
        }
    }

    #[test]
    fn test_new_server_dialog() {
        let handler = EventHandler::new();
        let mut app = app();

        press(&handler, &mut app, KeyCode::Char('n'));
        assert!(matches!(app.input_mode, InputMode::NewServer { .. }));

        for c in "thv run fetch".chars() {
            press(&handler, &mut app, KeyCode::Char(c));
        }
        let action = press(&handler, &mut app, KeyCode::Enter);
        match action {
            AppAction::RunCommand(cmd) => assert_eq!(cmd, "thv run fetch"),
            other => panic!("expected RunCommand, got {:?}", other),
        }

        press(&handler, &mut app, KeyCode::Esc);
        assert!(matches!(app.input_mode, InputMode::Normal));
    }

    #[test]
    fn test_help_mode() {
        let handler = EventHandler::new();
        let mut app = app();

        press(&handler, &mut app, KeyCode::Char('?'));
        assert!(matches!(app.input_mode, InputMode::Help));

        press(&handler, &mut app, KeyCode::Char('?'));
        assert!(matches!(app.input_mode, InputMode::Normal));
    }

    #[test]
    fn test_quit_confirmation() {
        let handler = EventHandler::new();
        let mut app = app();

        press(&handler, &mut app, KeyCode::Char('q'));
        assert!(matches!(app.input_mode, InputMode::ConfirmQuit));

        press(&handler, &mut app, KeyCode::Char('n'));
        assert!(matches!(app.input_mode, InputMode::Normal));
        assert!(!app.should_quit);

        press(&handler, &mut app, KeyCode::Char('q'));
        let action = press(&handler, &mut app, KeyCode::Char('y'));
        assert!(matches!(action, AppAction::Quit));
        assert!(app.should_quit);
    }

    #[test]
    fn test_ctrl_c_immediate_quit() {
        let handler = EventHandler::new();
        let mut app = app();

        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        let action = handler.handle_key(&mut app, key);
        assert!(matches!(action, AppAction::Quit));
    }
}
