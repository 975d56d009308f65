//! TUI application state
//!
//! All mutable dashboard state lives here: the latest server snapshot, the
//! registry search results, the live filter, dialog input modes, toasts,
//! and the refresh guard. Methods are pure state transitions returning
//! [`AppAction`] values for the runner to execute; nothing in this module
//! touches the network or the terminal.

use api::{RegistryServer, ServerInfo};
use std::time::{Duration, Instant};

use crate::settings::UiSettings;

/// Pane focus in the two-pane layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivePane {
    /// Running servers (left)
    Servers,
    /// Registry search (right)
    Registry,
}

/// Field focus inside the settings dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsField {
    AuthToken,
    RefreshInterval,
    AutoRefresh,
}

impl SettingsField {
    pub fn next(self) -> Self {
        match self {
            Self::AuthToken => Self::RefreshInterval,
            Self::RefreshInterval => Self::AutoRefresh,
            Self::AutoRefresh => Self::AuthToken,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::AuthToken => Self::AutoRefresh,
            Self::RefreshInterval => Self::AuthToken,
            Self::AutoRefresh => Self::RefreshInterval,
        }
    }
}

/// Output of an ad-hoc command, shown inside the new-server dialog
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub text: String,
    pub success: bool,
}

/// Input mode for the application
#[derive(Debug, Clone, PartialEq)]
pub enum InputMode {
    /// Normal navigation mode
    Normal,
    /// Live-editing the server card filter
    Filter,
    /// Registry search dialog
    Search { input: String },
    /// New-server command dialog, with the last command's output
    NewServer { input: String },
    /// Settings form
    Settings {
        token: String,
        interval: String,
        auto_refresh: bool,
        field: SettingsField,
    },
    /// Stop confirmation for the named server
    ConfirmStop { name: String },
    /// Help overlay
    Help,
    /// Confirm quit dialog
    ConfirmQuit,
}

/// Toast severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastType {
    Info,
    Success,
    Warning,
    Error,
}

/// A transient notification rendered in the corner of the screen
#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub toast_type: ToastType,
    pub created: Instant,
}

/// User action to be processed by the main loop
#[derive(Debug, Clone)]
pub enum AppAction {
    /// No action
    None,
    /// Quit the application
    Quit,
    /// Fetch the server list
    Refresh,
    /// Stop the named server
    StopServer(String),
    /// Search the registry
    Search(String),
    /// Start a server from the registry by name
    RunFromRegistry(String),
    /// Run an ad-hoc backend command
    RunCommand(String),
    /// Persist and apply the settings form
    ApplySettings(UiSettings),
    /// Pause or resume auto-refresh
    ToggleAutoRefresh,
}

/// Main application state
pub struct App {
    /// Backend base URL, shown in the status bar
    pub backend: String,
    /// Persisted user preferences (interval, auto-refresh, token)
    pub settings: UiSettings,
    /// Most recently fetched server snapshot
    pub servers: Vec<ServerInfo>,
    /// Inline error shown in place of the server list
    pub list_error: Option<String>,
    /// Latest registry search results
    pub registry_results: Vec<RegistryServer>,
    /// Last submitted search query
    pub search_query: String,
    /// Whether a search has run since the results were last cleared
    pub has_searched: bool,
    /// Live substring filter over the rendered server cards
    pub filter: String,
    pub active_pane: ActivePane,
    pub selected_server: usize,
    pub selected_registry: usize,
    /// In-flight guard: a refresh started while set is skipped
    pub is_refreshing: bool,
    /// Label of the blocking operation in progress, if any
    pub busy: Option<String>,
    /// Last command output, shown in the new-server dialog
    pub command_output: Option<CommandOutput>,
    pub input_mode: InputMode,
    pub toasts: Vec<Toast>,
    pub should_quit: bool,
}

impl App {
    pub fn new(settings: UiSettings) -> Self {
        Self {
            backend: String::new(),
            settings,
            servers: Vec::new(),
            list_error: None,
            registry_results: Vec::new(),
            search_query: String::new(),
            has_searched: false,
            filter: String::new(),
            active_pane: ActivePane::Servers,
            selected_server: 0,
            selected_registry: 0,
            is_refreshing: false,
            busy: None,
            command_output: None,
            input_mode: InputMode::Normal,
            toasts: Vec::new(),
            should_quit: false,
        }
    }

    // ------------------------------------------------------------------
    // Refresh guard and server snapshot

    /// Try to begin a refresh. Returns false (and does nothing) when one
    /// is already in flight or a blocking operation holds the busy flag.
    pub fn begin_refresh(&mut self) -> bool {
        if self.is_refreshing || self.busy.is_some() {
            return false;
        }
        self.is_refreshing = true;
        true
    }

    /// Replace the snapshot after a successful fetch
    pub fn refresh_succeeded(&mut self, servers: Vec<ServerInfo>) {
        self.is_refreshing = false;
        self.list_error = None;
        self.servers = servers;
        self.clamp_selection();
    }

    /// Record a failed fetch as an inline error
    pub fn refresh_failed(&mut self, error: String) {
        self.is_refreshing = false;
        self.list_error = Some(error);
    }

    pub fn set_busy(&mut self, label: impl Into<String>) {
        self.busy = Some(label.into());
    }

    pub fn clear_busy(&mut self) {
        self.busy = None;
    }

    // ------------------------------------------------------------------
    // Filtering

    /// Searchable text of a server card, mirroring its rendered content
    pub fn card_text(server: &ServerInfo) -> String {
        let port = if server.port > 0 {
            server.port.to_string()
        } else {
            "N/A".to_string()
        };
        let url = if server.url.is_empty() {
            "N/A"
        } else {
            &server.url
        };
        format!(
            "{} {} State: {} Transport: {} Port: {} URL: {} {}",
            display_or(&server.name, "Unnamed Server"),
            display_or(&server.image, "No image"),
            display_or(&server.state, "unknown"),
            display_or(&server.transport, "unknown"),
            port,
            url,
            server.tool_type.as_deref().unwrap_or_default(),
        )
    }

    /// Servers passing the live filter, in snapshot order
    pub fn visible_servers(&self) -> Vec<&ServerInfo> {
        if self.filter.is_empty() {
            return self.servers.iter().collect();
        }
        let needle = self.filter.to_lowercase();
        self.servers
            .iter()
            .filter(|s| Self::card_text(s).to_lowercase().contains(&needle))
            .collect()
    }

    fn clamp_selection(&mut self) {
        let visible = self.visible_servers().len();
        if self.selected_server >= visible {
            self.selected_server = visible.saturating_sub(1);
        }
        if self.selected_registry >= self.registry_results.len() {
            self.selected_registry = self.registry_results.len().saturating_sub(1);
        }
    }

    // ------------------------------------------------------------------
    // Navigation

    pub fn toggle_pane(&mut self) {
        self.active_pane = match self.active_pane {
            ActivePane::Servers => ActivePane::Registry,
            ActivePane::Registry => ActivePane::Servers,
        };
    }

    pub fn navigate_up(&mut self) {
        match self.active_pane {
            ActivePane::Servers => {
                self.selected_server = self.selected_server.saturating_sub(1);
            }
            ActivePane::Registry => {
                self.selected_registry = self.selected_registry.saturating_sub(1);
            }
        }
    }

    pub fn navigate_down(&mut self) {
        match self.active_pane {
            ActivePane::Servers => {
                let len = self.visible_servers().len();
                if len > 0 && self.selected_server < len - 1 {
                    self.selected_server += 1;
                }
            }
            ActivePane::Registry => {
                let len = self.registry_results.len();
                if len > 0 && self.selected_registry < len - 1 {
                    self.selected_registry += 1;
                }
            }
        }
    }

    /// Currently selected server, honoring the filter
    pub fn selected_server(&self) -> Option<&ServerInfo> {
        self.visible_servers().get(self.selected_server).copied()
    }

    pub fn selected_registry_entry(&self) -> Option<&RegistryServer> {
        self.registry_results.get(self.selected_registry)
    }

    /// Enter on the registry pane runs the selected entry
    pub fn handle_enter(&mut self) -> AppAction {
        match self.active_pane {
            ActivePane::Servers => AppAction::None,
            ActivePane::Registry => match self.selected_registry_entry() {
                Some(entry) => AppAction::RunFromRegistry(entry.name.clone()),
                None => AppAction::None,
            },
        }
    }

    // ------------------------------------------------------------------
    // Stop flow

    /// Ask for confirmation before stopping the selected server
    pub fn request_stop(&mut self) {
        let Some(name) = self.selected_server().map(|s| s.name.clone()) else {
            return;
        };
        self.input_mode = InputMode::ConfirmStop { name };
    }

    pub fn confirm_stop(&mut self) -> AppAction {
        if let InputMode::ConfirmStop { name } = &self.input_mode {
            let name = name.clone();
            self.input_mode = InputMode::Normal;
            return AppAction::StopServer(name);
        }
        AppAction::None
    }

    // ------------------------------------------------------------------
    // Registry search

    pub fn start_search(&mut self) {
        self.active_pane = ActivePane::Registry;
        self.input_mode = InputMode::Search {
            input: self.search_query.clone(),
        };
    }

    /// Submit the search dialog. Empty or whitespace-only queries are
    /// rejected with a warning toast and no network call.
    pub fn confirm_search(&mut self) -> AppAction {
        if let InputMode::Search { input } = &self.input_mode {
            let query = input.trim().to_string();
            self.input_mode = InputMode::Normal;
            if query.is_empty() {
                self.push_toast(ToastType::Warning, "Please enter a search query");
                return AppAction::None;
            }
            self.search_query = query.clone();
            return AppAction::Search(query);
        }
        AppAction::None
    }

    pub fn set_search_results(&mut self, results: Vec<RegistryServer>) {
        self.registry_results = results;
        self.has_searched = true;
        self.selected_registry = 0;
    }

    /// A registry run succeeded: clear the query and the result list
    pub fn registry_run_succeeded(&mut self) {
        self.search_query.clear();
        self.registry_results.clear();
        self.has_searched = false;
        self.selected_registry = 0;
    }

    // ------------------------------------------------------------------
    // New-server command dialog

    pub fn start_new_server(&mut self) {
        self.command_output = None;
        self.input_mode = InputMode::NewServer {
            input: String::new(),
        };
    }

    /// Submit the command dialog; blank commands are ignored
    pub fn confirm_new_server(&mut self) -> AppAction {
        if let InputMode::NewServer { input } = &self.input_mode {
            let command = input.trim().to_string();
            if command.is_empty() {
                return AppAction::None;
            }
            return AppAction::RunCommand(command);
        }
        AppAction::None
    }

    /// Record command output; the dialog stays open to show it
    pub fn set_command_output(&mut self, text: String, success: bool) {
        self.command_output = Some(CommandOutput { text, success });
    }

    pub fn close_new_server(&mut self) {
        self.command_output = None;
        self.input_mode = InputMode::Normal;
    }

    // ------------------------------------------------------------------
    // Settings

    pub fn open_settings(&mut self) {
        self.input_mode = InputMode::Settings {
            token: self.settings.auth_token.clone(),
            interval: self.settings.refresh_interval.clone(),
            auto_refresh: self.settings.is_auto_refresh_enabled,
            field: SettingsField::AuthToken,
        };
    }

    /// Submit the settings form, producing the record to persist
    pub fn confirm_settings(&mut self) -> AppAction {
        if let InputMode::Settings {
            token,
            interval,
            auto_refresh,
            ..
        } = &self.input_mode
        {
            let settings = UiSettings {
                refresh_interval: if interval.trim().is_empty() {
                    crate::settings::DEFAULT_REFRESH_SECS.to_string()
                } else {
                    interval.trim().to_string()
                },
                is_auto_refresh_enabled: *auto_refresh,
                auth_token: token.clone(),
            };
            self.input_mode = InputMode::Normal;
            return AppAction::ApplySettings(settings);
        }
        AppAction::None
    }

    /// 401 handling: forget the stored token and reopen the settings form
    pub fn auth_required(&mut self) {
        self.settings.auth_token.clear();
        self.push_toast(
            ToastType::Error,
            "Authentication required. Please enter a valid token.",
        );
        self.open_settings();
    }

    pub fn toggle_auto_refresh(&mut self) {
        self.settings.is_auto_refresh_enabled = !self.settings.is_auto_refresh_enabled;
    }

    // ------------------------------------------------------------------
    // Dialog plumbing

    pub fn cancel_input(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn show_help(&mut self) {
        self.input_mode = InputMode::Help;
    }

    pub fn show_quit_confirm(&mut self) {
        self.input_mode = InputMode::ConfirmQuit;
    }

    pub fn confirm_quit(&mut self) {
        self.should_quit = true;
    }

    // ------------------------------------------------------------------
    // Toasts

    pub fn push_toast(&mut self, toast_type: ToastType, message: impl Into<String>) {
        self.toasts.push(Toast {
            message: message.into(),
            toast_type,
            created: Instant::now(),
        });
    }

    /// Drop toasts older than `ttl`
    pub fn prune_toasts(&mut self, ttl: Duration) {
        self.toasts.retain(|t| t.created.elapsed() < ttl);
    }
}

fn display_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() { fallback } else { value }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::test_utils::{mock_registry_server, mock_server_info, mock_sparse_server_info};

    fn app() -> App {
        App::new(UiSettings::default())
    }

    #[test]
    fn test_refresh_guard_skips_overlapping_refresh() {
        let mut app = app();

        assert!(app.begin_refresh());
        // Second refresh while one is in flight is a no-op
        assert!(!app.begin_refresh());

        app.refresh_succeeded(vec![mock_server_info("fetch")]);
        assert!(app.begin_refresh());
    }

    #[test]
    fn test_busy_flag_also_blocks_refresh() {
        let mut app = app();
        app.set_busy("Stopping server...");
        assert!(!app.begin_refresh());

        app.clear_busy();
        assert!(app.begin_refresh());
    }

    #[test]
    fn test_refresh_failure_keeps_previous_snapshot() {
        let mut app = app();
        app.begin_refresh();
        app.refresh_succeeded(vec![mock_server_info("fetch")]);

        app.begin_refresh();
        app.refresh_failed("connection refused".to_string());

        assert_eq!(app.servers.len(), 1);
        assert_eq!(app.list_error.as_deref(), Some("connection refused"));

        // The next successful refresh clears the inline error
        app.begin_refresh();
        app.refresh_succeeded(vec![]);
        assert!(app.list_error.is_none());
    }

    #[test]
    fn test_filter_matches_card_text_case_insensitively() {
        let mut app = app();
        app.refresh_succeeded(vec![
            mock_server_info("fetch"),
            mock_server_info("github"),
        ]);

        app.filter = "GITHUB".to_string();
        let visible = app.visible_servers();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].name, "github");

        // Matches any part of the card, not just the name
        app.filter = "running".to_string();
        assert_eq!(app.visible_servers().len(), 2);

        app.filter.clear();
        assert_eq!(app.visible_servers().len(), 2);
    }

    #[test]
    fn test_card_text_fallbacks() {
        let text = App::card_text(&mock_sparse_server_info("bare"));
        assert!(text.contains("bare"));
        assert!(text.contains("No image"));
        assert!(text.contains("State: unknown"));
        assert!(text.contains("Port: N/A"));
        assert!(text.contains("URL: N/A"));
    }

    #[test]
    fn test_navigation_clamps_to_visible_list() {
        let mut app = app();
        app.refresh_succeeded(vec![
            mock_server_info("a"),
            mock_server_info("b"),
            mock_server_info("c"),
        ]);

        app.navigate_down();
        app.navigate_down();
        assert_eq!(app.selected_server, 2);
        app.navigate_down();
        assert_eq!(app.selected_server, 2);

        app.navigate_up();
        assert_eq!(app.selected_server, 1);
    }

    #[test]
    fn test_selection_clamped_after_shrinking_snapshot() {
        let mut app = app();
        app.refresh_succeeded(vec![
            mock_server_info("a"),
            mock_server_info("b"),
            mock_server_info("c"),
        ]);
        app.selected_server = 2;

        app.begin_refresh();
        app.refresh_succeeded(vec![mock_server_info("a")]);
        assert_eq!(app.selected_server, 0);
    }

    #[test]
    fn test_empty_search_query_rejected_without_action() {
        let mut app = app();
        app.start_search();
        if let InputMode::Search { input } = &mut app.input_mode {
            *input = "   ".to_string();
        }

        let action = app.confirm_search();
        assert!(matches!(action, AppAction::None));
        assert_eq!(app.toasts.len(), 1);
        assert_eq!(app.toasts[0].toast_type, ToastType::Warning);
    }

    #[test]
    fn test_search_submits_trimmed_query() {
        let mut app = app();
        app.start_search();
        if let InputMode::Search { input } = &mut app.input_mode {
            *input = "  github  ".to_string();
        }

        let action = app.confirm_search();
        match action {
            AppAction::Search(q) => assert_eq!(q, "github"),
            other => panic!("expected Search action, got {:?}", other),
        }
        assert_eq!(app.search_query, "github");
    }

    #[test]
    fn test_registry_run_clears_query_and_results() {
        let mut app = app();
        app.search_query = "github".to_string();
        app.set_search_results(vec![mock_registry_server("github")]);
        assert!(app.has_searched);

        app.registry_run_succeeded();
        assert!(app.search_query.is_empty());
        assert!(app.registry_results.is_empty());
        assert!(!app.has_searched);
    }

    #[test]
    fn test_enter_on_registry_runs_selected_entry() {
        let mut app = app();
        app.active_pane = ActivePane::Registry;
        app.set_search_results(vec![
            mock_registry_server("fetch"),
            mock_registry_server("github"),
        ]);
        app.selected_registry = 1;

        match app.handle_enter() {
            AppAction::RunFromRegistry(name) => assert_eq!(name, "github"),
            other => panic!("expected RunFromRegistry, got {:?}", other),
        }
    }

    #[test]
    fn test_stop_requires_confirmation() {
        let mut app = app();
        app.refresh_succeeded(vec![mock_server_info("fetch")]);

        app.request_stop();
        assert!(matches!(app.input_mode, InputMode::ConfirmStop { .. }));

        match app.confirm_stop() {
            AppAction::StopServer(name) => assert_eq!(name, "fetch"),
            other => panic!("expected StopServer, got {:?}", other),
        }
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn test_auth_required_clears_token_and_opens_settings() {
        let mut app = App::new(UiSettings {
            refresh_interval: "5".to_string(),
            is_auto_refresh_enabled: true,
            auth_token: "stale".to_string(),
        });

        app.auth_required();
        assert!(app.settings.auth_token.is_empty());
        assert!(matches!(app.input_mode, InputMode::Settings { .. }));
        assert!(app
            .toasts
            .iter()
            .any(|t| t.toast_type == ToastType::Error));
    }

    #[test]
    fn test_settings_form_roundtrip() {
        let mut app = app();
        app.open_settings();
        if let InputMode::Settings {
            token,
            interval,
            auto_refresh,
            ..
        } = &mut app.input_mode
        {
            *token = "abc".to_string();
            *interval = "10".to_string();
            *auto_refresh = false;
        }

        match app.confirm_settings() {
            AppAction::ApplySettings(s) => {
                assert_eq!(s.auth_token, "abc");
                assert_eq!(s.refresh_interval, "10");
                assert!(!s.is_auto_refresh_enabled);
            }
            other => panic!("expected ApplySettings, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_interval_falls_back_to_default() {
        let mut app = app();
        app.open_settings();
        if let InputMode::Settings { interval, .. } = &mut app.input_mode {
            *interval = "  ".to_string();
        }

        match app.confirm_settings() {
            AppAction::ApplySettings(s) => assert_eq!(s.refresh_interval, "5"),
            other => panic!("expected ApplySettings, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_command_ignored() {
        let mut app = app();
        app.start_new_server();
        let action = app.confirm_new_server();
        assert!(matches!(action, AppAction::None));
    }

    #[test]
    fn test_toast_pruning() {
        let mut app = app();
        app.push_toast(ToastType::Info, "hello");
        app.prune_toasts(Duration::from_secs(5));
        assert_eq!(app.toasts.len(), 1);
        app.prune_toasts(Duration::ZERO);
        assert!(app.toasts.is_empty());
    }
}
