//! Terminal User Interface
//!
//! Provides an interactive dashboard for managed MCP servers.
//!
//! # Layout
//!
//! The TUI is organized in three main sections:
//! - **Top Panel**: Status bar with server count, refresh state, and the
//!   current busy indicator
//! - **Center Panel**: Two-pane view with running servers (left) and
//!   registry search results (right)
//! - **Bottom Panel**: Help bar with context-sensitive keybindings
//!
//! # Keybindings
//!
//! - `Tab`: Switch between server and registry pane
//! - `j/k` or arrow keys: Navigate lists
//! - `s`: Stop selected server (with confirmation)
//! - `r`: Refresh now
//! - `p`: Pause/resume auto-refresh
//! - `f`: Filter server cards
//! - `/`: Search the registry
//! - `n`: Run a new server command
//! - `o`: Settings
//! - `q`: Quit (with confirmation)
//! - `?`: Show help

pub mod app;
pub mod events;
pub mod ui;

use anyhow::{Context, Result};
use crossterm::{
    event::Event,
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Stdout};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{info, warn};

use api::{ApiClient, ApiError, RegistryServer, ServerInfo};

use crate::refresh::RefreshTimer;
use crate::settings::UiSettings;

pub use app::{App, AppAction, InputMode, ToastType};
pub use events::EventHandler;

/// How long a toast stays on screen
const TOAST_TTL: Duration = Duration::from_secs(4);

/// Messages sent from async tasks to the TUI
#[derive(Debug, Clone)]
pub enum TuiMessage {
    /// Auto-refresh timer fired
    Tick,
    /// Server list fetched
    ServersLoaded(Vec<ServerInfo>),
    /// Server list fetch failed
    ServersFailed(ApiError),
    /// Registry search completed
    SearchResults(Vec<RegistryServer>),
    /// Registry search failed
    SearchFailed(ApiError),
    /// Server stopped; carries the backend's message
    ServerStopped(String),
    /// Stop request failed
    StopFailed(ApiError),
    /// Registry server started; carries the server name
    RegistryRunStarted(String),
    /// Registry run failed
    RegistryRunFailed(ApiError),
    /// Ad-hoc command finished with output
    CommandOutput(String),
    /// Ad-hoc command failed
    CommandFailed(ApiError),
}

/// TUI runner that manages the terminal and event loop
pub struct TuiRunner {
    /// Terminal instance
    terminal: Terminal<CrosstermBackend<Stdout>>,
    /// Application state
    app: App,
    /// Event handler
    event_handler: EventHandler,
    /// Backend API client
    client: Arc<ApiClient>,
    /// Where the UI settings are persisted
    settings_path: PathBuf,
    /// Auto-refresh timer feeding Tick messages into the channel
    refresh_timer: RefreshTimer<TuiMessage>,
    /// Channel for receiving messages from async tasks
    message_rx: mpsc::Receiver<TuiMessage>,
    /// Channel for sending messages from async tasks
    message_tx: mpsc::Sender<TuiMessage>,
}

impl TuiRunner {
    /// Create a new TUI runner
    pub fn new(
        client: Arc<ApiClient>,
        settings: UiSettings,
        settings_path: PathBuf,
    ) -> Result<Self> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend).context("Failed to create terminal")?;

        // Create message channel
        let (message_tx, message_rx) = mpsc::channel(100);

        let refresh_timer = RefreshTimer::new(message_tx.clone(), TuiMessage::Tick);
        let mut app = App::new(settings);
        app.backend = client.base_url().to_string();

        Ok(Self {
            terminal,
            app,
            event_handler: EventHandler::new(),
            client,
            settings_path,
            refresh_timer,
            message_rx,
            message_tx,
        })
    }

    /// Get a clone of the message sender for async tasks
    pub fn message_sender(&self) -> mpsc::Sender<TuiMessage> {
        self.message_tx.clone()
    }

    /// Run the TUI main loop
    pub async fn run(&mut self) -> Result<()> {
        info!("Starting TUI");

        // Restore the persisted token and fetch once immediately
        self.client
            .set_token(Some(self.app.settings.auth_token.clone()));
        self.trigger_refresh();
        if self.app.settings.is_auto_refresh_enabled {
            self.refresh_timer
                .start(self.app.settings.refresh_interval());
        }

        // Initial render
        self.terminal.draw(|f| ui::render(f, &self.app))?;

        loop {
            // Process any pending messages from async tasks
            while let Ok(msg) = self.message_rx.try_recv() {
                self.handle_message(msg);
            }

            // Poll for terminal events
            if let Some(event) = self.event_handler.poll()? {
                let action = match event {
                    Event::Key(key) => self.event_handler.handle_key(&mut self.app, key),
                    Event::Resize(_, _) => {
                        // Terminal will re-render on next draw
                        AppAction::None
                    }
                    _ => AppAction::None,
                };

                // Handle the action
                self.handle_action(action);
            }

            self.app.prune_toasts(TOAST_TTL);

            // Check if we should quit
            if self.app.should_quit {
                break;
            }

            // Render
            self.terminal.draw(|f| ui::render(f, &self.app))?;
        }

        info!("TUI shutting down");
        Ok(())
    }

    /// Handle TUI message from async task
    fn handle_message(&mut self, msg: TuiMessage) {
        match msg {
            TuiMessage::Tick => {
                // Ticks arriving while paused or while a fetch is in flight
                // are dropped by the guard
                if self.app.settings.is_auto_refresh_enabled {
                    self.trigger_refresh();
                }
            }
            TuiMessage::ServersLoaded(servers) => {
                self.app.refresh_succeeded(servers);
            }
            TuiMessage::ServersFailed(error) => {
                self.app.refresh_failed(error.to_string());
                self.handle_auth(&error);
            }
            TuiMessage::SearchResults(results) => {
                self.app.clear_busy();
                let count = results.len();
                self.app.set_search_results(results);
                if count > 0 {
                    self.app
                        .push_toast(ToastType::Info, format!("Found {} servers", count));
                }
            }
            TuiMessage::SearchFailed(error) => {
                self.app.clear_busy();
                if !self.handle_auth(&error) {
                    self.app
                        .push_toast(ToastType::Error, format!("Search failed: {}", error));
                }
            }
            TuiMessage::ServerStopped(message) => {
                self.app.clear_busy();
                let text = if message.is_empty() {
                    "Server stopped".to_string()
                } else {
                    message
                };
                self.app.push_toast(ToastType::Success, text);
                self.trigger_refresh();
            }
            TuiMessage::StopFailed(error) => {
                self.app.clear_busy();
                if !self.handle_auth(&error) {
                    self.app
                        .push_toast(ToastType::Error, format!("Failed to stop server: {}", error));
                }
            }
            TuiMessage::RegistryRunStarted(name) => {
                self.app.clear_busy();
                self.app.registry_run_succeeded();
                self.app
                    .push_toast(ToastType::Success, format!("Started {}", name));
                self.trigger_refresh();
            }
            TuiMessage::RegistryRunFailed(error) => {
                self.app.clear_busy();
                if !self.handle_auth(&error) {
                    self.app.push_toast(
                        ToastType::Error,
                        format!("Failed to start server: {}", error),
                    );
                }
            }
            TuiMessage::CommandOutput(output) => {
                self.app.clear_busy();
                self.app.set_command_output(output, true);
                self.trigger_refresh();
            }
            TuiMessage::CommandFailed(error) => {
                self.app.clear_busy();
                self.app.set_command_output(error.to_string(), false);
                self.handle_auth(&error);
            }
        }
    }

    /// Handle an application action
    fn handle_action(&mut self, action: AppAction) {
        match action {
            AppAction::None => {}
            AppAction::Quit => {
                self.app.should_quit = true;
            }
            AppAction::Refresh => {
                self.trigger_refresh();
            }
            AppAction::StopServer(name) => {
                self.app.set_busy("Stopping server...");
                self.spawn_stop_server(name);
            }
            AppAction::Search(query) => {
                self.app.set_busy("Searching registry...");
                self.spawn_search(query);
            }
            AppAction::RunFromRegistry(name) => {
                self.app.set_busy("Starting server...");
                self.spawn_run_from_registry(name);
            }
            AppAction::RunCommand(command) => {
                self.app.set_busy("Running command...");
                self.spawn_run_command(command);
            }
            AppAction::ApplySettings(settings) => {
                self.app.settings = settings;
                self.client
                    .set_token(Some(self.app.settings.auth_token.clone()));
                self.persist_settings();
                if self.app.settings.is_auto_refresh_enabled {
                    self.refresh_timer
                        .start(self.app.settings.refresh_interval());
                } else {
                    self.refresh_timer.stop();
                }
                self.app.push_toast(ToastType::Success, "Settings saved");
            }
            AppAction::ToggleAutoRefresh => {
                self.app.toggle_auto_refresh();
                self.persist_settings();
                if self.app.settings.is_auto_refresh_enabled {
                    self.refresh_timer
                        .start(self.app.settings.refresh_interval());
                    self.app.push_toast(ToastType::Info, "Auto-refresh resumed");
                } else {
                    self.refresh_timer.stop();
                    self.app.push_toast(ToastType::Info, "Auto-refresh paused");
                }
            }
        }
    }

    /// Begin a refresh unless one is already in flight
    fn trigger_refresh(&mut self) {
        if self.app.begin_refresh() {
            self.spawn_list_servers();
        }
    }

    /// On 401, forget the stored token and reopen the settings form.
    /// Returns true when the error was handled here.
    fn handle_auth(&mut self, error: &ApiError) -> bool {
        if !matches!(error, ApiError::AuthRequired) {
            return false;
        }
        self.client.clear_token();
        self.app.auth_required();
        self.persist_settings();
        true
    }

    fn persist_settings(&mut self) {
        if let Err(e) = self.app.settings.save(&self.settings_path) {
            warn!("Failed to save settings: {}", e);
            self.app
                .push_toast(ToastType::Error, format!("Failed to save settings: {}", e));
        }
    }

    /// Spawn async task to fetch the server list
    fn spawn_list_servers(&self) {
        let client = self.client.clone();
        let tx = self.message_tx.clone();

        tokio::spawn(async move {
            match client.list_servers().await {
                Ok(servers) => {
                    let _ = tx.send(TuiMessage::ServersLoaded(servers)).await;
                }
                Err(e) => {
                    let _ = tx.send(TuiMessage::ServersFailed(e)).await;
                }
            }
        });
    }

    /// Spawn async task to stop a server
    fn spawn_stop_server(&self, name: String) {
        let client = self.client.clone();
        let tx = self.message_tx.clone();

        tokio::spawn(async move {
            match client.stop_server(&name).await {
                Ok(message) => {
                    let _ = tx.send(TuiMessage::ServerStopped(message)).await;
                }
                Err(e) => {
                    let _ = tx.send(TuiMessage::StopFailed(e)).await;
                }
            }
        });
    }

    /// Spawn async task to search the registry
    fn spawn_search(&self, query: String) {
        let client = self.client.clone();
        let tx = self.message_tx.clone();

        tokio::spawn(async move {
            match client.search_registry(&query).await {
                Ok(results) => {
                    let _ = tx.send(TuiMessage::SearchResults(results)).await;
                }
                Err(e) => {
                    let _ = tx.send(TuiMessage::SearchFailed(e)).await;
                }
            }
        });
    }

    /// Spawn async task to start a registry server
    fn spawn_run_from_registry(&self, name: String) {
        let client = self.client.clone();
        let tx = self.message_tx.clone();

        tokio::spawn(async move {
            match client.run_from_registry(&name).await {
                Ok(_) => {
                    let _ = tx.send(TuiMessage::RegistryRunStarted(name)).await;
                }
                Err(e) => {
                    let _ = tx.send(TuiMessage::RegistryRunFailed(e)).await;
                }
            }
        });
    }

    /// Spawn async task to run an ad-hoc backend command
    fn spawn_run_command(&self, command: String) {
        let client = self.client.clone();
        let tx = self.message_tx.clone();

        tokio::spawn(async move {
            match client.run_command(&command).await {
                Ok(output) => {
                    let _ = tx.send(TuiMessage::CommandOutput(output)).await;
                }
                Err(e) => {
                    let _ = tx.send(TuiMessage::CommandFailed(e)).await;
                }
            }
        });
    }
}

impl Drop for TuiRunner {
    fn drop(&mut self) {
        // Restore terminal state
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Run the TUI application
///
/// This is the main entry point for TUI mode. It creates a TuiRunner
/// and runs the main event loop until the user quits.
pub async fn run(
    client: Arc<ApiClient>,
    settings: UiSettings,
    settings_path: PathBuf,
) -> Result<()> {
    let mut runner = TuiRunner::new(client, settings, settings_path)?;
    runner.run().await
}
