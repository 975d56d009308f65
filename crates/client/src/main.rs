//! mcp-dash Client
//!
//! Terminal dashboard for managed MCP servers. Connects to the management
//! backend over HTTP, shows running servers, and can start and stop them.

mod config;
mod refresh;
mod settings;
mod tui;

use anyhow::{Context, Result};
use api::ApiClient;
use clap::Parser;
use common::setup_logging;
use settings::UiSettings;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "mcp-dash")]
#[command(author, version, about = "MCP Dashboard - Manage MCP servers from the terminal")]
#[command(long_about = "
A terminal dashboard for managed MCP servers. Polls the management backend,
renders running servers as cards, and can stop servers or start new ones
from the registry.

EXAMPLES:
    # Run with default config (interactive TUI)
    mcp-dash

    # Point at a different backend
    mcp-dash --base-url http://localhost:9090

    # Run with custom config
    mcp-dash --config /path/to/config.toml

    # Print the server list once and exit
    mcp-dash --once

CONFIGURATION:
    The client looks for configuration files in the following order:
    1. Path specified with --config
    2. ~/.config/mcp-dash/client.toml
    3. /etc/mcp-dash/client.toml
    4. Built-in defaults

    UI preferences (refresh interval, auth token) are kept separately in
    ~/.config/mcp-dash/toolhiveSettings.json and edited from the TUI.
")]
struct Args {
    /// Path to configuration file
    #[arg(short, long, value_name = "PATH")]
    config: Option<std::path::PathBuf>,

    /// Save default configuration to default location and exit
    #[arg(long)]
    save_config: bool,

    /// Backend base URL (overrides config)
    #[arg(short, long, value_name = "URL")]
    base_url: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, value_name = "LEVEL")]
    log_level: Option<String>,

    /// Fetch the server list once, print it, and exit (no TUI)
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Handle --save-config flag early (before loading config)
    if args.save_config {
        let config = config::DashConfig::default();
        let path = config::DashConfig::default_path();
        config.save(&path).context("Failed to save configuration")?;
        println!("Configuration saved to: {}", path.display());
        return Ok(());
    }

    // Load configuration first (to get log level from config if not specified)
    let mut config = if let Some(ref path) = args.config {
        config::DashConfig::load(Some(path.clone())).context("Failed to load configuration")?
    } else {
        config::DashConfig::load_or_default()
    };

    if let Some(base_url) = args.base_url {
        config.server.base_url = base_url;
    }
    config.validate().context("Invalid configuration")?;

    // Use CLI log level if specified, otherwise use config value
    let log_level = args
        .log_level
        .as_deref()
        .unwrap_or(&config.client.log_level);

    // Setup logging
    setup_logging(log_level).context("Failed to setup logging")?;

    info!("mcp-dash v{}", env!("CARGO_PKG_VERSION"));
    info!("Backend: {}", config.server.base_url);

    // Restore persisted UI preferences
    let settings_path = UiSettings::default_path();
    let settings = UiSettings::load(&settings_path);

    let client = Arc::new(ApiClient::new(
        &config.server.base_url,
        settings.token().map(String::from),
    ));

    if args.once {
        return print_servers_once(&client).await;
    }

    let result = tui::run(client, settings, settings_path).await;

    info!("Client shutting down...");
    result
}

/// Fetch the server list once and print it as a plain table
async fn print_servers_once(client: &ApiClient) -> Result<()> {
    let servers = client
        .list_servers()
        .await
        .context("Failed to fetch server list")?;

    if servers.is_empty() {
        println!("No servers running");
        return Ok(());
    }

    println!(
        "{:<20} {:<12} {:<10} {:<6} URL",
        "NAME", "STATE", "TRANSPORT", "PORT"
    );
    for server in &servers {
        let name = if server.name.is_empty() {
            "(unnamed)"
        } else {
            &server.name
        };
        let state = if server.state.is_empty() {
            "unknown"
        } else {
            &server.state
        };
        let transport = if server.transport.is_empty() {
            "unknown"
        } else {
            &server.transport
        };
        let port = if server.port > 0 {
            server.port.to_string()
        } else {
            "-".to_string()
        };
        println!(
            "{:<20} {:<12} {:<10} {:<6} {}",
            name, state, transport, port, server.url
        );
    }

    Ok(())
}
