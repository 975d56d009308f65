//! TUI rendering with ratatui
//!
//! Renders the terminal user interface using ratatui widgets and layouts.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};

use api::ServerInfo;

use super::app::{ActivePane, App, InputMode, SettingsField, ToastType};

/// Colors used in the UI
mod colors {
    use ratatui::style::Color;

    pub const RUNNING: Color = Color::Green;
    pub const STARTING: Color = Color::Yellow;
    pub const STOPPED: Color = Color::Red;
    pub const UNKNOWN_STATE: Color = Color::Gray;

    pub const ACTIVE_BORDER: Color = Color::Cyan;
    pub const INACTIVE_BORDER: Color = Color::Gray;

    pub const HIGHLIGHT_BG: Color = Color::DarkGray;
    pub const STATUS_BAR_BG: Color = Color::Blue;
    pub const HELP_BAR_BG: Color = Color::DarkGray;

    pub const LIST_ERROR: Color = Color::Red;

    // Toast notification colors
    pub const TOAST_INFO_BG: Color = Color::Blue;
    pub const TOAST_SUCCESS_BG: Color = Color::Green;
    pub const TOAST_WARNING_BG: Color = Color::Yellow;
    pub const TOAST_ERROR_BG: Color = Color::Red;
}

/// Render the complete UI
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Status bar
            Constraint::Min(10),   // Main content (two panes)
            Constraint::Length(1), // Help bar
        ])
        .split(frame.area());

    render_status_bar(frame, app, chunks[0]);
    render_main_content(frame, app, chunks[1]);
    render_help_bar(frame, app, chunks[2]);

    // Render overlays based on input mode
    match &app.input_mode {
        InputMode::Search { input } => {
            render_search_dialog(frame, input);
        }
        InputMode::NewServer { input } => {
            render_new_server_dialog(frame, app, input);
        }
        InputMode::Settings {
            token,
            interval,
            auto_refresh,
            field,
        } => {
            render_settings_dialog(frame, token, interval, *auto_refresh, *field);
        }
        InputMode::ConfirmStop { name } => {
            render_stop_dialog(frame, name);
        }
        InputMode::Help => {
            render_help_overlay(frame);
        }
        InputMode::ConfirmQuit => {
            render_quit_dialog(frame);
        }
        InputMode::Normal | InputMode::Filter => {}
    }

    // Render toast notifications (in top-right corner)
    render_toasts(frame, app);
}

/// Render the top status bar
fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let refresh_state = if app.settings.is_auto_refresh_enabled {
        format!("auto {}s", app.settings.refresh_interval().as_secs())
    } else {
        "paused".to_string()
    };

    let status_text = format!(
        " Backend: {} | Servers: {} | Refresh: {}",
        app.backend,
        app.servers.len(),
        refresh_state
    );

    let busy_message = app
        .busy
        .as_deref()
        .map(|m| format!(" | {}", m))
        .unwrap_or_else(|| {
            if app.is_refreshing {
                " | Refreshing...".to_string()
            } else {
                String::new()
            }
        });

    let paragraph = Paragraph::new(Line::from(vec![
        Span::styled(status_text, Style::default().fg(Color::White)),
        Span::styled(busy_message, Style::default().fg(Color::Yellow)),
    ]))
    .style(Style::default().bg(colors::STATUS_BAR_BG))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(" MCP Dashboard ")
            .title_style(Style::default().add_modifier(Modifier::BOLD)),
    );

    frame.render_widget(paragraph, area);
}

/// Render the main content area with the server and registry panes
fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(55), // Running servers
            Constraint::Percentage(45), // Registry search
        ])
        .split(area);

    render_server_list(frame, app, chunks[0]);
    render_registry_list(frame, app, chunks[1]);
}

fn state_color(state: &str) -> Color {
    match state {
        "running" => colors::RUNNING,
        "starting" | "restarting" => colors::STARTING,
        "stopped" | "exited" => colors::STOPPED,
        _ => colors::UNKNOWN_STATE,
    }
}

/// Build the multi-line card for one server
fn server_card(server: &ServerInfo) -> ListItem<'static> {
    let name = if server.name.is_empty() {
        "Unnamed Server"
    } else {
        &server.name
    };
    let image = if server.image.is_empty() {
        "No image"
    } else {
        &server.image
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
        "N/A".to_string()
    };
    let url = if server.url.is_empty() {
        "N/A"
    } else {
        &server.url
    };

    let mut title_spans = vec![Span::styled(
        name.to_string(),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    if let Some(tool_type) = &server.tool_type {
        title_spans.push(Span::styled(
            format!(" ({})", tool_type),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let lines = vec![
        Line::from(title_spans),
        Line::from(vec![Span::styled(
            format!("  {}", image),
            Style::default().fg(Color::DarkGray),
        )]),
        Line::from(vec![
            Span::styled("  State: ", Style::default().fg(Color::DarkGray)),
            Span::styled(state.to_string(), Style::default().fg(state_color(state))),
            Span::styled(" | Transport: ", Style::default().fg(Color::DarkGray)),
            Span::raw(transport.to_string()),
            Span::styled(" | Port: ", Style::default().fg(Color::DarkGray)),
            Span::raw(port),
        ]),
        Line::from(vec![
            Span::styled("  URL: ", Style::default().fg(Color::DarkGray)),
            Span::styled(url.to_string(), Style::default().fg(Color::Cyan)),
        ]),
        Line::from(""),
    ];

    ListItem::new(lines)
}

/// Render the running servers pane
fn render_server_list(frame: &mut Frame, app: &App, area: Rect) {
    let is_active = app.active_pane == ActivePane::Servers;
    let border_color = if is_active {
        colors::ACTIVE_BORDER
    } else {
        colors::INACTIVE_BORDER
    };

    let title = if app.filter.is_empty() {
        if is_active {
            " Running Servers (active) ".to_string()
        } else {
            " Running Servers ".to_string()
        }
    } else {
        format!(" Running Servers [filter: {}] ", app.filter)
    };

    // Fetch errors replace the list until the next successful refresh
    if let Some(error) = &app.list_error {
        let paragraph = Paragraph::new(format!("Error loading servers: {}", error))
            .style(Style::default().fg(colors::LIST_ERROR))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(border_color))
                    .title(title),
            );
        frame.render_widget(paragraph, area);
        return;
    }

    let visible = app.visible_servers();
    if visible.is_empty() {
        let message = if app.servers.is_empty() {
            "No servers running"
        } else {
            "No servers match the filter"
        };
        let paragraph = Paragraph::new(message)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(border_color))
                    .title(title),
            );
        frame.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = visible.iter().map(|s| server_card(s)).collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border_color))
                .title(title)
                .title_style(if is_active {
                    Style::default()
                        .fg(colors::ACTIVE_BORDER)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                }),
        )
        .highlight_style(
            Style::default()
                .bg(colors::HIGHLIGHT_BG)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(Some(app.selected_server));

    frame.render_stateful_widget(list, area, &mut state);
}

/// Render the registry search pane
fn render_registry_list(frame: &mut Frame, app: &App, area: Rect) {
    let is_active = app.active_pane == ActivePane::Registry;
    let border_color = if is_active {
        colors::ACTIVE_BORDER
    } else {
        colors::INACTIVE_BORDER
    };

    let title = if app.search_query.is_empty() {
        if is_active {
            " Registry (active) ".to_string()
        } else {
            " Registry ".to_string()
        }
    } else {
        format!(" Registry [{}] ", app.search_query)
    };

    if app.registry_results.is_empty() {
        // "No MCPs found" only after a search actually ran
        let message = if app.has_searched {
            "No MCPs found"
        } else {
            "Press / to search the registry"
        };
        let paragraph = Paragraph::new(message)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(border_color))
                    .title(title),
            );
        frame.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = app
        .registry_results
        .iter()
        .map(|entry| {
            let description = if entry.description.is_empty() {
                "No description available"
            } else {
                &entry.description
            };
            let tags = if entry.tags.is_empty() {
                "none".to_string()
            } else {
                entry.tags.join(", ")
            };

            let lines = vec![
                Line::from(vec![
                    Span::styled(
                        entry.name.clone(),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        format!(" [{}]", entry.transport),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]),
                Line::from(vec![Span::styled(
                    format!("  {}", entry.image),
                    Style::default().fg(Color::DarkGray),
                )]),
                Line::from(vec![Span::raw(format!("  {}", description))]),
                Line::from(vec![
                    Span::styled("  Tags: ", Style::default().fg(Color::DarkGray)),
                    Span::styled(tags, Style::default().fg(Color::Cyan)),
                ]),
                Line::from(""),
            ];

            ListItem::new(lines)
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border_color))
                .title(title)
                .title_style(if is_active {
                    Style::default()
                        .fg(colors::ACTIVE_BORDER)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                }),
        )
        .highlight_style(
            Style::default()
                .bg(colors::HIGHLIGHT_BG)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(Some(app.selected_registry));

    frame.render_stateful_widget(list, area, &mut state);
}

/// Render the bottom help bar
fn render_help_bar(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = match &app.input_mode {
        InputMode::Normal => {
            if app.active_pane == ActivePane::Servers {
                "Tab: Switch | j/k: Navigate | s: Stop | r: Refresh | p: Pause | f: Filter | n: New | o: Settings | q: Quit | ?: Help"
            } else {
                "Tab: Switch | j/k: Navigate | Enter: Start | /: Search | r: Refresh | o: Settings | q: Quit | ?: Help"
            }
        }
        InputMode::Filter => "Type to filter | Enter/Esc: Done",
        InputMode::Search { .. } => "Enter: Search | Esc: Cancel",
        InputMode::NewServer { .. } => "Enter: Run | Esc: Close",
        InputMode::Settings { .. } => "Tab: Next field | Space: Toggle | Enter: Save | Esc: Cancel",
        InputMode::ConfirmStop { .. } => "y: Stop | n: Cancel",
        InputMode::Help => "Press any key to close",
        InputMode::ConfirmQuit => "y: Quit | n: Cancel",
    };

    let paragraph = Paragraph::new(help_text)
        .style(Style::default().fg(Color::White).bg(colors::HELP_BAR_BG))
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

/// Render the registry search dialog
fn render_search_dialog(frame: &mut Frame, input: &str) {
    let area = centered_rect(60, 20, frame.area());

    // Clear the area first
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Search Registry ")
        .title_style(Style::default().add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors::ACTIVE_BORDER));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(2), // Label
            Constraint::Length(3), // Input
            Constraint::Min(0),    // Spacing
        ])
        .split(inner);

    let label = Paragraph::new("Search for MCP servers:").style(Style::default().fg(Color::White));
    frame.render_widget(label, chunks[0]);

    let input_text = format!("{}_", input); // Show cursor
    let input_widget = Paragraph::new(input_text)
        .style(Style::default().fg(Color::Cyan))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
    frame.render_widget(input_widget, chunks[1]);
}

/// Render the new-server command dialog, with output from the last run
fn render_new_server_dialog(frame: &mut Frame, app: &App, input: &str) {
    let area = centered_rect(70, 50, frame.area());

    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" New Server ")
        .title_style(Style::default().add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors::ACTIVE_BORDER));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(2), // Label
            Constraint::Length(3), // Input
            Constraint::Min(3),    // Command output
        ])
        .split(inner);

    let label = Paragraph::new("Command to run (e.g. thv run fetch):")
        .style(Style::default().fg(Color::White));
    frame.render_widget(label, chunks[0]);

    let input_text = format!("{}_", input);
    let input_widget = Paragraph::new(input_text)
        .style(Style::default().fg(Color::Cyan))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
    frame.render_widget(input_widget, chunks[1]);

    if let Some(output) = &app.command_output {
        let output_color = if output.success {
            Color::Green
        } else {
            Color::Red
        };
        let output_widget = Paragraph::new(output.text.clone())
            .style(Style::default().fg(output_color))
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray))
                    .title(" Output "),
            );
        frame.render_widget(output_widget, chunks[2]);
    }
}

/// Render the settings form
fn render_settings_dialog(
    frame: &mut Frame,
    token: &str,
    interval: &str,
    auto_refresh: bool,
    field: SettingsField,
) {
    let area = centered_rect(60, 45, frame.area());

    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Settings ")
        .title_style(Style::default().add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors::ACTIVE_BORDER));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // Auth token
            Constraint::Length(3), // Refresh interval
            Constraint::Length(3), // Auto-refresh toggle
            Constraint::Min(0),
        ])
        .split(inner);

    let field_style = |f: SettingsField| {
        if f == field {
            Style::default().fg(colors::ACTIVE_BORDER)
        } else {
            Style::default().fg(Color::DarkGray)
        }
    };

    // Token content masked; length is still visible feedback
    let token_display = if field == SettingsField::AuthToken {
        format!("{}_", "*".repeat(token.len()))
    } else {
        "*".repeat(token.len())
    };
    let token_widget = Paragraph::new(token_display)
        .style(Style::default().fg(Color::Cyan))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(field_style(SettingsField::AuthToken))
                .title(" Auth token "),
        );
    frame.render_widget(token_widget, chunks[0]);

    let interval_display = if field == SettingsField::RefreshInterval {
        format!("{}_", interval)
    } else {
        interval.to_string()
    };
    let interval_widget = Paragraph::new(interval_display)
        .style(Style::default().fg(Color::Cyan))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(field_style(SettingsField::RefreshInterval))
                .title(" Refresh interval (seconds) "),
        );
    frame.render_widget(interval_widget, chunks[1]);

    let toggle_text = if auto_refresh {
        "[x] Auto-refresh enabled"
    } else {
        "[ ] Auto-refresh disabled"
    };
    let toggle_widget = Paragraph::new(toggle_text)
        .style(Style::default().fg(Color::White))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(field_style(SettingsField::AutoRefresh))
                .title(" Auto-refresh "),
        );
    frame.render_widget(toggle_widget, chunks[2]);
}

/// Render the stop confirmation dialog
fn render_stop_dialog(frame: &mut Frame, name: &str) {
    let area = centered_rect(40, 15, frame.area());

    frame.render_widget(Clear, area);

    let text = Text::from(vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("Stop server '{}'?", name),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("  [Y]es  ", Style::default().fg(Color::Green)),
            Span::styled("  [N]o  ", Style::default().fg(Color::Red)),
        ]),
    ]);

    let paragraph = Paragraph::new(text)
        .block(
            Block::default()
                .title(" Stop Server ")
                .title_style(Style::default().add_modifier(Modifier::BOLD))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        )
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

/// Render the help overlay
fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect(70, 70, frame.area());

    // Clear the area first
    frame.render_widget(Clear, area);

    let help_text = Text::from(vec![
        Line::from(Span::styled(
            "Keyboard Shortcuts",
            Style::default()
                .add_modifier(Modifier::BOLD)
                .add_modifier(Modifier::UNDERLINED),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Navigation",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from("  Tab          Switch between server and registry pane"),
        Line::from("  Up / k       Move selection up"),
        Line::from("  Down / j     Move selection down"),
        Line::from(""),
        Line::from(Span::styled(
            "Server Actions",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from("  s            Stop selected server (with confirmation)"),
        Line::from("  r            Refresh server list now"),
        Line::from("  p            Pause/resume auto-refresh"),
        Line::from("  f            Filter server cards (live)"),
        Line::from("  n            Run a new server command"),
        Line::from(""),
        Line::from(Span::styled(
            "Registry",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from("  /            Search the registry"),
        Line::from("  Enter        Start selected registry server"),
        Line::from(""),
        Line::from(Span::styled(
            "General",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from("  o            Settings (token, refresh interval)"),
        Line::from("  ?            Show this help"),
        Line::from("  q            Quit (with confirmation)"),
        Line::from("  Ctrl+C       Quit immediately"),
    ]);

    let paragraph = Paragraph::new(help_text)
        .block(
            Block::default()
                .title(" Help ")
                .title_style(Style::default().add_modifier(Modifier::BOLD))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(colors::ACTIVE_BORDER)),
        )
        .wrap(Wrap { trim: false })
        .alignment(Alignment::Left);

    frame.render_widget(paragraph, area);
}

/// Render the quit confirmation dialog
fn render_quit_dialog(frame: &mut Frame) {
    let area = centered_rect(40, 15, frame.area());

    // Clear the area first
    frame.render_widget(Clear, area);

    let text = Text::from(vec![
        Line::from(""),
        Line::from(Span::styled(
            "Are you sure you want to quit?",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Managed servers keep running in the background."),
        Line::from(""),
        Line::from(vec![
            Span::styled("  [Y]es  ", Style::default().fg(Color::Green)),
            Span::styled("  [N]o  ", Style::default().fg(Color::Red)),
        ]),
    ]);

    let paragraph = Paragraph::new(text)
        .block(
            Block::default()
                .title(" Quit ")
                .title_style(Style::default().add_modifier(Modifier::BOLD))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        )
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

/// Render toast notifications in the top-right corner
fn render_toasts(frame: &mut Frame, app: &App) {
    if app.toasts.is_empty() {
        return;
    }

    let area = frame.area();
    let toast_width = 40u16.min(area.width.saturating_sub(4));
    let toast_height = 1u16;
    let margin = 2u16;

    // Start from top-right, below status bar
    let start_x = area.width.saturating_sub(toast_width + margin);
    let start_y = 4u16; // Below status bar

    for (i, toast) in app.toasts.iter().enumerate().take(5) {
        let y = start_y + (i as u16) * (toast_height + 1);
        if y + toast_height > area.height.saturating_sub(2) {
            break; // No room for more toasts
        }

        let toast_area = Rect::new(start_x, y, toast_width, toast_height);

        let (bg_color, fg_color) = match toast.toast_type {
            ToastType::Info => (colors::TOAST_INFO_BG, Color::White),
            ToastType::Success => (colors::TOAST_SUCCESS_BG, Color::Black),
            ToastType::Warning => (colors::TOAST_WARNING_BG, Color::Black),
            ToastType::Error => (colors::TOAST_ERROR_BG, Color::White),
        };

        let icon = match toast.toast_type {
            ToastType::Info => "i",
            ToastType::Success => "+",
            ToastType::Warning => "!",
            ToastType::Error => "X",
        };

        // Truncate message if too long; backend-supplied messages are
        // arbitrary UTF-8, so cut on char boundaries, never byte offsets
        let max_msg_len = toast_width.saturating_sub(4) as usize;
        let msg = if toast.message.chars().count() > max_msg_len {
            let kept: String = toast
                .message
                .chars()
                .take(max_msg_len.saturating_sub(3))
                .collect();
            format!("{}...", kept)
        } else {
            toast.message.clone()
        };

        let line = Line::from(vec![
            Span::styled(
                format!("[{}] ", icon),
                Style::default().fg(fg_color).bg(bg_color),
            ),
            Span::styled(msg, Style::default().fg(fg_color).bg(bg_color)),
        ]);

        let paragraph = Paragraph::new(line).style(Style::default().bg(bg_color));

        frame.render_widget(paragraph, toast_area);
    }
}

/// Helper function to create a centered rectangle
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

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
mod tests {
    use super::*;
    use crate::settings::UiSettings;
    use common::test_utils::{mock_server_info, mock_sparse_server_info};
    use ratatui::{Terminal, backend::TestBackend};

    fn app() -> App {
        App::new(UiSettings::default())
    }

    /// Render the full UI into a test buffer and flatten it to text
    fn render_to_string(app: &App) -> String {
        let backend = TestBackend::new(120, 30);
        let mut terminal = Terminal::new(backend).expect("test terminal");
        terminal.draw(|f| render(f, app)).expect("draw");

        let buffer = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                if let Some(cell) = buffer.cell((x, y)) {
                    out.push_str(cell.symbol());
                }
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn test_centered_rect() {
        let area = Rect::new(0, 0, 100, 50);
        let centered = centered_rect(50, 50, area);

        // Should be centered
        assert!(centered.x > 0);
        assert!(centered.y > 0);
        assert!(centered.x + centered.width < area.width);
        assert!(centered.y + centered.height < area.height);
    }

    #[test]
    fn test_state_colors() {
        assert_eq!(state_color("running"), colors::RUNNING);
        assert_eq!(state_color("stopped"), colors::STOPPED);
        assert_eq!(state_color("weird"), colors::UNKNOWN_STATE);
    }

    #[test]
    fn test_sparse_server_card_builds() {
        // Fallback labels must not panic on an all-empty record
        let _ = server_card(&mock_sparse_server_info("bare"));
    }

    #[test]
    fn test_empty_panes_render_placeholders() {
        let mut app = app();
        let rendered = render_to_string(&app);
        assert!(rendered.contains("No servers running"));
        assert!(rendered.contains("Press / to search the registry"));

        // "No MCPs found" appears only after a search actually ran
        assert!(!rendered.contains("No MCPs found"));
        app.set_search_results(vec![]);
        let rendered = render_to_string(&app);
        assert!(rendered.contains("No MCPs found"));
    }

    #[test]
    fn test_cards_render_one_per_record_with_fallbacks() {
        let mut app = app();
        app.refresh_succeeded(vec![
            mock_server_info("fetch"),
            mock_sparse_server_info("bare"),
        ]);
        let rendered = render_to_string(&app);

        // Full record interpolated verbatim
        assert!(rendered.contains("fetch"));
        assert!(rendered.contains("State: running"));
        assert!(rendered.contains("Port: 21000"));

        // Sparse record uses the fallback labels
        assert!(rendered.contains("bare"));
        assert!(rendered.contains("No image"));
        assert!(rendered.contains("State: unknown"));
        assert!(rendered.contains("Port: N/A"));
        assert!(!rendered.contains("No servers running"));
    }

    #[test]
    fn test_list_error_replaces_cards() {
        let mut app = app();
        app.begin_refresh();
        app.refresh_failed("connection refused".to_string());
        let rendered = render_to_string(&app);
        assert!(rendered.contains("Error loading servers: connection refused"));
    }

    #[test]
    fn test_toast_truncation_survives_multibyte_messages() {
        let mut app = app();
        // Long enough to truncate, with the cut landing inside a
        // multi-byte character when measured in bytes
        app.push_toast(
            ToastType::Error,
            format!("{}éééééééé", "x".repeat(32)),
        );
        let rendered = render_to_string(&app);
        assert!(rendered.contains("..."));
    }

    #[test]
    fn test_short_multibyte_toast_rendered_whole() {
        let mut app = app();
        app.push_toast(ToastType::Error, "Нет такого контейнера");
        let rendered = render_to_string(&app);
        assert!(rendered.contains("Нет такого контейнера"));
    }
}
