//! Kamba TUI
//!
//! Terminal user interface for the Kamba task list.
//!
//! ## Layout
//!
//! Two-pane layout:
//! - Left: Task list
//! - Right: Detail preview (selected task)
//!
//! A channel indicator in the top-right corner shows whether the push
//! subscription is live; the view keeps working fetch-only when it is not.
//!
//! ## Navigation
//!
//! - j/k or ↑/↓: Move selection up/down
//! - g/G: Jump to first/last task
//! - Space/Enter: Toggle completed
//! - a: Add task
//! - d: Delete task (with confirmation)
//! - r: Refresh from server
//! - q: Quit

mod app;
mod ui;

use std::fs::File;
use std::io::stdout;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

use kamba_core::sync::{
    spawn_update_listener, ConnectionStatus, ListenerConfig, ListenerHandle, PushEvent,
};
use kamba_core::{Config, TaskApi, TaskBackend, TaskService};

use app::{App, ChannelIndicator, InputMode};

/// Run the TUI application
pub async fn run(config: Config) -> Result<()> {
    // Initialize TUI logging (file-based, only if KAMBA_LOG is set)
    init_tui_logging(&config);

    let api = TaskApi::new(&config.api_url)?;
    let mut service = TaskService::new(api);

    let mut app = App::new();

    // Initial fetch; a failure degrades to an empty view with a message
    if let Err(e) = service.refresh().await {
        app.set_status(format!("Could not reach server: {}", e));
    }
    app.sync_tasks(service.tasks());

    // Open the push channel
    let listener = spawn_update_listener(ListenerConfig::new(config.updates_url()));

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = run_app(&mut terminal, &mut app, &mut service, listener).await;

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

async fn run_app<B: Backend, T: TaskBackend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    service: &mut TaskService<T>,
    mut listener: ListenerHandle,
) -> Result<()> {
    loop {
        // Check for status message timeout
        app.check_status_timeout();

        // Draw UI
        terminal.draw(|frame| ui::draw(frame, app))?;

        tokio::select! {
            biased;

            // Push-channel events
            push_event = listener.event_rx.recv() => {
                if let Some(push_event) = push_event {
                    handle_push_event(app, service, push_event).await;
                }
            }

            // Poll for terminal events
            _ = tokio::time::sleep(Duration::from_millis(50)) => {
                // Check for terminal events (non-blocking)
                if event::poll(Duration::from_millis(0))? {
                    if let Event::Key(key) = event::read()? {
                        // Only handle key press events (not release)
                        if key.kind != KeyEventKind::Press {
                            continue;
                        }

                        // If help is showing, any key dismisses it
                        if app.show_help {
                            app.show_help = false;
                            continue;
                        }

                        match app.input_mode {
                            InputMode::Normal => {
                                handle_normal_mode(app, service, key.code, key.modifiers).await;
                            }
                            InputMode::Draft => {
                                handle_draft_mode(app, service, key.code, key.modifiers).await;
                            }
                            InputMode::ConfirmDelete => {
                                handle_confirm_mode(app, service, key.code).await;
                            }
                        }
                    }
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    // Close the push channel before giving the terminal back. An early
    // error return drops the handle instead, which shuts the listener
    // down just the same.
    listener.shutdown().await;

    Ok(())
}

/// Route a push-channel event through the service
async fn handle_push_event<T: TaskBackend>(
    app: &mut App,
    service: &mut TaskService<T>,
    event: PushEvent,
) {
    match event {
        PushEvent::StatusChanged(status) => {
            app.channel_status = match status {
                ConnectionStatus::Connected => ChannelIndicator::Live,
                ConnectionStatus::Connecting => ChannelIndicator::Connecting,
                ConnectionStatus::Disconnected => ChannelIndicator::Offline,
            };
        }
        PushEvent::Update(msg) => match service.apply_update(msg).await {
            Ok(true) => {
                app.sync_tasks(service.tasks());
                app.set_status("Synced remote changes");
            }
            Ok(false) => {}
            Err(e) => {
                // Keep showing the last snapshot
                app.set_status(format!("Refresh failed: {}", e));
            }
        },
        PushEvent::Error(msg) => {
            app.set_status(format!("Push channel error: {}", msg));
        }
    }
}

/// Handle key events in normal mode
async fn handle_normal_mode<T: TaskBackend>(
    app: &mut App,
    service: &mut TaskService<T>,
    code: KeyCode,
    modifiers: KeyModifiers,
) {
    match code {
        // Quit
        KeyCode::Char('q') => {
            app.should_quit = true;
        }
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
        }

        // Navigation
        KeyCode::Char('k') | KeyCode::Up => {
            app.move_up();
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.move_down();
        }
        KeyCode::Char('g') => {
            app.move_to_first();
        }
        KeyCode::Char('G') => {
            app.move_to_last();
        }

        // Toggle completed on the selected task
        KeyCode::Enter | KeyCode::Char(' ') => {
            if let Some(task) = app.current_task() {
                let id = task.id;
                match service.toggle(id).await {
                    Ok(()) => app.sync_tasks(service.tasks()),
                    Err(e) => app.set_status(format!("Update failed: {}", e)),
                }
            }
        }

        // Add task
        KeyCode::Char('a') => {
            app.enter_draft_mode();
        }

        // Delete task (opens confirmation)
        KeyCode::Char('d') => {
            app.request_delete();
        }

        // Manual refresh
        KeyCode::Char('r') => match service.refresh().await {
            Ok(()) => {
                app.sync_tasks(service.tasks());
                app.set_status("Refreshed");
            }
            Err(e) => app.set_status(format!("Refresh failed: {}", e)),
        },

        // Help
        KeyCode::Char('?') => {
            app.toggle_help();
        }

        _ => {}
    }
}

/// Handle key events while editing the new-task form
async fn handle_draft_mode<T: TaskBackend>(
    app: &mut App,
    service: &mut TaskService<T>,
    code: KeyCode,
    modifiers: KeyModifiers,
) {
    match code {
        // Cancel
        KeyCode::Esc => {
            app.cancel_draft();
        }
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.cancel_draft();
        }

        // Submit; a blank title is silently dropped and the form stays open
        KeyCode::Enter => match service.submit(&app.draft).await {
            Ok(Some(_)) => {
                app.finish_draft();
                app.sync_tasks(service.tasks());
                app.set_status("Task created");
            }
            Ok(None) => {}
            Err(e) => {
                // Draft is preserved so the user can retry
                app.set_status(format!("Create failed: {}", e));
            }
        },

        // Field switching
        KeyCode::Tab | KeyCode::BackTab => {
            app.draft_switch_field();
        }

        // Text input
        KeyCode::Char(c) => {
            app.draft_insert(c);
        }
        KeyCode::Backspace => {
            app.draft_backspace();
        }

        _ => {}
    }
}

/// Handle key events in the delete confirmation modal
async fn handle_confirm_mode<T: TaskBackend>(
    app: &mut App,
    service: &mut TaskService<T>,
    code: KeyCode,
) {
    match code {
        // Confirm: now (and only now) the delete is issued
        KeyCode::Char('y') | KeyCode::Enter => {
            if let Some(id) = app.take_confirmed_delete() {
                match service.delete(id).await {
                    Ok(()) => {
                        app.sync_tasks(service.tasks());
                        app.set_status("Task deleted");
                    }
                    Err(e) => app.set_status(format!("Delete failed: {}", e)),
                }
            }
        }

        // Decline: no request is issued
        KeyCode::Char('n') | KeyCode::Esc | KeyCode::Char('q') => {
            app.cancel_delete();
        }

        _ => {}
    }
}

/// Initialize logging for TUI mode
///
/// Only initializes if the KAMBA_LOG environment variable is set.
/// Logs to file (config.log_file or a default under the local data dir).
fn init_tui_logging(config: &Config) {
    // Only log if KAMBA_LOG is set
    let Ok(log_level) = std::env::var("KAMBA_LOG") else {
        return;
    };

    // Determine log file path
    let log_path = config.log_file_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    // Create log file
    let log_file = match File::create(&log_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Could not create log file {:?}: {}", log_path, e);
            return;
        }
    };

    let env_filter = EnvFilter::new(format!("kamba_core={},kamba_cli={}", log_level, log_level));

    // Initialize file-based logging (ignore error if already initialized)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(log_file)
        .try_init();

    info!("TUI logging initialized to {:?}", log_path);
}
