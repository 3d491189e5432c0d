//! Watch command handler
//!
//! Follows the push channel and re-lists tasks whenever the server signals
//! a change. Runs until interrupted.

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use kamba_core::sync::{spawn_update_listener, ConnectionStatus, ListenerConfig, PushEvent};
use kamba_core::{Config, TaskApi, TaskService};

use crate::output::Output;

/// Stream updates to stdout until Ctrl-C
pub async fn run(config: &Config, output: &Output) -> Result<()> {
    init_logging();

    let api = TaskApi::new(&config.api_url)?;
    let mut service = TaskService::new(api);

    service.refresh().await.context("Failed to fetch tasks")?;
    output.print_tasks(service.tasks());

    let mut handle = spawn_update_listener(ListenerConfig::new(config.updates_url()));
    output.message("Watching for updates (Ctrl-C to stop)...");

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,

            event = handle.event_rx.recv() => {
                match event {
                    Some(PushEvent::Update(msg)) => {
                        match service.apply_update(msg).await {
                            Ok(true) => output.print_tasks(service.tasks()),
                            Ok(false) => {}
                            // Keep showing the last snapshot
                            Err(e) => output.message(&format!("Refresh failed: {}", e)),
                        }
                    }
                    Some(PushEvent::StatusChanged(status)) => {
                        let label = match status {
                            ConnectionStatus::Connected => "connected",
                            ConnectionStatus::Connecting => "connecting",
                            ConnectionStatus::Disconnected => "disconnected",
                        };
                        output.message(&format!("Push channel {}", label));
                    }
                    Some(PushEvent::Error(msg)) => {
                        output.message(&format!("Push channel error: {}", msg));
                    }
                    None => break,
                }
            }
        }
    }

    handle.shutdown().await;
    Ok(())
}

/// Stderr logging, enabled via KAMBA_LOG
fn init_logging() {
    let Ok(log_level) = std::env::var("KAMBA_LOG") else {
        return;
    };

    let env_filter = EnvFilter::new(format!(
        "kamba_core={},kamba_cli={}",
        log_level, log_level
    ));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
