//! Push-channel listener
//!
//! Maintains one long-lived WebSocket subscription to the server's update
//! stream and reconnects automatically with exponential backoff. The
//! listener runs as a background task; the returned handle carries a
//! command channel, an event channel, and a status watch. Dropping the
//! handle closes the command channel, which shuts the task down and closes
//! the socket — release happens on every exit path.

use std::time::Duration;

use anyhow::Result;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, warn};

use super::message::UpdateMessage;

/// Commands sent to the listener task
#[derive(Debug, Clone)]
pub enum ListenerCommand {
    /// Close the channel and end the task
    Shutdown,
}

/// Connection status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    /// Not connected
    Disconnected,
    /// Attempting to connect
    Connecting,
    /// Subscription is live
    Connected,
}

/// Events emitted by the listener task
#[derive(Debug, Clone)]
pub enum PushEvent {
    /// Connection status changed
    StatusChanged(ConnectionStatus),
    /// An update message arrived
    Update(UpdateMessage),
    /// Error occurred (connect failure, transport error)
    Error(String),
}

/// Handle to control and monitor the listener task
pub struct ListenerHandle {
    /// Send commands to the listener task
    pub command_tx: mpsc::Sender<ListenerCommand>,
    /// Receive events from the listener task
    pub event_rx: mpsc::Receiver<PushEvent>,
    /// Watch connection status
    pub status_rx: watch::Receiver<ConnectionStatus>,
}

impl ListenerHandle {
    /// Ask the listener to close the channel and stop
    pub async fn shutdown(&self) {
        let _ = self.command_tx.send(ListenerCommand::Shutdown).await;
    }
}

/// Configuration for the listener
#[derive(Debug, Clone)]
pub struct ListenerConfig {
    /// WebSocket URL of the update stream
    pub url: String,
    /// Initial reconnect delay
    pub initial_reconnect_delay: Duration,
    /// Maximum reconnect delay
    pub max_reconnect_delay: Duration,
}

impl ListenerConfig {
    /// Config with default backoff for the given URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            initial_reconnect_delay: Duration::from_secs(1),
            max_reconnect_delay: Duration::from_secs(30),
        }
    }
}

/// Spawn the listener task
///
/// Returns a handle to control and monitor it. The task reconnects
/// automatically after a dropped or failed connection.
pub fn spawn_update_listener(config: ListenerConfig) -> ListenerHandle {
    let (command_tx, command_rx) = mpsc::channel(16);
    let (event_tx, event_rx) = mpsc::channel(64);
    let (status_tx, status_rx) = watch::channel(ConnectionStatus::Disconnected);

    tokio::spawn(listener_task(config, command_rx, event_tx, status_tx));

    ListenerHandle {
        command_tx,
        event_rx,
        status_rx,
    }
}

/// Main listener loop with reconnection
async fn listener_task(
    config: ListenerConfig,
    mut command_rx: mpsc::Receiver<ListenerCommand>,
    event_tx: mpsc::Sender<PushEvent>,
    status_tx: watch::Sender<ConnectionStatus>,
) {
    let mut reconnect_delay = config.initial_reconnect_delay;

    loop {
        set_status(&status_tx, &event_tx, ConnectionStatus::Connecting).await;

        match connect_and_listen(&config.url, &mut command_rx, &event_tx, &status_tx).await {
            Ok(true) => {
                // Shutdown requested
                set_status(&status_tx, &event_tx, ConnectionStatus::Disconnected).await;
                break;
            }
            Ok(false) => {
                // Connection closed normally, reset backoff
                reconnect_delay = config.initial_reconnect_delay;
            }
            Err(e) => {
                warn!("Push channel error: {}", e);
                let _ = event_tx.send(PushEvent::Error(e.to_string())).await;
            }
        }

        set_status(&status_tx, &event_tx, ConnectionStatus::Disconnected).await;

        // Wait before reconnecting, but check for shutdown command
        tokio::select! {
            _ = tokio::time::sleep(reconnect_delay) => {
                // Exponential backoff
                reconnect_delay = (reconnect_delay * 2).min(config.max_reconnect_delay);
            }
            cmd = command_rx.recv() => {
                if matches!(cmd, Some(ListenerCommand::Shutdown) | None) {
                    break;
                }
            }
        }
    }
}

/// Connect and deliver messages until disconnection or shutdown
///
/// Returns Ok(true) when shutdown was requested, Ok(false) on a normal
/// close from the server.
async fn connect_and_listen(
    url: &str,
    command_rx: &mut mpsc::Receiver<ListenerCommand>,
    event_tx: &mpsc::Sender<PushEvent>,
    status_tx: &watch::Sender<ConnectionStatus>,
) -> Result<bool> {
    debug!("Connecting to {}", url);
    let (ws_stream, _response) = connect_async(url).await?;

    set_status(status_tx, event_tx, ConnectionStatus::Connected).await;
    debug!("Push channel open");

    let (mut write, mut read) = ws_stream.split();

    loop {
        tokio::select! {
            cmd = command_rx.recv() => {
                if matches!(cmd, Some(ListenerCommand::Shutdown) | None) {
                    write.close().await.ok();
                    return Ok(true);
                }
            }

            msg = read.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        match UpdateMessage::parse(&text) {
                            Ok(update) => {
                                let _ = event_tx.send(PushEvent::Update(update)).await;
                            }
                            Err(e) => {
                                warn!("Ignoring malformed update message: {}", e);
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        // Connection closed
                        return Ok(false);
                    }
                    Some(Err(e)) => {
                        return Err(e.into());
                    }
                    _ => {
                        // Ping/pong/binary - ignore
                    }
                }
            }
        }
    }
}

async fn set_status(
    status_tx: &watch::Sender<ConnectionStatus>,
    event_tx: &mpsc::Sender<PushEvent>,
    status: ConnectionStatus,
) {
    let _ = status_tx.send(status);
    let _ = event_tx.send(PushEvent::StatusChanged(status)).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::message::UpdateAction;

    #[test]
    fn test_default_config() {
        let config = ListenerConfig::default();
        assert_eq!(config.initial_reconnect_delay, Duration::from_secs(1));
        assert_eq!(config.max_reconnect_delay, Duration::from_secs(30));
    }

    #[test]
    fn test_config_new() {
        let config = ListenerConfig::new("ws://localhost:8000/ws/updates");
        assert_eq!(config.url, "ws://localhost:8000/ws/updates");
        assert_eq!(config.initial_reconnect_delay, Duration::from_secs(1));
    }

    /// Wait for the next Update event, skipping status changes
    async fn next_update(handle: &mut ListenerHandle) -> UpdateMessage {
        loop {
            match tokio::time::timeout(Duration::from_secs(5), handle.event_rx.recv()).await {
                Ok(Some(PushEvent::Update(msg))) => return msg,
                Ok(Some(_)) => continue,
                Ok(None) => panic!("Listener task ended unexpectedly"),
                Err(_) => panic!("Timed out waiting for update"),
            }
        }
    }

    #[tokio::test]
    async fn test_listener_delivers_updates_and_drops_malformed() {
        let server = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = server.local_addr().unwrap();

        tokio::spawn(async move {
            let (stream, _) = server.accept().await.unwrap();
            let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();

            // A garbage frame must not kill the listener
            ws.send(Message::Text("not json".to_string())).await.unwrap();
            ws.send(Message::Text(
                r#"{"action": "init", "tasks": []}"#.to_string(),
            ))
            .await
            .unwrap();
            ws.send(Message::Text(r#"{"action": "created"}"#.to_string()))
                .await
                .unwrap();

            // Hold the connection open until the client closes it
            while let Some(Ok(_)) = ws.next().await {}
        });

        let mut handle = spawn_update_listener(ListenerConfig::new(format!("ws://{}", addr)));

        let first = next_update(&mut handle).await;
        assert_eq!(first.action, UpdateAction::Init);

        let second = next_update(&mut handle).await;
        assert_eq!(second.action, UpdateAction::Created);

        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_connect_failure_degrades_gracefully() {
        // Nothing listens on this port; the task should report the failure
        // and keep running (in backoff) rather than die
        let mut handle = spawn_update_listener(ListenerConfig {
            url: "ws://127.0.0.1:9".to_string(),
            initial_reconnect_delay: Duration::from_millis(50),
            max_reconnect_delay: Duration::from_millis(200),
        });

        let mut saw_error = false;
        let mut saw_disconnected = false;
        for _ in 0..6 {
            match tokio::time::timeout(Duration::from_secs(5), handle.event_rx.recv()).await {
                Ok(Some(PushEvent::Error(_))) => saw_error = true,
                Ok(Some(PushEvent::StatusChanged(ConnectionStatus::Disconnected))) => {
                    saw_disconnected = true
                }
                Ok(Some(_)) => {}
                Ok(None) => panic!("Listener task ended unexpectedly"),
                Err(_) => panic!("Timed out waiting for events"),
            }
            if saw_error && saw_disconnected {
                break;
            }
        }

        assert!(saw_error);
        assert!(saw_disconnected);

        handle.shutdown().await;
    }
}
