//! Push-channel message types
//!
//! Inbound messages are JSON text frames of shape
//! `{"action": "...", "tasks": [...]}`. The client sends nothing back on
//! this channel.

use serde::Deserialize;

use crate::models::Task;

/// What kind of change the server is announcing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateAction {
    /// Initial snapshot sent right after the channel opens
    Init,
    /// A task was created somewhere
    Created,
    /// A task was updated somewhere
    Updated,
    /// A task was deleted somewhere
    Deleted,
    /// Any action this client doesn't know; treated as a no-op
    #[serde(other)]
    Unknown,
}

/// One inbound message from the update stream
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateMessage {
    pub action: UpdateAction,
    /// Task payload; only meaningful for `init`
    #[serde(default)]
    pub tasks: Option<Vec<Task>>,
}

/// What the client should do with its local state after a message
#[derive(Debug, Clone, PartialEq)]
pub enum Reconcile {
    /// Replace local state with this snapshot, no round trip
    Replace(Vec<Task>),
    /// Re-fetch the authoritative snapshot over REST
    Refresh,
    /// Nothing to do
    Ignore,
}

impl UpdateMessage {
    /// Decode a text frame; malformed frames are the caller's problem to
    /// drop, not a reason to kill the channel
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Map this message to a state action
    ///
    /// `init` carries the snapshot itself. The change notifications may or
    /// may not embed task data; either way it is ignored in favor of a
    /// fresh fetch.
    pub fn reconcile(self) -> Reconcile {
        match self.action {
            UpdateAction::Init => Reconcile::Replace(self.tasks.unwrap_or_default()),
            UpdateAction::Created | UpdateAction::Updated | UpdateAction::Deleted => {
                Reconcile::Refresh
            }
            UpdateAction::Unknown => Reconcile::Ignore,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_init_with_tasks() {
        let msg = UpdateMessage::parse(
            r#"{"action": "init", "tasks": [
                {"id": 1, "title": "A", "created_at": "2024-05-01T10:00:00Z"}
            ]}"#,
        )
        .unwrap();

        assert_eq!(msg.action, UpdateAction::Init);
        match msg.reconcile() {
            Reconcile::Replace(tasks) => {
                assert_eq!(tasks.len(), 1);
                assert_eq!(tasks[0].id, 1);
            }
            other => panic!("Expected Replace, got {:?}", other),
        }
    }

    #[test]
    fn test_init_without_tasks_replaces_with_empty() {
        let msg = UpdateMessage::parse(r#"{"action": "init"}"#).unwrap();
        assert_eq!(msg.reconcile(), Reconcile::Replace(vec![]));
    }

    #[test]
    fn test_change_notifications_refresh() {
        for action in ["created", "updated", "deleted"] {
            let msg = UpdateMessage::parse(&format!(r#"{{"action": "{}"}}"#, action)).unwrap();
            assert_eq!(msg.reconcile(), Reconcile::Refresh);
        }
    }

    #[test]
    fn test_embedded_data_on_change_is_ignored() {
        // A "created" message carrying tasks still means "go fetch"
        let msg = UpdateMessage::parse(
            r#"{"action": "created", "tasks": [
                {"id": 9, "title": "X", "created_at": "2024-05-01T10:00:00Z"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(msg.reconcile(), Reconcile::Refresh);
    }

    #[test]
    fn test_unknown_action_is_ignored() {
        let msg = UpdateMessage::parse(r#"{"action": "reindexed"}"#).unwrap();
        assert_eq!(msg.action, UpdateAction::Unknown);
        assert_eq!(msg.reconcile(), Reconcile::Ignore);
    }

    #[test]
    fn test_malformed_frame_is_an_error() {
        assert!(UpdateMessage::parse("not json").is_err());
        assert!(UpdateMessage::parse(r#"{"tasks": []}"#).is_err());
    }
}
