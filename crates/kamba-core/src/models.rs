//! Data models for Kamba
//!
//! Defines the task record as served by the backend, plus the ephemeral
//! draft buffer used while composing a new task.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Server-assigned task identifier
pub type TaskId = i64;

/// One to-do item, owned by the server and cached by the client
///
/// Everything except `completed` is read-only from the client's point of
/// view: `id`, `priority`, `summary`, and `created_at` are assigned
/// server-side and never mutated locally.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    /// Unique identifier, assigned by the server
    pub id: TaskId,
    /// Display title
    pub title: String,
    /// Optional free-form description
    #[serde(default)]
    pub description: Option<String>,
    /// Server-derived summary; preferred over `description` for display
    #[serde(default)]
    pub summary: Option<String>,
    /// Server-assigned priority label, opaque to the client
    #[serde(default)]
    pub priority: Option<String>,
    /// Whether the task is done
    #[serde(default)]
    pub completed: bool,
    /// When the task was created (server clock)
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Text shown under the title: the summary when the server provided
    /// one, otherwise the description
    pub fn display_text(&self) -> Option<&str> {
        self.summary
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.description.as_deref().filter(|s| !s.is_empty()))
    }
}

/// Input buffer for a task being composed
///
/// Lives only on the client; cleared after a successful submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    /// Title field (required, must not be blank)
    pub title: String,
    /// Description field (optional)
    pub description: String,
}

impl TaskDraft {
    /// Create an empty draft
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the draft can be submitted (title is not blank)
    pub fn is_submittable(&self) -> bool {
        !self.title.trim().is_empty()
    }

    /// Reset both fields
    pub fn clear(&mut self) {
        self.title.clear();
        self.description.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: TaskId) -> Task {
        Task {
            id,
            title: format!("Task {}", id),
            description: None,
            summary: None,
            priority: Some("Medium".to_string()),
            completed: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_display_text_prefers_summary() {
        let mut t = task(1);
        t.description = Some("the long description".to_string());
        t.summary = Some("short".to_string());
        assert_eq!(t.display_text(), Some("short"));
    }

    #[test]
    fn test_display_text_falls_back_to_description() {
        let mut t = task(1);
        t.description = Some("the long description".to_string());
        t.summary = Some(String::new());
        assert_eq!(t.display_text(), Some("the long description"));

        t.summary = None;
        assert_eq!(t.display_text(), Some("the long description"));
    }

    #[test]
    fn test_display_text_empty() {
        let t = task(1);
        assert_eq!(t.display_text(), None);
    }

    #[test]
    fn test_task_deserialization_defaults() {
        // A minimal server payload still decodes
        let json = r#"{"id": 3, "title": "Buy milk", "created_at": "2024-05-01T10:00:00Z"}"#;
        let t: Task = serde_json::from_str(json).unwrap();
        assert_eq!(t.id, 3);
        assert_eq!(t.title, "Buy milk");
        assert!(t.description.is_none());
        assert!(t.priority.is_none());
        assert!(!t.completed);
    }

    #[test]
    fn test_task_serialization_round_trip() {
        let mut t = task(7);
        t.completed = true;
        t.description = Some("desc".to_string());
        let json = serde_json::to_string(&t).unwrap();
        let back: Task = serde_json::from_str(&json).unwrap();
        assert_eq!(t, back);
    }

    #[test]
    fn test_draft_submittable() {
        let mut draft = TaskDraft::new();
        assert!(!draft.is_submittable());

        draft.title = "   ".to_string();
        assert!(!draft.is_submittable());

        draft.title = "Water the plants".to_string();
        assert!(draft.is_submittable());
    }

    #[test]
    fn test_draft_clear() {
        let mut draft = TaskDraft {
            title: "a".to_string(),
            description: "b".to_string(),
        };
        draft.clear();
        assert_eq!(draft, TaskDraft::new());
    }
}
