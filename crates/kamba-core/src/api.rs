//! HTTP client for the task resource
//!
//! Translates the four semantic operations into requests against
//! `<base>/tasks`. The base URL is injected at construction; nothing in
//! here reads ambient environment state.

use std::time::Duration;

use serde::Serialize;
use tracing::debug;

use crate::error::ApiError;
use crate::models::{Task, TaskId};

/// Request timeout in seconds
const REQUEST_TIMEOUT: u64 = 10;

/// The REST operations the synchronization service needs
///
/// Implemented by [`TaskApi`] against a live server, and by in-memory
/// fakes in tests.
#[allow(async_fn_in_trait)]
pub trait TaskBackend {
    /// Fetch the full task collection
    async fn list_tasks(&self) -> Result<Vec<Task>, ApiError>;

    /// Create a task; the server assigns id, priority, and timestamps
    async fn create_task(&self, title: &str, description: &str) -> Result<Task, ApiError>;

    /// Partial update of a task's `completed` flag
    async fn set_completed(&self, id: TaskId, completed: bool) -> Result<Task, ApiError>;

    /// Delete a task
    async fn delete_task(&self, id: TaskId) -> Result<(), ApiError>;
}

/// Body for POST /tasks
#[derive(Serialize)]
struct NewTask<'a> {
    title: &'a str,
    description: &'a str,
}

/// Body for PUT /tasks/{id}
#[derive(Serialize)]
struct CompletedUpdate {
    completed: bool,
}

/// reqwest-backed implementation of [`TaskBackend`]
pub struct TaskApi {
    client: reqwest::Client,
    base_url: String,
}

impl TaskApi {
    /// Create a client against the given base URL
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT))
            .user_agent(concat!("kamba/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self { client, base_url })
    }

    /// The configured base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn tasks_url(&self) -> String {
        format!("{}/tasks", self.base_url)
    }

    fn task_url(&self, id: TaskId) -> String {
        format!("{}/tasks/{}", self.base_url, id)
    }

    /// Map a non-success status to a typed error
    fn check(resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = resp.status();
        if status.is_success() {
            Ok(resp)
        } else {
            Err(ApiError::Status {
                status: status.as_u16(),
                path: resp.url().path().to_string(),
            })
        }
    }
}

impl TaskBackend for TaskApi {
    async fn list_tasks(&self) -> Result<Vec<Task>, ApiError> {
        let url = self.tasks_url();
        debug!("GET {}", url);
        let resp = self.client.get(&url).send().await?;
        Ok(Self::check(resp)?.json().await?)
    }

    async fn create_task(&self, title: &str, description: &str) -> Result<Task, ApiError> {
        let url = self.tasks_url();
        debug!("POST {}", url);
        let resp = self
            .client
            .post(&url)
            .json(&NewTask { title, description })
            .send()
            .await?;
        Ok(Self::check(resp)?.json().await?)
    }

    async fn set_completed(&self, id: TaskId, completed: bool) -> Result<Task, ApiError> {
        let url = self.task_url(id);
        debug!("PUT {} completed={}", url, completed);
        let resp = self
            .client
            .put(&url)
            .json(&CompletedUpdate { completed })
            .send()
            .await?;
        Ok(Self::check(resp)?.json().await?)
    }

    async fn delete_task(&self, id: TaskId) -> Result<(), ApiError> {
        let url = self.task_url(id);
        debug!("DELETE {}", url);
        let resp = self.client.delete(&url).send().await?;
        Self::check(resp)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_construction() {
        let api = TaskApi::new("http://localhost:8000").unwrap();
        assert_eq!(api.tasks_url(), "http://localhost:8000/tasks");
        assert_eq!(api.task_url(5), "http://localhost:8000/tasks/5");
    }

    #[test]
    fn test_trailing_slash_is_normalized() {
        let api = TaskApi::new("http://localhost:8000/").unwrap();
        assert_eq!(api.base_url(), "http://localhost:8000");
        assert_eq!(api.tasks_url(), "http://localhost:8000/tasks");
    }

    #[test]
    fn test_create_body_shape() {
        let body = serde_json::to_value(NewTask {
            title: "Buy milk",
            description: "2 liters",
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({"title": "Buy milk", "description": "2 liters"})
        );
    }

    #[test]
    fn test_completed_body_is_partial() {
        // The update body carries only the changed field
        let body = serde_json::to_value(CompletedUpdate { completed: true }).unwrap();
        assert_eq!(body, serde_json::json!({"completed": true}));
    }
}
