//! Synchronization service
//!
//! Drives the write-then-refresh protocol: every user write goes to the
//! server and is followed by a full re-fetch, so local state never drifts
//! from server truth. Push messages route through [`TaskService::apply_update`];
//! only the initial snapshot skips the round trip.
//!
//! Failure policy: a failed request surfaces to the caller and the last
//! fetched snapshot stays in place. There is no retry here.

use tracing::debug;

use crate::api::TaskBackend;
use crate::error::{ApiError, ApiResult};
use crate::models::{Task, TaskDraft, TaskId};
use crate::state::TaskListState;
use crate::sync::{Reconcile, UpdateMessage};

/// The client's one mutable state container plus the backend that feeds it
pub struct TaskService<B> {
    backend: B,
    state: TaskListState,
}

impl<B: TaskBackend> TaskService<B> {
    /// Create a service with an empty, pre-fetch state
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            state: TaskListState::new(),
        }
    }

    /// The current snapshot
    pub fn tasks(&self) -> &[Task] {
        self.state.tasks()
    }

    /// The view state container
    pub fn state(&self) -> &TaskListState {
        &self.state
    }

    /// Fetch the authoritative snapshot and replace local state
    ///
    /// Refreshes are ticketed; if a newer snapshot was applied while this
    /// one was in flight, the stale result is discarded.
    pub async fn refresh(&mut self) -> ApiResult<()> {
        let ticket = self.state.begin_refresh();
        let tasks = self.backend.list_tasks().await?;
        if !self.state.apply(ticket, tasks) {
            debug!("Discarding superseded snapshot (ticket {})", ticket);
        }
        Ok(())
    }

    /// Submit a draft as a new task
    ///
    /// A blank title never issues a request; the draft is silently dropped
    /// and `None` is returned. On success the created task is returned and
    /// state has been refreshed from the server.
    pub async fn submit(&mut self, draft: &TaskDraft) -> ApiResult<Option<Task>> {
        if !draft.is_submittable() {
            return Ok(None);
        }

        let created = self
            .backend
            .create_task(&draft.title, &draft.description)
            .await?;
        self.refresh().await?;
        Ok(Some(created))
    }

    /// Set a task's completed flag, then refresh
    pub async fn set_completed(&mut self, id: TaskId, completed: bool) -> ApiResult<()> {
        self.backend.set_completed(id, completed).await?;
        self.refresh().await
    }

    /// Toggle a task's completed flag
    ///
    /// Sends the logical negation of the cached value.
    pub async fn toggle(&mut self, id: TaskId) -> ApiResult<()> {
        let completed = self
            .state
            .get(id)
            .ok_or(ApiError::UnknownTask(id))?
            .completed;
        self.set_completed(id, !completed).await
    }

    /// Delete a task, then refresh
    ///
    /// The user-confirmation gate lives in the caller; this is only invoked
    /// once the deletion is confirmed.
    pub async fn delete(&mut self, id: TaskId) -> ApiResult<()> {
        self.backend.delete_task(id).await?;
        self.refresh().await
    }

    /// Reconcile local state with a push message
    ///
    /// `init` replaces state directly from the payload; change
    /// notifications trigger one full refresh; anything else is a no-op.
    /// Returns whether state may have changed.
    pub async fn apply_update(&mut self, msg: UpdateMessage) -> ApiResult<bool> {
        match msg.reconcile() {
            Reconcile::Replace(tasks) => {
                let ticket = self.state.begin_refresh();
                self.state.apply(ticket, tasks);
                Ok(true)
            }
            Reconcile::Refresh => {
                self.refresh().await?;
                Ok(true)
            }
            Reconcile::Ignore => Ok(false),
        }
    }
}
