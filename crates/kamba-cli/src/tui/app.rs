//! Application state and logic

use kamba_core::{Task, TaskDraft, TaskId};

/// Input mode for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Normal navigation mode
    Normal,
    /// Editing the new-task form (after pressing a)
    Draft,
    /// Confirming a delete (after pressing d)
    ConfirmDelete,
}

/// Which field of the draft form is being edited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Title,
    Description,
}

impl DraftField {
    /// Move to the other field
    pub fn next(self) -> Self {
        match self {
            DraftField::Title => DraftField::Description,
            DraftField::Description => DraftField::Title,
        }
    }
}

/// Push-channel indicator shown in the top-right corner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelIndicator {
    /// Subscription is live
    Live,
    /// Trying to (re)connect
    Connecting,
    /// No connection; the view works fetch-only
    Offline,
}

/// Application state
pub struct App {
    /// Whether the app should exit
    pub should_quit: bool,
    /// Current input mode
    pub input_mode: InputMode,
    /// Rendered copy of the current snapshot
    pub tasks: Vec<Task>,
    /// Currently selected task index
    pub task_index: usize,
    /// New-task input buffer
    pub draft: TaskDraft,
    /// Which draft field has focus
    pub draft_field: DraftField,
    /// Task awaiting delete confirmation
    pub pending_delete: Option<TaskId>,
    /// Status message to display temporarily
    pub status_message: Option<String>,
    /// When the status message was set (for auto-dismiss)
    pub status_message_time: Option<std::time::Instant>,
    /// Push-channel indicator
    pub channel_status: ChannelIndicator,
    /// Whether help overlay is visible
    pub show_help: bool,
}

impl App {
    /// Create a new app with an empty task list
    pub fn new() -> Self {
        Self {
            should_quit: false,
            input_mode: InputMode::Normal,
            tasks: Vec::new(),
            task_index: 0,
            draft: TaskDraft::new(),
            draft_field: DraftField::Title,
            pending_delete: None,
            status_message: None,
            status_message_time: None,
            channel_status: ChannelIndicator::Connecting,
            show_help: false,
        }
    }

    /// Mirror the service snapshot for rendering
    pub fn sync_tasks(&mut self, tasks: &[Task]) {
        self.tasks = tasks.to_vec();
        if self.task_index >= self.tasks.len() {
            self.task_index = self.tasks.len().saturating_sub(1);
        }
    }

    /// Get the currently selected task
    pub fn current_task(&self) -> Option<&Task> {
        self.tasks.get(self.task_index)
    }

    /// Set a status message (will auto-dismiss after 3 seconds)
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.status_message_time = Some(std::time::Instant::now());
    }

    /// Check and clear expired status message
    pub fn check_status_timeout(&mut self) {
        if let Some(time) = self.status_message_time {
            if time.elapsed() > std::time::Duration::from_secs(3) {
                self.status_message = None;
                self.status_message_time = None;
            }
        }
    }

    /// Toggle help overlay
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Move selection up
    pub fn move_up(&mut self) {
        if self.task_index > 0 {
            self.task_index -= 1;
        }
    }

    /// Move selection down
    pub fn move_down(&mut self) {
        if self.task_index < self.tasks.len().saturating_sub(1) {
            self.task_index += 1;
        }
    }

    /// Jump to the first task
    pub fn move_to_first(&mut self) {
        self.task_index = 0;
    }

    /// Jump to the last task
    pub fn move_to_last(&mut self) {
        self.task_index = self.tasks.len().saturating_sub(1);
    }

    /// Open the new-task form
    pub fn enter_draft_mode(&mut self) {
        self.input_mode = InputMode::Draft;
        self.draft_field = DraftField::Title;
    }

    /// Close the form, discarding the buffer
    pub fn cancel_draft(&mut self) {
        self.draft.clear();
        self.draft_field = DraftField::Title;
        self.input_mode = InputMode::Normal;
    }

    /// Close the form after a successful submit
    pub fn finish_draft(&mut self) {
        self.cancel_draft();
    }

    /// Insert a character into the focused draft field
    pub fn draft_insert(&mut self, c: char) {
        match self.draft_field {
            DraftField::Title => self.draft.title.push(c),
            DraftField::Description => self.draft.description.push(c),
        }
    }

    /// Delete the last character of the focused draft field
    pub fn draft_backspace(&mut self) {
        match self.draft_field {
            DraftField::Title => {
                self.draft.title.pop();
            }
            DraftField::Description => {
                self.draft.description.pop();
            }
        }
    }

    /// Switch focus between the draft fields
    pub fn draft_switch_field(&mut self) {
        self.draft_field = self.draft_field.next();
    }

    /// Ask for confirmation before deleting the selected task
    ///
    /// Returns whether the modal was opened (false when nothing is
    /// selected). No request is issued here.
    pub fn request_delete(&mut self) -> bool {
        match self.current_task() {
            Some(task) => {
                self.pending_delete = Some(task.id);
                self.input_mode = InputMode::ConfirmDelete;
                true
            }
            None => false,
        }
    }

    /// Decline the pending delete; nothing is issued
    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
        self.input_mode = InputMode::Normal;
    }

    /// Confirm the pending delete, yielding the id to actually delete
    pub fn take_confirmed_delete(&mut self) -> Option<TaskId> {
        self.input_mode = InputMode::Normal;
        self.pending_delete.take()
    }

    /// Title of the task awaiting confirmation, for the modal
    pub fn pending_delete_title(&self) -> Option<&str> {
        let id = self.pending_delete?;
        self.tasks
            .iter()
            .find(|t| t.id == id)
            .map(|t| t.title.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn task(id: TaskId, title: &str) -> Task {
        Task {
            id,
            title: title.to_string(),
            description: None,
            summary: None,
            priority: None,
            completed: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_navigation_clamps() {
        let mut app = App::new();
        app.sync_tasks(&[task(1, "A"), task(2, "B")]);

        app.move_up();
        assert_eq!(app.task_index, 0);

        app.move_down();
        app.move_down();
        assert_eq!(app.task_index, 1);

        app.move_to_first();
        assert_eq!(app.task_index, 0);
        app.move_to_last();
        assert_eq!(app.task_index, 1);
    }

    #[test]
    fn test_sync_tasks_clamps_selection() {
        let mut app = App::new();
        app.sync_tasks(&[task(1, "A"), task(2, "B"), task(3, "C")]);
        app.task_index = 2;

        // The server dropped two tasks out from under us
        app.sync_tasks(&[task(1, "A")]);
        assert_eq!(app.task_index, 0);
        assert_eq!(app.current_task().unwrap().id, 1);
    }

    #[test]
    fn test_draft_editing() {
        let mut app = App::new();
        app.enter_draft_mode();
        assert_eq!(app.input_mode, InputMode::Draft);
        assert_eq!(app.draft_field, DraftField::Title);

        for c in "Buy milk".chars() {
            app.draft_insert(c);
        }
        app.draft_switch_field();
        for c in "2 liters".chars() {
            app.draft_insert(c);
        }
        app.draft_backspace();

        assert_eq!(app.draft.title, "Buy milk");
        assert_eq!(app.draft.description, "2 liter");

        app.cancel_draft();
        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(app.draft.title.is_empty());
        assert!(app.draft.description.is_empty());
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let mut app = App::new();
        app.sync_tasks(&[task(7, "A")]);

        assert!(app.request_delete());
        assert_eq!(app.input_mode, InputMode::ConfirmDelete);
        assert_eq!(app.pending_delete, Some(7));
        assert_eq!(app.pending_delete_title(), Some("A"));

        // Declining yields no id to delete
        app.cancel_delete();
        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(app.pending_delete.is_none());
        assert!(app.take_confirmed_delete().is_none());
    }

    #[test]
    fn test_delete_confirmation_yields_id_once() {
        let mut app = App::new();
        app.sync_tasks(&[task(7, "A")]);

        app.request_delete();
        assert_eq!(app.take_confirmed_delete(), Some(7));
        assert_eq!(app.input_mode, InputMode::Normal);
        // Consumed
        assert!(app.take_confirmed_delete().is_none());
    }

    #[test]
    fn test_request_delete_with_no_tasks() {
        let mut app = App::new();
        assert!(!app.request_delete());
        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(app.pending_delete.is_none());
    }
}
