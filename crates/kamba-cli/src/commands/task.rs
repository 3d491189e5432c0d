//! Task command handlers

use anyhow::{bail, Context, Result};

use kamba_core::{TaskBackend, TaskDraft, TaskId, TaskService};

use crate::output::Output;
use crate::prompt::confirm;

/// List all tasks
pub async fn list<B: TaskBackend>(service: &mut TaskService<B>, output: &Output) -> Result<()> {
    service.refresh().await.context("Failed to fetch tasks")?;
    output.print_tasks(service.tasks());
    Ok(())
}

/// Add a new task
pub async fn add<B: TaskBackend>(
    service: &mut TaskService<B>,
    title: String,
    description: String,
    output: &Output,
) -> Result<()> {
    let draft = TaskDraft { title, description };

    let created = service
        .submit(&draft)
        .await
        .context("Failed to create task")?;

    let Some(created) = created else {
        bail!("Title must not be empty");
    };

    output.success(&format!("Created task: {}", created.id));
    output.print_task(&created);

    Ok(())
}

/// Set a task's completed flag
pub async fn set_completed<B: TaskBackend>(
    service: &mut TaskService<B>,
    id: TaskId,
    completed: bool,
    output: &Output,
) -> Result<()> {
    service
        .set_completed(id, completed)
        .await
        .with_context(|| format!("Failed to update task {}", id))?;

    output.success(if completed {
        "Task completed"
    } else {
        "Task reopened"
    });

    Ok(())
}

/// Delete a task
pub async fn delete<B: TaskBackend>(
    service: &mut TaskService<B>,
    id: TaskId,
    output: &Output,
) -> Result<()> {
    // Confirm deletion; a declined prompt issues no request at all
    if output.should_prompt() {
        service.refresh().await.context("Failed to fetch tasks")?;
        if let Some(task) = service.state().get(id) {
            println!("Delete task: {} - {}", id, task.title);
        }
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    service
        .delete(id)
        .await
        .with_context(|| format!("Failed to delete task {}", id))?;

    output.success(&format!("Deleted task: {}", id));

    Ok(())
}
