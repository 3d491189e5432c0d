//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use kamba_core::Task;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Check if output is in quiet mode
    pub fn is_quiet(&self) -> bool {
        matches!(self.format, OutputFormat::Quiet)
    }

    /// Print a single task
    pub fn print_task(&self, task: &Task) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:          {}", task.id);
                println!("Title:       {}", task.title);
                if let Some(text) = task.display_text() {
                    println!("Description: {}", text);
                }
                if let Some(ref priority) = task.priority {
                    println!("Priority:    {}", priority);
                }
                println!("Completed:   {}", if task.completed { "yes" } else { "no" });
                println!("Created:     {}", task.created_at.format("%Y-%m-%d %H:%M"));
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(task).unwrap());
            }
            OutputFormat::Quiet => {
                println!("{}", task.id);
            }
        }
    }

    /// Print a list of tasks
    pub fn print_tasks(&self, tasks: &[Task]) {
        match self.format {
            OutputFormat::Human => {
                if tasks.is_empty() {
                    println!("No tasks found.");
                    return;
                }
                for task in tasks {
                    let mark = if task.completed { "[x]" } else { "[ ]" };
                    let priority = task
                        .priority
                        .as_deref()
                        .map(|p| format!(" ({})", p))
                        .unwrap_or_default();
                    println!(
                        "{:>4} {} {}{}",
                        task.id,
                        mark,
                        truncate(&task.title, 45),
                        priority
                    );
                }
                println!("\n{} task(s)", tasks.len());
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(tasks).unwrap());
            }
            OutputFormat::Quiet => {
                for task in tasks {
                    println!("{}", task.id);
                }
            }
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Check if we should prompt for confirmation
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }
}

/// Truncate a string to max length, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_flags() {
        assert_eq!(OutputFormat::from_flags(false, false), OutputFormat::Human);
        assert_eq!(OutputFormat::from_flags(true, false), OutputFormat::Json);
        assert_eq!(OutputFormat::from_flags(false, true), OutputFormat::Quiet);
        // Quiet takes precedence
        assert_eq!(OutputFormat::from_flags(true, true), OutputFormat::Quiet);
    }

    #[test]
    fn test_should_prompt() {
        assert!(Output::new(OutputFormat::Human).should_prompt());
        assert!(!Output::new(OutputFormat::Json).should_prompt());
        assert!(!Output::new(OutputFormat::Quiet).should_prompt());
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("this is a long string", 10), "this is...");
    }
}
