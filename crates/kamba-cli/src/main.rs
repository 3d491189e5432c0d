//! Kamba CLI
//!
//! Command-line interface for Kamba - a task list served by a REST backend
//! with live updates over a push channel.

use anyhow::Result;
use clap::{Parser, Subcommand};

use kamba_core::{Config, TaskApi, TaskService};

mod commands;
mod output;
mod prompt;
mod tui;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "kamba")]
#[command(about = "Kamba - task list client")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// API base URL (overrides configuration)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the TUI interface
    Tui,
    /// List all tasks
    #[command(alias = "ls")]
    List,
    /// Add a new task
    Add {
        /// Task title
        title: String,
        /// Optional description
        #[arg(short, long, default_value = "")]
        description: String,
    },
    /// Mark a task as completed
    Done {
        /// Task id
        id: i64,
    },
    /// Reopen a completed task
    Reopen {
        /// Task id
        id: i64,
    },
    /// Delete a task
    #[command(alias = "rm")]
    Delete {
        /// Task id
        id: i64,
    },
    /// Follow live updates and re-list on every change
    Watch,
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (api_url, log_file)
        key: String,
        /// Configuration value
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    // Config commands don't need the API
    if let Some(Commands::Config { command }) = &cli.command {
        return match command.clone() {
            Some(ConfigCommands::Show) | None => commands::config::show(&output),
            Some(ConfigCommands::Set { key, value }) => {
                commands::config::set(key, value, &output)
            }
        };
    }

    let mut config = Config::load()?;
    if let Some(url) = cli.api_url {
        config.api_url = url;
    }

    // TUI is the default when no command is given
    if matches!(&cli.command, Some(Commands::Tui) | None) {
        return tui::run(config).await;
    }

    if matches!(&cli.command, Some(Commands::Watch)) {
        return commands::watch::run(&config, &output).await;
    }

    let api = TaskApi::new(&config.api_url)?;
    let mut service = TaskService::new(api);

    match cli.command.unwrap() {
        Commands::Tui | Commands::Config { .. } | Commands::Watch => unreachable!(), // Handled above
        Commands::List => commands::task::list(&mut service, &output).await,
        Commands::Add { title, description } => {
            commands::task::add(&mut service, title, description, &output).await
        }
        Commands::Done { id } => commands::task::set_completed(&mut service, id, true, &output).await,
        Commands::Reopen { id } => {
            commands::task::set_completed(&mut service, id, false, &output).await
        }
        Commands::Delete { id } => commands::task::delete(&mut service, id, &output).await,
    }
}
