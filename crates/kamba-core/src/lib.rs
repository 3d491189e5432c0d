//! Kamba Core Library
//!
//! This crate provides the client-side core of Kamba, a task list that
//! lives on a REST backend and announces out-of-band changes over a
//! WebSocket update stream.
//!
//! # Architecture
//!
//! The server owns the data. The client holds one snapshot of the task
//! collection and keeps it converged by full replacement: every write is
//! followed by a re-fetch, and every change notification from the push
//! channel triggers one. There are no partial merges, so local state is
//! always either empty or exactly a server response.
//!
//! # Quick Start
//!
//! ```text
//! let config = Config::load()?;
//! let api = TaskApi::new(&config.api_url)?;
//! let mut service = TaskService::new(api);
//!
//! service.refresh().await?;
//! for task in service.tasks() {
//!     println!("{}", task.title);
//! }
//! ```
//!
//! # Modules
//!
//! - `service`: synchronization service (main entry point)
//! - `api`: REST client for the task resource
//! - `sync`: push-channel listener and message types
//! - `models`: task record and draft buffer
//! - `state`: snapshot container with last-fetch-wins tickets
//! - `config`: application configuration

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod service;
pub mod state;
pub mod sync;

pub use api::{TaskApi, TaskBackend};
pub use config::Config;
pub use error::{ApiError, ApiResult};
pub use models::{Task, TaskDraft, TaskId};
pub use service::TaskService;
pub use state::TaskListState;
