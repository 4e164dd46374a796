//! REST service wrappers for the taskmgr backend.
//!
//! Every call issues one or more HTTP requests and resolves to a single
//! value. Nothing is retried and no status code is treated specially.

mod client;
pub mod error;
mod project;
mod task;
mod task_list;
mod user;

use std::time::Duration;

pub use client::HttpClient;
pub use error::{HttpError, Result};
pub use project::ProjectService;
pub use task::TaskService;
pub use task_list::{DEFAULT_LISTS, TaskListService};
pub use user::UserService;

/// Every resource service, sharing one client.
#[derive(Debug, Clone)]
pub struct Services {
    /// `/projects`.
    pub projects: ProjectService,
    /// `/tasks`.
    pub tasks: TaskService,
    /// `/taskLists`.
    pub task_lists: TaskListService,
    /// `/users`.
    pub users: UserService,
}

impl Services {
    /// Build all services against `base_uri`.
    ///
    /// # Errors
    /// Returns an error when the client cannot be built.
    pub fn connect(base_uri: &str, timeout: Option<Duration>) -> Result<Self> {
        let client = HttpClient::new(base_uri, timeout)?;
        Ok(Self {
            projects: ProjectService::new(client.clone()),
            tasks: TaskService::new(client.clone()),
            task_lists: TaskListService::new(client.clone()),
            users: UserService::new(client),
        })
    }
}
