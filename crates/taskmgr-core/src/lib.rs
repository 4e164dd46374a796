//! Domain types, action vocabulary and reducer for taskmgr.

/// Action vocabulary.
pub mod action;
/// Project form rules.
pub mod form;
/// Identifier types.
pub mod id;
/// Entities exchanged with the REST backend.
pub mod model;
/// Application state and reducer.
pub mod state;

pub use action::{Action, AuthAction, ProjectAction, RouterAction, TaskAction, TaskListAction, UserAction};
pub use form::{FormError, FormMode, ProjectForm, ProjectPayload};
pub use id::{ProjectId, TaskId, TaskListId, UserId};
pub use model::{Auth, Priority, Project, Task, TaskList, User, merge_unique};
pub use state::{AppState, EntityTable, FailureNotice, Keyed};
