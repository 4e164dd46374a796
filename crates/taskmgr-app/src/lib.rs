//! Application layer for taskmgr.
//!
//! This crate owns the action store, the effect pipelines that talk to the
//! backend, and client configuration shared by every front end.

pub mod api;
pub mod config;
pub mod effects;
pub mod pipeline;
pub mod store;

// Re-exports for convenience
pub use api::{ProjectApi, TaskApi, TaskListApi, UserApi};
pub use config::{ClientConfig, CoverConfig};
pub use effects::install;
pub use pipeline::{Effects, Flatten, settle};
pub use store::{Applied, StoreError, StoreHandle, Subscription};
