//! Effect registrations, one module per entity.
//!
//! Request pipelines turn a request action into exactly one success or
//! failure action. Fan-out pipelines derive follow-up requests from success
//! actions so that, for example, creating a project also creates its default
//! task lists and references it from the owner.

mod project;
mod task;
mod task_list;
mod user;

use std::sync::Arc;

use crate::api::{ProjectApi, TaskApi, TaskListApi, UserApi};
use crate::pipeline::Effects;
use crate::store::StoreHandle;

pub(crate) const NOT_SIGNED_IN: &str = "no signed-in user";

/// Start every effect against `store`.
///
/// Listeners subscribe before this returns, so actions dispatched afterwards
/// are never missed.
pub fn install<P, L, T, U>(
    store: &StoreHandle,
    projects: &Arc<P>,
    task_lists: &Arc<L>,
    tasks: &Arc<T>,
    users: &Arc<U>,
) -> Effects
where
    P: ProjectApi,
    L: TaskListApi,
    T: TaskApi,
    U: UserApi,
{
    let mut effects = Effects::new(store.clone());
    project::register(&mut effects, projects);
    task_list::register(&mut effects, task_lists);
    task::register(&mut effects, tasks);
    user::register(&mut effects, users);
    effects
}
