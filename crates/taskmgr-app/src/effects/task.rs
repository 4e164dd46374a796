use std::sync::Arc;

use taskmgr_core::{Action, TaskAction};

use crate::api::TaskApi;
use crate::pipeline::{Effects, Flatten, settle};

/// Register every task effect.
pub fn register<A: TaskApi>(effects: &mut Effects, api: &Arc<A>) {
    // Several boards may load at once; every batch is kept.
    effects.on_request(
        "task.load_in_lists",
        Flatten::Merge,
        |action: &Action| match action {
            Action::Task(TaskAction::LoadInLists(lists)) => Some(lists.clone()),
            _ => None,
        },
        Arc::clone(api),
        |api, lists, _state| async move {
            settle(
                "task.load_in_lists",
                api.get_by_lists(&lists).await,
                TaskAction::LoadInListsSuccess,
                TaskAction::LoadInListsFail,
            )
        },
    );

    effects.on_request(
        "task.add",
        Flatten::Switch,
        |action: &Action| match action {
            Action::Task(TaskAction::Add(task)) => Some(task.clone()),
            _ => None,
        },
        Arc::clone(api),
        |api, task, _state| async move {
            settle("task.add", api.add(&task).await, TaskAction::AddSuccess, TaskAction::AddFail)
        },
    );

    effects.on_request(
        "task.update",
        Flatten::Switch,
        |action: &Action| match action {
            Action::Task(TaskAction::Update(task)) => Some(task.clone()),
            _ => None,
        },
        Arc::clone(api),
        |api, task, _state| async move {
            settle("task.update", api.update(&task).await, TaskAction::UpdateSuccess, TaskAction::UpdateFail)
        },
    );

    effects.on_request(
        "task.delete",
        Flatten::Switch,
        |action: &Action| match action {
            Action::Task(TaskAction::Delete(task)) => Some(task.clone()),
            _ => None,
        },
        Arc::clone(api),
        |api, task, _state| async move {
            settle("task.delete", api.del(&task).await, TaskAction::DeleteSuccess, TaskAction::DeleteFail)
        },
    );

    effects.on_request(
        "task.complete",
        Flatten::Switch,
        |action: &Action| match action {
            Action::Task(TaskAction::Complete(task)) => Some(task.clone()),
            _ => None,
        },
        Arc::clone(api),
        |api, task, _state| async move {
            settle(
                "task.complete",
                api.complete(&task).await,
                TaskAction::CompleteSuccess,
                TaskAction::CompleteFail,
            )
        },
    );

    effects.on_request(
        "task.move",
        Flatten::Switch,
        |action: &Action| match action {
            Action::Task(TaskAction::Move { task_id, task_list_id }) => Some((task_id.clone(), task_list_id.clone())),
            _ => None,
        },
        Arc::clone(api),
        |api, (task_id, task_list_id), _state| async move {
            settle(
                "task.move",
                api.move_to(&task_id, &task_list_id).await,
                TaskAction::MoveSuccess,
                TaskAction::MoveFail,
            )
        },
    );

    effects.on_request(
        "task.move_all",
        Flatten::Switch,
        |action: &Action| match action {
            Action::Task(TaskAction::MoveAll {
                src_list_id,
                target_list_id,
            }) => Some((src_list_id.clone(), target_list_id.clone())),
            _ => None,
        },
        Arc::clone(api),
        |api, (src, target), _state| async move {
            settle(
                "task.move_all",
                api.move_all(&src, &target).await,
                TaskAction::MoveAllSuccess,
                TaskAction::MoveAllFail,
            )
        },
    );
}
