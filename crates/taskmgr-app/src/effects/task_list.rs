use std::sync::Arc;

use taskmgr_core::{Action, ProjectAction, TaskAction, TaskListAction};

use crate::api::TaskListApi;
use crate::pipeline::{Effects, Flatten, settle};

/// Register every task-list effect.
pub fn register<A: TaskListApi>(effects: &mut Effects, api: &Arc<A>) {
    effects.on_request(
        "task_list.load",
        Flatten::Switch,
        |action: &Action| match action {
            Action::TaskList(TaskListAction::Load(project_id)) => Some(project_id.clone()),
            _ => None,
        },
        Arc::clone(api),
        |api, project_id, _state| async move {
            settle(
                "task_list.load",
                api.get(&project_id).await,
                TaskListAction::LoadSuccess,
                TaskListAction::LoadFail,
            )
        },
    );

    effects.on_request(
        "task_list.add",
        Flatten::Switch,
        |action: &Action| match action {
            Action::TaskList(TaskListAction::Add(list)) => Some(list.clone()),
            _ => None,
        },
        Arc::clone(api),
        |api, list, _state| async move {
            settle("task_list.add", api.add(&list).await, TaskListAction::AddSuccess, TaskListAction::AddFail)
        },
    );

    effects.on_request(
        "task_list.update",
        Flatten::Switch,
        |action: &Action| match action {
            Action::TaskList(TaskListAction::Update(list)) => Some(list.clone()),
            _ => None,
        },
        Arc::clone(api),
        |api, list, _state| async move {
            settle(
                "task_list.update",
                api.update(&list).await,
                TaskListAction::UpdateSuccess,
                TaskListAction::UpdateFail,
            )
        },
    );

    effects.on_request(
        "task_list.delete",
        Flatten::Switch,
        |action: &Action| match action {
            Action::TaskList(TaskListAction::Delete(list)) => Some(list.clone()),
            _ => None,
        },
        Arc::clone(api),
        |api, list, _state| async move {
            settle(
                "task_list.delete",
                api.del(&list).await,
                TaskListAction::DeleteSuccess,
                TaskListAction::DeleteFail,
            )
        },
    );

    effects.on_request(
        "task_list.swap",
        Flatten::Switch,
        |action: &Action| match action {
            Action::TaskList(TaskListAction::Swap { src, target }) => Some((src.clone(), target.clone())),
            _ => None,
        },
        Arc::clone(api),
        |api, (src, target), _state| async move {
            settle(
                "task_list.swap",
                api.swap_order(&src, &target).await,
                |(src, target)| TaskListAction::SwapSuccess(vec![src, target]),
                TaskListAction::SwapFail,
            )
        },
    );

    // Each new project gets its own defaults; none may be dropped.
    effects.on_request(
        "task_list.init",
        Flatten::Merge,
        |action: &Action| match action {
            Action::TaskList(TaskListAction::Init(project)) => Some(project.clone()),
            _ => None,
        },
        Arc::clone(api),
        |api, project, _state| async move {
            settle(
                "task_list.init",
                api.init_for_project(&project).await,
                TaskListAction::InitSuccess,
                TaskListAction::InitFail,
            )
        },
    );

    effects.on_map("task_list.loaded.tasks", |action, _state| match action {
        Action::TaskList(TaskListAction::LoadSuccess(lists)) => Some(TaskAction::LoadInLists(lists.clone()).into()),
        _ => None,
    });

    effects.on_map("task_list.initialized.project", |action, _state| match action {
        Action::TaskList(TaskListAction::InitSuccess(project)) => {
            Some(ProjectAction::UpdateLists(project.clone()).into())
        }
        _ => None,
    });
}
