use std::sync::Arc;

use taskmgr_core::{Action, UserAction};

use crate::api::UserApi;
use crate::pipeline::{Effects, Flatten, settle};

/// Register every user effect.
pub fn register<A: UserApi>(effects: &mut Effects, api: &Arc<A>) {
    effects.on_request(
        "user.load_by_project",
        Flatten::Switch,
        |action: &Action| match action {
            Action::User(UserAction::LoadByProject(project_id)) => Some(project_id.clone()),
            _ => None,
        },
        Arc::clone(api),
        |api, project_id, _state| async move {
            settle(
                "user.load_by_project",
                api.get_by_project(&project_id).await,
                UserAction::LoadByProjectSuccess,
                UserAction::LoadByProjectFail,
            )
        },
    );

    effects.on_request(
        "user.search",
        Flatten::Switch,
        |action: &Action| match action {
            Action::User(UserAction::Search(filter)) => Some(filter.clone()),
            _ => None,
        },
        Arc::clone(api),
        |api, filter, _state| async move {
            settle("user.search", api.search(&filter).await, UserAction::SearchSuccess, UserAction::SearchFail)
        },
    );

    // Reference updates touch different users; all of them must land.
    effects.on_request(
        "user.add_project_ref",
        Flatten::Merge,
        |action: &Action| match action {
            Action::User(UserAction::AddProjectRef { user, project_id }) => Some((user.clone(), project_id.clone())),
            _ => None,
        },
        Arc::clone(api),
        |api, (user, project_id), _state| async move {
            settle(
                "user.add_project_ref",
                api.add_project_ref(&user, &project_id).await,
                UserAction::AddProjectRefSuccess,
                UserAction::AddProjectRefFail,
            )
        },
    );

    effects.on_request(
        "user.remove_project_ref",
        Flatten::Merge,
        |action: &Action| match action {
            Action::User(UserAction::RemoveProjectRef { user, project_id }) => {
                Some((user.clone(), project_id.clone()))
            }
            _ => None,
        },
        Arc::clone(api),
        |api, (user, project_id), _state| async move {
            settle(
                "user.remove_project_ref",
                api.remove_project_ref(&user, &project_id).await,
                UserAction::RemoveProjectRefSuccess,
                UserAction::RemoveProjectRefFail,
            )
        },
    );

    effects.on_request(
        "user.batch_update_project_ref",
        Flatten::Merge,
        |action: &Action| match action {
            Action::User(UserAction::BatchUpdateProjectRef(project)) => Some(project.clone()),
            _ => None,
        },
        Arc::clone(api),
        |api, project, _state| async move {
            settle(
                "user.batch_update_project_ref",
                api.batch_update_project_ref(&project).await,
                UserAction::BatchUpdateProjectRefSuccess,
                UserAction::BatchUpdateProjectRefFail,
            )
        },
    );
}
