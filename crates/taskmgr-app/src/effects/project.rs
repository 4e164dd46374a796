use std::sync::Arc;

use taskmgr_core::{Action, ProjectAction, RouterAction, TaskListAction, UserAction};
use tracing::warn;

use super::NOT_SIGNED_IN;
use crate::api::ProjectApi;
use crate::pipeline::{Effects, Flatten, settle};

/// Register every project effect.
pub fn register<A: ProjectApi>(effects: &mut Effects, api: &Arc<A>) {
    register_requests(effects, api);
    register_fan_out(effects);
}

fn register_requests<A: ProjectApi>(effects: &mut Effects, api: &Arc<A>) {
    effects.on_request(
        "project.load",
        Flatten::Switch,
        |action: &Action| matches!(action, Action::Project(ProjectAction::Load)).then_some(()),
        Arc::clone(api),
        |api, (), state| async move {
            let Some(owner) = state.auth.user_id().cloned() else {
                warn!("Project load requested while signed out");
                return ProjectAction::LoadFail(NOT_SIGNED_IN.into()).into();
            };
            settle("project.load", api.get(&owner).await, ProjectAction::LoadSuccess, ProjectAction::LoadFail)
        },
    );

    effects.on_request(
        "project.add",
        Flatten::Switch,
        |action: &Action| match action {
            Action::Project(ProjectAction::Add(project)) => Some(project.clone()),
            _ => None,
        },
        Arc::clone(api),
        |api, mut project, state| async move {
            let Some(owner) = state.auth.user_id().cloned() else {
                warn!("Project creation requested while signed out");
                return ProjectAction::AddFail(NOT_SIGNED_IN.into()).into();
            };
            project.members = vec![owner];
            settle("project.add", api.add(&project).await, ProjectAction::AddSuccess, ProjectAction::AddFail)
        },
    );

    effects.on_request(
        "project.update",
        Flatten::Switch,
        |action: &Action| match action {
            Action::Project(ProjectAction::Update(project)) => Some(project.clone()),
            _ => None,
        },
        Arc::clone(api),
        |api, project, _state| async move {
            settle(
                "project.update",
                api.update(&project).await,
                ProjectAction::UpdateSuccess,
                ProjectAction::UpdateFail,
            )
        },
    );

    effects.on_request(
        "project.update_lists",
        Flatten::Switch,
        |action: &Action| match action {
            Action::Project(ProjectAction::UpdateLists(project)) => Some(project.clone()),
            _ => None,
        },
        Arc::clone(api),
        |api, project, _state| async move {
            settle(
                "project.update_lists",
                api.update_task_lists(&project).await,
                ProjectAction::UpdateListsSuccess,
                ProjectAction::UpdateListsFail,
            )
        },
    );

    effects.on_request(
        "project.delete",
        Flatten::Switch,
        |action: &Action| match action {
            Action::Project(ProjectAction::Delete(project)) => Some(project.clone()),
            _ => None,
        },
        Arc::clone(api),
        |api, project, _state| async move {
            settle(
                "project.delete",
                api.del(&project).await,
                ProjectAction::DeleteSuccess,
                ProjectAction::DeleteFail,
            )
        },
    );

    effects.on_request(
        "project.invite",
        Flatten::Switch,
        |action: &Action| match action {
            Action::Project(ProjectAction::Invite { project_id, members }) => {
                Some((project_id.clone(), members.clone()))
            }
            _ => None,
        },
        Arc::clone(api),
        |api, (project_id, members), _state| async move {
            settle(
                "project.invite",
                api.invite_members(&project_id, &members).await,
                ProjectAction::InviteSuccess,
                ProjectAction::InviteFail,
            )
        },
    );
}

fn register_fan_out(effects: &mut Effects) {
    effects.on_map("project.select.route", |action, _state| match action {
        Action::Project(ProjectAction::Select(project)) => {
            let id = project.id.as_ref()?;
            Some(RouterAction::Go(format!("/tasklists/{id}")).into())
        }
        _ => None,
    });

    effects.on_map("project.select.lists", |action, _state| match action {
        Action::Project(ProjectAction::Select(project)) => Some(TaskListAction::Load(project.id.clone()?).into()),
        _ => None,
    });

    effects.on_map("project.select.members", |action, _state| match action {
        Action::Project(ProjectAction::Select(project)) => {
            Some(UserAction::LoadByProject(project.id.clone()?).into())
        }
        _ => None,
    });

    effects.on_map("project.created.lists", |action, _state| match action {
        Action::Project(ProjectAction::AddSuccess(project)) => Some(TaskListAction::Init(project.clone()).into()),
        _ => None,
    });

    effects.on_map("project.created.owner", |action, state| match action {
        Action::Project(ProjectAction::AddSuccess(project)) => {
            let Some(user) = state.auth.user.clone() else {
                warn!("Created project has no signed-in owner to reference it");
                return None;
            };
            Some(
                UserAction::AddProjectRef {
                    user,
                    project_id: project.id.clone()?,
                }
                .into(),
            )
        }
        _ => None,
    });

    effects.on_map("project.deleted.owner", |action, state| match action {
        Action::Project(ProjectAction::DeleteSuccess(project)) => {
            let Some(user) = state.auth.user.clone() else {
                warn!("Deleted project has no signed-in owner to dereference it");
                return None;
            };
            Some(
                UserAction::RemoveProjectRef {
                    user,
                    project_id: project.id.clone()?,
                }
                .into(),
            )
        }
        _ => None,
    });

    effects.on_map("project.invited.members", |action, _state| match action {
        Action::Project(ProjectAction::InviteSuccess(project)) => {
            Some(UserAction::BatchUpdateProjectRef(project.clone()).into())
        }
        _ => None,
    });
}
