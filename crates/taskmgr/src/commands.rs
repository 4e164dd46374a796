use std::sync::Arc;

use anyhow::{Context, Result, bail};
use taskmgr_app::{ClientConfig, Effects, StoreHandle, install};
use taskmgr_core::form::{cover_from_thumbnail, default_cover};
use taskmgr_core::{
    Action, AppState, AuthAction, Priority, Project, ProjectAction, ProjectForm, ProjectId, Task, TaskAction, TaskId,
    TaskList, TaskListAction, TaskListId, UserId,
};
use taskmgr_http::Services;
use time::OffsetDateTime;
use tokio::task::JoinHandle;
use tracing::info;

use crate::Command;

/// Store, effects and services wired for one CLI invocation.
pub struct Session {
    config: ClientConfig,
    services: Services,
    store: StoreHandle,
    store_task: JoinHandle<()>,
    _effects: Effects,
}

impl Session {
    pub async fn start(config: ClientConfig) -> Result<Self> {
        let services = Services::connect(&config.base_uri, config.request_timeout())?;
        let (store, store_task) = StoreHandle::spawn(AppState::default(), config.backlog_warning);
        let effects = install(
            &store,
            &Arc::new(services.projects.clone()),
            &Arc::new(services.task_lists.clone()),
            &Arc::new(services.tasks.clone()),
            &Arc::new(services.users.clone()),
        );
        let session = Self {
            config,
            services,
            store,
            store_task,
            _effects: effects,
        };
        if let Some(user_id) = session.config.user_id.clone() {
            session.sign_in(&user_id).await?;
        }
        Ok(session)
    }

    async fn sign_in(&self, user_id: &UserId) -> Result<()> {
        let user = self
            .services
            .users
            .get(user_id)
            .await
            .with_context(|| format!("failed to load user {user_id}"))?;
        self.store
            .dispatch_until(AuthAction::SignedIn(user), |a| matches!(a, Action::Auth(_)))
            .await?;
        info!(user = %user_id, "Signed in");
        Ok(())
    }

    pub async fn shutdown(self) {
        self.store.shutdown();
        let _ = self.store_task.await;
    }

    /// Dispatch `action` and wait until each request in `requests` has settled.
    ///
    /// Stops early on the first failure, since follow-up requests never start.
    async fn settle(&self, action: impl Into<Action>, requests: &[&str]) -> Result<Vec<Action>> {
        let mut actions = self.store.subscribe("cli");
        self.store.dispatch(action)?;
        let mut settled: Vec<Option<Action>> = vec![None; requests.len()];
        while settled.iter().any(Option::is_none) {
            let Some(action) = actions.recv_action().await else {
                bail!("store stopped before the command finished");
            };
            let Some(slot) = requests
                .iter()
                .position(|request| settles(&action, request))
                .and_then(|index| settled.get_mut(index))
            else {
                continue;
            };
            let failed = action.failure().is_some();
            *slot = Some(action);
            if failed {
                break;
            }
        }
        Ok(settled.into_iter().flatten().collect())
    }

    async fn project(&self, id: &str) -> Result<Project> {
        let loaded = self.settle(ProjectAction::Load, &["[Project] Load"]).await?;
        if let Some(message) = loaded.iter().find_map(Action::failure) {
            bail!("failed to load projects: {message}");
        }
        self.store
            .snapshot()
            .projects
            .get(&ProjectId::new(id))
            .cloned()
            .with_context(|| format!("project {id} not found"))
    }

    fn cover(&self, index: usize) -> Result<String> {
        let thumbnails = self.config.thumbnails();
        thumbnails
            .get(index)
            .map(|thumb| cover_from_thumbnail(thumb))
            .with_context(|| format!("cover index {index} out of range (0..{})", thumbnails.len()))
    }
}

/// Whether `action` is the success or failure of `request`, e.g. `[Project] Add`.
fn settles(action: &Action, request: &str) -> bool {
    action
        .tag()
        .strip_prefix(request)
        .is_some_and(|rest| rest == " Success" || rest == " Fail")
}

pub async fn run(session: &Session, command: Command) -> Result<Vec<Action>> {
    match command {
        Command::Projects => session.settle(ProjectAction::Load, &["[Project] Load"]).await,
        Command::NewProject { name, desc, cover } => handle_new_project(session, name, desc, cover).await,
        Command::EditProject { id, name, desc, cover } => handle_edit_project(session, &id, name, desc, cover).await,
        Command::DeleteProject { id } => {
            let project = session.project(&id).await?;
            session
                .settle(
                    ProjectAction::Delete(project),
                    &["[Project] Delete", "[User] Remove Project Ref"],
                )
                .await
        }
        Command::SelectProject { id } => {
            let project = session.project(&id).await?;
            session
                .settle(
                    ProjectAction::Select(project),
                    &["[TaskList] Load", "[Task] Load In Lists", "[User] Load By Project"],
                )
                .await
        }
        Command::Invite { project, users } => handle_invite(session, project, &users).await,
        Command::Tasks { project } => {
            session
                .settle(
                    TaskListAction::Load(ProjectId::new(project)),
                    &["[TaskList] Load", "[Task] Load In Lists"],
                )
                .await
        }
        Command::AddTask {
            list,
            desc,
            priority,
            remark,
        } => handle_add_task(session, list, desc, priority, remark).await,
        Command::CompleteTask { list, id } => handle_complete_task(session, list, id).await,
        Command::MoveTask { id, to } => {
            session
                .settle(
                    TaskAction::Move {
                        task_id: TaskId::new(id),
                        task_list_id: TaskListId::new(to),
                    },
                    &["[Task] Move"],
                )
                .await
        }
        Command::MoveAll { from, to } => {
            session
                .settle(
                    TaskAction::MoveAll {
                        src_list_id: TaskListId::new(from),
                        target_list_id: TaskListId::new(to),
                    },
                    &["[Task] Move All"],
                )
                .await
        }
    }
}

async fn handle_new_project(
    session: &Session,
    name: String,
    desc: Option<String>,
    cover: Option<usize>,
) -> Result<Vec<Action>> {
    let thumbnails = session.config.thumbnails();
    let mut form = ProjectForm::create(default_cover(&thumbnails), thumbnails);
    form.name = name;
    form.desc = desc.unwrap_or_default();
    if let Some(index) = cover {
        form.cover_img = Some(session.cover(index)?);
    }
    let payload = form.submit()?;
    session
        .settle(
            ProjectAction::Add(payload.into_project()),
            &["[Project] Add", "[Project] Update Lists", "[User] Add Project Ref"],
        )
        .await
}

async fn handle_edit_project(
    session: &Session,
    id: &str,
    name: Option<String>,
    desc: Option<String>,
    cover: Option<usize>,
) -> Result<Vec<Action>> {
    let project = session.project(id).await?;
    let mut form = ProjectForm::edit(&project, session.config.thumbnails());
    if let Some(name) = name {
        form.name = name;
    }
    if let Some(desc) = desc {
        form.desc = desc;
    }
    if let Some(index) = cover {
        form.cover_img = Some(session.cover(index)?);
    }
    let payload = form.submit()?;
    session
        .settle(ProjectAction::Update(payload.apply_to(&project)), &["[Project] Update"])
        .await
}

async fn handle_invite(session: &Session, project: String, users: &[String]) -> Result<Vec<Action>> {
    let mut members = Vec::with_capacity(users.len());
    for id in users {
        let user = session
            .services
            .users
            .get(&UserId::new(id.as_str()))
            .await
            .with_context(|| format!("failed to load user {id}"))?;
        members.push(user);
    }
    session
        .settle(
            ProjectAction::Invite {
                project_id: ProjectId::new(project),
                members,
            },
            &["[Project] Invite", "[User] Batch Update Project Ref"],
        )
        .await
}

async fn handle_add_task(
    session: &Session,
    list: String,
    desc: String,
    priority: u8,
    remark: Option<String>,
) -> Result<Vec<Action>> {
    let priority = Priority::try_from(priority).map_err(anyhow::Error::msg)?;
    let owner = session.store.snapshot().auth.user_id().cloned();
    let task = Task {
        task_list_id: TaskListId::new(list),
        desc,
        priority,
        create_date: Some(OffsetDateTime::now_utc()),
        remark,
        participant_ids: owner.iter().cloned().collect(),
        owner_id: owner,
        ..Task::default()
    };
    session.settle(TaskAction::Add(task), &["[Task] Add"]).await
}

async fn handle_complete_task(session: &Session, list: String, id: String) -> Result<Vec<Action>> {
    let list = TaskList {
        id: Some(TaskListId::new(list)),
        ..TaskList::default()
    };
    let loaded = session
        .settle(TaskAction::LoadInLists(vec![list]), &["[Task] Load In Lists"])
        .await?;
    if let Some(message) = loaded.iter().find_map(Action::failure) {
        bail!("failed to load tasks: {message}");
    }
    let task = session
        .store
        .snapshot()
        .tasks
        .get(&TaskId::new(id.as_str()))
        .cloned()
        .with_context(|| format!("task {id} not found"))?;
    session.settle(TaskAction::Complete(task), &["[Task] Complete"]).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskmgr_core::{User, UserAction};

    #[test]
    fn settles_matches_success_and_failure_only() {
        let request = "[Project] Add";
        assert!(settles(&ProjectAction::AddSuccess(Project::default()).into(), request));
        assert!(settles(&ProjectAction::AddFail("boom".into()).into(), request));
        assert!(!settles(&ProjectAction::Add(Project::default()).into(), request));
        assert!(!settles(&ProjectAction::UpdateSuccess(Project::default()).into(), request));
    }

    #[test]
    fn settles_distinguishes_similar_prefixes() {
        let moved_all: Action = TaskAction::MoveAllSuccess(Vec::new()).into();
        assert!(settles(&moved_all, "[Task] Move All"));
        assert!(!settles(&moved_all, "[Task] Move"));

        let ref_added: Action = UserAction::AddProjectRefSuccess(User::default()).into();
        assert!(settles(&ref_added, "[User] Add Project Ref"));
    }
}
