//! Action vocabulary shared by the store, reducers and effects.
//!
//! Every request variant has a `*Success` and a `*Fail` counterpart. Failure
//! variants carry the rendered error chain of whatever went wrong.

use crate::id::{ProjectId, TaskId, TaskListId};
use crate::model::{Project, Task, TaskList, User};
use serde::{Deserialize, Serialize};

/// Any message the store can apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "entity", content = "action", rename_all = "camelCase")]
pub enum Action {
    /// Project actions.
    Project(ProjectAction),
    /// Task list actions.
    TaskList(TaskListAction),
    /// Task actions.
    Task(TaskAction),
    /// User actions.
    User(UserAction),
    /// Authentication changes.
    Auth(AuthAction),
    /// Navigation requests.
    Router(RouterAction),
}

/// Project lifecycle actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum ProjectAction {
    /// Load every project the signed-in user is a member of.
    Load,
    /// Projects loaded.
    LoadSuccess(Vec<Project>),
    /// Loading projects failed.
    LoadFail(String),
    /// Create a project.
    Add(Project),
    /// Project created.
    AddSuccess(Project),
    /// Creating a project failed.
    AddFail(String),
    /// Update name, description and cover.
    Update(Project),
    /// Project updated.
    UpdateSuccess(Project),
    /// Updating a project failed.
    UpdateFail(String),
    /// Persist the task-list collection of a project.
    UpdateLists(Project),
    /// Task-list collection persisted.
    UpdateListsSuccess(Project),
    /// Persisting the task-list collection failed.
    UpdateListsFail(String),
    /// Delete a project and its task lists.
    Delete(Project),
    /// Project deleted; carries the pre-deletion entity.
    DeleteSuccess(Project),
    /// Deleting a project failed.
    DeleteFail(String),
    /// Open a project.
    Select(Project),
    /// Add members to a project.
    Invite {
        /// Target project.
        project_id: ProjectId,
        /// Users to add.
        members: Vec<User>,
    },
    /// Members added.
    InviteSuccess(Project),
    /// Adding members failed.
    InviteFail(String),
}

/// Task list lifecycle actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum TaskListAction {
    /// Load the task lists of a project.
    Load(ProjectId),
    /// Task lists loaded.
    LoadSuccess(Vec<TaskList>),
    /// Loading task lists failed.
    LoadFail(String),
    /// Create a task list.
    Add(TaskList),
    /// Task list created.
    AddSuccess(TaskList),
    /// Creating a task list failed.
    AddFail(String),
    /// Rename a task list.
    Update(TaskList),
    /// Task list renamed.
    UpdateSuccess(TaskList),
    /// Renaming a task list failed.
    UpdateFail(String),
    /// Delete a task list.
    Delete(TaskList),
    /// Task list deleted; carries the pre-deletion entity.
    DeleteSuccess(TaskList),
    /// Deleting a task list failed.
    DeleteFail(String),
    /// Exchange the display order of two lists.
    Swap {
        /// List being dragged.
        src: TaskList,
        /// List being dropped on.
        target: TaskList,
    },
    /// Both lists re-ordered.
    SwapSuccess(Vec<TaskList>),
    /// Re-ordering failed.
    SwapFail(String),
    /// Create the default lists of a freshly created project.
    Init(Project),
    /// Default lists created; carries the project with their ids attached.
    InitSuccess(Project),
    /// Creating the default lists failed.
    InitFail(String),
}

/// Task lifecycle actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum TaskAction {
    /// Load the tasks of several lists.
    LoadInLists(Vec<TaskList>),
    /// Tasks loaded.
    LoadInListsSuccess(Vec<Task>),
    /// Loading tasks failed.
    LoadInListsFail(String),
    /// Create a task.
    Add(Task),
    /// Task created.
    AddSuccess(Task),
    /// Creating a task failed.
    AddFail(String),
    /// Update editable task fields.
    Update(Task),
    /// Task updated.
    UpdateSuccess(Task),
    /// Updating a task failed.
    UpdateFail(String),
    /// Delete a task.
    Delete(Task),
    /// Task deleted; carries the pre-deletion entity.
    DeleteSuccess(Task),
    /// Deleting a task failed.
    DeleteFail(String),
    /// Toggle the completion flag.
    Complete(Task),
    /// Completion toggled.
    CompleteSuccess(Task),
    /// Toggling completion failed.
    CompleteFail(String),
    /// Move one task to another list.
    Move {
        /// Task being moved.
        task_id: TaskId,
        /// Destination list.
        task_list_id: TaskListId,
    },
    /// Task moved.
    MoveSuccess(Task),
    /// Moving a task failed.
    MoveFail(String),
    /// Move every task of one list into another.
    MoveAll {
        /// Source list.
        src_list_id: TaskListId,
        /// Destination list.
        target_list_id: TaskListId,
    },
    /// Every moved task, in one batch.
    MoveAllSuccess(Vec<Task>),
    /// Bulk move failed.
    MoveAllFail(String),
}

/// User and membership-reference actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum UserAction {
    /// Load the members of a project.
    LoadByProject(ProjectId),
    /// Members loaded.
    LoadByProjectSuccess(Vec<User>),
    /// Loading members failed.
    LoadByProjectFail(String),
    /// Search users by email fragment.
    Search(String),
    /// Matching users.
    SearchSuccess(Vec<User>),
    /// Searching users failed.
    SearchFail(String),
    /// Record that `user` belongs to `project_id`.
    AddProjectRef {
        /// User to update.
        user: User,
        /// Project to reference.
        project_id: ProjectId,
    },
    /// Reference recorded.
    AddProjectRefSuccess(User),
    /// Recording the reference failed.
    AddProjectRefFail(String),
    /// Drop the reference from `user` to `project_id`.
    RemoveProjectRef {
        /// User to update.
        user: User,
        /// Project to forget.
        project_id: ProjectId,
    },
    /// Reference dropped.
    RemoveProjectRefSuccess(User),
    /// Dropping the reference failed.
    RemoveProjectRefFail(String),
    /// Ensure every member of the project references it.
    BatchUpdateProjectRef(Project),
    /// Every member updated.
    BatchUpdateProjectRefSuccess(Vec<User>),
    /// Batch update failed.
    BatchUpdateProjectRefFail(String),
}

/// Authentication changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum AuthAction {
    /// A user signed in.
    SignedIn(User),
    /// The current user signed out.
    SignedOut,
}

/// Navigation requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum RouterAction {
    /// Navigate to an application path.
    Go(String),
}

impl Action {
    /// Human-readable tag such as `[Project] Add`, used in logs.
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::Project(action) => action.tag(),
            Self::TaskList(action) => action.tag(),
            Self::Task(action) => action.tag(),
            Self::User(action) => action.tag(),
            Self::Auth(AuthAction::SignedIn(_)) => "[Auth] Signed In",
            Self::Auth(AuthAction::SignedOut) => "[Auth] Signed Out",
            Self::Router(RouterAction::Go(_)) => "[Router] Go",
        }
    }

    /// Error text when this is a failure action.
    #[must_use]
    pub fn failure(&self) -> Option<&str> {
        let message = match self {
            Self::Project(
                ProjectAction::LoadFail(msg)
                | ProjectAction::AddFail(msg)
                | ProjectAction::UpdateFail(msg)
                | ProjectAction::UpdateListsFail(msg)
                | ProjectAction::DeleteFail(msg)
                | ProjectAction::InviteFail(msg),
            )
            | Self::TaskList(
                TaskListAction::LoadFail(msg)
                | TaskListAction::AddFail(msg)
                | TaskListAction::UpdateFail(msg)
                | TaskListAction::DeleteFail(msg)
                | TaskListAction::SwapFail(msg)
                | TaskListAction::InitFail(msg),
            )
            | Self::Task(
                TaskAction::LoadInListsFail(msg)
                | TaskAction::AddFail(msg)
                | TaskAction::UpdateFail(msg)
                | TaskAction::DeleteFail(msg)
                | TaskAction::CompleteFail(msg)
                | TaskAction::MoveFail(msg)
                | TaskAction::MoveAllFail(msg),
            )
            | Self::User(
                UserAction::LoadByProjectFail(msg)
                | UserAction::SearchFail(msg)
                | UserAction::AddProjectRefFail(msg)
                | UserAction::RemoveProjectRefFail(msg)
                | UserAction::BatchUpdateProjectRefFail(msg),
            ) => msg,
            _ => return None,
        };
        Some(message.as_str())
    }
}

impl ProjectAction {
    /// Human-readable tag.
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::Load => "[Project] Load",
            Self::LoadSuccess(_) => "[Project] Load Success",
            Self::LoadFail(_) => "[Project] Load Fail",
            Self::Add(_) => "[Project] Add",
            Self::AddSuccess(_) => "[Project] Add Success",
            Self::AddFail(_) => "[Project] Add Fail",
            Self::Update(_) => "[Project] Update",
            Self::UpdateSuccess(_) => "[Project] Update Success",
            Self::UpdateFail(_) => "[Project] Update Fail",
            Self::UpdateLists(_) => "[Project] Update Lists",
            Self::UpdateListsSuccess(_) => "[Project] Update Lists Success",
            Self::UpdateListsFail(_) => "[Project] Update Lists Fail",
            Self::Delete(_) => "[Project] Delete",
            Self::DeleteSuccess(_) => "[Project] Delete Success",
            Self::DeleteFail(_) => "[Project] Delete Fail",
            Self::Select(_) => "[Project] Select",
            Self::Invite { .. } => "[Project] Invite",
            Self::InviteSuccess(_) => "[Project] Invite Success",
            Self::InviteFail(_) => "[Project] Invite Fail",
        }
    }
}

impl TaskListAction {
    /// Human-readable tag.
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::Load(_) => "[TaskList] Load",
            Self::LoadSuccess(_) => "[TaskList] Load Success",
            Self::LoadFail(_) => "[TaskList] Load Fail",
            Self::Add(_) => "[TaskList] Add",
            Self::AddSuccess(_) => "[TaskList] Add Success",
            Self::AddFail(_) => "[TaskList] Add Fail",
            Self::Update(_) => "[TaskList] Update",
            Self::UpdateSuccess(_) => "[TaskList] Update Success",
            Self::UpdateFail(_) => "[TaskList] Update Fail",
            Self::Delete(_) => "[TaskList] Delete",
            Self::DeleteSuccess(_) => "[TaskList] Delete Success",
            Self::DeleteFail(_) => "[TaskList] Delete Fail",
            Self::Swap { .. } => "[TaskList] Swap",
            Self::SwapSuccess(_) => "[TaskList] Swap Success",
            Self::SwapFail(_) => "[TaskList] Swap Fail",
            Self::Init(_) => "[TaskList] Init",
            Self::InitSuccess(_) => "[TaskList] Init Success",
            Self::InitFail(_) => "[TaskList] Init Fail",
        }
    }
}

impl TaskAction {
    /// Human-readable tag.
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::LoadInLists(_) => "[Task] Load In Lists",
            Self::LoadInListsSuccess(_) => "[Task] Load In Lists Success",
            Self::LoadInListsFail(_) => "[Task] Load In Lists Fail",
            Self::Add(_) => "[Task] Add",
            Self::AddSuccess(_) => "[Task] Add Success",
            Self::AddFail(_) => "[Task] Add Fail",
            Self::Update(_) => "[Task] Update",
            Self::UpdateSuccess(_) => "[Task] Update Success",
            Self::UpdateFail(_) => "[Task] Update Fail",
            Self::Delete(_) => "[Task] Delete",
            Self::DeleteSuccess(_) => "[Task] Delete Success",
            Self::DeleteFail(_) => "[Task] Delete Fail",
            Self::Complete(_) => "[Task] Complete",
            Self::CompleteSuccess(_) => "[Task] Complete Success",
            Self::CompleteFail(_) => "[Task] Complete Fail",
            Self::Move { .. } => "[Task] Move",
            Self::MoveSuccess(_) => "[Task] Move Success",
            Self::MoveFail(_) => "[Task] Move Fail",
            Self::MoveAll { .. } => "[Task] Move All",
            Self::MoveAllSuccess(_) => "[Task] Move All Success",
            Self::MoveAllFail(_) => "[Task] Move All Fail",
        }
    }
}

impl UserAction {
    /// Human-readable tag.
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::LoadByProject(_) => "[User] Load By Project",
            Self::LoadByProjectSuccess(_) => "[User] Load By Project Success",
            Self::LoadByProjectFail(_) => "[User] Load By Project Fail",
            Self::Search(_) => "[User] Search",
            Self::SearchSuccess(_) => "[User] Search Success",
            Self::SearchFail(_) => "[User] Search Fail",
            Self::AddProjectRef { .. } => "[User] Add Project Ref",
            Self::AddProjectRefSuccess(_) => "[User] Add Project Ref Success",
            Self::AddProjectRefFail(_) => "[User] Add Project Ref Fail",
            Self::RemoveProjectRef { .. } => "[User] Remove Project Ref",
            Self::RemoveProjectRefSuccess(_) => "[User] Remove Project Ref Success",
            Self::RemoveProjectRefFail(_) => "[User] Remove Project Ref Fail",
            Self::BatchUpdateProjectRef(_) => "[User] Batch Update Project Ref",
            Self::BatchUpdateProjectRefSuccess(_) => "[User] Batch Update Project Ref Success",
            Self::BatchUpdateProjectRefFail(_) => "[User] Batch Update Project Ref Fail",
        }
    }
}

impl From<ProjectAction> for Action {
    fn from(action: ProjectAction) -> Self {
        Self::Project(action)
    }
}

impl From<TaskListAction> for Action {
    fn from(action: TaskListAction) -> Self {
        Self::TaskList(action)
    }
}

impl From<TaskAction> for Action {
    fn from(action: TaskAction) -> Self {
        Self::Task(action)
    }
}

impl From<UserAction> for Action {
    fn from(action: UserAction) -> Self {
        Self::User(action)
    }
}

impl From<AuthAction> for Action {
    fn from(action: AuthAction) -> Self {
        Self::Auth(action)
    }
}

impl From<RouterAction> for Action {
    fn from(action: RouterAction) -> Self {
        Self::Router(action)
    }
}
