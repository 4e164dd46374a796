//! Service seams used by the effects.
//!
//! Each trait mirrors one REST service so effects can run against the HTTP
//! implementation or an in-memory fake.

use std::future::Future;

use anyhow::Error;
use taskmgr_core::{Project, ProjectId, Task, TaskId, TaskList, TaskListId, User, UserId};
use taskmgr_http::{HttpError, ProjectService, TaskListService, TaskService, UserService};

/// Project operations.
pub trait ProjectApi: Send + Sync + 'static {
    /// Error type bubbled up from the backend.
    type Error: Into<Error> + Send;

    /// Create a project.
    fn add(&self, project: &Project) -> impl Future<Output = Result<Project, Self::Error>> + Send;

    /// Update name, description and cover.
    fn update(&self, project: &Project) -> impl Future<Output = Result<Project, Self::Error>> + Send;

    /// Delete a project and its task lists. Resolves to the pre-deletion project.
    fn del(&self, project: &Project) -> impl Future<Output = Result<Project, Self::Error>> + Send;

    /// Projects the user is a member of.
    fn get(&self, owner: &UserId) -> impl Future<Output = Result<Vec<Project>, Self::Error>> + Send;

    /// Persist the task-list collection.
    fn update_task_lists(&self, project: &Project) -> impl Future<Output = Result<Project, Self::Error>> + Send;

    /// Add members to a project.
    fn invite_members(
        &self,
        project_id: &ProjectId,
        users: &[User],
    ) -> impl Future<Output = Result<Project, Self::Error>> + Send;
}

/// Task operations.
pub trait TaskApi: Send + Sync + 'static {
    /// Error type bubbled up from the backend.
    type Error: Into<Error> + Send;

    /// Tasks in every given list.
    fn get_by_lists(&self, lists: &[TaskList]) -> impl Future<Output = Result<Vec<Task>, Self::Error>> + Send;

    /// Create a task.
    fn add(&self, task: &Task) -> impl Future<Output = Result<Task, Self::Error>> + Send;

    /// Update editable fields.
    fn update(&self, task: &Task) -> impl Future<Output = Result<Task, Self::Error>> + Send;

    /// Delete a task.
    fn del(&self, task: &Task) -> impl Future<Output = Result<Task, Self::Error>> + Send;

    /// Toggle completion.
    fn complete(&self, task: &Task) -> impl Future<Output = Result<Task, Self::Error>> + Send;

    /// Move one task to another list.
    fn move_to(&self, task: &TaskId, list: &TaskListId) -> impl Future<Output = Result<Task, Self::Error>> + Send;

    /// Move every task of `src` to `target`.
    fn move_all(
        &self,
        src: &TaskListId,
        target: &TaskListId,
    ) -> impl Future<Output = Result<Vec<Task>, Self::Error>> + Send;
}

/// Task list operations.
pub trait TaskListApi: Send + Sync + 'static {
    /// Error type bubbled up from the backend.
    type Error: Into<Error> + Send;

    /// Lists of a project.
    fn get(&self, project: &ProjectId) -> impl Future<Output = Result<Vec<TaskList>, Self::Error>> + Send;

    /// Create a list.
    fn add(&self, list: &TaskList) -> impl Future<Output = Result<TaskList, Self::Error>> + Send;

    /// Rename a list.
    fn update(&self, list: &TaskList) -> impl Future<Output = Result<TaskList, Self::Error>> + Send;

    /// Delete a list.
    fn del(&self, list: &TaskList) -> impl Future<Output = Result<TaskList, Self::Error>> + Send;

    /// Exchange the order of two lists.
    fn swap_order(
        &self,
        src: &TaskList,
        target: &TaskList,
    ) -> impl Future<Output = Result<(TaskList, TaskList), Self::Error>> + Send;

    /// Create the default lists of a project.
    fn init_for_project(&self, project: &Project) -> impl Future<Output = Result<Project, Self::Error>> + Send;
}

/// User operations.
pub trait UserApi: Send + Sync + 'static {
    /// Error type bubbled up from the backend.
    type Error: Into<Error> + Send;

    /// Fetch one user.
    fn get(&self, id: &UserId) -> impl Future<Output = Result<User, Self::Error>> + Send;

    /// Users whose email contains `filter`.
    fn search(&self, filter: &str) -> impl Future<Output = Result<Vec<User>, Self::Error>> + Send;

    /// Members of a project.
    fn get_by_project(&self, project: &ProjectId) -> impl Future<Output = Result<Vec<User>, Self::Error>> + Send;

    /// Attach a project to a user.
    fn add_project_ref(
        &self,
        user: &User,
        project: &ProjectId,
    ) -> impl Future<Output = Result<User, Self::Error>> + Send;

    /// Detach a project from a user.
    fn remove_project_ref(
        &self,
        user: &User,
        project: &ProjectId,
    ) -> impl Future<Output = Result<User, Self::Error>> + Send;

    /// Attach a project to each of its members.
    fn batch_update_project_ref(&self, project: &Project) -> impl Future<Output = Result<Vec<User>, Self::Error>> + Send;
}

impl ProjectApi for ProjectService {
    type Error = HttpError;

    async fn add(&self, project: &Project) -> Result<Project, HttpError> {
        Self::add(self, project).await
    }

    async fn update(&self, project: &Project) -> Result<Project, HttpError> {
        Self::update(self, project).await
    }

    async fn del(&self, project: &Project) -> Result<Project, HttpError> {
        Self::del(self, project).await
    }

    async fn get(&self, owner: &UserId) -> Result<Vec<Project>, HttpError> {
        Self::get(self, owner).await
    }

    async fn update_task_lists(&self, project: &Project) -> Result<Project, HttpError> {
        Self::update_task_lists(self, project).await
    }

    async fn invite_members(&self, project_id: &ProjectId, users: &[User]) -> Result<Project, HttpError> {
        Self::invite_members(self, project_id, users).await
    }
}

impl TaskApi for TaskService {
    type Error = HttpError;

    async fn get_by_lists(&self, lists: &[TaskList]) -> Result<Vec<Task>, HttpError> {
        Self::get_by_lists(self, lists).await
    }

    async fn add(&self, task: &Task) -> Result<Task, HttpError> {
        Self::add(self, task).await
    }

    async fn update(&self, task: &Task) -> Result<Task, HttpError> {
        Self::update(self, task).await
    }

    async fn del(&self, task: &Task) -> Result<Task, HttpError> {
        Self::del(self, task).await
    }

    async fn complete(&self, task: &Task) -> Result<Task, HttpError> {
        Self::complete(self, task).await
    }

    async fn move_to(&self, task: &TaskId, list: &TaskListId) -> Result<Task, HttpError> {
        Self::move_to(self, task, list).await
    }

    async fn move_all(&self, src: &TaskListId, target: &TaskListId) -> Result<Vec<Task>, HttpError> {
        Self::move_all(self, src, target).await
    }
}

impl TaskListApi for TaskListService {
    type Error = HttpError;

    async fn get(&self, project: &ProjectId) -> Result<Vec<TaskList>, HttpError> {
        Self::get(self, project).await
    }

    async fn add(&self, list: &TaskList) -> Result<TaskList, HttpError> {
        Self::add(self, list).await
    }

    async fn update(&self, list: &TaskList) -> Result<TaskList, HttpError> {
        Self::update(self, list).await
    }

    async fn del(&self, list: &TaskList) -> Result<TaskList, HttpError> {
        Self::del(self, list).await
    }

    async fn swap_order(&self, src: &TaskList, target: &TaskList) -> Result<(TaskList, TaskList), HttpError> {
        Self::swap_order(self, src, target).await
    }

    async fn init_for_project(&self, project: &Project) -> Result<Project, HttpError> {
        Self::init_for_project(self, project).await
    }
}

impl UserApi for UserService {
    type Error = HttpError;

    async fn get(&self, id: &UserId) -> Result<User, HttpError> {
        Self::get(self, id).await
    }

    async fn search(&self, filter: &str) -> Result<Vec<User>, HttpError> {
        Self::search(self, filter).await
    }

    async fn get_by_project(&self, project: &ProjectId) -> Result<Vec<User>, HttpError> {
        Self::get_by_project(self, project).await
    }

    async fn add_project_ref(&self, user: &User, project: &ProjectId) -> Result<User, HttpError> {
        Self::add_project_ref(self, user, project).await
    }

    async fn remove_project_ref(&self, user: &User, project: &ProjectId) -> Result<User, HttpError> {
        Self::remove_project_ref(self, user, project).await
    }

    async fn batch_update_project_ref(&self, project: &Project) -> Result<Vec<User>, HttpError> {
        Self::batch_update_project_ref(self, project).await
    }
}
