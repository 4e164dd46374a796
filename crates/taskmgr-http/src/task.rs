use futures::future::try_join_all;
use serde::Serialize;
use taskmgr_core::{Priority, Task, TaskId, TaskList, TaskListId, UserId};
use time::OffsetDateTime;
use tracing::debug;

use crate::client::HttpClient;
use crate::error::{HttpError, Result};

const DOMAIN: &str = "tasks";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EditableFields<'a> {
    desc: &'a str,
    priority: Priority,
    #[serde(with = "time::serde::rfc3339::option")]
    due_date: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    reminder: Option<OffsetDateTime>,
    owner_id: Option<&'a UserId>,
    participant_ids: &'a [UserId],
    remark: Option<&'a str>,
}

#[derive(Serialize)]
struct CompletedField {
    completed: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ListField<'a> {
    task_list_id: &'a TaskListId,
}

/// REST wrapper for `/tasks`.
#[derive(Debug, Clone)]
pub struct TaskService {
    client: HttpClient,
}

impl TaskService {
    /// Wrap a shared client.
    #[must_use]
    pub const fn new(client: HttpClient) -> Self {
        Self { client }
    }

    /// `GET /tasks?taskListId={list}`.
    ///
    /// # Errors
    /// Any HTTP failure.
    pub async fn get(&self, list: &TaskListId) -> Result<Vec<Task>> {
        self.client.get(DOMAIN, &[("taskListId", list.as_str())]).await
    }

    /// Tasks of every given list, fetched concurrently and concatenated.
    ///
    /// # Errors
    /// A list without id or any HTTP failure.
    pub async fn get_by_lists(&self, lists: &[TaskList]) -> Result<Vec<Task>> {
        let ids = lists
            .iter()
            .map(|list| list.id.as_ref().ok_or(HttpError::MissingId("task list")))
            .collect::<Result<Vec<_>>>()?;
        let per_list = try_join_all(ids.into_iter().map(|id| self.get(id))).await?;
        Ok(per_list.into_iter().flatten().collect())
    }

    /// `POST /tasks`.
    ///
    /// # Errors
    /// Any HTTP failure.
    pub async fn add(&self, task: &Task) -> Result<Task> {
        self.client.post(DOMAIN, task).await
    }

    /// `PATCH /tasks/{id}` with the editable fields.
    ///
    /// # Errors
    /// Missing id or any HTTP failure.
    pub async fn update(&self, task: &Task) -> Result<Task> {
        let id = task_id(task)?;
        let fields = EditableFields {
            desc: &task.desc,
            priority: task.priority,
            due_date: task.due_date,
            reminder: task.reminder,
            owner_id: task.owner_id.as_ref(),
            participant_ids: &task.participant_ids,
            remark: task.remark.as_deref(),
        };
        self.client.patch(&format!("{DOMAIN}/{id}"), &fields).await
    }

    /// `DELETE /tasks/{id}`; resolves with the task as it was.
    ///
    /// # Errors
    /// Missing id or any HTTP failure.
    pub async fn del(&self, task: &Task) -> Result<Task> {
        let id = task_id(task)?;
        self.client.delete(&format!("{DOMAIN}/{id}")).await?;
        Ok(task.clone())
    }

    /// Toggle the completion flag.
    ///
    /// # Errors
    /// Missing id or any HTTP failure.
    pub async fn complete(&self, task: &Task) -> Result<Task> {
        let id = task_id(task)?;
        let field = CompletedField {
            completed: !task.completed,
        };
        self.client.patch(&format!("{DOMAIN}/{id}"), &field).await
    }

    /// Re-parent one task.
    ///
    /// # Errors
    /// Any HTTP failure.
    pub async fn move_to(&self, task: &TaskId, list: &TaskListId) -> Result<Task> {
        self.client
            .patch(&format!("{DOMAIN}/{task}"), &ListField { task_list_id: list })
            .await
    }

    /// Move every task of `src` into `target`, returning all moved tasks.
    ///
    /// # Errors
    /// A task without id or any HTTP failure.
    pub async fn move_all(&self, src: &TaskListId, target: &TaskListId) -> Result<Vec<Task>> {
        let tasks = self.get(src).await?;
        let ids = tasks
            .iter()
            .map(task_id)
            .collect::<Result<Vec<_>>>()?;
        let moved = try_join_all(ids.into_iter().map(|id| self.move_to(id, target))).await?;
        debug!(%src, %target, moved = moved.len(), "Moved all tasks");
        Ok(moved)
    }
}

fn task_id(task: &Task) -> Result<&TaskId> {
    task.id.as_ref().ok_or(HttpError::MissingId("task"))
}
