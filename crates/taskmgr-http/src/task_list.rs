use serde::Serialize;
use taskmgr_core::{Project, ProjectId, TaskList, TaskListId, merge_unique};
use tracing::info;

use crate::client::HttpClient;
use crate::error::{HttpError, Result};

const DOMAIN: &str = "taskLists";

/// Lists created for every new project, in display order.
pub const DEFAULT_LISTS: [&str; 3] = ["Todo", "In Progress", "Done"];

#[derive(Serialize)]
struct NameField<'a> {
    name: &'a str,
}

#[derive(Serialize)]
struct OrderField {
    order: i64,
}

/// REST wrapper for `/taskLists`.
#[derive(Debug, Clone)]
pub struct TaskListService {
    client: HttpClient,
}

impl TaskListService {
    /// Wrap a shared client.
    #[must_use]
    pub const fn new(client: HttpClient) -> Self {
        Self { client }
    }

    /// `GET /taskLists?projectId={project}`.
    ///
    /// # Errors
    /// Any HTTP failure.
    pub async fn get(&self, project: &ProjectId) -> Result<Vec<TaskList>> {
        self.client.get(DOMAIN, &[("projectId", project.as_str())]).await
    }

    /// `POST /taskLists`.
    ///
    /// # Errors
    /// Any HTTP failure.
    pub async fn add(&self, list: &TaskList) -> Result<TaskList> {
        self.client.post(DOMAIN, list).await
    }

    /// `PATCH /taskLists/{id}` with the name only.
    ///
    /// # Errors
    /// Missing id or any HTTP failure.
    pub async fn update(&self, list: &TaskList) -> Result<TaskList> {
        let id = list_id(list)?;
        self.client
            .patch(&format!("{DOMAIN}/{id}"), &NameField { name: &list.name })
            .await
    }

    /// `DELETE /taskLists/{id}`; resolves with the list as it was.
    ///
    /// # Errors
    /// Missing id or any HTTP failure.
    pub async fn del(&self, list: &TaskList) -> Result<TaskList> {
        let id = list_id(list)?;
        self.client.delete(&format!("{DOMAIN}/{id}")).await?;
        Ok(list.clone())
    }

    /// Exchange the `order` of two lists.
    ///
    /// # Errors
    /// Missing id or any HTTP failure.
    pub async fn swap_order(&self, src: &TaskList, target: &TaskList) -> Result<(TaskList, TaskList)> {
        let src_path = format!("{DOMAIN}/{}", list_id(src)?);
        let target_path = format!("{DOMAIN}/{}", list_id(target)?);
        let src_field = OrderField { order: target.order };
        let target_field = OrderField { order: src.order };
        futures::try_join!(
            self.client.patch(&src_path, &src_field),
            self.client.patch(&target_path, &target_field),
        )
    }

    /// Create [`DEFAULT_LISTS`] for `project`, one after another so their
    /// ids come back in display order, and return the project with the new
    /// ids attached.
    ///
    /// # Errors
    /// Missing project id or any HTTP failure.
    pub async fn init_for_project(&self, project: &Project) -> Result<Project> {
        let project_id = project.id.clone().ok_or(HttpError::MissingId("project"))?;
        let mut created = Vec::with_capacity(DEFAULT_LISTS.len());
        for (order, name) in (1_i64..).zip(DEFAULT_LISTS) {
            let list = self
                .add(&TaskList {
                    id: None,
                    name: name.to_owned(),
                    order,
                    project_id: project_id.clone(),
                })
                .await?;
            created.push(list_id(&list)?.clone());
        }
        info!(project = %project_id, lists = created.len(), "Initialized task lists");
        Ok(Project {
            task_lists: merge_unique(&project.task_lists, created),
            ..project.clone()
        })
    }
}

fn list_id(list: &TaskList) -> Result<&TaskListId> {
    list.id.as_ref().ok_or(HttpError::MissingId("task list"))
}
