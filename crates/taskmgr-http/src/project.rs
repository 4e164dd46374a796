use futures::future::try_join_all;
use serde::Serialize;
use taskmgr_core::{Project, ProjectId, TaskListId, User, UserId, merge_unique};
use tracing::{debug, info};

use crate::client::HttpClient;
use crate::error::{HttpError, Result};

const DOMAIN: &str = "projects";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectFields<'a> {
    name: &'a str,
    cover_img: &'a str,
    desc: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TaskListsField<'a> {
    task_lists: &'a [TaskListId],
}

#[derive(Serialize)]
struct MembersField<'a> {
    members: &'a [UserId],
}

/// REST wrapper for `/projects`.
#[derive(Debug, Clone)]
pub struct ProjectService {
    client: HttpClient,
}

impl ProjectService {
    /// Wrap a shared client.
    #[must_use]
    pub const fn new(client: HttpClient) -> Self {
        Self { client }
    }

    /// `POST /projects` with the full entity.
    ///
    /// # Errors
    /// Any HTTP failure.
    pub async fn add(&self, project: &Project) -> Result<Project> {
        let created: Project = self.client.post(DOMAIN, project).await?;
        info!(project = ?created.id, name = %created.name, "Created project");
        Ok(created)
    }

    /// `PATCH /projects/{id}` with name, cover and description only.
    ///
    /// # Errors
    /// Missing id or any HTTP failure.
    pub async fn update(&self, project: &Project) -> Result<Project> {
        let id = project_id(project)?;
        let fields = ProjectFields {
            name: &project.name,
            cover_img: &project.cover_img,
            desc: project.desc.as_deref(),
        };
        self.client.patch(&format!("{DOMAIN}/{id}"), &fields).await
    }

    /// Delete every task list of the project, then the project itself.
    ///
    /// Resolves with the project as it was before deletion.
    ///
    /// # Errors
    /// Missing id or any HTTP failure; the project is not deleted when a list deletion fails.
    pub async fn del(&self, project: &Project) -> Result<Project> {
        let id = project_id(project)?;
        let deleted = try_join_all(
            project
                .task_lists
                .iter()
                .map(|list| async move { self.client.delete(&format!("taskLists/{list}")).await }),
        )
        .await?
        .len();
        debug!(project = %id, deleted, "Deleted task lists of project");

        self.client.delete(&format!("{DOMAIN}/{id}")).await?;
        info!(project = %id, "Deleted project");
        Ok(project.clone())
    }

    /// `GET /projects?members_like={owner}`.
    ///
    /// # Errors
    /// Any HTTP failure.
    pub async fn get(&self, owner: &UserId) -> Result<Vec<Project>> {
        self.client.get(DOMAIN, &[("members_like", owner.as_str())]).await
    }

    /// `PATCH /projects/{id}` with the task-list collection only.
    ///
    /// # Errors
    /// Missing id or any HTTP failure.
    pub async fn update_task_lists(&self, project: &Project) -> Result<Project> {
        let id = project_id(project)?;
        let field = TaskListsField {
            task_lists: &project.task_lists,
        };
        self.client.patch(&format!("{DOMAIN}/{id}"), &field).await
    }

    /// Read the project, union its members with `users`, and write them back.
    ///
    /// This is an unguarded read-modify-write: two concurrent invites can
    /// each read the same member set and the later write wins.
    ///
    /// # Errors
    /// Any HTTP failure.
    pub async fn invite_members(&self, project_id: &ProjectId, users: &[User]) -> Result<Project> {
        let path = format!("{DOMAIN}/{project_id}");
        let current: Project = self.client.get(&path, &[]).await?;
        let invited = users.iter().filter_map(|user| user.id.clone());
        let members = merge_unique(&current.members, invited);
        debug!(
            project = %project_id,
            before = current.members.len(),
            after = members.len(),
            "Merged project members"
        );
        self.client.patch(&path, &MembersField { members: &members }).await
    }
}

fn project_id(project: &Project) -> Result<&ProjectId> {
    project.id.as_ref().ok_or(HttpError::MissingId("project"))
}
