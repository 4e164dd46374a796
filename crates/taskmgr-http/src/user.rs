use futures::future::try_join_all;
use serde::Serialize;
use taskmgr_core::{Project, ProjectId, User, UserId, merge_unique};
use tracing::debug;

use crate::client::HttpClient;
use crate::error::{HttpError, Result};

const DOMAIN: &str = "users";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectIdsField<'a> {
    project_ids: &'a [ProjectId],
}

/// REST wrapper for `/users`.
#[derive(Debug, Clone)]
pub struct UserService {
    client: HttpClient,
}

impl UserService {
    /// Wrap a shared client.
    #[must_use]
    pub const fn new(client: HttpClient) -> Self {
        Self { client }
    }

    /// `GET /users/{id}`.
    ///
    /// # Errors
    /// Any HTTP failure.
    pub async fn get(&self, id: &UserId) -> Result<User> {
        self.client.get(&format!("{DOMAIN}/{id}"), &[]).await
    }

    /// `GET /users?email_like={filter}`.
    ///
    /// # Errors
    /// Any HTTP failure.
    pub async fn search(&self, filter: &str) -> Result<Vec<User>> {
        self.client.get(DOMAIN, &[("email_like", filter)]).await
    }

    /// `GET /users?projectIds_like={project}`.
    ///
    /// # Errors
    /// Any HTTP failure.
    pub async fn get_by_project(&self, project: &ProjectId) -> Result<Vec<User>> {
        self.client.get(DOMAIN, &[("projectIds_like", project.as_str())]).await
    }

    /// Add `project` to the user's project set. No request is sent when it is already there.
    ///
    /// # Errors
    /// Missing id or any HTTP failure.
    pub async fn add_project_ref(&self, user: &User, project: &ProjectId) -> Result<User> {
        let id = user_id(user)?;
        if user.project_ids.contains(project) {
            debug!(user = %id, %project, "Project reference already present");
            return Ok(user.clone());
        }
        let project_ids = merge_unique(&user.project_ids, [project.clone()]);
        self.client
            .patch(&format!("{DOMAIN}/{id}"), &ProjectIdsField {
                project_ids: &project_ids,
            })
            .await
    }

    /// Remove `project` from the user's project set.
    ///
    /// # Errors
    /// Missing id or any HTTP failure.
    pub async fn remove_project_ref(&self, user: &User, project: &ProjectId) -> Result<User> {
        let id = user_id(user)?;
        let project_ids: Vec<_> = user
            .project_ids
            .iter()
            .filter(|existing| *existing != project)
            .cloned()
            .collect();
        self.client
            .patch(&format!("{DOMAIN}/{id}"), &ProjectIdsField {
                project_ids: &project_ids,
            })
            .await
    }

    /// Make every member of `project` reference it, fetching each user fresh.
    ///
    /// # Errors
    /// Missing project id or any HTTP failure.
    pub async fn batch_update_project_ref(&self, project: &Project) -> Result<Vec<User>> {
        let project_id = project.id.as_ref().ok_or(HttpError::MissingId("project"))?;
        try_join_all(project.members.iter().map(|member| async move {
            let user = self.get(member).await?;
            self.add_project_ref(&user, project_id).await
        }))
        .await
    }
}

fn user_id(user: &User) -> Result<&UserId> {
    user.id.as_ref().ok_or(HttpError::MissingId("user"))
}
