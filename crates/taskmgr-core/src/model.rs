use crate::id::{ProjectId, TaskId, TaskListId, UserId};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A project owning an ordered set of task lists and a member set.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Server-assigned identifier (absent before creation).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ProjectId>,
    /// Display name.
    pub name: String,
    /// Optional short description.
    #[serde(default)]
    pub desc: Option<String>,
    /// Cover image reference.
    #[serde(default)]
    pub cover_img: String,
    /// Task lists owned by this project, in display order.
    #[serde(default)]
    pub task_lists: Vec<TaskListId>,
    /// Member user ids (a set; never contains duplicates).
    #[serde(default)]
    pub members: Vec<UserId>,
}

/// Task urgency as stored by the backend (`1` is the most urgent).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Priority {
    /// Needs attention now.
    Urgent,
    /// Should be handled soon.
    Important,
    /// Everything else.
    #[default]
    Normal,
}

impl From<Priority> for u8 {
    fn from(priority: Priority) -> Self {
        match priority {
            Priority::Urgent => 1,
            Priority::Important => 2,
            Priority::Normal => 3,
        }
    }
}

impl TryFrom<u8> for Priority {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Urgent),
            2 => Ok(Self::Important),
            3 => Ok(Self::Normal),
            other => Err(format!("unknown task priority {other}")),
        }
    }
}

/// A task inside a task list.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Server-assigned identifier (absent before creation).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<TaskId>,
    /// Parent task list.
    pub task_list_id: TaskListId,
    /// Task content.
    #[serde(default)]
    pub desc: String,
    /// Completion flag.
    #[serde(default)]
    pub completed: bool,
    /// Urgency.
    #[serde(default)]
    pub priority: Priority,
    /// Due date.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub due_date: Option<OffsetDateTime>,
    /// Reminder timestamp.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub reminder: Option<OffsetDateTime>,
    /// Creation timestamp.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub create_date: Option<OffsetDateTime>,
    /// Free-form remark.
    #[serde(default)]
    pub remark: Option<String>,
    /// Owner of the task.
    #[serde(default)]
    pub owner_id: Option<UserId>,
    /// Other participants.
    #[serde(default)]
    pub participant_ids: Vec<UserId>,
}

/// A column of tasks inside a project.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskList {
    /// Server-assigned identifier (absent before creation).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<TaskListId>,
    /// Display name.
    pub name: String,
    /// Sort key within the project.
    #[serde(default)]
    pub order: i64,
    /// Owning project.
    pub project_id: ProjectId,
}

/// An account that can be a project member.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Server-assigned identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<UserId>,
    /// Login email.
    #[serde(default)]
    pub email: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Avatar reference.
    #[serde(default)]
    pub avatar: Option<String>,
    /// Projects this user belongs to (a set).
    #[serde(default)]
    pub project_ids: Vec<ProjectId>,
}

/// Authentication state read by effects.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Auth {
    /// Signed-in user, if any.
    pub user: Option<User>,
}

impl Auth {
    /// Identifier of the signed-in user.
    #[must_use]
    pub fn user_id(&self) -> Option<&UserId> {
        self.user.as_ref().and_then(|user| user.id.as_ref())
    }
}

/// Union of `existing` and `incoming`, keeping first-seen order and dropping duplicates.
pub fn merge_unique<T, I>(existing: &[T], incoming: I) -> Vec<T>
where
    T: PartialEq + Clone,
    I: IntoIterator<Item = T>,
{
    let mut merged = Vec::with_capacity(existing.len());
    for item in existing.iter().cloned().chain(incoming) {
        if !merged.contains(&item) {
            merged.push(item);
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used)]

    use super::*;

    #[test]
    fn merge_unique_is_a_set_union() {
        let existing = vec![UserId::new("A"), UserId::new("B")];
        let merged = merge_unique(&existing, [UserId::new("B"), UserId::new("C")]);
        assert_eq!(merged, vec![UserId::new("A"), UserId::new("B"), UserId::new("C")]);
    }

    #[test]
    fn merge_unique_collapses_duplicates_already_present() {
        let existing = vec![UserId::new("A"), UserId::new("A")];
        let merged = merge_unique(&existing, []);
        assert_eq!(merged, vec![UserId::new("A")]);
    }

    #[test]
    fn project_uses_camel_case_on_the_wire() {
        let json = serde_json::json!({
            "id": 3,
            "name": "Launch",
            "desc": null,
            "coverImg": "/assets/covers/1.jpg",
            "taskLists": ["10", 11],
            "members": ["1"]
        });
        let project: Project = serde_json::from_value(json).expect("decode project");
        assert_eq!(project.id, Some(ProjectId::new("3")));
        assert_eq!(project.task_lists, vec![TaskListId::new("10"), TaskListId::new("11")]);
        assert_eq!(project.desc, None);
    }

    #[test]
    fn task_priority_round_trips_through_numbers() {
        let json = serde_json::json!({
            "taskListId": "1",
            "desc": "write docs",
            "priority": 1,
            "dueDate": "2024-01-02T03:04:05Z"
        });
        let task: Task = serde_json::from_value(json).expect("decode task");
        assert_eq!(task.priority, Priority::Urgent);
        assert!(task.due_date.is_some());

        let encoded = serde_json::to_value(&task).expect("encode task");
        assert_eq!(encoded["priority"], 1);
        assert_eq!(encoded["dueDate"], "2024-01-02T03:04:05Z");
    }

    #[test]
    fn unknown_priority_is_rejected() {
        let json = serde_json::json!({ "taskListId": "1", "priority": 9 });
        assert!(serde_json::from_value::<Task>(json).is_err());
    }
}
