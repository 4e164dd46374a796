//! Application state and the reducer that applies actions to it.

use crate::action::{Action, AuthAction, ProjectAction, RouterAction, TaskAction, TaskListAction, UserAction};
use crate::id::{ProjectId, TaskId, TaskListId, UserId};
use crate::model::{Auth, Project, Task, TaskList, User};
use std::collections::HashMap;
use std::hash::Hash;

/// Entity that carries its own (optional, server-assigned) key.
pub trait Keyed {
    /// Key type.
    type Key: Clone + Eq + Hash + std::fmt::Debug;

    /// Key of this entity, if the server assigned one.
    fn key(&self) -> Option<&Self::Key>;
}

impl Keyed for Project {
    type Key = ProjectId;

    fn key(&self) -> Option<&ProjectId> {
        self.id.as_ref()
    }
}

impl Keyed for TaskList {
    type Key = TaskListId;

    fn key(&self) -> Option<&TaskListId> {
        self.id.as_ref()
    }
}

impl Keyed for Task {
    type Key = TaskId;

    fn key(&self) -> Option<&TaskId> {
        self.id.as_ref()
    }
}

impl Keyed for User {
    type Key = UserId;

    fn key(&self) -> Option<&UserId> {
        self.id.as_ref()
    }
}

/// Insertion-ordered table of entities keyed by id.
#[derive(Debug, Clone)]
pub struct EntityTable<T: Keyed> {
    ids: Vec<T::Key>,
    entities: HashMap<T::Key, T>,
}

impl<T: Keyed> Default for EntityTable<T> {
    fn default() -> Self {
        Self {
            ids: Vec::new(),
            entities: HashMap::new(),
        }
    }
}

impl<T: Keyed> EntityTable<T> {
    /// Insert or replace one entity. Entities without a key are ignored.
    pub fn upsert(&mut self, entity: T) {
        let Some(key) = entity.key().cloned() else {
            return;
        };
        if self.entities.insert(key.clone(), entity).is_none() {
            self.ids.push(key);
        }
    }

    /// Insert or replace many entities.
    pub fn upsert_many(&mut self, entities: impl IntoIterator<Item = T>) {
        for entity in entities {
            self.upsert(entity);
        }
    }

    /// Remove an entity by key.
    pub fn remove(&mut self, key: &T::Key) -> Option<T> {
        let removed = self.entities.remove(key)?;
        self.ids.retain(|id| id != key);
        Some(removed)
    }

    /// Remove every entity matching `predicate`.
    pub fn remove_where(&mut self, mut predicate: impl FnMut(&T) -> bool) {
        let entities = &mut self.entities;
        self.ids.retain(|id| match entities.get(id) {
            Some(entity) if predicate(entity) => {
                entities.remove(id);
                false
            }
            _ => true,
        });
    }

    /// Look an entity up by key.
    #[must_use]
    pub fn get(&self, key: &T::Key) -> Option<&T> {
        self.entities.get(key)
    }

    /// Iterate in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.ids.iter().filter_map(|id| self.entities.get(id))
    }

    /// Number of stored entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Last failure observed, kept for presentation layers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureNotice {
    /// Tag of the failing action.
    pub action: &'static str,
    /// Rendered error.
    pub message: String,
}

/// Canonical client state. Only [`AppState::reduce`] mutates it.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Authentication.
    pub auth: Auth,
    /// Current navigation path.
    pub route: Option<String>,
    /// Known projects.
    pub projects: EntityTable<Project>,
    /// Currently opened project.
    pub selected_project: Option<ProjectId>,
    /// Known task lists.
    pub task_lists: EntityTable<TaskList>,
    /// Known tasks.
    pub tasks: EntityTable<Task>,
    /// Known users.
    pub users: EntityTable<User>,
    /// Most recent failure.
    pub last_failure: Option<FailureNotice>,
}

impl AppState {
    /// Apply one action. Request actions leave entities untouched.
    pub fn reduce(&mut self, action: &Action) {
        if let Some(message) = action.failure() {
            self.last_failure = Some(FailureNotice {
                action: action.tag(),
                message: message.to_owned(),
            });
            return;
        }
        match action {
            Action::Project(action) => self.reduce_project(action),
            Action::TaskList(action) => self.reduce_task_list(action),
            Action::Task(action) => self.reduce_task(action),
            Action::User(action) => self.reduce_user(action),
            Action::Auth(AuthAction::SignedIn(user)) => self.auth.user = Some(user.clone()),
            Action::Auth(AuthAction::SignedOut) => *self = Self::default(),
            Action::Router(RouterAction::Go(path)) => self.route = Some(path.clone()),
        }
    }

    fn reduce_project(&mut self, action: &ProjectAction) {
        match action {
            ProjectAction::LoadSuccess(projects) => self.projects.upsert_many(projects.iter().cloned()),
            ProjectAction::AddSuccess(project)
            | ProjectAction::UpdateSuccess(project)
            | ProjectAction::UpdateListsSuccess(project)
            | ProjectAction::InviteSuccess(project) => self.projects.upsert(project.clone()),
            ProjectAction::DeleteSuccess(project) => {
                let Some(id) = project.id.as_ref() else {
                    return;
                };
                self.projects.remove(id);
                let mut dropped = project.task_lists.clone();
                self.task_lists.remove_where(|list| {
                    let owned = &list.project_id == id;
                    if owned {
                        dropped.extend(list.id.iter().cloned());
                    }
                    owned
                });
                self.tasks.remove_where(|task| dropped.contains(&task.task_list_id));
                if self.selected_project.as_ref() == Some(id) {
                    self.selected_project = None;
                }
            }
            ProjectAction::Select(project) => self.selected_project.clone_from(&project.id),
            _ => {}
        }
    }

    fn reduce_task_list(&mut self, action: &TaskListAction) {
        match action {
            TaskListAction::LoadSuccess(lists) | TaskListAction::SwapSuccess(lists) => {
                self.task_lists.upsert_many(lists.iter().cloned());
            }
            TaskListAction::AddSuccess(list) | TaskListAction::UpdateSuccess(list) => {
                self.task_lists.upsert(list.clone());
            }
            TaskListAction::DeleteSuccess(list) => {
                if let Some(id) = list.id.as_ref() {
                    self.task_lists.remove(id);
                    self.tasks.remove_where(|task| &task.task_list_id == id);
                }
            }
            _ => {}
        }
    }

    fn reduce_task(&mut self, action: &TaskAction) {
        match action {
            TaskAction::LoadInListsSuccess(tasks) | TaskAction::MoveAllSuccess(tasks) => {
                self.tasks.upsert_many(tasks.iter().cloned());
            }
            TaskAction::AddSuccess(task)
            | TaskAction::UpdateSuccess(task)
            | TaskAction::CompleteSuccess(task)
            | TaskAction::MoveSuccess(task) => self.tasks.upsert(task.clone()),
            TaskAction::DeleteSuccess(task) => {
                if let Some(id) = task.id.as_ref() {
                    self.tasks.remove(id);
                }
            }
            _ => {}
        }
    }

    fn reduce_user(&mut self, action: &UserAction) {
        match action {
            UserAction::LoadByProjectSuccess(users)
            | UserAction::SearchSuccess(users)
            | UserAction::BatchUpdateProjectRefSuccess(users) => self.users.upsert_many(users.iter().cloned()),
            UserAction::AddProjectRefSuccess(user) | UserAction::RemoveProjectRefSuccess(user) => {
                self.users.upsert(user.clone());
                if self.auth.user.as_ref().and_then(|u| u.id.as_ref()) == user.id.as_ref() {
                    self.auth.user = Some(user.clone());
                }
            }
            _ => {}
        }
    }

    /// Task lists of a project, sorted by display order.
    #[must_use]
    pub fn lists_of(&self, project: &ProjectId) -> Vec<&TaskList> {
        let mut lists: Vec<_> = self
            .task_lists
            .iter()
            .filter(|list| &list.project_id == project)
            .collect();
        lists.sort_by_key(|list| list.order);
        lists
    }

    /// Tasks of one list, in load order.
    #[must_use]
    pub fn tasks_in(&self, list: &TaskListId) -> Vec<&Task> {
        self.tasks.iter().filter(|task| &task.task_list_id == list).collect()
    }
}
