//! Service tests against an in-process json-server style backend.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::extract::{Path, Query, State};
use axum::http::{Method, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};
use taskmgr_core::{Project, ProjectId, Task, TaskList, TaskListId, User, UserId};
use taskmgr_http::{HttpError, Services};

#[derive(Default)]
struct Db {
    log: Vec<String>,
    collections: HashMap<String, BTreeMap<String, Value>>,
    next_id: u64,
}

#[derive(Clone, Default)]
struct Backend {
    db: Arc<Mutex<Db>>,
}

impl Backend {
    fn lock(&self) -> MutexGuard<'_, Db> {
        self.db.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn seed(&self, collection: &str, id: &str, mut value: Value) {
        value["id"] = json!(id);
        self.lock()
            .collections
            .entry(collection.to_owned())
            .or_default()
            .insert(id.to_owned(), value);
    }

    fn find(&self, collection: &str, id: &str) -> Option<Value> {
        self.lock().collections.get(collection).and_then(|c| c.get(id).cloned())
    }

    fn log(&self) -> Vec<String> {
        self.lock().log.clone()
    }

    fn record(&self, method: &Method, path: &str) {
        self.lock().log.push(format!("{method} {path}"));
    }
}

fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn matches(item: &Value, query: &HashMap<String, String>) -> bool {
    query.iter().all(|(key, wanted)| {
        if let Some(field) = key.strip_suffix("_like") {
            match &item[field] {
                Value::Array(values) => values.iter().any(|v| scalar(v) == *wanted),
                Value::Null => false,
                other => scalar(other).contains(wanted.as_str()),
            }
        } else {
            scalar(&item[key.as_str()]) == *wanted
        }
    })
}

async fn list(
    State(backend): State<Backend>,
    Path(collection): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Vec<Value>> {
    backend.record(&Method::GET, &format!("/{collection}"));
    let db = backend.lock();
    let items = db
        .collections
        .get(&collection)
        .map(|items| items.values().filter(|item| matches(item, &query)).cloned().collect())
        .unwrap_or_default();
    Json(items)
}

async fn create(
    State(backend): State<Backend>,
    Path(collection): Path<String>,
    Json(mut body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    backend.record(&Method::POST, &format!("/{collection}"));
    let mut db = backend.lock();
    db.next_id += 1;
    let id = db.next_id.to_string();
    body["id"] = json!(id);
    db.collections
        .entry(collection)
        .or_default()
        .insert(id, body.clone());
    (StatusCode::CREATED, Json(body))
}

async fn fetch(
    State(backend): State<Backend>,
    Path((collection, id)): Path<(String, String)>,
) -> Result<Json<Value>, StatusCode> {
    backend.record(&Method::GET, &format!("/{collection}/{id}"));
    backend.find(&collection, &id).map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn patch(
    State(backend): State<Backend>,
    Path((collection, id)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    backend.record(&Method::PATCH, &format!("/{collection}/{id}"));
    let mut db = backend.lock();
    let item = db
        .collections
        .get_mut(&collection)
        .and_then(|c| c.get_mut(&id))
        .ok_or(StatusCode::NOT_FOUND)?;
    if let (Value::Object(target), Value::Object(fields)) = (item, body) {
        target.extend(fields);
    }
    let updated = db.collections[&collection][&id].clone();
    Ok(Json(updated))
}

async fn remove(
    State(backend): State<Backend>,
    Path((collection, id)): Path<(String, String)>,
) -> Result<Json<Value>, StatusCode> {
    backend.record(&Method::DELETE, &format!("/{collection}/{id}"));
    backend
        .lock()
        .collections
        .get_mut(&collection)
        .and_then(|c| c.remove(&id))
        .map(|_| Json(json!({})))
        .ok_or(StatusCode::NOT_FOUND)
}

async fn serve(backend: Backend) -> Services {
    let app = Router::new()
        .route("/{collection}", get(list).post(create))
        .route("/{collection}/{id}", get(fetch).patch(patch).delete(remove))
        .with_state(backend);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fake backend");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve fake backend");
    });
    Services::connect(&format!("http://{addr}"), None).expect("connect services")
}

fn project(id: &str, lists: &[&str], members: &[&str]) -> Project {
    Project {
        id: Some(ProjectId::new(id)),
        name: format!("project {id}"),
        desc: None,
        cover_img: "/covers/0.jpg".into(),
        task_lists: lists.iter().map(|l| TaskListId::new(*l)).collect(),
        members: members.iter().map(|m| UserId::new(*m)).collect(),
    }
}

fn user(id: &str) -> User {
    User {
        id: Some(UserId::new(id)),
        email: format!("{id}@example.com"),
        name: id.to_owned(),
        ..User::default()
    }
}

#[tokio::test]
async fn add_project_returns_server_assigned_entity() {
    let backend = Backend::default();
    let services = serve(backend.clone()).await;

    let draft = Project {
        name: "Launch".into(),
        cover_img: "/covers/1.jpg".into(),
        members: vec![UserId::new("u1")],
        ..Project::default()
    };
    let created = services.projects.add(&draft).await.expect("add project");

    let id = created.id.clone().expect("server assigned id");
    assert_eq!(created.name, "Launch");
    assert_eq!(created.members, vec![UserId::new("u1")]);
    assert!(backend.find("projects", id.as_str()).is_some());
}

#[tokio::test]
async fn update_patches_only_mutable_fields() {
    let backend = Backend::default();
    backend.seed("projects", "1", serde_json::to_value(project("1", &["l1"], &["a"])).unwrap());
    let services = serve(backend.clone()).await;

    let mut edited = project("1", &[], &["someone-else"]);
    edited.name = "Renamed".into();
    edited.desc = Some("now with text".into());
    let updated = services.projects.update(&edited).await.expect("update project");

    assert_eq!(updated.name, "Renamed");
    assert_eq!(updated.desc.as_deref(), Some("now with text"));
    assert_eq!(updated.members, vec![UserId::new("a")]);
    assert_eq!(updated.task_lists, vec![TaskListId::new("l1")]);
}

#[tokio::test]
async fn delete_removes_task_lists_before_the_project() {
    let backend = Backend::default();
    let original = project("p", &["l1", "l2"], &["a"]);
    backend.seed("projects", "p", serde_json::to_value(&original).unwrap());
    backend.seed("taskLists", "l1", json!({ "name": "Todo", "order": 1, "projectId": "p" }));
    backend.seed("taskLists", "l2", json!({ "name": "Done", "order": 2, "projectId": "p" }));
    let services = serve(backend.clone()).await;

    let resolved = services.projects.del(&original).await.expect("delete project");

    assert_eq!(resolved, original);
    let log = backend.log();
    let position = |entry: &str| log.iter().position(|e| e == entry).expect(entry);
    let project_delete = position("DELETE /projects/p");
    assert!(position("DELETE /taskLists/l1") < project_delete);
    assert!(position("DELETE /taskLists/l2") < project_delete);
    assert!(backend.find("projects", "p").is_none());
}

#[tokio::test]
async fn delete_keeps_project_when_a_list_deletion_fails() {
    let backend = Backend::default();
    let original = project("p", &["missing"], &[]);
    backend.seed("projects", "p", serde_json::to_value(&original).unwrap());
    let services = serve(backend.clone()).await;

    let err = services.projects.del(&original).await.expect_err("list is missing");

    assert!(matches!(err, HttpError::Status { status, .. } if status == reqwest::StatusCode::NOT_FOUND));
    assert!(backend.find("projects", "p").is_some());
}

#[tokio::test]
async fn get_filters_projects_by_member() {
    let backend = Backend::default();
    backend.seed("projects", "1", serde_json::to_value(project("1", &[], &["a", "b"])).unwrap());
    backend.seed("projects", "2", serde_json::to_value(project("2", &[], &["c"])).unwrap());
    let services = serve(backend).await;

    let projects = services.projects.get(&UserId::new("b")).await.expect("load projects");

    let ids: Vec<_> = projects.iter().filter_map(|p| p.id.clone()).collect();
    assert_eq!(ids, vec![ProjectId::new("1")]);
}

#[tokio::test]
async fn invite_merges_members_as_a_set() {
    let backend = Backend::default();
    backend.seed("projects", "1", serde_json::to_value(project("1", &[], &["A", "B"])).unwrap());
    let services = serve(backend.clone()).await;

    let updated = services
        .projects
        .invite_members(&ProjectId::new("1"), &[user("B"), user("C")])
        .await
        .expect("invite");

    assert_eq!(updated.members, vec![UserId::new("A"), UserId::new("B"), UserId::new("C")]);
    assert_eq!(backend.log(), vec!["GET /projects/1", "PATCH /projects/1"]);
}

#[tokio::test]
async fn update_task_lists_sends_only_the_list_collection() {
    let backend = Backend::default();
    backend.seed("projects", "1", serde_json::to_value(project("1", &[], &["a"])).unwrap());
    let services = serve(backend).await;

    let mut local = project("1", &["x", "y"], &[]);
    local.name = "ignored".into();
    let updated = services.projects.update_task_lists(&local).await.expect("update lists");

    assert_eq!(updated.task_lists, vec![TaskListId::new("x"), TaskListId::new("y")]);
    assert_eq!(updated.name, "project 1");
    assert_eq!(updated.members, vec![UserId::new("a")]);
}

#[tokio::test]
async fn move_all_reports_every_moved_task_once() {
    let backend = Backend::default();
    for id in ["t1", "t2", "t3"] {
        backend.seed("tasks", id, json!({ "taskListId": "S", "desc": id }));
    }
    backend.seed("tasks", "other", json!({ "taskListId": "X", "desc": "other" }));
    let services = serve(backend.clone()).await;

    let moved = services
        .tasks
        .move_all(&TaskListId::new("S"), &TaskListId::new("T"))
        .await
        .expect("move all");

    let mut ids: Vec<_> = moved.iter().filter_map(|t| t.id.clone()).map(|id| id.to_string()).collect();
    ids.sort();
    assert_eq!(ids, vec!["t1", "t2", "t3"]);
    assert!(moved.iter().all(|t| t.task_list_id == TaskListId::new("T")));
    assert_eq!(backend.find("tasks", "other").unwrap()["taskListId"], "X");
}

#[tokio::test]
async fn get_by_lists_concatenates_every_list() {
    let backend = Backend::default();
    backend.seed("tasks", "1", json!({ "taskListId": "a" }));
    backend.seed("tasks", "2", json!({ "taskListId": "b" }));
    backend.seed("tasks", "3", json!({ "taskListId": "c" }));
    let services = serve(backend).await;

    let lists: Vec<_> = ["a", "b"]
        .into_iter()
        .map(|id| TaskList {
            id: Some(TaskListId::new(id)),
            name: id.to_owned(),
            order: 0,
            project_id: ProjectId::new("p"),
        })
        .collect();
    let tasks = services.tasks.get_by_lists(&lists).await.expect("load tasks");

    assert_eq!(tasks.len(), 2);
}

#[tokio::test]
async fn complete_toggles_the_flag() {
    let backend = Backend::default();
    backend.seed("tasks", "1", json!({ "taskListId": "a", "completed": false }));
    let services = serve(backend).await;

    let task = Task {
        id: Some("1".into()),
        task_list_id: TaskListId::new("a"),
        ..Task::default()
    };
    let done = services.tasks.complete(&task).await.expect("complete");
    assert!(done.completed);

    let undone = services.tasks.complete(&done).await.expect("undo");
    assert!(!undone.completed);
}

#[tokio::test]
async fn init_creates_default_lists_and_attaches_them() {
    let backend = Backend::default();
    let services = serve(backend.clone()).await;

    let initialized = services
        .task_lists
        .init_for_project(&project("p", &[], &[]))
        .await
        .expect("init lists");

    assert_eq!(initialized.task_lists.len(), 3);
    let names: Vec<_> = initialized
        .task_lists
        .iter()
        .map(|id| backend.find("taskLists", id.as_str()).unwrap()["name"].clone())
        .collect();
    assert_eq!(names, vec![json!("Todo"), json!("In Progress"), json!("Done")]);
}

#[tokio::test]
async fn swap_exchanges_orders() {
    let backend = Backend::default();
    backend.seed("taskLists", "a", json!({ "name": "A", "order": 1, "projectId": "p" }));
    backend.seed("taskLists", "b", json!({ "name": "B", "order": 2, "projectId": "p" }));
    let services = serve(backend).await;

    let list = |id: &str, order| TaskList {
        id: Some(TaskListId::new(id)),
        name: id.to_uppercase(),
        order,
        project_id: ProjectId::new("p"),
    };
    let (a, b) = services
        .task_lists
        .swap_order(&list("a", 1), &list("b", 2))
        .await
        .expect("swap");

    assert_eq!((a.order, b.order), (2, 1));
}

#[tokio::test]
async fn adding_an_existing_project_ref_sends_nothing() {
    let backend = Backend::default();
    let services = serve(backend.clone()).await;

    let mut member = user("u1");
    member.project_ids = vec![ProjectId::new("p")];
    let unchanged = services
        .users
        .add_project_ref(&member, &ProjectId::new("p"))
        .await
        .expect("add ref");

    assert_eq!(unchanged, member);
    assert!(backend.log().is_empty());
}

#[tokio::test]
async fn batch_update_adds_project_to_every_member() {
    let backend = Backend::default();
    backend.seed("users", "a", json!({ "email": "a@x", "name": "a", "projectIds": [] }));
    backend.seed("users", "b", json!({ "email": "b@x", "name": "b", "projectIds": ["p"] }));
    let services = serve(backend.clone()).await;

    let users = services
        .users
        .batch_update_project_ref(&project("p", &[], &["a", "b"]))
        .await
        .expect("batch update");

    assert_eq!(users.len(), 2);
    assert!(users.iter().all(|u| u.project_ids == vec![ProjectId::new("p")]));
    assert!(!backend.log().contains(&"PATCH /users/b".to_owned()));
}

#[tokio::test]
async fn non_success_status_carries_status_and_body() {
    let backend = Backend::default();
    let services = serve(backend).await;

    let err = services
        .users
        .get(&UserId::new("nobody"))
        .await
        .expect_err("missing user");

    match err {
        HttpError::Status { status, url, .. } => {
            assert_eq!(status, reqwest::StatusCode::NOT_FOUND);
            assert!(url.ends_with("/users/nobody"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
