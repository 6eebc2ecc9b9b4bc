//! Test server for the REST client's integration tests.
//!
//! # Routes
//! - `/todos`, `/todos/{id}`: in-memory JSON CRUD. `Todo` carries a
//!   `revision` field that clients are free not to declare.
//! - `/status/{code}`: any method; answers `code` with the `body` query
//!   parameter as text (empty when missing).
//! - `/echo/method`, `/echo/headers`, `/echo/body`: reflect the request.
//! - `/empty`: 204 No Content.
//! - `/cookies/set`, `/cookies/echo`: set a session cookie, or return the
//!   `Cookie` header the request carried.
//! - `/cookies/login`: set the session cookie and redirect to `/cookies/echo`.
//! - `/redirect/{code}?to=<path>`: any method; answers `code` with
//!   `Location: <path>`.
//! - `/loop`: redirects to itself forever.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, HeaderMap, Method, StatusCode},
    response::IntoResponse,
    routing::{any, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "session=abc123; Path=/";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Todo {
    pub id: Uuid,
    pub title: String,
    pub completed: bool,
    pub revision: u32,
}

#[derive(Deserialize)]
pub struct CreateTodo {
    pub title: String,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Deserialize)]
pub struct UpdateTodo {
    pub title: Option<String>,
    pub completed: Option<bool>,
}

pub type Db = Arc<RwLock<HashMap<Uuid, Todo>>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(HashMap::new()));
    Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route(
            "/todos/{id}",
            get(get_todo)
                .put(update_todo)
                .patch(update_todo)
                .delete(delete_todo),
        )
        .with_state(db)
        .route("/status/{code}", any(status))
        .route("/echo/method", any(echo_method))
        .route("/echo/headers", any(echo_headers))
        .route("/echo/body", any(echo_body))
        .route("/empty", any(empty))
        .route("/cookies/set", get(set_cookie))
        .route("/cookies/echo", get(echo_cookie))
        .route("/cookies/login", any(login))
        .route("/redirect/{code}", any(redirect))
        .route("/loop", any(redirect_loop))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn list_todos(State(db): State<Db>) -> Json<Vec<Todo>> {
    let todos = db.read().await;
    Json(todos.values().cloned().collect())
}

async fn create_todo(
    State(db): State<Db>,
    Json(input): Json<CreateTodo>,
) -> (StatusCode, Json<Todo>) {
    let todo = Todo {
        id: Uuid::new_v4(),
        title: input.title,
        completed: input.completed,
        revision: 1,
    };
    db.write().await.insert(todo.id, todo.clone());
    (StatusCode::CREATED, Json(todo))
}

async fn get_todo(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
) -> Result<Json<Todo>, StatusCode> {
    let todos = db.read().await;
    todos.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn update_todo(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateTodo>,
) -> Result<Json<Todo>, StatusCode> {
    let mut todos = db.write().await;
    let todo = todos.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    if let Some(title) = input.title {
        todo.title = title;
    }
    if let Some(completed) = input.completed {
        todo.completed = completed;
    }
    todo.revision += 1;
    Ok(Json(todo.clone()))
}

async fn delete_todo(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, StatusCode> {
    let mut todos = db.write().await;
    todos.remove(&id).map(|_| StatusCode::NO_CONTENT).ok_or(StatusCode::NOT_FOUND)
}

async fn status(
    Path(code): Path<u16>,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, String) {
    let status = StatusCode::from_u16(code).unwrap_or(StatusCode::BAD_REQUEST);
    (status, params.get("body").cloned().unwrap_or_default())
}

async fn echo_method(method: Method) -> String {
    method.to_string()
}

async fn echo_headers(headers: HeaderMap) -> Json<BTreeMap<String, String>> {
    let echoed = headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect();
    Json(echoed)
}

async fn echo_body(body: Bytes) -> Bytes {
    body
}

async fn empty() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn set_cookie() -> impl IntoResponse {
    ([(header::SET_COOKIE, SESSION_COOKIE)], "cookie set")
}

async fn login() -> impl IntoResponse {
    (
        StatusCode::FOUND,
        [
            (header::SET_COOKIE, SESSION_COOKIE),
            (header::LOCATION, "/cookies/echo"),
        ],
    )
}

async fn redirect(
    Path(code): Path<u16>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    let status = StatusCode::from_u16(code).unwrap_or(StatusCode::FOUND);
    let to = params.get("to").cloned().unwrap_or_else(|| "/".to_string());
    (status, [(header::LOCATION, to)])
}

async fn redirect_loop() -> impl IntoResponse {
    (StatusCode::FOUND, [(header::LOCATION, "/loop")])
}

async fn echo_cookie(headers: HeaderMap) -> String {
    headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}
