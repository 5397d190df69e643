//! Test utilities for nestegg-core
//!
//! This module provides an in-memory mock of the finance API that can be
//! used for development and integration tests.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    extract::{Path, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Map, Value};
use tokio::sync::oneshot;

use crate::models::{Credentials, ProfileUpdate, Resource};

#[derive(Debug, Clone)]
struct MockUser {
    id: String,
    email: String,
    password: String,
    first_name: String,
    last_name: String,
    token: String,
}

impl MockUser {
    fn to_json(&self) -> Value {
        json!({
            "id": self.id,
            "email": self.email,
            "firstName": self.first_name,
            "lastName": self.last_name,
        })
    }
}

#[derive(Debug, Default)]
struct MockState {
    users: Vec<MockUser>,
    /// (owner id, resource, record body)
    records: Vec<(String, Resource, Map<String, Value>)>,
    next_id: u64,
    tokens_revoked: bool,
    malformed_lists: bool,
}

impl MockState {
    fn object_id(&mut self) -> String {
        self.next_id += 1;
        format!("{:024x}", self.next_id)
    }
}

type Shared = Arc<Mutex<MockState>>;

fn lock(state: &Shared) -> MutexGuard<'_, MockState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Mock finance API server for testing and development
pub struct MockApiServer {
    addr: SocketAddr,
    state: Shared,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockApiServer {
    /// Start the mock server on an available port
    pub async fn start() -> Self {
        let state: Shared = Arc::default();

        let mut app = Router::new()
            .route("/api/register", post(handle_register))
            .route("/api/login", post(handle_login))
            .route("/api/auth/me", get(handle_me).put(handle_update_me));
        for resource in [Resource::Transactions, Resource::Savings] {
            app = record_routes(app, resource);
        }
        let app = app.with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            state,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Number of stored records of a resource, across all users
    pub fn record_count(&self, resource: Resource) -> usize {
        lock(&self.state)
            .records
            .iter()
            .filter(|(_, r, _)| *r == resource)
            .count()
    }

    /// Reject every token from now on, as if all sessions expired
    pub fn revoke_tokens(&self) {
        lock(&self.state).tokens_revoked = true;
    }

    /// Answer list requests with an object instead of an array
    pub fn serve_malformed_lists(&self, malformed: bool) {
        lock(&self.state).malformed_lists = malformed;
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockApiServer {
    fn drop(&mut self) {
        self.stop();
    }
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

/// Resolve the bearer token to a user id
fn authorize(state: &MockState, headers: &HeaderMap) -> Result<String, Response> {
    let token = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| error(StatusCode::UNAUTHORIZED, "Missing token"))?;

    if state.tokens_revoked {
        return Err(error(StatusCode::UNAUTHORIZED, "Token expired"));
    }
    state
        .users
        .iter()
        .find(|u| u.token == token)
        .map(|u| u.id.clone())
        .ok_or_else(|| error(StatusCode::UNAUTHORIZED, "Invalid token"))
}

fn record_routes(router: Router<Shared>, resource: Resource) -> Router<Shared> {
    let base = format!("/api/{}", resource.path());
    let item = format!("{}/:id", base);

    router
        .route(
            &base,
            get(move |State(state): State<Shared>, headers: HeaderMap| async move {
                list_records(&state, &headers, resource)
            })
            .post(
                move |State(state): State<Shared>, headers: HeaderMap, Json(body): Json<Value>| async move {
                    create_record(&state, &headers, resource, body)
                },
            ),
        )
        .route(
            &item,
            put(
                move |State(state): State<Shared>,
                      Path(id): Path<String>,
                      headers: HeaderMap,
                      Json(body): Json<Value>| async move {
                    update_record(&state, &headers, resource, &id, body)
                },
            )
            .delete(
                move |State(state): State<Shared>, Path(id): Path<String>, headers: HeaderMap| async move {
                    delete_record(&state, &headers, resource, &id)
                },
            ),
        )
}

fn list_records(state: &Shared, headers: &HeaderMap, resource: Resource) -> Response {
    let state = lock(state);
    let owner = match authorize(&state, headers) {
        Ok(owner) => owner,
        Err(response) => return response,
    };
    if state.malformed_lists {
        return Json(json!({ "items": "unavailable" })).into_response();
    }

    let records: Vec<Value> = state
        .records
        .iter()
        .filter(|(o, r, _)| *o == owner && *r == resource)
        .map(|(_, _, body)| Value::Object(body.clone()))
        .collect();
    Json(Value::Array(records)).into_response()
}

fn create_record(state: &Shared, headers: &HeaderMap, resource: Resource, body: Value) -> Response {
    let mut state = lock(state);
    let owner = match authorize(&state, headers) {
        Ok(owner) => owner,
        Err(response) => return response,
    };
    let Value::Object(mut body) = body else {
        return error(StatusCode::BAD_REQUEST, "Expected a JSON object");
    };

    body.remove("id");
    body.insert("_id".to_string(), Value::String(state.object_id()));
    state.records.push((owner, resource, body.clone()));
    (StatusCode::CREATED, Json(Value::Object(body))).into_response()
}

fn update_record(
    state: &Shared,
    headers: &HeaderMap,
    resource: Resource,
    id: &str,
    body: Value,
) -> Response {
    let mut state = lock(state);
    let owner = match authorize(&state, headers) {
        Ok(owner) => owner,
        Err(response) => return response,
    };
    let Value::Object(changes) = body else {
        return error(StatusCode::BAD_REQUEST, "Expected a JSON object");
    };

    let found = state.records.iter_mut().find(|(o, r, b)| {
        *o == owner && *r == resource && b.get("_id").and_then(Value::as_str) == Some(id)
    });
    match found {
        Some((_, _, stored)) => {
            for (key, value) in changes {
                if key != "_id" && key != "id" {
                    stored.insert(key, value);
                }
            }
            Json(Value::Object(stored.clone())).into_response()
        }
        None => error(StatusCode::NOT_FOUND, "Record not found"),
    }
}

fn delete_record(state: &Shared, headers: &HeaderMap, resource: Resource, id: &str) -> Response {
    let mut state = lock(state);
    let owner = match authorize(&state, headers) {
        Ok(owner) => owner,
        Err(response) => return response,
    };

    let before = state.records.len();
    state.records.retain(|(o, r, b)| {
        !(*o == owner && *r == resource && b.get("_id").and_then(Value::as_str) == Some(id))
    });
    if state.records.len() == before {
        return error(StatusCode::NOT_FOUND, "Record not found");
    }
    Json(json!({ "message": "Deleted" })).into_response()
}

async fn handle_register(
    State(state): State<Shared>,
    Json(credentials): Json<Credentials>,
) -> Response {
    let mut state = lock(&state);
    if credentials.email.is_empty() || credentials.password.is_empty() {
        return error(StatusCode::BAD_REQUEST, "Email and password are required");
    }
    if state.users.iter().any(|u| u.email == credentials.email) {
        return error(StatusCode::BAD_REQUEST, "User already exists");
    }

    let id = state.object_id();
    let user = MockUser {
        token: format!("token-{}", id),
        id,
        email: credentials.email,
        password: credentials.password,
        first_name: String::new(),
        last_name: String::new(),
    };
    state.users.push(user.clone());
    (
        StatusCode::CREATED,
        Json(json!({ "token": user.token, "user": user.to_json() })),
    )
        .into_response()
}

async fn handle_login(
    State(state): State<Shared>,
    Json(credentials): Json<Credentials>,
) -> Response {
    let state = lock(&state);
    match state
        .users
        .iter()
        .find(|u| u.email == credentials.email && u.password == credentials.password)
    {
        Some(user) => Json(json!({ "token": user.token, "user": user.to_json() })).into_response(),
        None => error(StatusCode::UNAUTHORIZED, "Invalid email or password"),
    }
}

async fn handle_me(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let state = lock(&state);
    let id = match authorize(&state, &headers) {
        Ok(id) => id,
        Err(response) => return response,
    };
    match state.users.iter().find(|u| u.id == id) {
        Some(user) => Json(user.to_json()).into_response(),
        None => error(StatusCode::NOT_FOUND, "User not found"),
    }
}

async fn handle_update_me(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(update): Json<ProfileUpdate>,
) -> Response {
    let mut state = lock(&state);
    let id = match authorize(&state, &headers) {
        Ok(id) => id,
        Err(response) => return response,
    };
    match state.users.iter_mut().find(|u| u.id == id) {
        Some(user) => {
            user.first_name = update.first_name;
            user.last_name = update.last_name;
            // The real API answers with the names only
            Json(json!({ "firstName": user.first_name, "lastName": user.last_name }))
                .into_response()
        }
        None => error(StatusCode::NOT_FOUND, "User not found"),
    }
}
