//! Common test utilities for portal tests
//!
//! Provides session fixtures and an in-process mock of the REST backend.

#![allow(dead_code)]

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use campusdesk_core::{ApiConfig, StorageConfig};
use campusdesk_portal::{ApiClient, DocumentRoot, MemoryStorage, Portal, Role, SessionUser};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

pub const GOOD_TOKEN: &str = "good-token";
pub const PASSWORD: &str = "secret";

pub fn user(role: Role) -> SessionUser {
    SessionUser {
        user_id: format!("{}-1", role.as_str().to_lowercase()),
        email: format!("{}@uni.edu", role.as_str().to_lowercase()),
        role,
        status: "ACTIVE".to_string(),
        name: None,
    }
}

/// A portal over fresh in-memory storage; the storage handle shares contents
pub fn memory_portal() -> (Portal, MemoryStorage, Arc<DocumentRoot>) {
    let storage = MemoryStorage::new();
    let document = Arc::new(DocumentRoot::new());
    let portal = Portal::init(
        Arc::new(storage.clone()),
        Arc::clone(&document),
        &StorageConfig::default(),
    );
    (portal, storage, document)
}

pub fn api_client(base_url: &str) -> Arc<ApiClient> {
    let config = ApiConfig {
        base_url: base_url.to_string(),
        timeout_seconds: 5,
        ..ApiConfig::default()
    };
    Arc::new(ApiClient::new(&config).unwrap())
}

/// Records held by the mock backend
#[derive(Clone, Default)]
pub struct Backend {
    pub colleges: Arc<Mutex<Vec<Value>>>,
    pub next_id: Arc<Mutex<u32>>,
    pub logouts: Arc<Mutex<u32>>,
    /// Answer deletes with `204 No Content` instead of an envelope
    pub empty_deletes: Arc<Mutex<bool>>,
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Bearer {}", GOOD_TOKEN))
        .unwrap_or(false)
}

fn unauthorized() -> (StatusCode, Json<Value>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "success": false, "message": "Invalid or expired token" })),
    )
}

async fn login(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let email = body["email"].as_str().unwrap_or_default().to_string();
    if body["password"] != PASSWORD {
        return (
            StatusCode::OK,
            Json(json!({ "success": false, "message": "Invalid email or password" })),
        );
    }

    let role = if email.starts_with("student") { "STUDENT" } else { "ADMIN" };
    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "data": {
                "user": { "_id": "u-42", "email": email, "role": role, "status": "ACTIVE" },
                "accessToken": GOOD_TOKEN
            }
        })),
    )
}

async fn logout(State(backend): State<Backend>) -> Json<Value> {
    *backend.logouts.lock().unwrap() += 1;
    Json(json!({ "success": true, "message": "Logged out" }))
}

async fn me(headers: HeaderMap) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return unauthorized();
    }
    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "data": {
                "id": "u-42",
                "email": "admin@uni.edu",
                "role": "ADMIN",
                "name": "Registrar"
            }
        })),
    )
}

async fn list_colleges(
    State(backend): State<Backend>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return unauthorized();
    }
    let colleges = backend.colleges.lock().unwrap().clone();
    (StatusCode::OK, Json(json!({ "success": true, "data": colleges })))
}

async fn create_college(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Json(mut body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return unauthorized();
    }
    let id = {
        let mut next = backend.next_id.lock().unwrap();
        *next += 1;
        format!("c{}", next)
    };
    body["_id"] = json!(id);
    backend.colleges.lock().unwrap().push(body.clone());
    (
        StatusCode::CREATED,
        Json(json!({ "success": true, "data": body })),
    )
}

async fn get_college(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return unauthorized();
    }
    let colleges = backend.colleges.lock().unwrap();
    match colleges.iter().find(|c| c["_id"] == id) {
        Some(college) => (
            StatusCode::OK,
            Json(json!({ "success": true, "data": college })),
        ),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "success": false, "message": "College not found" })),
        ),
    }
}

async fn update_college(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(mut body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return unauthorized();
    }
    let mut colleges = backend.colleges.lock().unwrap();
    match colleges.iter_mut().find(|c| c["_id"] == id) {
        Some(existing) => {
            body["_id"] = json!(id);
            *existing = body.clone();
            (StatusCode::OK, Json(json!({ "success": true, "data": body })))
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "success": false, "message": "College not found" })),
        ),
    }
}

async fn delete_college(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized().into_response();
    }
    let mut colleges = backend.colleges.lock().unwrap();
    let before = colleges.len();
    colleges.retain(|c| c["_id"] != id);
    if colleges.len() == before {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "success": false, "message": "College not found" })),
        )
            .into_response();
    }
    if *backend.empty_deletes.lock().unwrap() {
        return StatusCode::NO_CONTENT.into_response();
    }
    (StatusCode::OK, Json(json!({ "success": true }))).into_response()
}

/// Serve the mock backend on an ephemeral port; returns its `/api` base URL
pub async fn spawn_backend(backend: Backend) -> String {
    let app = Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/me", get(me))
        .route("/api/colleges", get(list_colleges).post(create_college))
        .route(
            "/api/colleges/{id}",
            get(get_college).put(update_college).delete(delete_college),
        )
        .with_state(backend);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}/api", addr)
}

/// A base URL nothing listens on
pub fn unreachable_backend() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/api", addr)
}
