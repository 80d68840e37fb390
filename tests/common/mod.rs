//! Shared test fixtures: an in-memory database and a stub of the upstream AI service.

#![allow(dead_code)]

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use companion_gateway::infrastructure::database::DatabaseConnection;
use di::Ref;
use serde_json::{Value, json};
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// In-memory database with migrations applied.
///
/// A single connection, because every `:memory:` connection is its own database.
pub async fn setup_test_db() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    sqlx::migrate!().run(&pool).await.unwrap();
    pool
}

pub fn connection(pool: &SqlitePool) -> Ref<DatabaseConnection> {
    Ref::new(DatabaseConnection::from_pool(pool.clone()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamMode {
    Healthy,
    Failing,
    Slow,
}

/// A request as seen by the stub upstream.
#[derive(Debug, Clone)]
pub struct Received {
    pub path: String,
    pub body: Option<Value>,
    pub api_key: Option<String>,
}

pub struct Upstream {
    pub base_url: String,
    pub received: Arc<Mutex<Vec<Received>>>,
}

impl Upstream {
    pub fn received(&self) -> Vec<Received> {
        self.received.lock().unwrap().clone()
    }
}

#[derive(Clone)]
struct StubState {
    mode: UpstreamMode,
    received: Arc<Mutex<Vec<Received>>>,
}

impl StubState {
    async fn respond(&self, path: &str, headers: &HeaderMap, body: Option<Value>, payload: Value) -> Response {
        self.received.lock().unwrap().push(Received {
            path: path.to_owned(),
            body,
            api_key: headers
                .get("x-api-key")
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned),
        });

        match self.mode {
            UpstreamMode::Healthy => Json(payload).into_response(),
            UpstreamMode::Failing => {
                (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded").into_response()
            }
            UpstreamMode::Slow => {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(payload).into_response()
            }
        }
    }
}

pub fn chat_response() -> Value {
    json!({
        "id": "msg-1",
        "message": "Every action carries its consequence.",
        "timestamp": "2025-06-01T12:00:00Z",
        "quality_score": 7,
        "score_reason": "Thoughtful question"
    })
}

/// Upstream points payloads use camelCase.
pub fn points_response() -> Value {
    json!({
        "pointsEarned": 42,
        "totalPoints": 1250,
        "breakdown": {"base": 5, "duration": 12, "messages": 20, "streak": 5}
    })
}

pub fn health_response() -> Value {
    json!({
        "status": "healthy",
        "timestamp": "2025-06-01T12:00:00Z",
        "version": "1.0.0",
        "environment": "test",
        "system": {
            "cpu_usage": 12.5,
            "memory_usage": {"percent": 40.0, "used_mb": 512.0, "total_mb": 1024.0},
            "disk_usage": {"percent": 50.0, "used_gb": 10.0, "total_gb": 20.0},
            "platform": "Linux",
            "python_version": "3.11.4"
        },
        "service": {"cache_size": 3, "uptime_seconds": 120}
    })
}

async fn chat_generate(State(state): State<StubState>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    state
        .respond("/api/chat/generate", &headers, Some(body), chat_response())
        .await
}

/// Rejects bodies without the upstream's camelCase members, like its request model does.
async fn session_metrics(State(state): State<StubState>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if !body["durationSeconds"].is_i64() || !body["messageCount"].is_i64() {
        return (StatusCode::UNPROCESSABLE_ENTITY, "durationSeconds and messageCount are required").into_response();
    }

    state
        .respond("/api/session/metrics", &headers, Some(body), points_response())
        .await
}

async fn points_calculations(State(state): State<StubState>, headers: HeaderMap) -> Response {
    state
        .respond("/api/points/calculations", &headers, None, points_response())
        .await
}

async fn health(State(state): State<StubState>, headers: HeaderMap) -> Response {
    state
        .respond("/health", &headers, None, health_response())
        .await
}

/// Starts the stub upstream AI service on a random local port.
pub async fn spawn_upstream(mode: UpstreamMode) -> Upstream {
    let received = Arc::new(Mutex::new(Vec::new()));
    let state = StubState {
        mode,
        received: received.clone(),
    };

    let app = Router::new()
        .route("/api/chat/generate", post(chat_generate))
        .route("/api/session/metrics", post(session_metrics))
        .route("/api/points/calculations", get(points_calculations))
        .route("/health", get(health))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    Upstream {
        base_url: format!("http://{address}"),
        received,
    }
}

/// Base URL of a port nothing listens on.
pub async fn unreachable_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{address}")
}
