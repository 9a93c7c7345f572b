#![allow(dead_code)]

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::Json;
use axum::Router;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use chrono::{TimeZone, Utc};
use serde_json::{Value, json};
use tokio::time::Instant;

use astra_console::api::{AuditApi, EventQuery, LoginResponse, PasswordLogin};
use astra_console::config::Config;
use astra_console::error::AppError;
use astra_console::models::{
    AssetEvent, AssetEventType, AuditSummary, CurrentUser, Role, UserEvent, UserEventType,
};
use astra_console::state::SharedState;
use astra_console::storage::{MemoryStorage, Storage};

pub const TOKEN: &str = "good-token";

/// One request seen by [`MockApi`].
#[derive(Debug, Clone)]
pub struct Call {
    pub path: &'static str,
    pub query: Option<EventQuery>,
    pub at: Instant,
}

/// In-process stand-in for the asset-management API. Serves pages out of
/// fixed datasets, filtering the way the server does.
pub struct MockApi {
    pub role: Mutex<String>,
    pub user_data: Mutex<Vec<UserEvent>>,
    pub asset_data: Mutex<Vec<AssetEvent>>,
    pub summary: AuditSummary,
    pub calls: Mutex<Vec<Call>>,
    /// Latency for successive event requests; empty means immediate.
    pub delays: Mutex<VecDeque<Duration>>,
    pub fail_events: AtomicBool,
    pub unauthorized: AtomicBool,
    pub fail_summary: AtomicBool,
}

impl MockApi {
    pub fn new(role: &str) -> Self {
        Self {
            role: Mutex::new(role.to_string()),
            user_data: Mutex::new(Vec::new()),
            asset_data: Mutex::new(Vec::new()),
            summary: sample_summary(),
            calls: Mutex::new(Vec::new()),
            delays: Mutex::new(VecDeque::new()),
            fail_events: AtomicBool::new(false),
            unauthorized: AtomicBool::new(false),
            fail_summary: AtomicBool::new(false),
        }
    }

    pub fn with_user_events(self, events: Vec<UserEvent>) -> Self {
        *self.user_data.lock().unwrap() = events;
        self
    }

    pub fn with_asset_events(self, events: Vec<AssetEvent>) -> Self {
        *self.asset_data.lock().unwrap() = events;
        self
    }

    pub fn push_delay(&self, delay: Duration) {
        self.delays.lock().unwrap().push_back(delay);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, path: &str) -> Vec<Call> {
        self.calls().into_iter().filter(|c| c.path == path).collect()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record(&self, path: &'static str, query: Option<&EventQuery>) {
        self.calls.lock().unwrap().push(Call {
            path,
            query: query.cloned(),
            at: Instant::now(),
        });
    }

    fn check(&self, token: &str) -> Result<(), AppError> {
        if token != TOKEN || self.unauthorized.load(Ordering::SeqCst) {
            return Err(AppError::Unauthorized("Could not validate credentials".to_string()));
        }
        Ok(())
    }

    async fn event_gate(&self) -> Result<(), AppError> {
        let delay = self.delays.lock().unwrap().pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_events.load(Ordering::SeqCst) {
            return Err(AppError::Network("connection reset".to_string()));
        }
        Ok(())
    }
}

fn page<T: Clone>(items: Vec<T>, query: &EventQuery) -> Vec<T> {
    items
        .into_iter()
        .skip(query.offset)
        .take(query.limit)
        .collect()
}

fn matches_search(search: &Option<String>, fields: &[&Option<String>]) -> bool {
    match search {
        None => true,
        Some(s) => fields
            .iter()
            .any(|f| f.as_deref().is_some_and(|v| v.to_lowercase().contains(&s.to_lowercase()))),
    }
}

#[async_trait]
impl AuditApi for MockApi {
    async fn current_user(&self, token: &str) -> Result<CurrentUser, AppError> {
        self.record("/auth/me", None);
        self.check(token)?;
        Ok(CurrentUser {
            id: 1,
            role: Role::from(self.role.lock().unwrap().clone()),
            email: "auditor@example.com".to_string(),
        })
    }

    async fn summary(&self, token: &str) -> Result<AuditSummary, AppError> {
        self.record("/audit/summary", None);
        self.check(token)?;
        if self.fail_summary.load(Ordering::SeqCst) {
            return Err(AppError::Api {
                status: 500,
                message: "summary unavailable".to_string(),
            });
        }
        Ok(self.summary.clone())
    }

    async fn user_events(&self, token: &str, query: &EventQuery) -> Result<Vec<UserEvent>, AppError> {
        self.record("/audit/user-events", Some(query));
        self.check(token)?;
        self.event_gate().await?;
        let data = self.user_data.lock().unwrap().clone();
        let filtered: Vec<UserEvent> = data
            .into_iter()
            .filter(|e| {
                query
                    .event_type
                    .as_deref()
                    .is_none_or(|t| e.event_type.as_str() == t)
            })
            .filter(|e| {
                matches_search(
                    &query.search,
                    &[&e.notes, &e.target_user_name, &e.actor_user_name],
                )
            })
            .collect();
        Ok(page(filtered, query))
    }

    async fn asset_events(
        &self,
        token: &str,
        query: &EventQuery,
    ) -> Result<Vec<AssetEvent>, AppError> {
        self.record("/audit/asset-events", Some(query));
        self.check(token)?;
        self.event_gate().await?;
        let data = self.asset_data.lock().unwrap().clone();
        let filtered: Vec<AssetEvent> = data
            .into_iter()
            .filter(|e| {
                query
                    .event_type
                    .as_deref()
                    .is_none_or(|t| e.event_type.as_str() == t)
            })
            .filter(|e| {
                let tag = Some(e.asset_tag.clone());
                matches_search(&query.search, &[&tag, &e.notes])
            })
            .collect();
        Ok(page(filtered, query))
    }

    async fn login(&self, credentials: &PasswordLogin) -> Result<LoginResponse, AppError> {
        self.record("/auth/login", None);
        if credentials.password == "password123" {
            Ok(LoginResponse {
                access_token: TOKEN.to_string(),
            })
        } else {
            Err(AppError::Unauthorized("Incorrect email or password".to_string()))
        }
    }
}

pub fn sample_summary() -> AuditSummary {
    AuditSummary {
        total_users: 12,
        active_users: 10,
        inactive_users: 2,
        total_assets: 40,
        hardware_count: 30,
        software_count: 10,
        assigned_assets: 25,
        in_stock_assets: 12,
        retired_assets: 3,
        software_seats_total: 50,
        software_seats_used: 20,
        software_seats_available: 30,
        user_events_today: 3,
        user_events_week: 9,
        asset_events_today: 1,
        asset_events_week: 7,
    }
}

pub fn user_event(id: i64, event_type: UserEventType, notes: Option<&str>) -> UserEvent {
    UserEvent {
        id,
        event_type,
        timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap() - chrono::Duration::minutes(id),
        target_user_id: Some(2),
        actor_user_id: Some(1),
        old_value: None,
        new_value: None,
        notes: notes.map(str::to_string),
        target_user_name: Some("Bob".to_string()),
        actor_user_name: Some("Alice".to_string()),
    }
}

/// `n` user events, newest first, alternating between two types.
pub fn user_events(n: usize) -> Vec<UserEvent> {
    (1..=n as i64)
        .map(|id| {
            let t = if id % 2 == 0 {
                UserEventType::RoleChanged
            } else {
                UserEventType::UserCreated
            };
            user_event(id, t, Some(&format!("event {id}")))
        })
        .collect()
}

pub fn asset_event(id: i64, event_type: AssetEventType, tag: &str) -> AssetEvent {
    AssetEvent {
        id,
        asset_id: id * 10,
        asset_tag: tag.to_string(),
        event_type,
        from_user_id: None,
        to_user_id: Some(2),
        from_location_id: Some(1),
        to_location_id: None,
        actor_user_id: Some(1),
        timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap(),
        notes: None,
        from_user_name: None,
        to_user_name: Some("Bob".to_string()),
        actor_user_name: Some("Alice".to_string()),
        from_location_name: Some("Warehouse".to_string()),
        to_location_name: None,
    }
}

pub fn asset_events(n: usize) -> Vec<AssetEvent> {
    (1..=n as i64)
        .map(|id| asset_event(id, AssetEventType::Assign, &format!("LAP-{id:04}")))
        .collect()
}

pub fn test_config() -> Config {
    Config::with_api_url("http://api.test")
}

/// Build console state over `api` with an in-memory store, signed in with
/// `token` when given.
pub fn console_with(api: Arc<MockApi>, token: Option<&str>) -> (SharedState, Arc<MemoryStorage>) {
    console_with_config(api, token, test_config())
}

pub fn console_with_config(
    api: Arc<MockApi>,
    token: Option<&str>,
    config: Config,
) -> (SharedState, Arc<MemoryStorage>) {
    let storage = Arc::new(MemoryStorage::new());
    if let Some(token) = token {
        storage.set("token", token).unwrap();
    }
    let state = astra_console::build_state(config, api, storage.clone()).unwrap();
    (state, storage)
}

// ── HTTP mock server ────────────────────────────────────────────

/// A running mock of the REST API, for exercising the HTTP client.
pub struct TestServer {
    pub addr: SocketAddr,
    pub seen: Arc<Mutex<Vec<String>>>,
}

impl TestServer {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

#[derive(Clone)]
struct ServerState {
    seen: Arc<Mutex<Vec<String>>>,
    user_events: Arc<Vec<Value>>,
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {TOKEN}"))
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "detail": "Could not validate credentials" })),
    )
        .into_response()
}

async fn me(State(state): State<ServerState>, headers: HeaderMap) -> Response {
    state.seen.lock().unwrap().push("/auth/me".to_string());
    if !authorized(&headers) {
        return unauthorized();
    }
    Json(json!({ "id": 7, "role": "AUDITOR", "email": "audit@example.com" })).into_response()
}

async fn summary(State(state): State<ServerState>, headers: HeaderMap) -> Response {
    state.seen.lock().unwrap().push("/audit/summary".to_string());
    if !authorized(&headers) {
        return unauthorized();
    }
    Json(serde_json::to_value(sample_summary()).unwrap()).into_response()
}

async fn user_events_handler(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Query(params): Query<std::collections::HashMap<String, String>>,
    uri: axum::http::Uri,
) -> Response {
    state
        .seen
        .lock()
        .unwrap()
        .push(format!("/audit/user-events?{}", uri.query().unwrap_or("")));
    if !authorized(&headers) {
        return unauthorized();
    }
    let limit: usize = params.get("limit").and_then(|v| v.parse().ok()).unwrap_or(100);
    let offset: usize = params.get("offset").and_then(|v| v.parse().ok()).unwrap_or(0);
    let items: Vec<Value> = state
        .user_events
        .iter()
        .skip(offset)
        .take(limit)
        .cloned()
        .collect();
    Json(Value::Array(items)).into_response()
}

async fn asset_events_handler(State(state): State<ServerState>, headers: HeaderMap) -> Response {
    state.seen.lock().unwrap().push("/audit/asset-events".to_string());
    if !authorized(&headers) {
        return unauthorized();
    }
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "detail": "asset index rebuilding" })),
    )
        .into_response()
}

async fn login_handler(State(state): State<ServerState>, Json(body): Json<Value>) -> Response {
    state.seen.lock().unwrap().push("/auth/login".to_string());
    if body["password"] == "password123" {
        Json(json!({ "access_token": TOKEN, "token_type": "bearer" })).into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "detail": "Incorrect email or password" })),
        )
            .into_response()
    }
}

/// Spawn the mock API on a random local port. `user_events` are served raw,
/// so tests can send exactly the JSON the real API emits.
pub async fn spawn_server(user_events: Vec<Value>) -> TestServer {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let state = ServerState {
        seen: seen.clone(),
        user_events: Arc::new(user_events),
    };

    let app = Router::new()
        .route("/auth/me", get(me))
        .route("/auth/login", post(login_handler))
        .route("/audit/summary", get(summary))
        .route("/audit/user-events", get(user_events_handler))
        .route("/audit/asset-events", get(asset_events_handler))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    TestServer { addr, seen }
}
