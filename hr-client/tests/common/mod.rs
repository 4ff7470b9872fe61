#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use axum::extract::{RawQuery, State};
use axum::http::HeaderMap;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use hr_client::{AppContext, ClientConfig};
use parking_lot::Mutex;
use shared::client::{LoginRequest, LoginResponse, UserInfo};
use shared::models::{
    AttendanceRecord, Department, EmployeeResponse, Leave, ManagementLevel, Poll, PollAudience,
    PollOption, PollPhase, PollView, TeamLeave,
};
use shared::{ApiResponse, AppError, Capabilities, ErrorCode};

pub const PASSWORD: &str = "secret";
pub const TOKEN: &str = "stub-token";

/// Behaviour switches and hit counters of the stub server
#[derive(Default)]
pub struct StubState {
    pub level: u8,
    /// Every request that reached the server
    pub hits: AtomicUsize,
    pub logouts: AtomicUsize,
    pub team_hits: AtomicUsize,
    pub slow_polls: AtomicBool,
    pub failing_polls: AtomicBool,
    /// Raw query strings of list calls, in arrival order
    pub queries: Mutex<Vec<String>>,
}

pub struct Stub {
    pub addr: SocketAddr,
    pub state: Arc<StubState>,
}

impl Stub {
    pub async fn start(level: u8) -> Self {
        let state = Arc::new(StubState {
            level,
            ..Default::default()
        });
        let app = Router::new()
            .route("/api/auth/login", post(login))
            .route("/api/auth/me", get(me))
            .route("/api/auth/logout", post(logout))
            .route("/api/leaves", get(leaves).post(unexpected))
            .route("/api/leaves/team", get(team_leaves))
            .route("/api/employees", get(employees).post(unexpected))
            .route("/api/employees/{id}", put(unexpected).delete(unexpected))
            .route("/api/employees/{id}/status", put(unexpected))
            .route("/api/employees/{id}/assets", post(unexpected))
            .route("/api/assets/{id}/revoke", post(unexpected))
            .route("/api/departments", get(departments).post(unexpected))
            .route("/api/departments/{id}", put(unexpected).delete(unexpected))
            .route("/api/departments/eligible-parents", get(departments))
            .route("/api/departments/{id}/eligible-parents", get(departments))
            .route("/api/attendance", get(attendance))
            .route("/api/polls", get(polls).post(unexpected))
            .route("/api/polls/{id}", put(unexpected).delete(unexpected))
            .route("/api/polls/{id}/vote", post(unexpected))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Self { addr, state }
    }

    pub fn context(&self) -> AppContext {
        ClientConfig::new(format!("http://{}/", self.addr))
            .with_timeout(Duration::from_secs(5))
            .build_context()
            .unwrap()
    }

    pub fn hits(&self) -> usize {
        self.state.hits.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> Vec<String> {
        self.state.queries.lock().clone()
    }
}

pub fn department(id: i64, parent_id: Option<i64>) -> Department {
    Department {
        id,
        name: format!("Dept {id}"),
        description: None,
        positions: Vec::new(),
        parent_id,
    }
}

pub fn user(level: u8) -> UserInfo {
    let level = ManagementLevel::try_from(level).unwrap();
    UserInfo {
        id: 7,
        name: "Dana Stub".into(),
        email: "dana@example.com".into(),
        management_level: level,
        department_id: None,
        department_name: None,
        capabilities: Capabilities::resolve(level, None),
    }
}

pub fn poll_view(allow_custom_option: bool) -> PollView {
    PollView {
        poll: Poll {
            id: 11,
            title: "Lunch".into(),
            description: None,
            options: vec![
                PollOption {
                    id: "opt-1".into(),
                    label: "Pizza".into(),
                },
                PollOption {
                    id: "opt-2".into(),
                    label: "Salad".into(),
                },
            ],
            allow_custom_option,
            audience: PollAudience::All,
            start_date: None,
            end_date: None,
            is_active: true,
            created_by: 1,
            created_at: 0,
            updated_at: 0,
        },
        phase: PollPhase::Active,
        can_vote: true,
        viewer_vote: None,
        can_see_results: false,
        results: None,
    }
}

fn authorized(headers: &HeaderMap) -> Result<(), AppError> {
    let expected = format!("Bearer {TOKEN}");
    match headers.get("authorization").and_then(|v| v.to_str().ok()) {
        Some(value) if value == expected => Ok(()),
        _ => Err(AppError::new(ErrorCode::NotAuthenticated)),
    }
}

async fn login(
    State(state): State<Arc<StubState>>,
    Json(req): Json<LoginRequest>,
) -> Result<ApiResponse<LoginResponse>, AppError> {
    state.hits.fetch_add(1, Ordering::SeqCst);
    if req.password != PASSWORD {
        return Err(AppError::new(ErrorCode::InvalidCredentials));
    }
    Ok(ApiResponse::success(LoginResponse {
        token: TOKEN.into(),
        user: user(state.level),
    }))
}

async fn me(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
) -> Result<ApiResponse<UserInfo>, AppError> {
    state.hits.fetch_add(1, Ordering::SeqCst);
    authorized(&headers)?;
    Ok(ApiResponse::success(user(state.level)))
}

async fn logout(State(state): State<Arc<StubState>>, headers: HeaderMap) -> Result<ApiResponse<()>, AppError> {
    state.hits.fetch_add(1, Ordering::SeqCst);
    authorized(&headers)?;
    state.logouts.fetch_add(1, Ordering::SeqCst);
    Ok(ApiResponse::ok())
}

async fn leaves(State(state): State<Arc<StubState>>, headers: HeaderMap) -> Result<ApiResponse<Vec<Leave>>, AppError> {
    state.hits.fetch_add(1, Ordering::SeqCst);
    authorized(&headers)?;
    Ok(ApiResponse::success(Vec::new()))
}

async fn team_leaves(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> Result<ApiResponse<Vec<TeamLeave>>, AppError> {
    state.hits.fetch_add(1, Ordering::SeqCst);
    state.team_hits.fetch_add(1, Ordering::SeqCst);
    authorized(&headers)?;
    state.queries.lock().push(query.unwrap_or_default());
    Ok(ApiResponse::success(Vec::new()))
}

async fn employees(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> Result<ApiResponse<Vec<EmployeeResponse>>, AppError> {
    state.hits.fetch_add(1, Ordering::SeqCst);
    authorized(&headers)?;
    state.queries.lock().push(query.unwrap_or_default());
    Ok(ApiResponse::success(Vec::new()))
}

async fn attendance(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> Result<ApiResponse<Vec<AttendanceRecord>>, AppError> {
    state.hits.fetch_add(1, Ordering::SeqCst);
    authorized(&headers)?;
    state.queries.lock().push(query.unwrap_or_default());
    Ok(ApiResponse::success(Vec::new()))
}

async fn departments(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
) -> Result<ApiResponse<Vec<Department>>, AppError> {
    state.hits.fetch_add(1, Ordering::SeqCst);
    authorized(&headers)?;
    Ok(ApiResponse::success(vec![department(1, None), department(2, Some(1))]))
}

async fn polls(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
) -> Result<ApiResponse<Vec<PollView>>, AppError> {
    state.hits.fetch_add(1, Ordering::SeqCst);
    authorized(&headers)?;
    if state.slow_polls.load(Ordering::SeqCst) {
        tokio::time::sleep(Duration::from_secs(3)).await;
    }
    if state.failing_polls.load(Ordering::SeqCst) {
        return Err(AppError::new(ErrorCode::DatabaseError));
    }
    Ok(ApiResponse::success(vec![poll_view(false)]))
}

async fn unexpected(State(state): State<Arc<StubState>>) -> Result<ApiResponse<()>, AppError> {
    state.hits.fetch_add(1, Ordering::SeqCst);
    Err(AppError::internal("request should have been stopped client-side"))
}
