//! Shared integration-test harness
//!
//! Drives the full axum app (auth middleware included) through
//! `tower::ServiceExt::oneshot` against a private in-memory database.

#![allow(dead_code)]

use std::sync::OnceLock;

use axum::Router;
use axum::body::Body;
use http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use hr_server::auth::password::hash_password;
use hr_server::db::DbService;
use hr_server::db::repository::{department, employee};
use hr_server::{Config, ErrorCode, ServerState};
use shared::models::{Department, DepartmentCreate, Employee, ManagementLevel, RevotePolicy};

pub const PASSWORD: &str = "correct-horse-battery";

/// Argon2 is slow in debug builds; hash the shared password once
fn password_hash() -> String {
    static HASH: OnceLock<String> = OnceLock::new();
    HASH.get_or_init(|| hash_password(PASSWORD).expect("hash"))
        .clone()
}

pub struct TestApp {
    pub state: ServerState,
    app: Router,
    _work_dir: TempDir,
}

/// A seeded employee with a signed token
pub struct Actor {
    pub employee: Employee,
    pub token: String,
}

impl Actor {
    pub fn id(&self) -> i64 {
        self.employee.id
    }
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_policy(RevotePolicy::Reject).await
    }

    pub async fn with_policy(policy: RevotePolicy) -> Self {
        let work_dir = tempfile::tempdir().expect("temp dir");
        let mut config = Config::for_tests(work_dir.path().to_string_lossy().to_string());
        config.revote_policy = policy;

        let db = DbService::in_memory().await.expect("in-memory db");
        let state = ServerState::new(config, db.pool);
        let app = hr_server::api::build_app(state.clone());
        Self {
            state,
            app,
            _work_dir: work_dir,
        }
    }

    pub async fn department(&self, name: &str, parent_id: Option<i64>) -> Department {
        department::create(
            &self.state.pool,
            DepartmentCreate {
                name: name.into(),
                description: None,
                positions: vec![],
                parent_id,
            },
        )
        .await
        .expect("create department")
    }

    /// Seed an employee and sign a token carrying the department name
    pub async fn actor(&self, code: &str, level: u8, department: Option<&Department>) -> Actor {
        let employee = employee::insert(
            &self.state.pool,
            employee::NewEmployee {
                employee_code: code.into(),
                name: format!("Employee {code}"),
                email: format!("{}@example.com", code.to_lowercase()),
                password_hash: password_hash(),
                management_level: ManagementLevel::try_from(level).expect("level"),
                department_id: department.map(|d| d.id),
                reporting_manager_id: None,
                salary: Some(4200.0),
                bank_account: Some("DE89 3704 0044".into()),
                tax_id: Some("TX-1".into()),
            },
        )
        .await
        .expect("create employee");

        let token = self
            .state
            .get_jwt_service()
            .generate_token(&employee, department.map(|d| d.name.as_str()))
            .expect("token");
        Actor { employee, token }
    }

    pub async fn request(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header(http::header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(http::header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");

        let response = self.app.clone().oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body")
            .to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };
        (status, json)
    }

    pub async fn get(&self, path: &str, actor: &Actor) -> (StatusCode, Value) {
        self.request(Method::GET, path, Some(&actor.token), None).await
    }

    pub async fn post(&self, path: &str, actor: &Actor, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, path, Some(&actor.token), Some(body))
            .await
    }

    pub async fn put(&self, path: &str, actor: &Actor, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, path, Some(&actor.token), Some(body))
            .await
    }

    pub async fn delete(&self, path: &str, actor: &Actor) -> (StatusCode, Value) {
        self.request(Method::DELETE, path, Some(&actor.token), None)
            .await
    }
}

/// Assert an error envelope carries the expected code
pub fn assert_error(body: &Value, code: ErrorCode) {
    assert_eq!(
        body["code"].as_u64(),
        Some(u64::from(code.code())),
        "unexpected error body: {body}"
    );
}

/// The `data` member of a success envelope
pub fn data(body: &Value) -> &Value {
    assert_eq!(body["code"].as_u64(), Some(0), "not a success body: {body}");
    &body["data"]
}
