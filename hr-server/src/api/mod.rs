//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`auth`] - 登录、当前用户、登出
//! - [`employees`] - 员工管理 (含敏感字段遮蔽)
//! - [`departments`] - 部门管理与层级
//! - [`leaves`] - 请假申请与审批
//! - [`polls`] - 投票
//! - [`attendance`] - 考勤打卡
//! - [`assets`] - 资产分配

pub mod assets;
pub mod attendance;
pub mod auth;
pub mod departments;
pub mod employees;
pub mod health;
pub mod leaves;
pub mod polls;

use std::time::Duration;

use axum::{Router, middleware};
use http::StatusCode;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::auth::{CurrentUser, require_auth};
use crate::core::ServerState;
use crate::security_log;
use crate::utils::{AppError, ErrorCode};

// Re-export common types for handlers
pub use crate::utils::{ApiResponse, AppResult};

/// Permission denial, recorded on the security target
pub(crate) fn denied(user: &CurrentUser, action: &str) -> AppError {
    security_log!(
        "WARN",
        "permission_denied",
        employee_id = user.id,
        level = user.management_level.value(),
        action = action
    );
    AppError::with_message(ErrorCode::PermissionDenied, format!("Not allowed to {action}"))
}

/// 所有业务路由
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(employees::router())
        .merge(departments::router())
        .merge(leaves::router())
        .merge(polls::router())
        .merge(attendance::router())
        .merge(assets::router())
}

/// 完整应用：路由 + 认证 + tower-http 中间件
///
/// HTTP 服务和集成测试 (oneshot) 共用。
pub fn build_app(state: ServerState) -> Router {
    let timeout = Duration::from_millis(state.config.request_timeout_ms);

    build_router()
        // JWT 认证 - require_auth 内部跳过公共路由
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .layer(TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, timeout))
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
