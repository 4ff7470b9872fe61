//! Authentication Handlers
//!
//! Handles login, logout and the current-user snapshot

use std::time::Duration;

use axum::{Json, extract::State};

use shared::client::{LoginRequest, LoginResponse, UserInfo};
use shared::models::{Employee, EmployeeStatus};
use shared::permission::Capabilities;

use crate::auth::CurrentUser;
use crate::auth::password::verify_password;
use crate::core::ServerState;
use crate::db::repository::{department, employee};
use crate::security_log;
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode, ok};

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 300;

fn user_info(employee: &Employee, department_name: Option<String>) -> UserInfo {
    UserInfo {
        id: employee.id,
        name: employee.name.clone(),
        email: employee.email.clone(),
        management_level: employee.management_level,
        department_id: employee.department_id,
        capabilities: Capabilities::resolve(employee.management_level, department_name.as_deref()),
        department_name,
    }
}

async fn department_name_of(state: &ServerState, employee: &Employee) -> AppResult<Option<String>> {
    match employee.department_id {
        Some(id) => Ok(department::name_of(&state.pool, id).await?),
        None => Ok(None),
    }
}

/// POST /api/auth/login
///
/// Unknown email and wrong password produce the same error.
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<ApiResponse<LoginResponse>> {
    let email = req.email.trim().to_string();
    let credentials = employee::find_credentials(&state.pool, &email).await?;

    // Fixed delay before looking at the result
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    let credentials = match credentials {
        Some(c) if verify_password(&req.password, &c.password_hash) => c,
        _ => {
            security_log!("WARN", "login_failed", email = email.as_str());
            return Err(AppError::new(ErrorCode::InvalidCredentials));
        }
    };

    let employee = credentials.employee;
    if employee.status == EmployeeStatus::Inactive {
        security_log!("WARN", "login_disabled", employee_id = employee.id);
        return Err(AppError::new(ErrorCode::AccountDisabled));
    }

    let department_name = department_name_of(&state, &employee).await?;
    let token = state
        .get_jwt_service()
        .generate_token(&employee, department_name.as_deref())
        .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))?;

    tracing::info!(
        employee_id = employee.id,
        level = %employee.management_level,
        "User logged in"
    );

    Ok(ok(LoginResponse {
        token,
        user: user_info(&employee, department_name),
    }))
}

/// GET /api/auth/me - fresh snapshot of the current user
pub async fn me(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<ApiResponse<UserInfo>> {
    let employee = employee::find_by_id(&state.pool, user.id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::EmployeeNotFound))?;
    let department_name = department_name_of(&state, &employee).await?;
    Ok(ok(user_info(&employee, department_name)))
}

/// POST /api/auth/logout
///
/// Tokens are stateless; the client drops its session.
pub async fn logout(user: CurrentUser) -> ApiResponse<()> {
    tracing::info!(employee_id = user.id, "User logged out");
    ApiResponse::ok()
}
