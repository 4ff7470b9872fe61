//! 认证中间件
//!
//! 为 JWT 认证提供 Axum 中间件

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use http::{HeaderMap, Uri};
use shared::models::EmployeeStatus;

use crate::auth::{CurrentUser, JwtError, JwtService};
use crate::core::ServerState;
use crate::db::repository::{department, employee};
use crate::security_log;
use crate::{AppError, ErrorCode};

/// 公共 API 路由 (无需认证)
const PUBLIC_API_ROUTES: &[&str] = &["/api/auth/login", "/api/health"];

/// 认证中间件 - 要求用户登录
///
/// 从 `Authorization: Bearer <token>` 头提取并验证 JWT。
/// 验证成功后将 [`CurrentUser`] 注入请求扩展。
///
/// # 跳过认证的路径
///
/// - `OPTIONS *` (CORS 预检)
/// - 非 `/api/` 路径
/// - `/api/auth/login`、`/api/health`
///
/// # 错误处理
///
/// | 错误 | HTTP 状态码 |
/// |------|------------|
/// | 无 Authorization 头 | 401 NotAuthenticated |
/// | 令牌过期 | 401 TokenExpired |
/// | 无效令牌 | 401 TokenInvalid |
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path();

    // 允许 CORS 预检的 OPTIONS 请求
    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    // 非 API 路由跳过认证 (让它们正常返回 404)
    if !path.starts_with("/api/") || PUBLIC_API_ROUTES.contains(&path) {
        return Ok(next.run(req).await);
    }

    let user = authenticate(&state, req.headers(), req.uri()).await?;
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

/// 校验请求头中的令牌并解析当前用户
///
/// 令牌只证明身份；级别、部门和在职状态每次从数据库读取，
/// 离职或降级立即生效。
pub(crate) async fn authenticate(
    state: &ServerState,
    headers: &HeaderMap,
    uri: &Uri,
) -> Result<CurrentUser, AppError> {
    let auth_header = headers
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => JwtService::extract_from_header(header)
            .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
        None => {
            security_log!("WARN", "auth_missing", uri = format!("{:?}", uri));
            return Err(AppError::new(ErrorCode::NotAuthenticated));
        }
    };

    let claims = state.get_jwt_service().validate_token(token).map_err(|e| {
        security_log!(
            "WARN",
            "auth_failed",
            error = format!("{}", e),
            uri = format!("{:?}", uri)
        );
        match e {
            JwtError::ExpiredToken => AppError::new(ErrorCode::TokenExpired),
            _ => AppError::invalid_token("Invalid token"),
        }
    })?;

    let mut user = CurrentUser::try_from(claims)
        .map_err(|e| AppError::invalid_token(format!("Malformed JWT claims: {}", e)))?;

    let Some(employee) = employee::find_by_id(&state.pool, user.id).await? else {
        security_log!("WARN", "auth_unknown_employee", employee_id = user.id);
        return Err(AppError::invalid_token("Employee no longer exists"));
    };
    if employee.status == EmployeeStatus::Inactive {
        security_log!("WARN", "auth_inactive", employee_id = user.id, uri = format!("{:?}", uri));
        return Err(AppError::new(ErrorCode::AccountDisabled));
    }

    user.department_name = match employee.department_id {
        Some(id) => department::name_of(&state.pool, id).await?,
        None => None,
    };
    user.name = employee.name;
    user.email = employee.email;
    user.management_level = employee.management_level;
    user.department_id = employee.department_id;
    Ok(user)
}
