//! Attendance API Handlers

use axum::extract::{Query, State};

use shared::client::AttendanceQuery;
use shared::models::AttendanceRecord;
use shared::permission;
use shared::util::now_millis;

use crate::api::denied;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{RepoError, attendance};
use crate::utils::time::{today, validate_range};
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode, ok};

/// POST /api/attendance/check-in - 当天签到
pub async fn check_in(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<ApiResponse<AttendanceRecord>> {
    let date = today();
    let record = match attendance::check_in(&state.pool, user.id, date, now_millis()).await {
        Ok(record) => record,
        Err(RepoError::Duplicate(_)) => {
            return Err(AppError::new(ErrorCode::AttendanceAlreadyCheckedIn)
                .with_detail("date", date.to_string()));
        }
        Err(e) => return Err(e.into()),
    };
    tracing::info!(employee_id = user.id, %date, "Checked in");
    Ok(ok(record))
}

/// POST /api/attendance/check-out - 当天签退
pub async fn check_out(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<ApiResponse<AttendanceRecord>> {
    let date = today();
    let open = attendance::find_for_date(&state.pool, user.id, date)
        .await?
        .ok_or_else(|| {
            AppError::new(ErrorCode::AttendanceNotCheckedIn).with_detail("date", date.to_string())
        })?;

    let record = attendance::check_out(&state.pool, open.id, now_millis())
        .await?
        .ok_or_else(|| {
            AppError::new(ErrorCode::AttendanceAlreadyCheckedOut).with_detail("date", date.to_string())
        })?;
    tracing::info!(
        employee_id = user.id,
        %date,
        worked_ms = ?record.worked_millis(),
        "Checked out"
    );
    Ok(ok(record))
}

/// GET /api/attendance?employee_id&start_date&end_date
///
/// Own records by default; other employees need `can_manage_employees`.
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<AttendanceQuery>,
) -> AppResult<ApiResponse<Vec<AttendanceRecord>>> {
    let employee_id = query.employee_id.unwrap_or(user.id);
    if employee_id != user.id && !permission::can_manage_employees(user.management_level) {
        return Err(denied(&user, "view other employees' attendance"));
    }
    validate_range(query.start_date, query.end_date)?;

    let records =
        attendance::find_range(&state.pool, employee_id, query.start_date, query.end_date).await?;
    Ok(ok(records))
}
