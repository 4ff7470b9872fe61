//! Leave API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use shared::leave::{can_delete_leave, leave_days};
use shared::models::{Leave, LeaveCreate, LeaveDecision, LeaveStatus, TeamLeave};
use shared::permission;

use crate::api::denied;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::leave;
use crate::utils::validation::{MAX_NOTE_LEN, validate_optional_text};
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode, ok};

#[derive(Debug, Default, Deserialize)]
pub struct TeamQuery {
    pub status: Option<LeaveStatus>,
}

fn leave_not_found(id: i64) -> AppError {
    AppError::new(ErrorCode::LeaveNotFound).with_detail("leave_id", id)
}

fn not_pending(id: i64) -> AppError {
    AppError::new(ErrorCode::LeaveNotPending).with_detail("leave_id", id)
}

/// GET /api/leaves - 本人的请假记录
pub async fn list_own(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<ApiResponse<Vec<Leave>>> {
    Ok(ok(leave::find_for_employee(&state.pool, user.id).await?))
}

/// GET /api/leaves/team - 查看者可审批范围内的请假
///
/// `can_approve` is set only for pending requests.
pub async fn list_team(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<TeamQuery>,
) -> AppResult<ApiResponse<Vec<TeamLeave>>> {
    let leaves = leave::find_others(&state.pool, user.id, query.status).await?;
    let team = leaves
        .into_iter()
        .filter(|l| permission::can_approve_leave(user.management_level, l.employee_level, false))
        .map(|mut l| {
            l.can_approve = l.leave.status == LeaveStatus::Pending;
            l
        })
        .collect();
    Ok(ok(team))
}

/// POST /api/leaves
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<LeaveCreate>,
) -> AppResult<ApiResponse<Leave>> {
    let days = leave_days(payload.leave_type, payload.start_date, payload.end_date)?;
    validate_optional_text(&payload.reason, "reason", MAX_NOTE_LEN)?;

    let created = leave::insert(&state.pool, user.id, &payload, days).await?;
    tracing::info!(
        leave_id = created.id,
        employee_id = user.id,
        leave_type = ?created.leave_type,
        days,
        "Leave requested"
    );
    Ok(ok(created))
}

async fn decide(
    state: &ServerState,
    user: &CurrentUser,
    id: i64,
    status: LeaveStatus,
    decision: LeaveDecision,
) -> AppResult<Leave> {
    validate_optional_text(&decision.remarks, "remarks", MAX_NOTE_LEN)?;
    let request = leave::find_with_requester(&state.pool, id)
        .await?
        .ok_or_else(|| leave_not_found(id))?;

    let is_own = request.leave.employee_id == user.id;
    if !permission::can_approve_leave(user.management_level, request.employee_level, is_own) {
        return Err(denied(user, "decide this leave request"));
    }
    if !request.leave.status.can_transition_to(status) {
        return Err(not_pending(id));
    }

    let remarks = decision.remarks.as_deref().map(str::trim).filter(|r| !r.is_empty());
    let decided = leave::decide(&state.pool, id, status, user.id, remarks)
        .await?
        .ok_or_else(|| not_pending(id))?;

    tracing::info!(
        leave_id = id,
        status = ?status,
        approver_id = user.id,
        "Leave decided"
    );
    Ok(decided)
}

/// POST /api/leaves/{id}/approve
pub async fn approve(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    payload: Option<Json<LeaveDecision>>,
) -> AppResult<ApiResponse<Leave>> {
    let decision = payload.map(|Json(d)| d).unwrap_or_default();
    Ok(ok(decide(&state, &user, id, LeaveStatus::Approved, decision).await?))
}

/// POST /api/leaves/{id}/reject
pub async fn reject(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    payload: Option<Json<LeaveDecision>>,
) -> AppResult<ApiResponse<Leave>> {
    let decision = payload.map(|Json(d)| d).unwrap_or_default();
    Ok(ok(decide(&state, &user, id, LeaveStatus::Rejected, decision).await?))
}

/// DELETE /api/leaves/{id} - 仅申请人，仅待审批
pub async fn delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<bool>> {
    let request = leave::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| leave_not_found(id))?;

    if !can_delete_leave(&request, user.id) {
        if request.employee_id != user.id {
            return Err(AppError::new(ErrorCode::LeaveNotOwner).with_detail("leave_id", id));
        }
        return Err(not_pending(id));
    }

    if !leave::delete_pending(&state.pool, id).await? {
        return Err(not_pending(id));
    }
    tracing::info!(leave_id = id, employee_id = user.id, "Leave request withdrawn");
    Ok(ok(true))
}
