//! Asset API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use shared::models::{Asset, AssetCreate};
use shared::permission;

use crate::api::denied;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{asset, employee};
use crate::utils::validation::{MAX_NAME_LEN, validate_required_text};
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode, ok};

fn ensure_can_manage(user: &CurrentUser, action: &str) -> AppResult<()> {
    if permission::can_manage_employees(user.management_level) {
        Ok(())
    } else {
        Err(denied(user, action))
    }
}

/// GET /api/employees/{id}/assets
pub async fn list_for_employee(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(employee_id): Path<i64>,
) -> AppResult<ApiResponse<Vec<Asset>>> {
    if employee_id != user.id {
        ensure_can_manage(&user, "view other employees' assets")?;
    }
    Ok(ok(asset::find_for_employee(&state.pool, employee_id).await?))
}

/// POST /api/employees/{id}/assets
pub async fn allocate(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(employee_id): Path<i64>,
    Json(payload): Json<AssetCreate>,
) -> AppResult<ApiResponse<Asset>> {
    ensure_can_manage(&user, "allocate assets")?;
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    if employee::find_by_id(&state.pool, employee_id).await?.is_none() {
        return Err(AppError::new(ErrorCode::EmployeeNotFound).with_detail("employee_id", employee_id));
    }

    let allocated =
        asset::allocate(&state.pool, employee_id, payload.name.trim(), user.id).await?;
    tracing::info!(
        asset_id = allocated.id,
        employee_id,
        allocated_by = user.id,
        "Asset allocated"
    );
    Ok(ok(allocated))
}

/// POST /api/assets/{id}/revoke
pub async fn revoke(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<Asset>> {
    ensure_can_manage(&user, "revoke assets")?;
    if asset::find_by_id(&state.pool, id).await?.is_none() {
        return Err(AppError::new(ErrorCode::AssetNotFound).with_detail("asset_id", id));
    }

    let revoked = asset::revoke(&state.pool, id, user.id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::AssetAlreadyRevoked).with_detail("asset_id", id))?;
    tracing::info!(asset_id = id, revoked_by = user.id, "Asset revoked");
    Ok(ok(revoked))
}
