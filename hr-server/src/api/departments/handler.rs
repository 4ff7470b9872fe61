//! Department API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use shared::hierarchy;
use shared::models::{Department, DepartmentCreate, DepartmentUpdate, HierarchyEntry};
use shared::permission;

use crate::api::denied;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{department, employee};
use crate::utils::validation::{MAX_NAME_LEN, MAX_NOTE_LEN, validate_optional_text, validate_required_text};
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode, ok};

fn ensure_can_manage(user: &CurrentUser, action: &str) -> AppResult<()> {
    if permission::can_manage_departments(user.management_level) {
        Ok(())
    } else {
        Err(denied(user, action))
    }
}

fn clean_positions(positions: Vec<String>) -> AppResult<Vec<String>> {
    let positions: Vec<String> = positions
        .into_iter()
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect();
    for p in &positions {
        validate_required_text(p, "position", MAX_NAME_LEN)?;
    }
    Ok(positions)
}

async fn ensure_name_free(state: &ServerState, name: &str, except: Option<i64>) -> AppResult<()> {
    if department::name_taken(&state.pool, name, except).await? {
        return Err(AppError::new(ErrorCode::DepartmentNameExists).with_detail("name", name));
    }
    Ok(())
}

async fn load(state: &ServerState, id: i64) -> AppResult<Department> {
    department::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::DepartmentNotFound).with_detail("department_id", id))
}

/// GET /api/departments
pub async fn list(
    State(state): State<ServerState>,
    _user: CurrentUser,
) -> AppResult<ApiResponse<Vec<Department>>> {
    Ok(ok(department::find_all(&state.pool).await?))
}

/// GET /api/departments/tree - 深度标注的先序列表
pub async fn tree(
    State(state): State<ServerState>,
    _user: CurrentUser,
) -> AppResult<ApiResponse<Vec<HierarchyEntry>>> {
    let departments = department::find_all(&state.pool).await?;
    Ok(ok(hierarchy::build_hierarchy(&departments)))
}

/// GET /api/departments/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    _user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<Department>> {
    Ok(ok(load(&state, id).await?))
}

/// GET /api/departments/{id}/eligible-parents
pub async fn eligible_parents(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<Vec<Department>>> {
    ensure_can_manage(&user, "manage departments")?;
    load(&state, id).await?;
    let departments = department::find_all(&state.pool).await?;
    let eligible = hierarchy::eligible_parents(Some(id), &departments)
        .into_iter()
        .cloned()
        .collect();
    Ok(ok(eligible))
}

/// GET /api/departments/eligible-parents - 新建部门时可选的上级
pub async fn eligible_parents_for_new(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<ApiResponse<Vec<Department>>> {
    ensure_can_manage(&user, "manage departments")?;
    let departments = department::find_all(&state.pool).await?;
    let eligible = hierarchy::eligible_parents(None, &departments)
        .into_iter()
        .cloned()
        .collect();
    Ok(ok(eligible))
}

/// POST /api/departments
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(mut payload): Json<DepartmentCreate>,
) -> AppResult<ApiResponse<Department>> {
    ensure_can_manage(&user, "create departments")?;
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    ensure_name_free(&state, payload.name.trim(), None).await?;
    payload.positions = clean_positions(payload.positions)?;

    if let Some(parent) = payload.parent_id {
        load(&state, parent).await?;
    }

    let created = department::create(&state.pool, payload).await?;
    tracing::info!(
        department_id = created.id,
        parent_id = ?created.parent_id,
        created_by = user.id,
        "Department created"
    );
    Ok(ok(created))
}

/// PUT /api/departments/{id}
///
/// Parent changes go through the cycle guard.
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<DepartmentUpdate>,
) -> AppResult<ApiResponse<Department>> {
    ensure_can_manage(&user, "edit departments")?;
    let mut current = load(&state, id).await?;

    if let Some(name) = payload.name {
        validate_required_text(&name, "name", MAX_NAME_LEN)?;
        let name = name.trim().to_string();
        ensure_name_free(&state, &name, Some(id)).await?;
        current.name = name;
    }
    if payload.description.is_some() {
        validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
        current.description = payload.description;
    }
    if let Some(positions) = payload.positions {
        current.positions = clean_positions(positions)?;
    }

    if payload.clear_parent {
        current.parent_id = None;
    } else if payload.parent_id.is_some() {
        let departments = department::find_all(&state.pool).await?;
        current.parent_id = hierarchy::assign_parent(id, payload.parent_id, &departments)?;
    }

    let Some(saved) = department::save(&state.pool, &current).await? else {
        // Row gone, or a concurrent re-parenting made this parent a descendant
        load(&state, id).await?;
        return Err(AppError::with_message(
            ErrorCode::DepartmentCycle,
            "A department cannot be placed under itself or one of its sub-departments",
        )
        .with_detail("department_id", id)
        .with_detail("parent_id", current.parent_id));
    };
    tracing::info!(
        department_id = id,
        parent_id = ?saved.parent_id,
        updated_by = user.id,
        "Department updated"
    );
    Ok(ok(saved))
}

/// DELETE /api/departments/{id}
pub async fn delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<bool>> {
    ensure_can_manage(&user, "delete departments")?;
    load(&state, id).await?;

    let children = department::count_children(&state.pool, id).await?;
    if children > 0 {
        return Err(AppError::new(ErrorCode::DepartmentHasChildren).with_detail("children", children));
    }
    let members = employee::count_in_department(&state.pool, id).await?;
    if members > 0 {
        return Err(AppError::new(ErrorCode::DepartmentHasEmployees).with_detail("employees", members));
    }

    let deleted = department::delete(&state.pool, id).await?;
    tracing::info!(department_id = id, deleted_by = user.id, "Department deleted");
    Ok(ok(deleted))
}
