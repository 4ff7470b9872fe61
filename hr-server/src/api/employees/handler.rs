//! Employee API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};

use shared::client::EmployeeQuery;
use shared::models::{
    Employee, EmployeeCreate, EmployeeResponse, EmployeeStatusUpdate, EmployeeUpdate,
};
use shared::permission;

use crate::api::denied;
use crate::auth::CurrentUser;
use crate::auth::password::hash_password;
use crate::core::ServerState;
use crate::db::repository::employee::{self, EmployeeChanges, NewEmployee};
use crate::db::repository::department;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_amount, validate_email, validate_optional_text,
    validate_password, validate_required_text,
};
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode, ok};

fn view_for(user: &CurrentUser, employee: Employee) -> EmployeeResponse {
    let allowed = permission::can_view_sensitive_data(
        user.management_level,
        user.department_name(),
        employee.id == user.id,
    );
    employee.into_view(allowed)
}

async fn load(state: &ServerState, id: i64) -> AppResult<Employee> {
    employee::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::EmployeeNotFound).with_detail("employee_id", id))
}

async fn ensure_department_exists(state: &ServerState, department_id: Option<i64>) -> AppResult<()> {
    if let Some(id) = department_id
        && department::find_by_id(&state.pool, id).await?.is_none()
    {
        return Err(AppError::new(ErrorCode::DepartmentNotFound).with_detail("department_id", id));
    }
    Ok(())
}

async fn ensure_manager_exists(state: &ServerState, manager_id: Option<i64>) -> AppResult<()> {
    if let Some(id) = manager_id
        && employee::find_by_id(&state.pool, id).await?.is_none()
    {
        return Err(AppError::new(ErrorCode::EmployeeNotFound).with_detail("employee_id", id));
    }
    Ok(())
}

/// GET /api/employees - 员工列表 (敏感字段按查看者遮蔽)
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<EmployeeQuery>,
) -> AppResult<ApiResponse<Vec<EmployeeResponse>>> {
    let employees = employee::find_all(&state.pool, &query).await?;
    let views = employees
        .into_iter()
        .map(|e| view_for(&user, e))
        .collect();
    Ok(ok(views))
}

/// GET /api/employees/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<EmployeeResponse>> {
    let employee = load(&state, id).await?;
    Ok(ok(view_for(&user, employee)))
}

/// POST /api/employees
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<EmployeeCreate>,
) -> AppResult<ApiResponse<EmployeeResponse>> {
    if !permission::can_manage_employees(user.management_level) {
        return Err(denied(&user, "create employees"));
    }
    if !permission::can_assign_level(user.management_level, payload.management_level) {
        return Err(AppError::with_message(
            ErrorCode::InvalidManagementLevel,
            format!("Cannot assign level {}", payload.management_level),
        )
        .with_detail("management_level", payload.management_level.value()));
    }

    validate_required_text(&payload.employee_code, "employee_code", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_email(payload.email.trim())?;
    validate_password(&payload.password)?;
    validate_amount(payload.salary, "salary")?;
    validate_optional_text(&payload.bank_account, "bank_account", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.tax_id, "tax_id", MAX_SHORT_TEXT_LEN)?;

    let touches_sensitive =
        payload.salary.is_some() || payload.bank_account.is_some() || payload.tax_id.is_some();
    if touches_sensitive
        && !permission::can_view_sensitive_data(user.management_level, user.department_name(), false)
    {
        return Err(denied(&user, "set sensitive employee fields"));
    }

    let code = payload.employee_code.trim().to_string();
    let email = payload.email.trim().to_string();
    if employee::code_exists(&state.pool, &code).await? {
        return Err(AppError::new(ErrorCode::EmployeeCodeExists).with_detail("employee_code", code));
    }
    if employee::email_taken(&state.pool, &email, None).await? {
        return Err(AppError::new(ErrorCode::EmployeeEmailExists).with_detail("email", email));
    }
    ensure_department_exists(&state, payload.department_id).await?;
    ensure_manager_exists(&state, payload.reporting_manager_id).await?;

    let created = employee::insert(
        &state.pool,
        NewEmployee {
            employee_code: code,
            name: payload.name.trim().to_string(),
            email,
            password_hash: hash_password(&payload.password)?,
            management_level: payload.management_level,
            department_id: payload.department_id,
            reporting_manager_id: payload.reporting_manager_id,
            salary: payload.salary,
            bank_account: payload.bank_account,
            tax_id: payload.tax_id,
        },
    )
    .await?;

    tracing::info!(
        employee_id = created.id,
        created_by = user.id,
        level = %created.management_level,
        "Employee created"
    );
    Ok(ok(view_for(&user, created)))
}

/// PUT /api/employees/{id}
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<EmployeeUpdate>,
) -> AppResult<ApiResponse<EmployeeResponse>> {
    let target = load(&state, id).await?;
    let is_self = target.id == user.id;

    if !permission::can_edit_employee_record(user.management_level, target.management_level, is_self)
    {
        return Err(denied(&user, "edit this employee"));
    }
    if payload.touches_sensitive_fields()
        && !permission::can_view_sensitive_data(user.management_level, user.department_name(), is_self)
    {
        return Err(denied(&user, "edit sensitive employee fields"));
    }
    if let Some(level) = payload.management_level
        && level != target.management_level
    {
        if is_self {
            return Err(AppError::with_message(
                ErrorCode::CannotModifySelf,
                "Cannot change your own management level",
            ));
        }
        if !permission::can_assign_level(user.management_level, level) {
            return Err(AppError::with_message(
                ErrorCode::InvalidManagementLevel,
                format!("Cannot assign level {level}"),
            )
            .with_detail("management_level", level.value()));
        }
        if !permission::can_change_level(user.management_level, target.management_level, level) {
            return Err(denied(&user, "change this employee's level"));
        }
    }

    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    if let Some(email) = &payload.email {
        validate_email(email.trim())?;
        if employee::email_taken(&state.pool, email.trim(), Some(id)).await? {
            return Err(AppError::new(ErrorCode::EmployeeEmailExists).with_detail("email", email.trim()));
        }
    }
    if let Some(password) = &payload.password {
        validate_password(password)?;
    }
    validate_amount(payload.salary, "salary")?;
    validate_optional_text(&payload.bank_account, "bank_account", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.tax_id, "tax_id", MAX_SHORT_TEXT_LEN)?;
    ensure_department_exists(&state, payload.department_id).await?;
    if payload.reporting_manager_id == Some(id) {
        return Err(AppError::validation("An employee cannot report to themselves"));
    }
    ensure_manager_exists(&state, payload.reporting_manager_id).await?;

    let password_hash = match &payload.password {
        Some(p) => Some(hash_password(p)?),
        None => None,
    };

    let updated = employee::update(
        &state.pool,
        id,
        EmployeeChanges {
            name: payload.name.map(|n| n.trim().to_string()),
            email: payload.email.map(|e| e.trim().to_string()),
            password_hash,
            management_level: payload.management_level,
            department_id: payload.department_id,
            reporting_manager_id: payload.reporting_manager_id,
            salary: payload.salary,
            bank_account: payload.bank_account,
            tax_id: payload.tax_id,
        },
    )
    .await?;

    tracing::info!(employee_id = id, updated_by = user.id, "Employee updated");
    Ok(ok(view_for(&user, updated)))
}

/// PUT /api/employees/{id}/status - 在职状态 (离职处理)
pub async fn update_status(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<EmployeeStatusUpdate>,
) -> AppResult<ApiResponse<EmployeeResponse>> {
    let target = load(&state, id).await?;
    if target.id == user.id {
        return Err(AppError::with_message(
            ErrorCode::CannotModifySelf,
            "Cannot change your own status",
        ));
    }
    if !permission::can_manage_status(user.management_level, target.management_level) {
        return Err(denied(&user, "change this employee's status"));
    }

    let updated = employee::update_status(&state.pool, id, payload.status).await?;
    tracing::info!(
        employee_id = id,
        status = ?payload.status,
        updated_by = user.id,
        "Employee status changed"
    );
    Ok(ok(view_for(&user, updated)))
}

/// DELETE /api/employees/{id}
pub async fn delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<bool>> {
    if id == user.id {
        return Err(AppError::new(ErrorCode::EmployeeCannotDeleteSelf));
    }
    let target = load(&state, id).await?;
    if !permission::can_delete_employee(user.management_level, target.management_level) {
        return Err(denied(&user, "delete this employee"));
    }

    let deleted = employee::delete(&state.pool, id).await?;
    if deleted {
        tracing::info!(employee_id = id, deleted_by = user.id, "Employee deleted");
    }
    Ok(ok(deleted))
}
