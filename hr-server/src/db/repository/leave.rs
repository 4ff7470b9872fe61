//! Leave Repository

use super::{RepoError, RepoResult};
use shared::models::{Leave, LeaveCreate, LeaveStatus, TeamLeave};
use shared::util::{now_millis, snowflake_id};
use sqlx::SqlitePool;

const COLUMNS: &str = "l.id, l.employee_id, l.leave_type, l.start_date, l.end_date, l.days, \
     l.reason, l.status, l.approver_id, l.remarks, l.created_at, l.updated_at";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Leave>> {
    let sql = format!("SELECT {COLUMNS} FROM leave_request l WHERE l.id = ?");
    let leave = sqlx::query_as::<_, Leave>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(leave)
}

/// A leave with its requester (approval checks need the requester's level)
pub async fn find_with_requester(pool: &SqlitePool, id: i64) -> RepoResult<Option<TeamLeave>> {
    let sql = format!(
        "SELECT {COLUMNS}, e.name AS employee_name, e.management_level AS employee_level \
         FROM leave_request l JOIN employee e ON e.id = l.employee_id WHERE l.id = ?"
    );
    let leave = sqlx::query_as::<_, TeamLeave>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(leave)
}

pub async fn find_for_employee(pool: &SqlitePool, employee_id: i64) -> RepoResult<Vec<Leave>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM leave_request l WHERE l.employee_id = ? \
         ORDER BY l.start_date DESC, l.created_at DESC"
    );
    let leaves = sqlx::query_as::<_, Leave>(&sql)
        .bind(employee_id)
        .fetch_all(pool)
        .await?;
    Ok(leaves)
}

/// Leaves of everyone except `viewer_id`, optionally filtered by status
pub async fn find_others(
    pool: &SqlitePool,
    viewer_id: i64,
    status: Option<LeaveStatus>,
) -> RepoResult<Vec<TeamLeave>> {
    let sql = format!(
        "SELECT {COLUMNS}, e.name AS employee_name, e.management_level AS employee_level \
         FROM leave_request l JOIN employee e ON e.id = l.employee_id \
         WHERE l.employee_id != ?1 AND (?2 IS NULL OR l.status = ?2) \
         ORDER BY l.created_at DESC"
    );
    let leaves = sqlx::query_as::<_, TeamLeave>(&sql)
        .bind(viewer_id)
        .bind(status)
        .fetch_all(pool)
        .await?;
    Ok(leaves)
}

pub async fn insert(
    pool: &SqlitePool,
    employee_id: i64,
    data: &LeaveCreate,
    days: f64,
) -> RepoResult<Leave> {
    let id = snowflake_id();
    let now = now_millis();
    sqlx::query(
        "INSERT INTO leave_request (id, employee_id, leave_type, start_date, end_date, days, \
         reason, status, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(employee_id)
    .bind(data.leave_type)
    .bind(data.start_date)
    .bind(data.end_date)
    .bind(days)
    .bind(&data.reason)
    .bind(LeaveStatus::Pending)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create leave".into()))
}

/// Record a decision; only a pending row is updated
///
/// Returns `None` when the leave was no longer pending, so two approvers
/// racing on the same request cannot both win.
pub async fn decide(
    pool: &SqlitePool,
    id: i64,
    status: LeaveStatus,
    approver_id: i64,
    remarks: Option<&str>,
) -> RepoResult<Option<Leave>> {
    let rows = sqlx::query(
        "UPDATE leave_request SET status = ?, approver_id = ?, remarks = ?, updated_at = ? \
         WHERE id = ? AND status = ?",
    )
    .bind(status)
    .bind(approver_id)
    .bind(remarks)
    .bind(now_millis())
    .bind(id)
    .bind(LeaveStatus::Pending)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Ok(None);
    }
    find_by_id(pool, id).await
}

/// Delete a pending leave
pub async fn delete_pending(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let result = sqlx::query("DELETE FROM leave_request WHERE id = ? AND status = ?")
        .bind(id)
        .bind(LeaveStatus::Pending)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
