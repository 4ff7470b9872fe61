//! Attendance Repository

use super::{RepoError, RepoResult};
use chrono::NaiveDate;
use shared::models::{AttendanceRecord, AttendanceStatus};
use shared::util::snowflake_id;
use sqlx::SqlitePool;

const COLUMNS: &str = "id, employee_id, date, check_in, check_out, status";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<AttendanceRecord>> {
    let sql = format!("SELECT {COLUMNS} FROM attendance WHERE id = ?");
    let record = sqlx::query_as::<_, AttendanceRecord>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(record)
}

pub async fn find_for_date(
    pool: &SqlitePool,
    employee_id: i64,
    date: NaiveDate,
) -> RepoResult<Option<AttendanceRecord>> {
    let sql = format!("SELECT {COLUMNS} FROM attendance WHERE employee_id = ? AND date = ?");
    let record = sqlx::query_as::<_, AttendanceRecord>(&sql)
        .bind(employee_id)
        .bind(date)
        .fetch_optional(pool)
        .await?;
    Ok(record)
}

/// Records of one employee, newest first, optionally bounded (inclusive)
pub async fn find_range(
    pool: &SqlitePool,
    employee_id: i64,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> RepoResult<Vec<AttendanceRecord>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM attendance \
         WHERE employee_id = ?1 AND (?2 IS NULL OR date >= ?2) AND (?3 IS NULL OR date <= ?3) \
         ORDER BY date DESC"
    );
    let records = sqlx::query_as::<_, AttendanceRecord>(&sql)
        .bind(employee_id)
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await?;
    Ok(records)
}

/// Open the day's record
///
/// A second check-in on the same date is a [`RepoError::Duplicate`].
pub async fn check_in(
    pool: &SqlitePool,
    employee_id: i64,
    date: NaiveDate,
    at: i64,
) -> RepoResult<AttendanceRecord> {
    let id = snowflake_id();
    sqlx::query(
        "INSERT INTO attendance (id, employee_id, date, check_in, status) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(employee_id)
    .bind(date)
    .bind(at)
    .bind(AttendanceStatus::Present)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to record check-in".into()))
}

/// Close the day's record; `None` when it was already closed
pub async fn check_out(pool: &SqlitePool, id: i64, at: i64) -> RepoResult<Option<AttendanceRecord>> {
    let rows = sqlx::query(
        "UPDATE attendance SET check_out = ? WHERE id = ? AND check_out IS NULL",
    )
    .bind(at)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Ok(None);
    }
    find_by_id(pool, id).await
}
