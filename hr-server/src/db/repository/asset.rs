//! Asset Repository

use super::{RepoError, RepoResult};
use shared::models::{Asset, AssetStatus};
use shared::util::{now_millis, snowflake_id};
use sqlx::SqlitePool;

const COLUMNS: &str =
    "id, employee_id, name, status, allocated_at, allocated_by, revoked_at, revoked_by";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Asset>> {
    let sql = format!("SELECT {COLUMNS} FROM asset WHERE id = ?");
    let asset = sqlx::query_as::<_, Asset>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(asset)
}

pub async fn find_for_employee(pool: &SqlitePool, employee_id: i64) -> RepoResult<Vec<Asset>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM asset WHERE employee_id = ? ORDER BY allocated_at DESC, id DESC"
    );
    let assets = sqlx::query_as::<_, Asset>(&sql)
        .bind(employee_id)
        .fetch_all(pool)
        .await?;
    Ok(assets)
}

pub async fn allocate(
    pool: &SqlitePool,
    employee_id: i64,
    name: &str,
    allocated_by: i64,
) -> RepoResult<Asset> {
    let id = snowflake_id();
    sqlx::query(
        "INSERT INTO asset (id, employee_id, name, status, allocated_at, allocated_by) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(employee_id)
    .bind(name)
    .bind(AssetStatus::Active)
    .bind(now_millis())
    .bind(allocated_by)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to allocate asset".into()))
}

/// Revoke an active asset; `None` when it was already revoked
pub async fn revoke(pool: &SqlitePool, id: i64, revoked_by: i64) -> RepoResult<Option<Asset>> {
    let rows = sqlx::query(
        "UPDATE asset SET status = ?, revoked_at = ?, revoked_by = ? WHERE id = ? AND status = ?",
    )
    .bind(AssetStatus::Revoked)
    .bind(now_millis())
    .bind(revoked_by)
    .bind(id)
    .bind(AssetStatus::Active)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Ok(None);
    }
    find_by_id(pool, id).await
}
