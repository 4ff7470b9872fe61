//! Department Repository

use super::{RepoError, RepoResult};
use shared::models::{Department, DepartmentCreate};
use shared::util::snowflake_id;
use sqlx::SqlitePool;
use sqlx::types::Json;

const COLUMNS: &str = "id, name, description, positions, parent_id";

/// All departments by name (hierarchy siblings keep this order)
pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Department>> {
    let sql = format!("SELECT {COLUMNS} FROM department ORDER BY name COLLATE NOCASE");
    let departments = sqlx::query_as::<_, Department>(&sql)
        .fetch_all(pool)
        .await?;
    Ok(departments)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Department>> {
    let sql = format!("SELECT {COLUMNS} FROM department WHERE id = ?");
    let department = sqlx::query_as::<_, Department>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(department)
}

pub async fn name_of(pool: &SqlitePool, id: i64) -> RepoResult<Option<String>> {
    let name = sqlx::query_scalar("SELECT name FROM department WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(name)
}

/// Whether another department already uses the name (case-insensitive)
pub async fn name_taken(pool: &SqlitePool, name: &str, except_id: Option<i64>) -> RepoResult<bool> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM department WHERE name = ? COLLATE NOCASE AND (?2 IS NULL OR id != ?2)",
    )
    .bind(name)
    .bind(except_id)
    .fetch_one(pool)
    .await?;
    Ok(count > 0)
}

pub async fn count_children(pool: &SqlitePool, id: i64) -> RepoResult<i64> {
    let count = sqlx::query_scalar("SELECT COUNT(*) FROM department WHERE parent_id = ?")
        .bind(id)
        .fetch_one(pool)
        .await?;
    Ok(count)
}

pub async fn create(pool: &SqlitePool, data: DepartmentCreate) -> RepoResult<Department> {
    let id = snowflake_id();
    sqlx::query(
        "INSERT INTO department (id, name, description, positions, parent_id) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(data.name.trim())
    .bind(&data.description)
    .bind(Json(&data.positions))
    .bind(data.parent_id)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create department".into()))
}

/// Write a fully resolved department (parent already validated)
/// Write a department back
///
/// The parent link is re-checked inside the UPDATE itself: the row is left
/// untouched (`None`) when the new parent's ancestor chain already contains
/// this department, so two concurrent re-parentings cannot close a loop.
pub async fn save(pool: &SqlitePool, department: &Department) -> RepoResult<Option<Department>> {
    let rows = sqlx::query(
        "UPDATE department SET name = ?1, description = ?2, positions = ?3, parent_id = ?4 \
         WHERE id = ?5 AND (?4 IS NULL OR NOT EXISTS ( \
             WITH RECURSIVE chain(id) AS ( \
                 SELECT ?4 \
                 UNION \
                 SELECT d.parent_id FROM department d JOIN chain c ON d.id = c.id \
                 WHERE d.parent_id IS NOT NULL \
             ) \
             SELECT 1 FROM chain WHERE id = ?5))",
    )
    .bind(&department.name)
    .bind(&department.description)
    .bind(Json(&department.positions))
    .bind(department.parent_id)
    .bind(department.id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Ok(None);
    }
    find_by_id(pool, department.id).await
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let result = sqlx::query("DELETE FROM department WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
