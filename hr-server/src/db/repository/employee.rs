//! Employee Repository

use super::{RepoError, RepoResult};
use shared::client::EmployeeQuery;
use shared::models::{Employee, EmployeeStatus, ManagementLevel};
use shared::util::{now_millis, snowflake_id};
use sqlx::{FromRow, SqlitePool};

const COLUMNS: &str = "id, employee_code, name, email, management_level, department_id, \
     reporting_manager_id, status, salary, bank_account, tax_id, created_at, updated_at";

/// Employee row with its password hash (login only)
#[derive(Debug, FromRow)]
pub struct EmployeeCredentials {
    #[sqlx(flatten)]
    pub employee: Employee,
    pub password_hash: String,
}

/// Insert payload, password already hashed
#[derive(Debug, Clone)]
pub struct NewEmployee {
    pub employee_code: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub management_level: ManagementLevel,
    pub department_id: Option<i64>,
    pub reporting_manager_id: Option<i64>,
    pub salary: Option<f64>,
    pub bank_account: Option<String>,
    pub tax_id: Option<String>,
}

/// Update payload, password already hashed
#[derive(Debug, Clone, Default)]
pub struct EmployeeChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub management_level: Option<ManagementLevel>,
    pub department_id: Option<i64>,
    pub reporting_manager_id: Option<i64>,
    pub salary: Option<f64>,
    pub bank_account: Option<String>,
    pub tax_id: Option<String>,
}

pub async fn find_all(pool: &SqlitePool, query: &EmployeeQuery) -> RepoResult<Vec<Employee>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM employee \
         WHERE (?1 IS NULL OR department_id = ?1) AND (?2 IS NULL OR status = ?2) \
         ORDER BY name"
    );
    let employees = sqlx::query_as::<_, Employee>(&sql)
        .bind(query.department_id)
        .bind(query.status)
        .fetch_all(pool)
        .await?;
    Ok(employees)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Employee>> {
    let sql = format!("SELECT {COLUMNS} FROM employee WHERE id = ?");
    let employee = sqlx::query_as::<_, Employee>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(employee)
}

pub async fn find_by_email(pool: &SqlitePool, email: &str) -> RepoResult<Option<Employee>> {
    let sql = format!("SELECT {COLUMNS} FROM employee WHERE email = ? LIMIT 1");
    let employee = sqlx::query_as::<_, Employee>(&sql)
        .bind(email)
        .fetch_optional(pool)
        .await?;
    Ok(employee)
}

pub async fn find_credentials(
    pool: &SqlitePool,
    email: &str,
) -> RepoResult<Option<EmployeeCredentials>> {
    let sql = format!("SELECT {COLUMNS}, password_hash FROM employee WHERE email = ? LIMIT 1");
    let row = sqlx::query_as::<_, EmployeeCredentials>(&sql)
        .bind(email)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn code_exists(pool: &SqlitePool, code: &str) -> RepoResult<bool> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM employee WHERE employee_code = ?")
        .bind(code)
        .fetch_one(pool)
        .await?;
    Ok(count > 0)
}

/// Whether another employee already uses the email
pub async fn email_taken(pool: &SqlitePool, email: &str, except_id: Option<i64>) -> RepoResult<bool> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM employee WHERE email = ? AND (?2 IS NULL OR id != ?2)")
            .bind(email)
            .bind(except_id)
            .fetch_one(pool)
            .await?;
    Ok(count > 0)
}

pub async fn count_in_department(pool: &SqlitePool, department_id: i64) -> RepoResult<i64> {
    let count = sqlx::query_scalar("SELECT COUNT(*) FROM employee WHERE department_id = ?")
        .bind(department_id)
        .fetch_one(pool)
        .await?;
    Ok(count)
}

pub async fn insert(pool: &SqlitePool, data: NewEmployee) -> RepoResult<Employee> {
    let id = snowflake_id();
    let now = now_millis();
    sqlx::query(
        "INSERT INTO employee (id, employee_code, name, email, password_hash, management_level, \
         department_id, reporting_manager_id, status, salary, bank_account, tax_id, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(&data.employee_code)
    .bind(&data.name)
    .bind(&data.email)
    .bind(&data.password_hash)
    .bind(data.management_level)
    .bind(data.department_id)
    .bind(data.reporting_manager_id)
    .bind(EmployeeStatus::Active)
    .bind(data.salary)
    .bind(&data.bank_account)
    .bind(&data.tax_id)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create employee".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: EmployeeChanges) -> RepoResult<Employee> {
    let rows = sqlx::query(
        "UPDATE employee SET \
         name = COALESCE(?1, name), \
         email = COALESCE(?2, email), \
         password_hash = COALESCE(?3, password_hash), \
         management_level = COALESCE(?4, management_level), \
         department_id = COALESCE(?5, department_id), \
         reporting_manager_id = COALESCE(?6, reporting_manager_id), \
         salary = COALESCE(?7, salary), \
         bank_account = COALESCE(?8, bank_account), \
         tax_id = COALESCE(?9, tax_id), \
         updated_at = ?10 \
         WHERE id = ?11",
    )
    .bind(data.name)
    .bind(data.email)
    .bind(data.password_hash)
    .bind(data.management_level)
    .bind(data.department_id)
    .bind(data.reporting_manager_id)
    .bind(data.salary)
    .bind(data.bank_account)
    .bind(data.tax_id)
    .bind(now_millis())
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Employee {id}")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Employee {id}")))
}

pub async fn update_status(
    pool: &SqlitePool,
    id: i64,
    status: EmployeeStatus,
) -> RepoResult<Employee> {
    let rows = sqlx::query("UPDATE employee SET status = ?, updated_at = ? WHERE id = ?")
        .bind(status)
        .bind(now_millis())
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Employee {id}")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Employee {id}")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let result = sqlx::query("DELETE FROM employee WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
