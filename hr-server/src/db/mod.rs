//! Database Module
//!
//! Handles SQLite connection pool and migrations

pub mod repository;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use std::str::FromStr;

use shared::models::ManagementLevel;

use crate::auth::password::hash_password;
use crate::core::BootstrapAdmin;
use crate::utils::AppError;

/// Database service, owns a SQLite connection pool
#[derive(Clone)]
pub struct DbService {
    pub pool: SqlitePool,
}

impl DbService {
    /// Open (or create) the database file with WAL mode and run migrations
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str(&format!("sqlite:{db_path}"))
            .map_err(|e| AppError::database(format!("Invalid database path: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true)
            .busy_timeout(std::time::Duration::from_secs(5))
            .optimize_on_close(true, None);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        tracing::info!(path = db_path, "Database connection established (SQLite WAL)");

        Self::migrate(&pool).await?;
        Ok(Self { pool })
    }

    /// Private in-memory database (single connection so every query sees the same data)
    pub async fn in_memory() -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| AppError::database(format!("Invalid database options: {e}")))?
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        Self::migrate(&pool).await?;
        Ok(Self { pool })
    }

    async fn migrate(pool: &SqlitePool) -> Result<(), AppError> {
        sqlx::migrate!("./migrations")
            .run(pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to apply migrations: {e}")))?;
        tracing::info!("Database migrations applied");
        Ok(())
    }

    /// Seed the apex administrator on first start
    ///
    /// No-op when an employee with the same email already exists.
    pub async fn bootstrap_admin(&self, admin: &BootstrapAdmin) -> Result<(), AppError> {
        if repository::employee::find_by_email(&self.pool, &admin.email)
            .await?
            .is_some()
        {
            return Ok(());
        }

        let hash = hash_password(&admin.password)?;
        let employee = repository::employee::insert(
            &self.pool,
            repository::employee::NewEmployee {
                employee_code: "ADMIN-0001".to_string(),
                name: admin.name.clone(),
                email: admin.email.clone(),
                password_hash: hash,
                management_level: ManagementLevel::APEX,
                department_id: None,
                reporting_manager_id: None,
                salary: None,
                bank_account: None,
                tax_id: None,
            },
        )
        .await?;

        tracing::info!(employee_id = employee.id, email = %employee.email, "Bootstrap administrator created");
        Ok(())
    }
}
