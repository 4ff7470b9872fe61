//! Asset Model

use serde::{Deserialize, Serialize};

/// Asset allocation status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum AssetStatus {
    #[default]
    Active,
    Revoked,
}

/// Asset allocated to an employee
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Asset {
    pub id: i64,
    pub employee_id: i64,
    pub name: String,
    pub status: AssetStatus,
    pub allocated_at: i64,
    pub allocated_by: i64,
    pub revoked_at: Option<i64>,
    pub revoked_by: Option<i64>,
}

/// Allocate asset payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetCreate {
    pub name: String,
}
