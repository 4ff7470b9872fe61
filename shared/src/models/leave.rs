//! Leave Model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::ManagementLevel;

/// Leave type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "kebab-case"))]
pub enum LeaveType {
    Personal,
    Casual,
    Sick,
    Unpaid,
    HalfDay,
    Earned,
    Maternity,
    Paternity,
}

/// Leave approval status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum LeaveStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

/// Leave request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Leave {
    pub id: i64,
    pub employee_id: i64,
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Half-day = 0.5, otherwise inclusive day count
    pub days: f64,
    pub reason: Option<String>,
    pub status: LeaveStatus,
    pub approver_id: Option<i64>,
    pub remarks: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Leave joined with requester information (approval queue)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct TeamLeave {
    #[serde(flatten)]
    #[cfg_attr(feature = "db", sqlx(flatten))]
    pub leave: Leave,
    pub employee_name: String,
    pub employee_level: ManagementLevel,
    /// Filled per viewer by the server
    #[serde(default)]
    #[cfg_attr(feature = "db", sqlx(skip))]
    pub can_approve: bool,
}

/// Create leave payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveCreate {
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: Option<String>,
}

/// Approve / reject payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LeaveDecision {
    pub remarks: Option<String>,
}
