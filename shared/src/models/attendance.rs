//! Attendance Model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Attendance status for a day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "kebab-case"))]
pub enum AttendanceStatus {
    #[default]
    Present,
    Absent,
    HalfDay,
    OnLeave,
}

/// One record per employee per date
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct AttendanceRecord {
    pub id: i64,
    pub employee_id: i64,
    pub date: NaiveDate,
    pub check_in: Option<i64>,
    pub check_out: Option<i64>,
    pub status: AttendanceStatus,
}

impl AttendanceRecord {
    /// Worked time in milliseconds, once checked out
    pub fn worked_millis(&self) -> Option<i64> {
        match (self.check_in, self.check_out) {
            (Some(start), Some(end)) if end >= start => Some(end - start),
            _ => None,
        }
    }
}
