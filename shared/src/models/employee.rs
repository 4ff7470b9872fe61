//! Employee Model

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{AppError, ErrorCode};

/// Management level L0–L4 (monotonic authority ranking)
///
/// L0 is a regular employee, L4 the apex level. Values outside 0..=4 never
/// deserialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(transparent))]
pub struct ManagementLevel(u8);

impl ManagementLevel {
    pub const L0: Self = Self(0);
    pub const L1: Self = Self(1);
    pub const L2: Self = Self(2);
    pub const L3: Self = Self(3);
    pub const L4: Self = Self(4);

    /// Highest level
    pub const APEX: Self = Self::L4;

    pub const fn value(self) -> u8 {
        self.0
    }

    pub const fn is_apex(self) -> bool {
        self.0 == Self::APEX.0
    }
}

impl TryFrom<u8> for ManagementLevel {
    type Error = AppError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value <= Self::APEX.0 {
            Ok(Self(value))
        } else {
            Err(AppError::new(ErrorCode::InvalidManagementLevel).with_detail("value", value))
        }
    }
}

impl From<ManagementLevel> for u8 {
    fn from(level: ManagementLevel) -> Self {
        level.0
    }
}

impl fmt::Display for ManagementLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.0)
    }
}

/// Employment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "kebab-case"))]
pub enum EmployeeStatus {
    #[default]
    Active,
    OnLeave,
    Inactive,
}

/// Employee record (without password)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Employee {
    pub id: i64,
    /// Human-facing employee id (e.g. "EMP-0042")
    pub employee_code: String,
    pub name: String,
    pub email: String,
    pub management_level: ManagementLevel,
    pub department_id: Option<i64>,
    pub reporting_manager_id: Option<i64>,
    pub status: EmployeeStatus,
    pub salary: Option<f64>,
    pub bank_account: Option<String>,
    pub tax_id: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Employee {
    /// Build the response for a viewer, blanking sensitive fields unless allowed
    pub fn into_view(self, can_view_sensitive_data: bool) -> EmployeeResponse {
        let (salary, bank_account, tax_id) = if can_view_sensitive_data {
            (self.salary, self.bank_account, self.tax_id)
        } else {
            (None, None, None)
        };
        EmployeeResponse {
            id: self.id,
            employee_code: self.employee_code,
            name: self.name,
            email: self.email,
            management_level: self.management_level,
            department_id: self.department_id,
            reporting_manager_id: self.reporting_manager_id,
            status: self.status,
            salary,
            bank_account,
            tax_id,
            can_view_sensitive_data,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Employee response
///
/// `can_view_sensitive_data` is decided by the server per request. Clients
/// render sensitive fields based on this flag and never derive it themselves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeResponse {
    pub id: i64,
    pub employee_code: String,
    pub name: String,
    pub email: String,
    pub management_level: ManagementLevel,
    pub department_id: Option<i64>,
    pub reporting_manager_id: Option<i64>,
    pub status: EmployeeStatus,
    pub salary: Option<f64>,
    pub bank_account: Option<String>,
    pub tax_id: Option<String>,
    pub can_view_sensitive_data: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create employee payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeCreate {
    pub employee_code: String,
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub management_level: ManagementLevel,
    pub department_id: Option<i64>,
    pub reporting_manager_id: Option<i64>,
    pub salary: Option<f64>,
    pub bank_account: Option<String>,
    pub tax_id: Option<String>,
}

/// Update employee payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmployeeUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub management_level: Option<ManagementLevel>,
    pub department_id: Option<i64>,
    pub reporting_manager_id: Option<i64>,
    pub salary: Option<f64>,
    pub bank_account: Option<String>,
    pub tax_id: Option<String>,
}

impl EmployeeUpdate {
    /// Whether the payload touches salary, bank or compliance fields
    pub fn touches_sensitive_fields(&self) -> bool {
        self.salary.is_some() || self.bank_account.is_some() || self.tax_id.is_some()
    }
}

/// Status change payload (exit / leave processing)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeStatusUpdate {
    pub status: EmployeeStatus,
}
