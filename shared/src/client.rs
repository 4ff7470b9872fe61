//! Client-related types shared between server and client
//!
//! Request/response types for the auth endpoints and the session snapshot.
//! These types are shared between hr-server and hr-client.

use serde::{Deserialize, Serialize};

use crate::models::ManagementLevel;
use crate::permission::Capabilities;

// =============================================================================
// Auth API DTOs
// =============================================================================

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserInfo,
}

/// Authenticated user as seen by clients
///
/// `capabilities` is resolved by the server at login; UI gating reads it
/// instead of re-deriving rules from the level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub management_level: ManagementLevel,
    pub department_id: Option<i64>,
    pub department_name: Option<String>,
    #[serde(default)]
    pub capabilities: Capabilities,
}

/// Employee list query
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmployeeQuery {
    pub department_id: Option<i64>,
    pub status: Option<crate::models::EmployeeStatus>,
}

/// Attendance range query
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttendanceQuery {
    pub employee_id: Option<i64>,
    pub start_date: Option<chrono::NaiveDate>,
    pub end_date: Option<chrono::NaiveDate>,
}
