//! Unified error codes for Staffdesk
//!
//! This module defines all error codes used across hr-server, hr-client and frontends.
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Employee errors
//! - 4xxx: Department errors
//! - 5xxx: Leave errors
//! - 6xxx: Poll errors
//! - 7xxx: Attendance errors
//! - 8xxx: Asset errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (email/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Account is inactive
    AccountDisabled = 1005,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// A higher management level is required
    ManagementLevelRequired = 2002,
    /// Operation is not allowed on one's own record
    CannotModifySelf = 2003,

    // ==================== 3xxx: Employee ====================
    /// Employee not found
    EmployeeNotFound = 3001,
    /// Employee email already exists
    EmployeeEmailExists = 3002,
    /// Employee code already exists
    EmployeeCodeExists = 3003,
    /// Cannot delete own account
    EmployeeCannotDeleteSelf = 3004,
    /// Management level outside 0..=4
    InvalidManagementLevel = 3005,

    // ==================== 4xxx: Department ====================
    /// Department not found
    DepartmentNotFound = 4001,
    /// Department name already exists
    DepartmentNameExists = 4002,
    /// Parent assignment would create a cycle
    DepartmentCycle = 4003,
    /// Department still has child departments
    DepartmentHasChildren = 4004,
    /// Department still has employees
    DepartmentHasEmployees = 4005,

    // ==================== 5xxx: Leave ====================
    /// Leave not found
    LeaveNotFound = 5001,
    /// End date before start date
    LeaveInvalidRange = 5002,
    /// Half-day leave spanning more than one date
    LeaveHalfDaySpan = 5003,
    /// Leave is no longer pending
    LeaveNotPending = 5004,
    /// Leave does not belong to the caller
    LeaveNotOwner = 5005,

    // ==================== 6xxx: Poll ====================
    /// Poll not found
    PollNotFound = 6001,
    /// Poll is not open for voting
    PollNotActive = 6002,
    /// User already voted on this poll
    PollAlreadyVoted = 6003,
    /// Selected option does not exist
    PollOptionNotFound = 6004,
    /// Poll does not accept custom responses
    PollCustomNotAllowed = 6005,
    /// Vote carries neither an option nor a custom response
    PollEmptyVote = 6006,
    /// Options or audience cannot change after votes exist
    PollFrozen = 6007,
    /// User is outside the poll audience
    PollNotInAudience = 6008,
    /// Poll option list is invalid
    PollInvalidOptions = 6009,

    // ==================== 7xxx: Attendance ====================
    /// Attendance record not found
    AttendanceNotFound = 7001,
    /// Already checked in today
    AttendanceAlreadyCheckedIn = 7002,
    /// No check-in recorded today
    AttendanceNotCheckedIn = 7003,
    /// Already checked out today
    AttendanceAlreadyCheckedOut = 7004,

    // ==================== 8xxx: Asset ====================
    /// Asset not found
    AssetNotFound = 8001,
    /// Asset has already been revoked
    AssetAlreadyRevoked = 8002,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Network error
    NetworkError = 9003,
    /// Operation timeout
    TimeoutError = 9004,
    /// Configuration error
    ConfigError = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Whether this code is a pre-flight validation failure
    ///
    /// Validation failures are detected before any state is touched and are
    /// never worth retrying with the same input.
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            ErrorCode::ValidationFailed
                | ErrorCode::InvalidFormat
                | ErrorCode::RequiredField
                | ErrorCode::ValueOutOfRange
                | ErrorCode::InvalidManagementLevel
                | ErrorCode::LeaveInvalidRange
                | ErrorCode::LeaveHalfDaySpan
                | ErrorCode::PollEmptyVote
                | ErrorCode::PollCustomNotAllowed
                | ErrorCode::PollInvalidOptions
        )
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Invalid email or password",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",
            ErrorCode::AccountDisabled => "Account is inactive",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::ManagementLevelRequired => "A higher management level is required",
            ErrorCode::CannotModifySelf => "Operation not allowed on own record",

            // Employee
            ErrorCode::EmployeeNotFound => "Employee not found",
            ErrorCode::EmployeeEmailExists => "Employee email already exists",
            ErrorCode::EmployeeCodeExists => "Employee code already exists",
            ErrorCode::EmployeeCannotDeleteSelf => "Cannot delete own account",
            ErrorCode::InvalidManagementLevel => "Management level must be between 0 and 4",

            // Department
            ErrorCode::DepartmentNotFound => "Department not found",
            ErrorCode::DepartmentNameExists => "Department name already exists",
            ErrorCode::DepartmentCycle => "A department cannot be its own ancestor",
            ErrorCode::DepartmentHasChildren => "Department has child departments",
            ErrorCode::DepartmentHasEmployees => "Department has employees",

            // Leave
            ErrorCode::LeaveNotFound => "Leave not found",
            ErrorCode::LeaveInvalidRange => "End date must not be before start date",
            ErrorCode::LeaveHalfDaySpan => "Half-day leave must start and end on the same date",
            ErrorCode::LeaveNotPending => "Leave is no longer pending",
            ErrorCode::LeaveNotOwner => "Leave belongs to another employee",

            // Poll
            ErrorCode::PollNotFound => "Poll not found",
            ErrorCode::PollNotActive => "Poll is not open for voting",
            ErrorCode::PollAlreadyVoted => "You have already voted on this poll",
            ErrorCode::PollOptionNotFound => "Poll option not found",
            ErrorCode::PollCustomNotAllowed => "This poll does not accept custom responses",
            ErrorCode::PollEmptyVote => "Select an option or enter a response",
            ErrorCode::PollFrozen => "Options and audience cannot change after votes exist",
            ErrorCode::PollNotInAudience => "You are not in this poll's audience",
            ErrorCode::PollInvalidOptions => "Poll options are invalid",

            // Attendance
            ErrorCode::AttendanceNotFound => "Attendance record not found",
            ErrorCode::AttendanceAlreadyCheckedIn => "Already checked in today",
            ErrorCode::AttendanceNotCheckedIn => "No check-in recorded today",
            ErrorCode::AttendanceAlreadyCheckedOut => "Already checked out today",

            // Asset
            ErrorCode::AssetNotFound => "Asset not found",
            ErrorCode::AssetAlreadyRevoked => "Asset has already been revoked",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::NetworkError => "Network error",
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1005 => Ok(ErrorCode::AccountDisabled),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::ManagementLevelRequired),
            2003 => Ok(ErrorCode::CannotModifySelf),

            // Employee
            3001 => Ok(ErrorCode::EmployeeNotFound),
            3002 => Ok(ErrorCode::EmployeeEmailExists),
            3003 => Ok(ErrorCode::EmployeeCodeExists),
            3004 => Ok(ErrorCode::EmployeeCannotDeleteSelf),
            3005 => Ok(ErrorCode::InvalidManagementLevel),

            // Department
            4001 => Ok(ErrorCode::DepartmentNotFound),
            4002 => Ok(ErrorCode::DepartmentNameExists),
            4003 => Ok(ErrorCode::DepartmentCycle),
            4004 => Ok(ErrorCode::DepartmentHasChildren),
            4005 => Ok(ErrorCode::DepartmentHasEmployees),

            // Leave
            5001 => Ok(ErrorCode::LeaveNotFound),
            5002 => Ok(ErrorCode::LeaveInvalidRange),
            5003 => Ok(ErrorCode::LeaveHalfDaySpan),
            5004 => Ok(ErrorCode::LeaveNotPending),
            5005 => Ok(ErrorCode::LeaveNotOwner),

            // Poll
            6001 => Ok(ErrorCode::PollNotFound),
            6002 => Ok(ErrorCode::PollNotActive),
            6003 => Ok(ErrorCode::PollAlreadyVoted),
            6004 => Ok(ErrorCode::PollOptionNotFound),
            6005 => Ok(ErrorCode::PollCustomNotAllowed),
            6006 => Ok(ErrorCode::PollEmptyVote),
            6007 => Ok(ErrorCode::PollFrozen),
            6008 => Ok(ErrorCode::PollNotInAudience),
            6009 => Ok(ErrorCode::PollInvalidOptions),

            // Attendance
            7001 => Ok(ErrorCode::AttendanceNotFound),
            7002 => Ok(ErrorCode::AttendanceAlreadyCheckedIn),
            7003 => Ok(ErrorCode::AttendanceNotCheckedIn),
            7004 => Ok(ErrorCode::AttendanceAlreadyCheckedOut),

            // Asset
            8001 => Ok(ErrorCode::AssetNotFound),
            8002 => Ok(ErrorCode::AssetAlreadyRevoked),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::NetworkError),
            9004 => Ok(ErrorCode::TimeoutError),
            9005 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
