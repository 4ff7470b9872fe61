//! Leave arithmetic and lifecycle rules

use chrono::NaiveDate;

use crate::error::{AppError, AppResult, ErrorCode};
use crate::models::{Leave, LeaveStatus, LeaveType};

/// Number of leave days a request consumes
///
/// Half-day leave is 0.5 and must start and end on the same date; every other
/// type counts calendar days inclusively.
pub fn leave_days(leave_type: LeaveType, start: NaiveDate, end: NaiveDate) -> AppResult<f64> {
    if end < start {
        return Err(AppError::new(ErrorCode::LeaveInvalidRange)
            .with_detail("start_date", start.to_string())
            .with_detail("end_date", end.to_string()));
    }
    if leave_type == LeaveType::HalfDay {
        if start != end {
            return Err(AppError::new(ErrorCode::LeaveHalfDaySpan));
        }
        return Ok(0.5);
    }
    Ok(((end - start).num_days() + 1) as f64)
}

impl LeaveStatus {
    /// Only pending requests can be decided
    pub fn can_transition_to(self, next: LeaveStatus) -> bool {
        matches!(
            (self, next),
            (LeaveStatus::Pending, LeaveStatus::Approved)
                | (LeaveStatus::Pending, LeaveStatus::Rejected)
        )
    }
}

/// The requester may withdraw a request until it is decided
pub fn can_delete_leave(leave: &Leave, viewer_id: i64) -> bool {
    leave.employee_id == viewer_id && leave.status == LeaveStatus::Pending
}
