//! Permission tier resolver
//!
//! Authorization policy keyed on [`ManagementLevel`], plus finance/HR
//! department matching for sensitive data.
//!
//! ## Tiers
//! - L0: regular employee
//! - L1: approves L0 leave
//! - L2: manages employees, edits and approves below L2
//! - L3: manages departments, edits anyone, deletes below L4
//! - L4: apex, everything
//!
//! Every function here is pure and never fails. hr-server calls them as the
//! enforcement point; clients may call the same functions to hide controls,
//! which is a convenience and not a security boundary.

use serde::{Deserialize, Serialize};

use crate::models::ManagementLevel;

const FINANCE_DEPARTMENTS: &[&str] = &["finance", "accounts", "accounting"];
const HR_DEPARTMENTS: &[&str] = &["hr", "human resources", "people"];

fn department_matches(department_name: Option<&str>, names: &[&str]) -> bool {
    department_name
        .map(|name| name.trim().to_lowercase())
        .is_some_and(|name| names.iter().any(|n| *n == name))
}

/// Whether the department is a finance department
pub fn is_finance_department(department_name: Option<&str>) -> bool {
    department_matches(department_name, FINANCE_DEPARTMENTS)
}

/// Whether the department is an HR department
pub fn is_hr_department(department_name: Option<&str>) -> bool {
    department_matches(department_name, HR_DEPARTMENTS)
}

/// Create, edit and list employees
pub fn can_manage_employees(level: ManagementLevel) -> bool {
    level >= ManagementLevel::L2
}

/// Create, edit and delete departments
pub fn can_manage_departments(level: ManagementLevel) -> bool {
    level >= ManagementLevel::L3
}

/// Salary, bank details and compliance numbers
///
/// Decided by the server per request and shipped with the record.
pub fn can_view_sensitive_data(
    viewer: ManagementLevel,
    viewer_department_name: Option<&str>,
    is_self: bool,
) -> bool {
    is_self
        || viewer >= ManagementLevel::L3
        || is_finance_department(viewer_department_name)
        || is_hr_department(viewer_department_name)
}

/// Export employee / attendance data
pub fn can_export_data(viewer: ManagementLevel, viewer_department_name: Option<&str>) -> bool {
    viewer >= ManagementLevel::L3 || is_finance_department(viewer_department_name)
}

/// Approve or reject a leave request
///
/// Each level approves strictly junior levels only; L4 approves everyone,
/// including L3 and other L4s. Nobody approves their own request.
pub fn can_approve_leave(
    viewer: ManagementLevel,
    requester: ManagementLevel,
    is_own_request: bool,
) -> bool {
    if is_own_request {
        return false;
    }
    match viewer.value() {
        4 => true,
        1..=3 => requester < viewer,
        _ => false,
    }
}

/// Edit another employee's record
pub fn can_edit_employee_record(
    viewer: ManagementLevel,
    target: ManagementLevel,
    is_self: bool,
) -> bool {
    match viewer.value() {
        3 | 4 => true,
        2 => target < ManagementLevel::L2 && !is_self,
        _ => false,
    }
}

/// Delete an employee record
pub fn can_delete_employee(viewer: ManagementLevel, target: ManagementLevel) -> bool {
    match viewer.value() {
        4 => true,
        3 => target < ManagementLevel::L4,
        _ => false,
    }
}

/// Change an employee's status (active / on-leave / inactive)
pub fn can_manage_status(viewer: ManagementLevel, target: ManagementLevel) -> bool {
    match viewer.value() {
        4 => true,
        3 => target < ManagementLevel::L3,
        _ => false,
    }
}

/// Assign a management level when creating or editing an employee
///
/// Only the apex level may hand out a level equal to its own.
pub fn can_assign_level(viewer: ManagementLevel, assigned: ManagementLevel) -> bool {
    viewer.is_apex() || assigned < viewer
}

/// Move an existing employee from `current` to `new`
///
/// Below the apex level both the current and the new level must sit under
/// the viewer's, so nobody can demote a peer or a superior.
pub fn can_change_level(viewer: ManagementLevel, current: ManagementLevel, new: ManagementLevel) -> bool {
    viewer.is_apex() || (current < viewer && new < viewer)
}

/// Coarse capability set shipped to clients on login
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Capabilities {
    pub manage_employees: bool,
    pub manage_departments: bool,
    pub export_data: bool,
    pub approve_leave: bool,
    pub create_polls: bool,
}

impl Capabilities {
    pub fn resolve(level: ManagementLevel, department_name: Option<&str>) -> Self {
        Self {
            manage_employees: can_manage_employees(level),
            manage_departments: can_manage_departments(level),
            export_data: can_export_data(level, department_name),
            approve_leave: level >= ManagementLevel::L1,
            create_polls: can_manage_employees(level),
        }
    }
}
