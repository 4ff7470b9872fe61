//! View-scoped API access
//!
//! Every call races the scope's cancellation token. Once the view is left
//! (scope dropped or cancelled, or the user logged out) pending calls resolve
//! to [`ClientError::Cancelled`] and late responses are discarded.

use std::future::Future;

use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::client::{AttendanceQuery, EmployeeQuery, UserInfo};
use shared::hierarchy;
use shared::leave::leave_days;
use shared::models::{
    Asset, AssetCreate, AttendanceRecord, Department, DepartmentCreate, DepartmentUpdate,
    EmployeeCreate, EmployeeResponse, EmployeeStatus, EmployeeStatusUpdate, EmployeeUpdate,
    HierarchyEntry, Leave, LeaveCreate, LeaveDecision, LeaveStatus, PollCreate, PollUpdate,
    PollView, TeamLeave, VoteSubmission,
};
use tokio_util::sync::CancellationToken;

use crate::{AppContext, ClientError, ClientResult};

#[derive(Serialize)]
struct TeamQuery {
    status: Option<LeaveStatus>,
}

/// Request scope bound to one view
#[derive(Debug)]
pub struct ViewScope {
    ctx: AppContext,
    token: CancellationToken,
}

impl ViewScope {
    pub(crate) fn new(ctx: AppContext, token: CancellationToken) -> Self {
        Self { ctx, token }
    }

    pub fn context(&self) -> &AppContext {
        &self.ctx
    }

    /// Cancel every in-flight and future call of this scope
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Run a future unless the scope is cancelled first
    pub async fn run<T, F>(&self, fut: F) -> ClientResult<T>
    where
        F: Future<Output = ClientResult<T>>,
    {
        if self.token.is_cancelled() {
            return Err(ClientError::Cancelled);
        }
        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(ClientError::Cancelled),
            result = fut => result,
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let token = self.ctx.token()?;
        self.run(self.ctx.http().get(path, Some(&token))).await
    }

    async fn get_with_query<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> ClientResult<T> {
        let token = self.ctx.token()?;
        self.run(self.ctx.http().get_with_query(path, Some(&token), query))
            .await
    }

    async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ClientResult<T> {
        let token = self.ctx.token()?;
        self.run(self.ctx.http().post(path, Some(&token), body)).await
    }

    async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let token = self.ctx.token()?;
        self.run(self.ctx.http().post_empty(path, Some(&token))).await
    }

    async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ClientResult<T> {
        let token = self.ctx.token()?;
        self.run(self.ctx.http().put(path, Some(&token), body)).await
    }

    async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let token = self.ctx.token()?;
        self.run(self.ctx.http().delete(path, Some(&token))).await
    }

    // ========== Auth ==========

    pub async fn me(&self) -> ClientResult<UserInfo> {
        self.get("/api/auth/me").await
    }

    // ========== Employees ==========

    pub async fn employees(&self, query: &EmployeeQuery) -> ClientResult<Vec<EmployeeResponse>> {
        self.get_with_query("/api/employees", query).await
    }

    pub async fn employee(&self, id: i64) -> ClientResult<EmployeeResponse> {
        self.get(&format!("/api/employees/{id}")).await
    }

    pub async fn create_employee(&self, payload: &EmployeeCreate) -> ClientResult<EmployeeResponse> {
        if !self.ctx.capabilities().manage_employees {
            return Err(AppContext::not_permitted("manage employees"));
        }
        self.post("/api/employees", payload).await
    }

    /// Level and sensitive-field rules depend on the target, so the server decides
    pub async fn update_employee(&self, id: i64, payload: &EmployeeUpdate) -> ClientResult<EmployeeResponse> {
        self.put(&format!("/api/employees/{id}"), payload).await
    }

    pub async fn set_employee_status(&self, id: i64, status: EmployeeStatus) -> ClientResult<EmployeeResponse> {
        self.put(&format!("/api/employees/{id}/status"), &EmployeeStatusUpdate { status })
            .await
    }

    pub async fn delete_employee(&self, id: i64) -> ClientResult<bool> {
        self.delete(&format!("/api/employees/{id}")).await
    }

    // ========== Departments ==========

    pub async fn departments(&self) -> ClientResult<Vec<Department>> {
        self.get("/api/departments").await
    }

    /// Pre-order hierarchy with depths
    pub async fn department_tree(&self) -> ClientResult<Vec<HierarchyEntry>> {
        self.get("/api/departments/tree").await
    }

    /// Departments selectable as parent; `None` when creating a new one
    pub async fn eligible_parents(&self, editing: Option<i64>) -> ClientResult<Vec<Department>> {
        match editing {
            Some(id) => self.get(&format!("/api/departments/{id}/eligible-parents")).await,
            None => self.get("/api/departments/eligible-parents").await,
        }
    }

    pub async fn create_department(&self, payload: &DepartmentCreate) -> ClientResult<Department> {
        if !self.ctx.capabilities().manage_departments {
            return Err(AppContext::not_permitted("manage departments"));
        }
        self.post("/api/departments", payload).await
    }

    /// Update a department
    ///
    /// A new parent is checked against `departments`, the list the view
    /// already holds, so self-parenting and cycles never reach the server.
    pub async fn update_department(
        &self,
        id: i64,
        payload: &DepartmentUpdate,
        departments: &[Department],
    ) -> ClientResult<Department> {
        if !self.ctx.capabilities().manage_departments {
            return Err(AppContext::not_permitted("manage departments"));
        }
        if !payload.clear_parent && payload.parent_id.is_some() {
            hierarchy::assign_parent(id, payload.parent_id, departments)?;
        }
        self.put(&format!("/api/departments/{id}"), payload).await
    }

    pub async fn delete_department(&self, id: i64) -> ClientResult<bool> {
        if !self.ctx.capabilities().manage_departments {
            return Err(AppContext::not_permitted("manage departments"));
        }
        self.delete(&format!("/api/departments/{id}")).await
    }

    // ========== Leaves ==========

    pub async fn leaves(&self) -> ClientResult<Vec<Leave>> {
        self.get("/api/leaves").await
    }

    pub async fn team_leaves(&self, status: Option<LeaveStatus>) -> ClientResult<Vec<TeamLeave>> {
        self.get_with_query("/api/leaves/team", &TeamQuery { status })
            .await
    }

    /// Submit a leave request; the date range is checked locally first
    pub async fn request_leave(&self, payload: &LeaveCreate) -> ClientResult<Leave> {
        leave_days(payload.leave_type, payload.start_date, payload.end_date)?;
        self.post("/api/leaves", payload).await
    }

    pub async fn approve_leave(&self, id: i64, remarks: Option<String>) -> ClientResult<Leave> {
        self.post(&format!("/api/leaves/{id}/approve"), &LeaveDecision { remarks })
            .await
    }

    pub async fn reject_leave(&self, id: i64, remarks: Option<String>) -> ClientResult<Leave> {
        self.post(&format!("/api/leaves/{id}/reject"), &LeaveDecision { remarks })
            .await
    }

    /// Withdraw an own pending request
    pub async fn withdraw_leave(&self, id: i64) -> ClientResult<bool> {
        self.delete(&format!("/api/leaves/{id}")).await
    }

    // ========== Polls ==========

    pub async fn polls(&self) -> ClientResult<Vec<PollView>> {
        self.get("/api/polls").await
    }

    pub async fn poll(&self, id: i64) -> ClientResult<PollView> {
        self.get(&format!("/api/polls/{id}")).await
    }

    pub async fn create_poll(&self, payload: &PollCreate) -> ClientResult<PollView> {
        if !self.ctx.capabilities().create_polls {
            return Err(AppContext::not_permitted("create polls"));
        }
        payload.validate()?;
        self.post("/api/polls", payload).await
    }

    /// Edit a poll already loaded by the view
    ///
    /// Options and audience changes are refused locally once `view` shows
    /// votes. A viewer without result access only knows about its own ballot,
    /// so the server still has the final word.
    pub async fn update_poll(&self, view: &PollView, payload: &PollUpdate) -> ClientResult<PollView> {
        let known_votes = match &view.results {
            Some(results) => results.total_votes,
            None => u64::from(view.viewer_vote.is_some()),
        };
        payload.ensure_editable(known_votes)?;
        self.put(&format!("/api/polls/{}", view.poll.id), payload)
            .await
    }

    pub async fn delete_poll(&self, id: i64) -> ClientResult<bool> {
        self.delete(&format!("/api/polls/{id}")).await
    }

    /// Vote on a poll already loaded by the view
    ///
    /// The ballot is checked against `view` before sending.
    pub async fn vote(&self, view: &PollView, submission: &VoteSubmission) -> ClientResult<PollView> {
        submission.validate(&view.poll)?;
        self.post(&format!("/api/polls/{}/vote", view.poll.id), submission)
            .await
    }

    // ========== Attendance ==========

    pub async fn check_in(&self) -> ClientResult<AttendanceRecord> {
        self.post_empty("/api/attendance/check-in").await
    }

    pub async fn check_out(&self) -> ClientResult<AttendanceRecord> {
        self.post_empty("/api/attendance/check-out").await
    }

    pub async fn attendance(&self, query: &AttendanceQuery) -> ClientResult<Vec<AttendanceRecord>> {
        if let (Some(start), Some(end)) = (query.start_date, query.end_date)
            && end < start
        {
            return Err(ClientError::Validation(shared::AppError::validation(
                "End date must not be before start date",
            )));
        }
        self.get_with_query("/api/attendance", query).await
    }

    // ========== Assets ==========

    pub async fn assets(&self, employee_id: i64) -> ClientResult<Vec<Asset>> {
        self.get(&format!("/api/employees/{employee_id}/assets"))
            .await
    }

    pub async fn allocate_asset(&self, employee_id: i64, name: &str) -> ClientResult<Asset> {
        if !self.ctx.capabilities().manage_employees {
            return Err(AppContext::not_permitted("allocate assets"));
        }
        let payload = AssetCreate {
            name: name.to_string(),
        };
        self.post(&format!("/api/employees/{employee_id}/assets"), &payload)
            .await
    }

    pub async fn revoke_asset(&self, id: i64) -> ClientResult<Asset> {
        if !self.ctx.capabilities().manage_employees {
            return Err(AppContext::not_permitted("revoke assets"));
        }
        self.post_empty(&format!("/api/assets/{id}/revoke")).await
    }
}

impl Drop for ViewScope {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
