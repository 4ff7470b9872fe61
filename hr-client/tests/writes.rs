mod common;

use chrono::NaiveDate;
use common::{PASSWORD, Stub, department, poll_view};
use hr_client::ErrorCode;
use shared::client::{AttendanceQuery, EmployeeQuery};
use shared::models::{
    Ballot, DepartmentCreate, DepartmentUpdate, EmployeeCreate, EmployeeStatus, LeaveStatus,
    ManagementLevel, PollAudience, PollResults, PollUpdate,
};

#[tokio::test]
async fn list_filters_travel_as_query_parameters() {
    let stub = Stub::start(2).await;
    let ctx = stub.context();
    ctx.login("dana@example.com", PASSWORD).await.unwrap();
    let scope = ctx.scope();

    let query = EmployeeQuery {
        department_id: Some(5),
        status: Some(EmployeeStatus::Inactive),
    };
    scope.employees(&query).await.unwrap();
    scope.employees(&EmployeeQuery::default()).await.unwrap();

    let range = AttendanceQuery {
        employee_id: None,
        start_date: NaiveDate::from_ymd_opt(2024, 3, 1),
        end_date: NaiveDate::from_ymd_opt(2024, 3, 31),
    };
    scope.attendance(&range).await.unwrap();
    scope.team_leaves(Some(LeaveStatus::Pending)).await.unwrap();

    assert_eq!(
        stub.queries(),
        vec![
            "department_id=5&status=inactive".to_string(),
            String::new(),
            "start_date=2024-03-01&end_date=2024-03-31".to_string(),
            "status=pending".to_string(),
        ]
    );
}

#[tokio::test]
async fn department_cycles_are_refused_before_sending() {
    let stub = Stub::start(3).await;
    let ctx = stub.context();
    ctx.login("dana@example.com", PASSWORD).await.unwrap();
    let scope = ctx.scope();

    let loaded = scope.departments().await.unwrap();
    assert_eq!(loaded, vec![department(1, None), department(2, Some(1))]);
    assert_eq!(scope.eligible_parents(None).await.unwrap().len(), 2);
    assert_eq!(scope.eligible_parents(Some(1)).await.unwrap().len(), 2);
    let before = stub.hits();

    let under_child = DepartmentUpdate {
        parent_id: Some(2),
        ..Default::default()
    };
    let err = scope.update_department(1, &under_child, &loaded).await.unwrap_err();
    assert!(err.is_validation());
    assert_eq!(err.code(), Some(ErrorCode::DepartmentCycle));

    let under_itself = DepartmentUpdate {
        parent_id: Some(2),
        ..Default::default()
    };
    let err = scope.update_department(2, &under_itself, &loaded).await.unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::DepartmentCycle));

    let unknown_parent = DepartmentUpdate {
        parent_id: Some(99),
        ..Default::default()
    };
    let err = scope.update_department(1, &unknown_parent, &loaded).await.unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::DepartmentNotFound));
    assert_eq!(stub.hits(), before);

    // clear_parent wins over parent_id, so nothing is checked locally
    let to_root = DepartmentUpdate {
        parent_id: Some(2),
        clear_parent: true,
        ..Default::default()
    };
    let err = scope.update_department(1, &to_root, &loaded).await.unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::InternalError));
    assert_eq!(stub.hits(), before + 1);
}

#[tokio::test]
async fn frozen_poll_fields_are_refused_before_sending() {
    let stub = Stub::start(2).await;
    let ctx = stub.context();
    ctx.login("dana@example.com", PASSWORD).await.unwrap();
    let scope = ctx.scope();
    let before = stub.hits();

    let reaudience = PollUpdate {
        audience: Some(PollAudience::Department { department_ids: vec![3] }),
        ..Default::default()
    };

    let mut with_results = poll_view(false);
    with_results.can_see_results = true;
    with_results.results = Some(PollResults {
        total_votes: 3,
        options: Vec::new(),
        custom_responses: Vec::new(),
    });
    let err = scope.update_poll(&with_results, &reaudience).await.unwrap_err();
    assert!(err.is_validation());
    assert_eq!(err.code(), Some(ErrorCode::PollFrozen));

    // Results hidden, but the viewer's own ballot proves the poll has votes
    let mut voted = poll_view(false);
    voted.viewer_vote = Some(Ballot::Option("opt-1".into()));
    let err = scope.update_poll(&voted, &reaudience).await.unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::PollFrozen));
    assert_eq!(stub.hits(), before);

    let retitle = PollUpdate {
        title: Some("Dinner".into()),
        ..Default::default()
    };
    scope.update_poll(&with_results, &retitle).await.unwrap_err();
    assert_eq!(stub.hits(), before + 1);
}

#[tokio::test]
async fn management_writes_need_the_capability() {
    let stub = Stub::start(1).await;
    let ctx = stub.context();
    ctx.login("dana@example.com", PASSWORD).await.unwrap();
    let scope = ctx.scope();
    let before = stub.hits();

    let new_department = DepartmentCreate {
        name: "Ops".into(),
        description: None,
        positions: Vec::new(),
        parent_id: None,
    };
    let err = scope.create_department(&new_department).await.unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::PermissionDenied));
    let err = scope.delete_department(2).await.unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::PermissionDenied));

    let hire = EmployeeCreate {
        employee_code: "EMP-9".into(),
        name: "Sam".into(),
        email: "sam@example.com".into(),
        password: "hunter22".into(),
        management_level: ManagementLevel::L0,
        department_id: None,
        reporting_manager_id: None,
        salary: None,
        bank_account: None,
        tax_id: None,
    };
    let err = scope.create_employee(&hire).await.unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::PermissionDenied));

    let err = scope.allocate_asset(7, "Laptop").await.unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::PermissionDenied));
    let err = scope.revoke_asset(1).await.unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::PermissionDenied));
    assert_eq!(stub.hits(), before);
}

#[tokio::test]
async fn permitted_writes_reach_the_server() {
    let stub = Stub::start(4).await;
    let ctx = stub.context();
    ctx.login("dana@example.com", PASSWORD).await.unwrap();
    let scope = ctx.scope();
    let before = stub.hits();

    // The stub refuses every write, so each call shows up as a server error
    let calls = [
        scope.delete_department(2).await.map(|_| ()),
        scope.set_employee_status(3, EmployeeStatus::Inactive).await.map(|_| ()),
        scope.delete_employee(3).await.map(|_| ()),
        scope.allocate_asset(3, "Laptop").await.map(|_| ()),
        scope.revoke_asset(1).await.map(|_| ()),
        scope.delete_poll(11).await.map(|_| ()),
    ];
    for result in calls {
        assert_eq!(result.unwrap_err().code(), Some(ErrorCode::InternalError));
    }
    assert_eq!(stub.hits(), before + 6);
}
