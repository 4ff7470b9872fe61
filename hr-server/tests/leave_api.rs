mod common;

use common::{Actor, TestApp, assert_error, data};
use http::StatusCode;
use hr_server::ErrorCode;
use serde_json::{Value, json};

async fn request_leave(app: &TestApp, actor: &Actor) -> i64 {
    let (status, body) = app
        .post(
            "/api/leaves",
            actor,
            json!({
                "leave_type": "casual",
                "start_date": "2024-01-10",
                "end_date": "2024-01-12",
                "reason": "Family visit"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    data(&body)["id"].as_i64().unwrap()
}

#[tokio::test]
async fn leave_days_are_computed_on_create() {
    let app = TestApp::new().await;
    let employee = app.actor("EMP-1", 0, None).await;

    let (status, body) = app
        .post(
            "/api/leaves",
            &employee,
            json!({ "leave_type": "casual", "start_date": "2024-01-10", "end_date": "2024-01-12" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(data(&body)["days"], 3.0);
    assert_eq!(data(&body)["status"], "pending");

    let (_, body) = app
        .post(
            "/api/leaves",
            &employee,
            json!({ "leave_type": "half-day", "start_date": "2024-02-01", "end_date": "2024-02-01" }),
        )
        .await;
    assert_eq!(data(&body)["days"], 0.5);

    let (status, body) = app
        .post(
            "/api/leaves",
            &employee,
            json!({ "leave_type": "half-day", "start_date": "2024-02-01", "end_date": "2024-02-02" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error(&body, ErrorCode::LeaveHalfDaySpan);

    let (status, body) = app
        .post(
            "/api/leaves",
            &employee,
            json!({ "leave_type": "sick", "start_date": "2024-02-05", "end_date": "2024-02-01" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error(&body, ErrorCode::LeaveInvalidRange);
}

#[tokio::test]
async fn l2_approves_only_strictly_junior_requests() {
    let app = TestApp::new().await;
    let manager = app.actor("MGR", 2, None).await;
    let junior = app.actor("JR", 1, None).await;
    let peer = app.actor("PEER", 2, None).await;
    let senior = app.actor("SR", 3, None).await;

    let junior_leave = request_leave(&app, &junior).await;
    let peer_leave = request_leave(&app, &peer).await;
    let senior_leave = request_leave(&app, &senior).await;
    let own_leave = request_leave(&app, &manager).await;

    let (status, body) = app
        .post(
            &format!("/api/leaves/{junior_leave}/approve"),
            &manager,
            json!({ "remarks": "Enjoy" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(data(&body)["status"], "approved");
    assert_eq!(data(&body)["approver_id"], manager.id());

    for id in [peer_leave, senior_leave, own_leave] {
        let (status, body) = app
            .post(&format!("/api/leaves/{id}/approve"), &manager, json!({}))
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_error(&body, ErrorCode::PermissionDenied);
    }
}

#[tokio::test]
async fn apex_approves_peers_but_never_own_request() {
    let app = TestApp::new().await;
    let apex = app.actor("CEO", 4, None).await;
    let other_apex = app.actor("CTO", 4, None).await;

    let peer_leave = request_leave(&app, &other_apex).await;
    let own_leave = request_leave(&app, &apex).await;

    let (status, _) = app
        .post(&format!("/api/leaves/{peer_leave}/reject"), &apex, json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .post(&format!("/api/leaves/{own_leave}/approve"), &apex, json!({}))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn decided_leave_cannot_be_decided_again() {
    let app = TestApp::new().await;
    let manager = app.actor("MGR", 3, None).await;
    let employee = app.actor("EMP", 0, None).await;
    let id = request_leave(&app, &employee).await;

    let (status, _) = app
        .post(&format!("/api/leaves/{id}/approve"), &manager, json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .post(&format!("/api/leaves/{id}/reject"), &manager, json!({}))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_error(&body, ErrorCode::LeaveNotPending);
}

#[tokio::test]
async fn team_queue_lists_only_approvable_requests() {
    let app = TestApp::new().await;
    let manager = app.actor("MGR", 2, None).await;
    let junior = app.actor("JR", 0, None).await;
    let peer = app.actor("PEER", 2, None).await;
    request_leave(&app, &junior).await;
    request_leave(&app, &peer).await;
    request_leave(&app, &manager).await;

    let (status, body) = app.get("/api/leaves/team", &manager).await;
    assert_eq!(status, StatusCode::OK);
    let team: &Vec<Value> = data(&body).as_array().unwrap();
    assert_eq!(team.len(), 1);
    assert_eq!(team[0]["employee_id"], junior.id());
    assert_eq!(team[0]["can_approve"], true);

    let (_, body) = app.get("/api/leaves/team", &junior).await;
    assert!(data(&body).as_array().unwrap().is_empty());
}

#[tokio::test]
async fn only_requester_withdraws_pending_leave() {
    let app = TestApp::new().await;
    let employee = app.actor("EMP", 0, None).await;
    let colleague = app.actor("COL", 0, None).await;
    let manager = app.actor("MGR", 3, None).await;

    let id = request_leave(&app, &employee).await;
    let (status, body) = app.delete(&format!("/api/leaves/{id}"), &colleague).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_error(&body, ErrorCode::LeaveNotOwner);

    let (status, _) = app.delete(&format!("/api/leaves/{id}"), &employee).await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = app.get("/api/leaves", &employee).await;
    assert!(data(&body).as_array().unwrap().is_empty());

    let approved = request_leave(&app, &employee).await;
    app.post(&format!("/api/leaves/{approved}/approve"), &manager, json!({}))
        .await;
    let (status, body) = app
        .delete(&format!("/api/leaves/{approved}"), &employee)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_error(&body, ErrorCode::LeaveNotPending);
}
