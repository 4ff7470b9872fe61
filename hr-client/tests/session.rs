mod common;

use std::sync::atomic::Ordering;
use std::time::Duration;

use chrono::NaiveDate;
use common::{PASSWORD, Stub, TOKEN, poll_view};
use hr_client::{ClientError, Dashboard, ErrorCode};
use http::StatusCode;
use shared::models::{LeaveCreate, LeaveType, PollAudience, PollCreate, VoteSubmission};

#[tokio::test]
async fn login_stores_session_until_logout() {
    let stub = Stub::start(1).await;
    let ctx = stub.context();
    assert!(!ctx.is_authenticated());
    assert!(matches!(ctx.token(), Err(ClientError::NotLoggedIn)));

    let user = ctx.login("  dana@example.com ", PASSWORD).await.unwrap();
    assert_eq!(user.id, 7);
    assert_eq!(ctx.token().unwrap(), TOKEN);
    assert!(ctx.capabilities().approve_leave);
    assert!(!ctx.capabilities().create_polls);

    let scope = ctx.scope();
    assert_eq!(scope.me().await.unwrap(), user);

    ctx.logout().await;
    assert_eq!(stub.state.logouts.load(Ordering::SeqCst), 1);
    assert!(!ctx.is_authenticated());
    assert!(ctx.current_user().is_none());
    assert_eq!(ctx.capabilities(), Default::default());
    assert!(scope.is_cancelled());
}

#[tokio::test]
async fn failed_login_leaves_context_logged_out() {
    let stub = Stub::start(1).await;
    let ctx = stub.context();

    let err = ctx.login("dana@example.com", "wrong").await.unwrap_err();
    match &err {
        ClientError::Api { status, code, .. } => {
            assert_eq!(*status, StatusCode::UNAUTHORIZED);
            assert_eq!(*code, ErrorCode::InvalidCredentials);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.is_auth_failure());
    assert!(!err.is_retryable());
    assert!(!ctx.is_authenticated());
}

#[tokio::test]
async fn resume_checks_the_stored_token() {
    let stub = Stub::start(2).await;
    let ctx = stub.context();

    let err = ctx.resume("stale").await.unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::NotAuthenticated));
    assert!(!ctx.is_authenticated());

    let user = ctx.resume(TOKEN).await.unwrap();
    assert_eq!(ctx.current_user(), Some(user));
}

#[tokio::test]
async fn empty_credentials_never_reach_the_server() {
    let stub = Stub::start(1).await;
    let ctx = stub.context();

    let err = ctx.login("   ", PASSWORD).await.unwrap_err();
    assert!(err.is_validation());
    let err = ctx.login("dana@example.com", "").await.unwrap_err();
    assert!(err.is_validation());
    assert_eq!(stub.hits(), 0);
}

#[tokio::test]
async fn cancelling_a_scope_drops_the_pending_result() {
    let stub = Stub::start(1).await;
    stub.state.slow_polls.store(true, Ordering::SeqCst);
    let ctx = stub.context();
    ctx.login("dana@example.com", PASSWORD).await.unwrap();

    let scope = ctx.scope();
    let (result, _) = tokio::join!(scope.polls(), async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        scope.cancel();
    });
    assert!(matches!(result, Err(ClientError::Cancelled)));

    // Later calls on the same scope stop immediately
    let before = stub.hits();
    assert!(matches!(scope.me().await, Err(ClientError::Cancelled)));
    assert_eq!(stub.hits(), before);

    // Other views are unaffected
    let other = ctx.scope();
    assert!(other.me().await.is_ok());
}

#[tokio::test]
async fn logout_cancels_in_flight_requests() {
    let stub = Stub::start(1).await;
    stub.state.slow_polls.store(true, Ordering::SeqCst);
    let ctx = stub.context();
    ctx.login("dana@example.com", PASSWORD).await.unwrap();

    let scope = ctx.scope();
    let (result, _) = tokio::join!(scope.polls(), async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        ctx.logout().await;
    });
    assert!(matches!(result, Err(ClientError::Cancelled)));

    // A fresh login gets a fresh root
    ctx.login("dana@example.com", PASSWORD).await.unwrap();
    assert!(!ctx.scope().is_cancelled());
}

#[tokio::test]
async fn invalid_input_is_rejected_before_sending() {
    let stub = Stub::start(1).await;
    let ctx = stub.context();
    ctx.login("dana@example.com", PASSWORD).await.unwrap();
    let scope = ctx.scope();
    let before = stub.hits();

    let view = poll_view(false);
    let err = scope
        .vote(&view, &VoteSubmission::default())
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::PollEmptyVote));

    let custom = VoteSubmission {
        option_id: None,
        custom_text: Some("Tacos".into()),
    };
    let err = scope.vote(&view, &custom).await.unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::PollCustomNotAllowed));

    let unknown = VoteSubmission {
        option_id: Some("opt-9".into()),
        custom_text: None,
    };
    let err = scope.vote(&view, &unknown).await.unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::PollOptionNotFound));

    let day = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
    let err = scope
        .request_leave(&LeaveCreate {
            leave_type: LeaveType::HalfDay,
            start_date: day,
            end_date: day.succ_opt().unwrap(),
            reason: None,
        })
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::LeaveHalfDaySpan));

    // L1 has no poll creation capability
    let poll = PollCreate {
        title: "Lunch".into(),
        description: None,
        options: vec!["A".into(), "B".into()],
        allow_custom_option: false,
        audience: PollAudience::All,
        start_date: None,
        end_date: None,
        is_active: true,
    };
    let err = scope.create_poll(&poll).await.unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::PermissionDenied));
    assert!(err.is_validation());
    assert_eq!(stub.hits(), before);
}

#[tokio::test]
async fn poll_options_are_checked_before_sending() {
    let stub = Stub::start(2).await;
    let ctx = stub.context();
    ctx.login("dana@example.com", PASSWORD).await.unwrap();
    let scope = ctx.scope();
    let before = stub.hits();

    let poll = PollCreate {
        title: "Lunch".into(),
        description: None,
        options: vec!["Pizza".into(), " pizza ".into()],
        allow_custom_option: false,
        audience: PollAudience::All,
        start_date: None,
        end_date: None,
        is_active: true,
    };
    let err = scope.create_poll(&poll).await.unwrap_err();
    assert!(err.is_validation());
    assert_eq!(err.code(), Some(ErrorCode::PollInvalidOptions));
    assert_eq!(stub.hits(), before);
}

#[tokio::test]
async fn dashboard_loads_concurrently_and_fails_as_a_whole() {
    let stub = Stub::start(0).await;
    let ctx = stub.context();
    ctx.login("dana@example.com", PASSWORD).await.unwrap();

    let scope = ctx.scope();
    let dashboard = Dashboard::load(&scope).await.unwrap();
    assert_eq!(dashboard.user.id, 7);
    assert_eq!(dashboard.polls.len(), 1);
    assert_eq!(dashboard.open_polls().count(), 1);
    assert!(dashboard.team_leaves.is_empty());
    // L0 cannot approve, so the team queue is not requested
    assert_eq!(stub.state.team_hits.load(Ordering::SeqCst), 0);

    stub.state.failing_polls.store(true, Ordering::SeqCst);
    let err = Dashboard::load(&scope).await.unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::DatabaseError));
}

#[tokio::test]
async fn approvers_also_load_the_team_queue() {
    let stub = Stub::start(1).await;
    let ctx = stub.context();
    ctx.login("dana@example.com", PASSWORD).await.unwrap();

    Dashboard::load(&ctx.scope()).await.unwrap();
    assert_eq!(stub.state.team_hits.load(Ordering::SeqCst), 1);
}
