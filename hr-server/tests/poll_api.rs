mod common;

use common::{Actor, TestApp, assert_error, data};
use http::StatusCode;
use hr_server::ErrorCode;
use serde_json::{Value, json};
use shared::models::RevotePolicy;

async fn create_poll(app: &TestApp, creator: &Actor, extra: Value) -> i64 {
    let mut body = json!({
        "title": "Team offsite",
        "options": ["Beach", "Mountains"],
    });
    if let (Some(target), Some(extra)) = (body.as_object_mut(), extra.as_object()) {
        target.extend(extra.clone());
    }
    let (status, body) = app.post("/api/polls", creator, body).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    data(&body)["id"].as_i64().unwrap()
}

async fn vote(app: &TestApp, voter: &Actor, poll_id: i64, body: Value) -> (StatusCode, Value) {
    app.post(&format!("/api/polls/{poll_id}/vote"), voter, body)
        .await
}

#[tokio::test]
async fn tally_reports_counts_and_rounded_percentages() {
    let app = TestApp::new().await;
    let creator = app.actor("HR", 2, None).await;
    let poll_id = create_poll(&app, &creator, json!({})).await;

    for (i, option) in ["opt-1", "opt-1", "opt-1", "opt-2"].iter().enumerate() {
        let voter = app.actor(&format!("V{i}"), 0, None).await;
        let (status, body) = vote(&app, &voter, poll_id, json!({ "option_id": option })).await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(data(&body)["viewer_vote"]["kind"], "option");
        assert_eq!(data(&body)["can_see_results"], false);
        assert_eq!(data(&body)["results"], Value::Null);
    }

    let (_, body) = app.get(&format!("/api/polls/{poll_id}"), &creator).await;
    let results = &data(&body)["results"];
    assert_eq!(results["total_votes"], 4);
    assert_eq!(results["options"][0]["count"], 3);
    assert_eq!(results["options"][0]["percentage"], 75);
    assert_eq!(results["options"][1]["percentage"], 25);
}

#[tokio::test]
async fn second_vote_is_rejected_by_default() {
    let app = TestApp::new().await;
    let creator = app.actor("HR", 2, None).await;
    let voter = app.actor("EMP", 0, None).await;
    let poll_id = create_poll(&app, &creator, json!({})).await;

    let (status, body) = vote(&app, &voter, poll_id, json!({ "option_id": "opt-1" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(data(&body)["can_vote"], false);

    let (status, body) = vote(&app, &voter, poll_id, json!({ "option_id": "opt-2" })).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_error(&body, ErrorCode::PollAlreadyVoted);
}

#[tokio::test]
async fn replace_policy_swaps_the_ballot() {
    let app = TestApp::with_policy(RevotePolicy::Replace).await;
    let creator = app.actor("CEO", 4, None).await;
    let voter = app.actor("EMP", 0, None).await;
    let poll_id = create_poll(&app, &creator, json!({})).await;

    vote(&app, &voter, poll_id, json!({ "option_id": "opt-1" })).await;
    let (status, body) = vote(&app, &voter, poll_id, json!({ "option_id": "opt-2" })).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(data(&body)["viewer_vote"]["value"], "opt-2");
    assert_eq!(data(&body)["can_vote"], true);

    let (_, body) = app.get(&format!("/api/polls/{poll_id}"), &creator).await;
    let results = &data(&body)["results"];
    assert_eq!(results["total_votes"], 1);
    assert_eq!(results["options"][1]["count"], 1);
}

#[tokio::test]
async fn custom_responses_group_by_text() {
    let app = TestApp::new().await;
    let apex = app.actor("CEO", 4, None).await;
    let poll_id = create_poll(&app, &apex, json!({ "allow_custom_option": true })).await;

    let first = app.actor("A", 0, None).await;
    let second = app.actor("B", 0, None).await;
    vote(&app, &first, poll_id, json!({ "custom_text": "  Lake  " })).await;
    vote(&app, &second, poll_id, json!({ "custom_text": "Lake" })).await;

    let (_, body) = app.get(&format!("/api/polls/{poll_id}"), &apex).await;
    let results = &data(&body)["results"];
    assert_eq!(results["total_votes"], 2);
    assert_eq!(results["custom_responses"][0]["text"], "Lake");
    assert_eq!(results["custom_responses"][0]["count"], 2);
    assert_eq!(
        results["custom_responses"][0]["voters"],
        json!(["Employee A", "Employee B"])
    );
}

#[tokio::test]
async fn invalid_ballots_are_rejected() {
    let app = TestApp::new().await;
    let creator = app.actor("HR", 2, None).await;
    let voter = app.actor("EMP", 0, None).await;
    let poll_id = create_poll(&app, &creator, json!({})).await;

    let (status, body) = vote(&app, &voter, poll_id, json!({ "custom_text": "   " })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error(&body, ErrorCode::PollEmptyVote);

    let (_, body) = vote(&app, &voter, poll_id, json!({ "custom_text": "Lake" })).await;
    assert_error(&body, ErrorCode::PollCustomNotAllowed);

    let (status, body) = vote(&app, &voter, poll_id, json!({ "option_id": "opt-9" })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_error(&body, ErrorCode::PollOptionNotFound);
}

#[tokio::test]
async fn audience_limits_visibility_and_voting() {
    let app = TestApp::new().await;
    let eng = app.department("Engineering", None).await;
    let sales = app.department("Sales", None).await;
    let creator = app.actor("HR", 2, None).await;
    let engineer = app.actor("ENG", 0, Some(&eng)).await;
    let seller = app.actor("SAL", 0, Some(&sales)).await;

    let poll_id = create_poll(
        &app,
        &creator,
        json!({ "audience": { "type": "department", "department_ids": [eng.id] } }),
    )
    .await;

    let (_, body) = app.get("/api/polls", &seller).await;
    assert!(data(&body).as_array().unwrap().is_empty());
    let (status, body) = app.get(&format!("/api/polls/{poll_id}"), &seller).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_error(&body, ErrorCode::PollNotFound);

    let (status, body) = vote(&app, &seller, poll_id, json!({ "option_id": "opt-1" })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_error(&body, ErrorCode::PollNotInAudience);

    let (_, body) = app.get("/api/polls", &engineer).await;
    assert_eq!(data(&body).as_array().unwrap().len(), 1);
    assert_eq!(data(&body)[0]["can_vote"], true);
}

#[tokio::test]
async fn closed_or_out_of_window_polls_refuse_votes() {
    let app = TestApp::new().await;
    let creator = app.actor("HR", 2, None).await;
    let voter = app.actor("EMP", 0, None).await;

    let closed = create_poll(&app, &creator, json!({ "is_active": false })).await;
    let (status, body) = vote(&app, &voter, closed, json!({ "option_id": "opt-1" })).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_error(&body, ErrorCode::PollNotActive);

    let ended = create_poll(
        &app,
        &creator,
        json!({ "start_date": 1_000, "end_date": 2_000 }),
    )
    .await;
    let (_, body) = app.get(&format!("/api/polls/{ended}"), &voter).await;
    assert_eq!(data(&body)["phase"], "ended");
    let (_, body) = vote(&app, &voter, ended, json!({ "option_id": "opt-1" })).await;
    assert_error(&body, ErrorCode::PollNotActive);

    let far_future = 32_503_680_000_000_i64;
    let scheduled = create_poll(&app, &creator, json!({ "start_date": far_future })).await;
    let (_, body) = app.get(&format!("/api/polls/{scheduled}"), &voter).await;
    assert_eq!(data(&body)["phase"], "scheduled");
    assert_eq!(data(&body)["can_vote"], false);
}

#[tokio::test]
async fn options_freeze_after_first_vote() {
    let app = TestApp::new().await;
    let creator = app.actor("HR", 2, None).await;
    let voter = app.actor("EMP", 0, None).await;
    let other = app.actor("OTH", 2, None).await;
    let poll_id = create_poll(&app, &creator, json!({})).await;
    let path = format!("/api/polls/{poll_id}");

    let new_options = json!({ "options": [
        { "id": "opt-1", "label": "Beach" },
        { "id": "opt-2", "label": "Mountains" },
        { "id": "opt-3", "label": "City" }
    ]});
    let (status, body) = app.put(&path, &creator, new_options.clone()).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(data(&body)["options"].as_array().unwrap().len(), 3);

    vote(&app, &voter, poll_id, json!({ "option_id": "opt-3" })).await;

    let (status, body) = app.put(&path, &creator, new_options).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_error(&body, ErrorCode::PollFrozen);

    let (status, body) = app
        .put(&path, &creator, json!({ "title": "Team offsite 2025" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(data(&body)["title"], "Team offsite 2025");

    let (status, _) = app.put(&path, &other, json!({ "title": "Hijack" })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn create_validates_options_and_permission() {
    let app = TestApp::new().await;
    let creator = app.actor("HR", 2, None).await;
    let employee = app.actor("EMP", 1, None).await;

    let (status, _) = app
        .post("/api/polls", &employee, json!({ "title": "Lunch", "options": ["A", "B"] }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .post("/api/polls", &creator, json!({ "title": "Lunch", "options": ["A", " a "] }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error(&body, ErrorCode::PollInvalidOptions);
}

#[tokio::test]
async fn clearing_the_end_date_reopens_an_ended_poll() {
    let app = TestApp::new().await;
    let creator = app.actor("HR", 2, None).await;
    let poll_id = create_poll(
        &app,
        &creator,
        json!({ "start_date": 1_000, "end_date": 2_000 }),
    )
    .await;
    let path = format!("/api/polls/{poll_id}");

    let (status, body) = app.put(&path, &creator, json!({ "clear_end_date": true })).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(data(&body)["end_date"], Value::Null);
    assert_eq!(data(&body)["start_date"], 1_000);
    assert_eq!(data(&body)["phase"], "active");

    // The clear flag wins over a date sent alongside it
    let (_, body) = app
        .put(&path, &creator, json!({ "clear_start_date": true, "start_date": 5_000 }))
        .await;
    assert_eq!(data(&body)["start_date"], Value::Null);
}

#[tokio::test]
async fn guarded_save_refuses_once_a_ballot_exists() {
    use hr_server::db::repository::poll;
    use shared::models::Ballot;

    let app = TestApp::new().await;
    let creator = app.actor("HR", 2, None).await;
    let voter = app.actor("EMP", 0, None).await;
    let poll_id = create_poll(&app, &creator, json!({})).await;

    // Snapshot taken while the poll had no votes
    let mut stale = poll::find_by_id(&app.state.pool, poll_id)
        .await
        .unwrap()
        .unwrap();
    poll::cast_vote(
        &app.state.pool,
        poll_id,
        voter.id(),
        &Ballot::Option("opt-1".into()),
        RevotePolicy::Reject,
    )
    .await
    .unwrap();

    stale.options.truncate(1);
    let saved = poll::save(&app.state.pool, &stale, true).await.unwrap();
    assert!(saved.is_none());
    let stored = poll::find_by_id(&app.state.pool, poll_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.options.len(), 2);

    stale.options = stored.options.clone();
    stale.title = "Renamed".into();
    let saved = poll::save(&app.state.pool, &stale, false).await.unwrap().unwrap();
    assert_eq!(saved.title, "Renamed");
}
