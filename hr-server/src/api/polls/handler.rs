//! Poll API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use shared::models::{
    Ballot, Poll, PollCreate, PollPhase, PollUpdate, PollView, RevotePolicy, VoteSubmission,
};
use shared::permission;
use shared::poll::{can_see_results, tally};
use shared::util::now_millis;

use crate::api::denied;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{RepoError, poll};
use crate::utils::validation::{MAX_NAME_LEN, MAX_NOTE_LEN, validate_optional_text, validate_required_text};
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode, ok};

fn poll_not_found(id: i64) -> AppError {
    AppError::new(ErrorCode::PollNotFound).with_detail("poll_id", id)
}

fn in_audience(poll: &Poll, user: &CurrentUser) -> bool {
    poll.audience.includes(user.id, user.department_id)
}

/// Audience members, the creator and the apex level see a poll
fn is_visible(poll: &Poll, user: &CurrentUser) -> bool {
    in_audience(poll, user) || poll.created_by == user.id || user.is_apex()
}

fn can_administer(poll: &Poll, user: &CurrentUser) -> bool {
    poll.created_by == user.id || user.is_apex()
}

async fn load(state: &ServerState, id: i64) -> AppResult<Poll> {
    poll::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| poll_not_found(id))
}

/// Build the per-viewer projection of a poll
async fn view_of(state: &ServerState, poll: Poll, user: &CurrentUser) -> AppResult<PollView> {
    let ballots = poll::ballots(&state.pool, poll.id).await?;
    let viewer_vote: Option<Ballot> = ballots
        .iter()
        .find(|b| b.user_id == user.id)
        .and_then(|b| b.ballot());

    let phase = PollPhase::of(&poll, now_millis());
    let may_vote_again = viewer_vote.is_none() || state.revote_policy() == RevotePolicy::Replace;
    let can_vote = phase == PollPhase::Active && in_audience(&poll, user) && may_vote_again;

    let show_results = can_see_results(&poll, user.id, user.management_level);
    let results = show_results.then(|| tally(&poll, &ballots, user.management_level));

    Ok(PollView {
        poll,
        phase,
        can_vote,
        viewer_vote,
        can_see_results: show_results,
        results,
    })
}

/// GET /api/polls - 查看者可见的投票
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<ApiResponse<Vec<PollView>>> {
    let polls = poll::find_all(&state.pool).await?;
    let mut views = Vec::new();
    for p in polls.into_iter().filter(|p| is_visible(p, &user)) {
        views.push(view_of(&state, p, &user).await?);
    }
    Ok(ok(views))
}

/// GET /api/polls/{id}
///
/// Polls outside the viewer's audience look like missing ones.
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<PollView>> {
    let poll = load(&state, id).await?;
    if !is_visible(&poll, &user) {
        return Err(poll_not_found(id));
    }
    Ok(ok(view_of(&state, poll, &user).await?))
}

/// POST /api/polls
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<PollCreate>,
) -> AppResult<ApiResponse<PollView>> {
    if !permission::can_manage_employees(user.management_level) {
        return Err(denied(&user, "create polls"));
    }
    payload.validate()?;
    validate_required_text(&payload.title, "title", MAX_NAME_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    for label in &payload.options {
        validate_required_text(label, "option", MAX_NAME_LEN)?;
    }

    let options = payload.into_options();
    let created = poll::insert(&state.pool, &payload, &options, user.id).await?;
    tracing::info!(
        poll_id = created.id,
        created_by = user.id,
        options = options.len(),
        "Poll created"
    );
    Ok(ok(view_of(&state, created, &user).await?))
}

/// PUT /api/polls/{id}
///
/// Options and audience are frozen once the poll has votes.
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<PollUpdate>,
) -> AppResult<ApiResponse<PollView>> {
    let mut current = load(&state, id).await?;
    if !can_administer(&current, &user) {
        return Err(denied(&user, "edit this poll"));
    }

    let total_votes = poll::count_votes(&state.pool, id).await?;
    payload.ensure_editable(total_votes)?;

    let frozen_fields = payload.options.is_some() || payload.audience.is_some();
    if let Some(title) = payload.title {
        validate_required_text(&title, "title", MAX_NAME_LEN)?;
        current.title = title.trim().to_string();
    }
    if payload.description.is_some() {
        validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
        current.description = payload.description;
    }
    if let Some(options) = payload.options {
        current.options = options;
    }
    if let Some(allow) = payload.allow_custom_option {
        current.allow_custom_option = allow;
    }
    if let Some(audience) = payload.audience {
        current.audience = audience;
    }
    if payload.clear_start_date {
        current.start_date = None;
    } else if payload.start_date.is_some() {
        current.start_date = payload.start_date;
    }
    if payload.clear_end_date {
        current.end_date = None;
    } else if payload.end_date.is_some() {
        current.end_date = payload.end_date;
    }
    if let Some(active) = payload.is_active {
        current.is_active = active;
    }
    if let (Some(start), Some(end)) = (current.start_date, current.end_date)
        && end < start
    {
        return Err(AppError::validation("Poll end date is before its start date"));
    }

    let Some(saved) = poll::save(&state.pool, &current, frozen_fields).await? else {
        // Row gone, or a ballot landed after the count above
        load(&state, id).await?;
        return Err(AppError::new(ErrorCode::PollFrozen).with_detail("poll_id", id));
    };
    tracing::info!(poll_id = id, updated_by = user.id, total_votes, "Poll updated");
    Ok(ok(view_of(&state, saved, &user).await?))
}

/// DELETE /api/polls/{id}
pub async fn delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<bool>> {
    let current = load(&state, id).await?;
    if !can_administer(&current, &user) {
        return Err(denied(&user, "delete this poll"));
    }
    let deleted = poll::delete(&state.pool, id).await?;
    tracing::info!(poll_id = id, deleted_by = user.id, "Poll deleted");
    Ok(ok(deleted))
}

/// POST /api/polls/{id}/vote
pub async fn vote(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(submission): Json<VoteSubmission>,
) -> AppResult<ApiResponse<PollView>> {
    let current = load(&state, id).await?;
    if !in_audience(&current, &user) {
        return Err(AppError::new(ErrorCode::PollNotInAudience).with_detail("poll_id", id));
    }

    let phase = PollPhase::of(&current, now_millis());
    if phase != PollPhase::Active {
        return Err(AppError::new(ErrorCode::PollNotActive)
            .with_detail("poll_id", id)
            .with_detail("phase", format!("{phase:?}").to_lowercase()));
    }

    let ballot = submission.validate(&current)?;
    if let Ballot::Custom(text) = &ballot {
        validate_required_text(text, "custom_text", MAX_NOTE_LEN)?;
    }

    let policy = state.revote_policy();
    match poll::cast_vote(&state.pool, id, user.id, &ballot, policy).await {
        Ok(()) => {}
        Err(RepoError::Duplicate(_)) => {
            return Err(AppError::new(ErrorCode::PollAlreadyVoted).with_detail("poll_id", id));
        }
        Err(e) => return Err(e.into()),
    }

    tracing::info!(poll_id = id, voter_id = user.id, policy = ?policy, "Vote recorded");
    Ok(ok(view_of(&state, current, &user).await?))
}
