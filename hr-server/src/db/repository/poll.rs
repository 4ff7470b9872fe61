//! Poll Repository

use super::{RepoError, RepoResult};
use shared::models::{Ballot, BallotRecord, Poll, PollCreate, PollOption, RevotePolicy};
use shared::util::{now_millis, snowflake_id};
use sqlx::SqlitePool;
use sqlx::types::Json;

const COLUMNS: &str = "id, title, description, options, allow_custom_option, audience, \
     start_date, end_date, is_active, created_by, created_at, updated_at";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Poll>> {
    let sql = format!("SELECT {COLUMNS} FROM poll ORDER BY created_at DESC");
    let polls = sqlx::query_as::<_, Poll>(&sql).fetch_all(pool).await?;
    Ok(polls)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Poll>> {
    let sql = format!("SELECT {COLUMNS} FROM poll WHERE id = ?");
    let poll = sqlx::query_as::<_, Poll>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(poll)
}

pub async fn insert(
    pool: &SqlitePool,
    data: &PollCreate,
    options: &[PollOption],
    created_by: i64,
) -> RepoResult<Poll> {
    let id = snowflake_id();
    let now = now_millis();
    sqlx::query(
        "INSERT INTO poll (id, title, description, options, allow_custom_option, audience, \
         start_date, end_date, is_active, created_by, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(data.title.trim())
    .bind(&data.description)
    .bind(Json(options))
    .bind(data.allow_custom_option)
    .bind(Json(&data.audience))
    .bind(data.start_date)
    .bind(data.end_date)
    .bind(data.is_active)
    .bind(created_by)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create poll".into()))
}

/// Write a fully merged poll
///
/// With `require_no_votes` the write only lands while the poll has no
/// ballots; the check runs inside the UPDATE so a vote cast after the caller
/// counted cannot slip through. `None` means the row is gone or the guard
/// failed.
pub async fn save(pool: &SqlitePool, poll: &Poll, require_no_votes: bool) -> RepoResult<Option<Poll>> {
    let rows = sqlx::query(
        "UPDATE poll SET title = ?1, description = ?2, options = ?3, allow_custom_option = ?4, \
         audience = ?5, start_date = ?6, end_date = ?7, is_active = ?8, updated_at = ?9 \
         WHERE id = ?10 AND (?11 = 0 OR NOT EXISTS (SELECT 1 FROM poll_vote WHERE poll_id = ?10))",
    )
    .bind(&poll.title)
    .bind(&poll.description)
    .bind(Json(&poll.options))
    .bind(poll.allow_custom_option)
    .bind(Json(&poll.audience))
    .bind(poll.start_date)
    .bind(poll.end_date)
    .bind(poll.is_active)
    .bind(now_millis())
    .bind(poll.id)
    .bind(require_no_votes)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Ok(None);
    }
    find_by_id(pool, poll.id).await
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let result = sqlx::query("DELETE FROM poll WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// All ballots of a poll with voter names, oldest first
pub async fn ballots(pool: &SqlitePool, poll_id: i64) -> RepoResult<Vec<BallotRecord>> {
    let ballots = sqlx::query_as::<_, BallotRecord>(
        "SELECT v.user_id, e.name AS user_name, v.option_id, v.custom_text \
         FROM poll_vote v JOIN employee e ON e.id = v.user_id \
         WHERE v.poll_id = ? ORDER BY v.created_at, v.rowid",
    )
    .bind(poll_id)
    .fetch_all(pool)
    .await?;
    Ok(ballots)
}

pub async fn count_votes(pool: &SqlitePool, poll_id: i64) -> RepoResult<u64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM poll_vote WHERE poll_id = ?")
        .bind(poll_id)
        .fetch_one(pool)
        .await?;
    Ok(count.max(0) as u64)
}

fn ballot_columns(ballot: &Ballot) -> (Option<&str>, Option<&str>) {
    match ballot {
        Ballot::Option(id) => (Some(id.as_str()), None),
        Ballot::Custom(text) => (None, Some(text.as_str())),
    }
}

/// Store a ballot according to the revote policy
///
/// `Reject` surfaces an existing ballot as [`RepoError::Duplicate`];
/// `Replace` swaps the previous ballot inside one transaction.
pub async fn cast_vote(
    pool: &SqlitePool,
    poll_id: i64,
    user_id: i64,
    ballot: &Ballot,
    policy: RevotePolicy,
) -> RepoResult<()> {
    let (option_id, custom_text) = ballot_columns(ballot);
    let insert = "INSERT INTO poll_vote (poll_id, user_id, option_id, custom_text, created_at) \
                  VALUES (?, ?, ?, ?, ?)";

    match policy {
        RevotePolicy::Reject => {
            sqlx::query(insert)
                .bind(poll_id)
                .bind(user_id)
                .bind(option_id)
                .bind(custom_text)
                .bind(now_millis())
                .execute(pool)
                .await?;
        }
        RevotePolicy::Replace => {
            let mut tx = pool.begin().await?;
            sqlx::query("DELETE FROM poll_vote WHERE poll_id = ? AND user_id = ?")
                .bind(poll_id)
                .bind(user_id)
                .execute(&mut *tx)
                .await?;
            sqlx::query(insert)
                .bind(poll_id)
                .bind(user_id)
                .bind(option_id)
                .bind(custom_text)
                .bind(now_millis())
                .execute(&mut *tx)
                .await?;
            tx.commit().await?;
        }
    }
    Ok(())
}
