//! Poll Model

use serde::{Deserialize, Serialize};

/// A predefined poll choice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollOption {
    pub id: String,
    pub label: String,
}

/// Who may vote on a poll
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PollAudience {
    #[default]
    All,
    Department { department_ids: Vec<i64> },
    Custom { user_ids: Vec<i64> },
}

/// Poll entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Poll {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    #[cfg_attr(feature = "db", sqlx(json))]
    pub options: Vec<PollOption>,
    pub allow_custom_option: bool,
    #[cfg_attr(feature = "db", sqlx(json))]
    pub audience: PollAudience,
    /// Voting opens at this instant (millis), if set
    pub start_date: Option<i64>,
    /// Voting closes after this instant (millis), if set
    pub end_date: Option<i64>,
    pub is_active: bool,
    pub created_by: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Poll lifecycle phase, the single source for both label and votability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PollPhase {
    Scheduled,
    Active,
    Ended,
    Closed,
}

/// A validated vote
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Ballot {
    Option(String),
    Custom(String),
}

/// A stored vote with the voter's display name
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct BallotRecord {
    pub user_id: i64,
    pub user_name: String,
    pub option_id: Option<String>,
    pub custom_text: Option<String>,
}

/// Raw vote submission
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VoteSubmission {
    pub option_id: Option<String>,
    pub custom_text: Option<String>,
}

/// What happens when a user who already voted votes again
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RevotePolicy {
    /// Second vote is refused with `PollAlreadyVoted`
    #[default]
    Reject,
    /// Second vote replaces the first in one transaction
    Replace,
}

/// Create poll payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollCreate {
    pub title: String,
    pub description: Option<String>,
    /// Option labels; ids are assigned by the server
    pub options: Vec<String>,
    #[serde(default)]
    pub allow_custom_option: bool,
    #[serde(default)]
    pub audience: PollAudience,
    pub start_date: Option<i64>,
    pub end_date: Option<i64>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// Update poll payload
///
/// `options` and `audience` are frozen once the poll has votes.
/// `clear_start_date` / `clear_end_date` remove a bound and win over the
/// matching date field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PollUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub options: Option<Vec<PollOption>>,
    pub allow_custom_option: Option<bool>,
    pub audience: Option<PollAudience>,
    pub start_date: Option<i64>,
    pub end_date: Option<i64>,
    #[serde(default)]
    pub clear_start_date: bool,
    #[serde(default)]
    pub clear_end_date: bool,
    pub is_active: Option<bool>,
}

/// Per-option tally
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionResult {
    pub id: String,
    pub label: String,
    pub count: u64,
    pub percentage: u32,
}

/// Custom responses grouped by exact text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomResponseGroup {
    pub text: String,
    pub count: u64,
    /// Voter names, only for the apex viewer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voters: Option<Vec<String>>,
}

/// Aggregated poll results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollResults {
    pub total_votes: u64,
    pub options: Vec<OptionResult>,
    pub custom_responses: Vec<CustomResponseGroup>,
}

/// Poll as seen by one viewer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollView {
    #[serde(flatten)]
    pub poll: Poll,
    pub phase: PollPhase,
    pub can_vote: bool,
    pub viewer_vote: Option<Ballot>,
    pub can_see_results: bool,
    /// Present only when `can_see_results`
    pub results: Option<PollResults>,
}
