//! Poll audience, phase and tally
//!
//! [`PollPhase::of`] is the only place that decides whether a poll is open;
//! both the status label and votability derive from it.

use std::collections::HashSet;

use crate::error::{AppError, AppResult, ErrorCode};
use crate::models::{
    Ballot, BallotRecord, CustomResponseGroup, ManagementLevel, OptionResult, Poll, PollAudience,
    PollCreate, PollOption, PollPhase, PollResults, PollUpdate, VoteSubmission,
};

impl PollAudience {
    /// Whether an employee belongs to the audience
    pub fn includes(&self, employee_id: i64, department_id: Option<i64>) -> bool {
        match self {
            PollAudience::All => true,
            PollAudience::Department { department_ids } => {
                department_id.is_some_and(|d| department_ids.contains(&d))
            }
            PollAudience::Custom { user_ids } => user_ids.contains(&employee_id),
        }
    }
}

impl PollPhase {
    pub fn of(poll: &Poll, now: i64) -> Self {
        if !poll.is_active {
            return PollPhase::Closed;
        }
        if poll.start_date.is_some_and(|start| now < start) {
            return PollPhase::Scheduled;
        }
        if poll.end_date.is_some_and(|end| now > end) {
            return PollPhase::Ended;
        }
        PollPhase::Active
    }
}

pub fn can_vote_now(poll: &Poll, now: i64) -> bool {
    PollPhase::of(poll, now) == PollPhase::Active
}

/// Creator and the apex level see counts
pub fn can_see_results(poll: &Poll, viewer_id: i64, viewer_level: ManagementLevel) -> bool {
    poll.created_by == viewer_id || viewer_level.is_apex()
}

impl VoteSubmission {
    /// Check a submission against the poll's options
    pub fn validate(&self, poll: &Poll) -> AppResult<Ballot> {
        let option = self.option_id.as_deref().filter(|id| !id.is_empty());
        let custom = self
            .custom_text
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty());

        match (option, custom) {
            (None, None) => Err(AppError::new(ErrorCode::PollEmptyVote)),
            (Some(_), Some(_)) => Err(AppError::validation(
                "Choose either an option or a custom response, not both",
            )),
            (None, Some(text)) => {
                if !poll.allow_custom_option {
                    return Err(AppError::new(ErrorCode::PollCustomNotAllowed)
                        .with_detail("poll_id", poll.id));
                }
                Ok(Ballot::Custom(text.to_string()))
            }
            (Some(id), None) => {
                if !poll.options.iter().any(|o| o.id == id) {
                    return Err(AppError::new(ErrorCode::PollOptionNotFound)
                        .with_detail("option_id", id));
                }
                Ok(Ballot::Option(id.to_string()))
            }
        }
    }
}

impl BallotRecord {
    pub fn ballot(&self) -> Option<Ballot> {
        match (&self.option_id, &self.custom_text) {
            (Some(id), _) => Some(Ballot::Option(id.clone())),
            (None, Some(text)) => Some(Ballot::Custom(text.clone())),
            (None, None) => None,
        }
    }
}

fn percentage(count: u64, total: u64) -> u32 {
    if total == 0 {
        return 0;
    }
    (count as f64 / total as f64 * 100.0).round() as u32
}

/// Aggregate ballots into per-option counts and grouped custom responses
///
/// Voter names on custom responses are disclosed to the apex level only.
/// Ballots that match no option are left out of `total_votes`, so the counts
/// always sum to the total.
pub fn tally(poll: &Poll, ballots: &[BallotRecord], viewer_level: ManagementLevel) -> PollResults {
    let mut counts = vec![0u64; poll.options.len()];
    let mut custom: Vec<(String, u64, Vec<String>)> = Vec::new();

    for record in ballots {
        match record.ballot() {
            Some(Ballot::Option(id)) => {
                if let Some(i) = poll.options.iter().position(|o| o.id == id) {
                    counts[i] += 1;
                }
            }
            Some(Ballot::Custom(text)) => {
                match custom.iter_mut().find(|(t, _, _)| *t == text) {
                    Some(group) => {
                        group.1 += 1;
                        group.2.push(record.user_name.clone());
                    }
                    None => custom.push((text, 1, vec![record.user_name.clone()])),
                }
            }
            None => {}
        }
    }

    let total_votes = counts.iter().sum::<u64>() + custom.iter().map(|g| g.1).sum::<u64>();

    let options = poll
        .options
        .iter()
        .zip(counts)
        .map(|(option, count)| OptionResult {
            id: option.id.clone(),
            label: option.label.clone(),
            count,
            percentage: percentage(count, total_votes),
        })
        .collect();

    let show_voters = viewer_level.is_apex();
    let custom_responses = custom
        .into_iter()
        .map(|(text, count, voters)| CustomResponseGroup {
            text,
            count,
            voters: show_voters.then_some(voters),
        })
        .collect();

    PollResults {
        total_votes,
        options,
        custom_responses,
    }
}

impl PollCreate {
    pub fn validate(&self) -> AppResult<()> {
        if self.title.trim().is_empty() {
            return Err(AppError::with_message(
                ErrorCode::RequiredField,
                "Poll title is required",
            )
            .with_detail("field", "title"));
        }

        let mut seen = HashSet::new();
        for label in &self.options {
            let label = label.trim();
            if label.is_empty() || !seen.insert(label.to_lowercase()) {
                return Err(AppError::with_message(
                    ErrorCode::PollInvalidOptions,
                    "Poll options must be non-empty and distinct",
                )
                .with_detail("option", label));
            }
        }
        if seen.len() < 2 {
            return Err(AppError::with_message(
                ErrorCode::PollInvalidOptions,
                "A poll needs at least two options",
            ));
        }

        if let (Some(start), Some(end)) = (self.start_date, self.end_date)
            && end < start
        {
            return Err(AppError::validation("Poll end date is before its start date"));
        }
        Ok(())
    }

    /// Options with ids assigned in order
    pub fn into_options(&self) -> Vec<PollOption> {
        self.options
            .iter()
            .enumerate()
            .map(|(i, label)| PollOption {
                id: format!("opt-{}", i + 1),
                label: label.trim().to_string(),
            })
            .collect()
    }
}

impl PollUpdate {
    /// Options and audience are frozen once anyone has voted
    pub fn ensure_editable(&self, total_votes: u64) -> AppResult<()> {
        if total_votes > 0 && (self.options.is_some() || self.audience.is_some()) {
            return Err(AppError::new(ErrorCode::PollFrozen).with_detail("total_votes", total_votes));
        }
        if let Some(options) = &self.options {
            let distinct: HashSet<&str> = options.iter().map(|o| o.id.as_str()).collect();
            if options.len() < 2
                || distinct.len() != options.len()
                || options.iter().any(|o| o.label.trim().is_empty())
            {
                return Err(AppError::new(ErrorCode::PollInvalidOptions));
            }
        }
        Ok(())
    }
}
