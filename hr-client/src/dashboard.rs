//! Dashboard loader
//!
//! Loads everything the landing view needs in one concurrent batch.

use shared::client::UserInfo;
use shared::models::{Leave, LeaveStatus, PollView, TeamLeave};

use crate::{ClientResult, ViewScope};

/// Landing view data
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub user: UserInfo,
    pub leaves: Vec<Leave>,
    /// Pending requests this user may decide; empty without approval rights
    pub team_leaves: Vec<TeamLeave>,
    pub polls: Vec<PollView>,
}

impl Dashboard {
    /// Fetch the dashboard concurrently
    ///
    /// Any failed call fails the whole load; nothing partial is returned.
    pub async fn load(scope: &ViewScope) -> ClientResult<Self> {
        let approver = scope.context().capabilities().approve_leave;
        let team = async {
            if approver {
                scope.team_leaves(Some(LeaveStatus::Pending)).await
            } else {
                Ok(Vec::new())
            }
        };

        let (user, leaves, team_leaves, polls) =
            futures::try_join!(scope.me(), scope.leaves(), team, scope.polls())?;

        tracing::debug!(
            leaves = leaves.len(),
            team_leaves = team_leaves.len(),
            polls = polls.len(),
            "Dashboard loaded"
        );
        Ok(Self {
            user,
            leaves,
            team_leaves,
            polls,
        })
    }

    /// Polls the user can still vote on
    pub fn open_polls(&self) -> impl Iterator<Item = &PollView> {
        self.polls.iter().filter(|p| p.can_vote)
    }
}
