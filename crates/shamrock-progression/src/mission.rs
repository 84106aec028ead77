//! Weekly team missions set by neighborhood captains.
//!
//! A captain issues one goal at a time, at most once per cooldown period.
//! The captain and the assistant captain each tick the goal; the second
//! tick completes the mission, pays the golden reward and clears the
//! mission sub-state. The cooldown clock (`weekly_goal_set_at`) survives
//! completion.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use shamrock_types::{LeaderRole, UserProfile};
use tracing::info;

use crate::config::ProgressionConfig;
use crate::error::ProgressionError;
use crate::wallet;

/// Result of ticking a team goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum TickOutcome {
    /// Still waiting for the other role.
    Waiting,
    /// Both roles ticked; the reward was paid.
    Completed {
        /// Golden shamrocks credited.
        golden_reward: u64,
    },
}

/// Earliest time a new goal may be set, if a goal was ever set.
pub fn next_goal_available_at(
    profile: &UserProfile,
    config: &ProgressionConfig,
) -> Option<DateTime<Utc>> {
    let cooldown = Duration::try_days(config.mission_cooldown_days)?;
    profile
        .weekly_goal_set_at
        .and_then(|set_at| set_at.checked_add_signed(cooldown))
}

/// Issue a new team goal.
pub fn set_goal(
    profile: &mut UserProfile,
    goal: &str,
    config: &ProgressionConfig,
    now: DateTime<Utc>,
) -> Result<(), ProgressionError> {
    if !profile.is_captain {
        return Err(ProgressionError::NotCaptain);
    }
    let goal = goal.trim();
    if goal.is_empty() {
        return Err(ProgressionError::EmptyGoal);
    }
    if profile.active_goal.is_some() {
        return Err(ProgressionError::MissionAlreadyActive);
    }
    if let Some(available_at) = next_goal_available_at(profile, config) {
        if now < available_at {
            return Err(ProgressionError::MissionCooldown { available_at });
        }
    }

    profile.active_goal = Some(goal.to_owned());
    profile.weekly_goal_set_at = Some(now);
    profile.has_captain_ticked_goal = false;
    profile.has_assistant_ticked_goal = false;
    info!(profile_id = %profile.id, goal, "Team goal set");
    Ok(())
}

/// Record a tick from `role`, completing the mission when both have ticked.
pub fn tick_goal(
    profile: &mut UserProfile,
    role: LeaderRole,
    config: &ProgressionConfig,
) -> Result<TickOutcome, ProgressionError> {
    if profile.active_goal.is_none() {
        return Err(ProgressionError::NoActiveMission);
    }
    let already = match role {
        LeaderRole::Captain => profile.has_captain_ticked_goal,
        LeaderRole::Assistant => profile.has_assistant_ticked_goal,
    };
    if already {
        return Err(ProgressionError::AlreadyTicked { role });
    }

    let (captain, assistant) = match role {
        LeaderRole::Captain => (true, profile.has_assistant_ticked_goal),
        LeaderRole::Assistant => (profile.has_captain_ticked_goal, true),
    };
    if !(captain && assistant) {
        profile.has_captain_ticked_goal = captain;
        profile.has_assistant_ticked_goal = assistant;
        return Ok(TickOutcome::Waiting);
    }

    wallet::award_golden(profile, config.mission_golden_reward)?;
    profile.active_goal = None;
    profile.has_captain_ticked_goal = false;
    profile.has_assistant_ticked_goal = false;
    info!(
        profile_id = %profile.id,
        golden_reward = config.mission_golden_reward,
        golden_total = profile.golden_shamrocks,
        "Team mission completed"
    );
    Ok(TickOutcome::Completed {
        golden_reward: config.mission_golden_reward,
    })
}
