//! Shamrock and golden shamrock balances.
//!
//! Every operation computes the new values with checked arithmetic first
//! and only then writes them, so a failed call leaves the profile exactly
//! as it was.

use shamrock_types::{ActionKind, UserProfile};
use tracing::info;

use crate::error::ProgressionError;

fn overflow(context: &str) -> ProgressionError {
    ProgressionError::ArithmeticOverflow {
        context: context.to_owned(),
    }
}

/// Credit a verified action: adds `points`, counts the completion, and
/// records the action kind.
pub fn award_action(
    profile: &mut UserProfile,
    kind: ActionKind,
    points: u64,
) -> Result<(), ProgressionError> {
    let total = profile
        .total_shamrocks
        .checked_add(points)
        .ok_or_else(|| overflow("action award"))?;
    let completed = profile
        .completed_actions
        .checked_add(1)
        .ok_or_else(|| overflow("completed action count"))?;

    profile.total_shamrocks = total;
    profile.completed_actions = completed;
    profile.completed_action_types.insert(kind);
    info!(
        profile_id = %profile.id,
        action = %kind,
        points,
        total,
        "Action awarded"
    );
    Ok(())
}

/// Credit mini-game points. Does not count as a completed action.
pub fn award_game_points(profile: &mut UserProfile, points: u64) -> Result<(), ProgressionError> {
    profile.total_shamrocks = profile
        .total_shamrocks
        .checked_add(points)
        .ok_or_else(|| overflow("game award"))?;
    Ok(())
}

/// Credit golden shamrocks from a completed team mission.
pub fn award_golden(profile: &mut UserProfile, amount: u64) -> Result<(), ProgressionError> {
    profile.golden_shamrocks = profile
        .golden_shamrocks
        .checked_add(amount)
        .ok_or_else(|| overflow("golden award"))?;
    Ok(())
}

/// Debit `cost` shamrocks.
pub fn spend(profile: &mut UserProfile, cost: u64) -> Result<(), ProgressionError> {
    profile.total_shamrocks = profile.total_shamrocks.checked_sub(cost).ok_or(
        ProgressionError::InsufficientShamrocks {
            cost,
            balance: profile.total_shamrocks,
        },
    )?;
    Ok(())
}
