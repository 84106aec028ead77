//! Error types for the shamrock-progression crate.
//!
//! The rules engine itself never fails. Everything else that mutates a
//! profile (wallet, shop, missions, games) returns a typed error and leaves
//! the profile untouched when it does.

use chrono::{DateTime, Utc};
use shamrock_types::{ActionKind, LeaderRole, MiniGame};

/// Errors that can occur when mutating progression state.
#[derive(Debug, thiserror::Error)]
pub enum ProgressionError {
    /// An arithmetic overflow occurred while updating a balance or counter.
    #[error("arithmetic overflow: {context}")]
    ArithmeticOverflow {
        /// Description of what was being computed.
        context: String,
    },

    /// The balance does not cover the cost.
    #[error("insufficient shamrocks: cost {cost}, balance {balance}")]
    InsufficientShamrocks {
        /// The price of the attempted purchase.
        cost: u64,
        /// The balance at the time of the attempt.
        balance: u64,
    },

    /// No action with this kind exists in the catalog.
    #[error("unknown action: {0}")]
    UnknownAction(ActionKind),

    /// The action is rewarded per unit but no quantity was claimed.
    #[error("action {0} requires a quantity")]
    MissingQuantity(ActionKind),

    /// No shop item with this id exists in the catalog.
    #[error("shop item not found: {0}")]
    ItemNotFound(String),

    /// The item can only be earned, never bought.
    #[error("shop item {0} cannot be purchased")]
    NotPurchasable(String),

    /// The item is already unlocked.
    #[error("shop item {0} is already owned")]
    AlreadyOwned(String),

    /// The avatar has not been unlocked.
    #[error("avatar {0} is locked")]
    AvatarLocked(String),

    /// The theme has not been unlocked.
    #[error("theme {0} is locked")]
    ThemeLocked(String),

    /// Only a captain may issue team goals.
    #[error("only a neighborhood captain can set a team goal")]
    NotCaptain,

    /// The goal text was blank.
    #[error("team goal text must not be empty")]
    EmptyGoal,

    /// A goal is already in progress.
    #[error("a team goal is already active")]
    MissionAlreadyActive,

    /// A new goal cannot be issued before the weekly cooldown has elapsed.
    #[error("next team goal can be set at {available_at}")]
    MissionCooldown {
        /// Earliest time a new goal may be set.
        available_at: DateTime<Utc>,
    },

    /// There is no goal to tick.
    #[error("no team goal is active")]
    NoActiveMission,

    /// This role has already ticked the current goal.
    #[error("{role:?} has already ticked the current goal")]
    AlreadyTicked {
        /// The role that ticked twice.
        role: LeaderRole,
    },

    /// The game is not played as a quiz round.
    #[error("{0:?} is not a quiz game")]
    NotAQuiz(MiniGame),

    /// The quiz round has no questions left.
    #[error("quiz round is already finished")]
    RoundFinished,

    /// The memory card index is out of range or already matched.
    #[error("card {index} cannot be flipped")]
    InvalidCard {
        /// The index that was flipped.
        index: usize,
    },

    /// The sanctuary grid contains nothing.
    #[error("place some items in your sanctuary first")]
    EmptySanctuary,

    /// The sanctuary grid has too many cells.
    #[error("sanctuary grid has {cells} cells, maximum is {max}")]
    SanctuaryTooLarge {
        /// Cells submitted.
        cells: usize,
        /// Cells allowed.
        max: usize,
    },

    /// The sanctuary grid references an item that does not exist.
    #[error("unknown sanctuary item: {0}")]
    UnknownSanctuaryItem(String),
}
