//! Error types for the session layer.

use shamrock_progression::ProgressionError;
use shamrock_store::StoreError;
use shamrock_types::{GameRoundId, ProfileId};
use shamrock_verify::VerifyError;

/// Errors that can occur while operating on the session.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A rules, wallet, shop, mission or game error.
    #[error(transparent)]
    Progression(#[from] ProgressionError),

    /// A verification gate error.
    #[error(transparent)]
    Verify(#[from] VerifyError),

    /// Persistence failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// The registration or profile form failed validation.
    #[error("invalid form: {0}")]
    Validation(#[from] validator::ValidationErrors),

    /// The operation needs a registered profile.
    #[error("profile is not registered")]
    NotRegistered,

    /// Registration was attempted twice.
    #[error("profile is already registered")]
    AlreadyRegistered,

    /// A chat message had no text after trimming.
    #[error("message text is empty")]
    EmptyMessage,

    /// The user does not belong to the room.
    #[error("not a member of room {room}")]
    NotARoomMember {
        /// The room.
        room: String,
    },

    /// The confirming member is not in the peer pool.
    #[error("unknown community member: {0}")]
    UnknownPeer(ProfileId),

    /// Only a captain or assistant captain may do this.
    #[error("only neighborhood leaders can tick team goals")]
    NotALeader,

    /// Only the requester may withdraw a witness request.
    #[error("only the requester can cancel a witness request")]
    NotRequester,

    /// No game round with this id is in progress.
    #[error("game round not found: {0}")]
    GameNotFound(GameRoundId),

    /// The round exists but is a different kind of game.
    #[error("game round {id} is not a {expected} round")]
    WrongGameKind {
        /// The round.
        id: GameRoundId,
        /// The kind the operation needs.
        expected: &'static str,
    },
}

impl CoreError {
    /// Whether the error is the caller's fault and carries no side effects.
    ///
    /// Economic violations are reported separately by [`is_conflict`](Self::is_conflict).
    pub const fn is_invalid_input(&self) -> bool {
        match self {
            Self::Validation(_)
            | Self::EmptyMessage
            | Self::WrongGameKind { .. }
            | Self::NotRegistered
            | Self::AlreadyRegistered => true,
            Self::Progression(e) => is_invalid_progression_input(e),
            Self::Verify(VerifyError::Progression(e)) => is_invalid_progression_input(e),
            Self::Verify(
                VerifyError::InvalidImage(_)
                | VerifyError::SelfConfirmation
                | VerifyError::InvalidTransition { .. },
            ) => true,
            _ => false,
        }
    }

    /// Whether the error is a rejected economic or state transition
    /// (insufficient balance, already owned, cooldown, already resolved).
    pub const fn is_conflict(&self) -> bool {
        match self {
            Self::Progression(e) | Self::Verify(VerifyError::Progression(e)) => matches!(
                e,
                ProgressionError::InsufficientShamrocks { .. }
                    | ProgressionError::NotPurchasable(_)
                    | ProgressionError::AlreadyOwned(_)
                    | ProgressionError::AvatarLocked(_)
                    | ProgressionError::ThemeLocked(_)
                    | ProgressionError::NotCaptain
                    | ProgressionError::MissionAlreadyActive
                    | ProgressionError::MissionCooldown { .. }
                    | ProgressionError::NoActiveMission
                    | ProgressionError::AlreadyTicked { .. }
                    | ProgressionError::RoundFinished
                    | ProgressionError::ArithmeticOverflow { .. }
            ),
            Self::Verify(VerifyError::NotPending { .. } | VerifyError::WrongRoom { .. })
            | Self::NotARoomMember { .. }
            | Self::NotALeader
            | Self::NotRequester => true,
            _ => false,
        }
    }

    /// Whether the error names something that does not exist.
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::GameNotFound(_)
                | Self::UnknownPeer(_)
                | Self::Verify(VerifyError::WitnessNotFound(_))
                | Self::Progression(ProgressionError::ItemNotFound(_))
        )
    }
}

const fn is_invalid_progression_input(error: &ProgressionError) -> bool {
    matches!(
        error,
        ProgressionError::UnknownAction(_)
            | ProgressionError::MissingQuantity(_)
            | ProgressionError::EmptyGoal
            | ProgressionError::NotAQuiz(_)
            | ProgressionError::InvalidCard { .. }
            | ProgressionError::EmptySanctuary
            | ProgressionError::SanctuaryTooLarge { .. }
            | ProgressionError::UnknownSanctuaryItem(_)
    )
}

#[cfg(test)]
mod tests {
    use shamrock_types::ActionKind;

    use super::*;

    #[test]
    fn missing_quantity_is_invalid_input() {
        let err = CoreError::from(VerifyError::from(ProgressionError::MissingQuantity(
            ActionKind::DonateVolunteer,
        )));
        assert!(err.is_invalid_input());
        assert!(!err.is_conflict());
    }

    #[test]
    fn insufficient_balance_is_conflict() {
        let err = CoreError::from(ProgressionError::InsufficientShamrocks { cost: 500, balance: 10 });
        assert!(err.is_conflict());
        assert!(!err.is_invalid_input());
    }

    #[test]
    fn unknown_item_is_not_found() {
        let err = CoreError::from(ProgressionError::ItemNotFound("av9".to_owned()));
        assert!(err.is_not_found());
    }
}
