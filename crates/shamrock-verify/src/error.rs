//! Error types for the verification gate.
//!
//! A failing judge call is never surfaced as an error to the user: the gate
//! turns it into a negative verdict. These variants exist so the failure can
//! be logged with its cause before that happens, and so witness and state
//! machine misuse is reported precisely.

use shamrock_progression::ProgressionError;
use shamrock_types::WitnessRequestId;

use crate::witness::WitnessStatus;

/// Errors that can occur while verifying an action claim.
#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    /// Configuration is invalid or missing.
    #[error("config error: {0}")]
    Config(String),

    /// Failed to render the judge prompt.
    #[error("template render error: {0}")]
    Template(String),

    /// The judge backend returned an error or was unreachable.
    #[error("judge backend error: {0}")]
    JudgeBackend(String),

    /// The judge response could not be parsed into a verdict.
    #[error("judge response parse error: {0}")]
    Parse(String),

    /// The evidence image could not be decoded.
    #[error("invalid evidence image: {0}")]
    InvalidImage(String),

    /// Award calculation failed (unknown action, missing quantity).
    #[error(transparent)]
    Progression(#[from] ProgressionError),

    /// No witness request with this id exists.
    #[error("witness request not found: {0}")]
    WitnessNotFound(WitnessRequestId),

    /// The requester tried to witness their own claim.
    #[error("a claim cannot be confirmed by its own author")]
    SelfConfirmation,

    /// The confirming member is not in the request's room.
    #[error("confirmer is not a member of room {room}")]
    WrongRoom {
        /// The room the request was posted to.
        room: String,
    },

    /// The request has already been resolved.
    #[error("witness request {id} is no longer pending ({status:?})")]
    NotPending {
        /// The request id.
        id: WitnessRequestId,
        /// Its current status.
        status: WitnessStatus,
    },

    /// An attempt was driven through an invalid state transition.
    #[error("cannot {operation} a verification attempt that is {state}")]
    InvalidTransition {
        /// The operation that was attempted.
        operation: &'static str,
        /// The state the attempt was in.
        state: &'static str,
    },

    /// Serialization or deserialization failure.
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
}
