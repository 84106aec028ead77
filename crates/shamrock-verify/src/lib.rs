//! The verification gate for action-completion claims.
//!
//! Every claim takes exactly one of two paths:
//!
//! - **Evidence**: a photo is sent to an image judge, which answers with a
//!   verdict. Any judge failure becomes a negative verdict with a generic
//!   "unavailable" message.
//! - **Witness**: the claim is posted to the user's chat room and resolved
//!   when another member of that room confirms it, or when it is cancelled
//!   or expires.
//!
//! # Modules
//!
//! - [`gate`] -- Attempt state machine and the evidence path
//! - [`judge`] -- Image judgment backends (Gemini, stub, disabled)
//! - [`witness`] -- Publish/subscribe witness confirmation board
//! - [`prompt`] -- Judge prompt rendering
//! - [`config`] -- Judge and witness settings
//! - [`error`] -- Error types

pub mod config;
pub mod error;
pub mod gate;
pub mod judge;
pub mod prompt;
pub mod witness;

pub use config::{JudgeBackendType, JudgeConfig, VerifyConfig};
pub use error::VerifyError;
pub use gate::{AttemptOutcome, AttemptState, CancelEffect, VerificationAttempt, verify_evidence};
pub use judge::{
    EvidenceImage, JudgeBackend, UNAVAILABLE_MESSAGE, create_backend, judge_or_unavailable,
};
pub use witness::{
    NewWitnessRequest, WitnessBoard, WitnessEvent, WitnessRequest, WitnessResolution,
    WitnessStatus, WitnessTicket,
};
