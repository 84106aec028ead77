//! The verification attempt state machine.
//!
//! ```text
//! Unstarted --choose--> MethodChosen --submit--> Pending --resolve--> Resolved
//!     |                     |                       |
//!     +------cancel---------+---> discarded         +--cancel--> Resolved(Cancelled)
//! ```
//!
//! `Resolved` is terminal. Cancelling before `Pending` discards the attempt
//! with no side effects. Points are fixed when the attempt is created, from
//! the catalog reward and the claimed quantity.

use serde::Serialize;
use shamrock_progression::{Catalog, award_for};
use shamrock_types::{ActionKind, AttemptId, JudgmentVerdict, VerificationMethod};

use crate::error::VerifyError;
use crate::judge::{EvidenceImage, JudgeBackend, judge_or_unavailable};

/// How a resolved attempt ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum AttemptOutcome {
    /// The claim was confirmed and should be awarded.
    Verified {
        /// Points to award.
        points: u64,
        /// Message for the user.
        message: String,
    },
    /// The claim was rejected. No points.
    Rejected {
        /// Message for the user.
        message: String,
    },
    /// The requester withdrew a pending claim.
    Cancelled,
    /// Nobody confirmed a witness claim in time.
    Expired,
}

/// Where an attempt stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptState {
    /// Created, no method chosen.
    Unstarted,
    /// Method chosen, nothing submitted yet.
    MethodChosen(VerificationMethod),
    /// Submitted and awaiting a verdict or a witness.
    Pending(VerificationMethod),
    /// Finished.
    Resolved(AttemptOutcome),
}

impl AttemptState {
    const fn label(&self) -> &'static str {
        match self {
            Self::Unstarted => "unstarted",
            Self::MethodChosen(_) => "awaiting submission",
            Self::Pending(_) => "pending",
            Self::Resolved(_) => "resolved",
        }
    }
}

/// What cancelling did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelEffect {
    /// Nothing had been submitted; the attempt is simply dropped.
    Discarded,
    /// A pending claim was resolved as cancelled.
    Withdrawn,
}

/// One claim that an action was completed.
#[derive(Debug, Clone)]
pub struct VerificationAttempt {
    id: AttemptId,
    action: ActionKind,
    quantity: Option<u64>,
    points: u64,
    state: AttemptState,
}

impl VerificationAttempt {
    /// Start an attempt for `action`, computing its award up front.
    ///
    /// Fails for actions missing from the catalog and for per-unit actions
    /// without a quantity.
    pub fn new(
        catalog: &Catalog,
        action: ActionKind,
        quantity: Option<u64>,
    ) -> Result<Self, VerifyError> {
        let definition = catalog
            .action(action)
            .ok_or(shamrock_progression::ProgressionError::UnknownAction(action))?;
        let points = award_for(definition, quantity)?;
        Ok(Self {
            id: AttemptId::new(),
            action,
            quantity,
            points,
            state: AttemptState::Unstarted,
        })
    }

    /// Attempt id.
    pub const fn id(&self) -> AttemptId {
        self.id
    }

    /// Claimed action.
    pub const fn action(&self) -> ActionKind {
        self.action
    }

    /// Claimed quantity.
    pub const fn quantity(&self) -> Option<u64> {
        self.quantity
    }

    /// Points a successful verification awards.
    pub const fn points(&self) -> u64 {
        self.points
    }

    /// Current state.
    pub const fn state(&self) -> &AttemptState {
        &self.state
    }

    /// Whether the attempt has finished.
    pub const fn is_resolved(&self) -> bool {
        matches!(self.state, AttemptState::Resolved(_))
    }

    fn invalid(&self, operation: &'static str) -> VerifyError {
        VerifyError::InvalidTransition {
            operation,
            state: self.state.label(),
        }
    }

    /// Choose how the claim will be verified.
    pub fn choose(&mut self, method: VerificationMethod) -> Result<(), VerifyError> {
        match self.state {
            AttemptState::Unstarted | AttemptState::MethodChosen(_) => {
                self.state = AttemptState::MethodChosen(method);
                Ok(())
            }
            AttemptState::Pending(_) | AttemptState::Resolved(_) => Err(self.invalid("choose a method for")),
        }
    }

    /// Submit the claim for judgment or witnessing.
    pub fn submit(&mut self) -> Result<VerificationMethod, VerifyError> {
        match self.state {
            AttemptState::MethodChosen(method) => {
                self.state = AttemptState::Pending(method);
                Ok(method)
            }
            _ => Err(self.invalid("submit")),
        }
    }

    /// Finish a pending attempt.
    pub fn resolve(&mut self, outcome: AttemptOutcome) -> Result<&AttemptOutcome, VerifyError> {
        if !matches!(self.state, AttemptState::Pending(_)) {
            return Err(self.invalid("resolve"));
        }
        self.state = AttemptState::Resolved(outcome);
        match &self.state {
            AttemptState::Resolved(outcome) => Ok(outcome),
            _ => Err(self.invalid("resolve")),
        }
    }

    /// Finish a pending attempt from a judge verdict.
    pub fn resolve_with_verdict(
        &mut self,
        verdict: JudgmentVerdict,
    ) -> Result<&AttemptOutcome, VerifyError> {
        let outcome = if verdict.verified {
            AttemptOutcome::Verified {
                points: self.points,
                message: verdict.message,
            }
        } else {
            AttemptOutcome::Rejected {
                message: verdict.message,
            }
        };
        self.resolve(outcome)
    }

    /// Cancel the attempt.
    pub fn cancel(&mut self) -> Result<CancelEffect, VerifyError> {
        match self.state {
            AttemptState::Unstarted | AttemptState::MethodChosen(_) => {
                self.state = AttemptState::Unstarted;
                Ok(CancelEffect::Discarded)
            }
            AttemptState::Pending(_) => {
                self.state = AttemptState::Resolved(AttemptOutcome::Cancelled);
                Ok(CancelEffect::Withdrawn)
            }
            AttemptState::Resolved(_) => Err(self.invalid("cancel")),
        }
    }
}

/// Run the evidence path end to end: choose, submit, judge, resolve.
///
/// A judge failure resolves the attempt as rejected with the unavailable
/// message. The returned outcome tells the caller whether to award.
pub async fn verify_evidence(
    attempt: &mut VerificationAttempt,
    catalog: &Catalog,
    judge: &JudgeBackend,
    image: &EvidenceImage,
) -> Result<AttemptOutcome, VerifyError> {
    let definition = catalog
        .action(attempt.action)
        .ok_or(shamrock_progression::ProgressionError::UnknownAction(attempt.action))?;
    attempt.choose(VerificationMethod::Evidence)?;
    attempt.submit()?;
    let verdict = judge_or_unavailable(judge, image, definition, attempt.quantity).await;
    attempt.resolve_with_verdict(verdict).cloned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::judge::{StubJudge, UNAVAILABLE_MESSAGE};

    fn image() -> EvidenceImage {
        EvidenceImage {
            bytes: vec![1, 2, 3],
            mime_type: "image/png".to_owned(),
        }
    }

    #[test]
    fn points_are_fixed_at_creation() {
        let catalog = Catalog::default();
        let rubbish = VerificationAttempt::new(&catalog, ActionKind::PickUpRubbish, None).unwrap();
        assert_eq!(rubbish.points(), 100);
        let volunteer = VerificationAttempt::new(&catalog, ActionKind::DonateVolunteer, Some(39)).unwrap();
        assert_eq!(volunteer.points(), 10);
        let volunteer = VerificationAttempt::new(&catalog, ActionKind::DonateVolunteer, Some(40)).unwrap();
        assert_eq!(volunteer.points(), 20);
    }

    #[test]
    fn per_unit_claim_without_quantity_is_rejected() {
        let result = VerificationAttempt::new(&Catalog::default(), ActionKind::DonateVolunteer, None);
        assert!(matches!(result, Err(VerifyError::Progression(_))));
    }

    #[test]
    fn happy_path_transitions() {
        let mut attempt = VerificationAttempt::new(&Catalog::default(), ActionKind::Recycle, None).unwrap();
        assert!(attempt.submit().is_err());
        attempt.choose(VerificationMethod::Witness).unwrap();
        assert_eq!(attempt.submit().unwrap(), VerificationMethod::Witness);
        assert!(attempt.choose(VerificationMethod::Evidence).is_err());
        attempt
            .resolve(AttemptOutcome::Verified { points: 200, message: String::new() })
            .unwrap();
        assert!(attempt.is_resolved());
        assert!(attempt.cancel().is_err());
        assert!(attempt.resolve(AttemptOutcome::Expired).is_err());
    }

    #[test]
    fn cancel_before_pending_discards() {
        let mut attempt = VerificationAttempt::new(&Catalog::default(), ActionKind::Recycle, None).unwrap();
        attempt.choose(VerificationMethod::Evidence).unwrap();
        assert_eq!(attempt.cancel().unwrap(), CancelEffect::Discarded);
        assert_eq!(attempt.state(), &AttemptState::Unstarted);
    }

    #[test]
    fn cancel_while_pending_withdraws() {
        let mut attempt = VerificationAttempt::new(&Catalog::default(), ActionKind::Recycle, None).unwrap();
        attempt.choose(VerificationMethod::Witness).unwrap();
        attempt.submit().unwrap();
        assert_eq!(attempt.cancel().unwrap(), CancelEffect::Withdrawn);
        assert_eq!(attempt.state(), &AttemptState::Resolved(AttemptOutcome::Cancelled));
    }

    #[tokio::test]
    async fn failed_judge_call_rejects_without_points() {
        let catalog = Catalog::default();
        let mut attempt = VerificationAttempt::new(&catalog, ActionKind::PickUpRubbish, None).unwrap();
        let outcome = verify_evidence(&mut attempt, &catalog, &JudgeBackend::Disabled, &image())
            .await
            .unwrap();
        assert_eq!(
            outcome,
            AttemptOutcome::Rejected { message: UNAVAILABLE_MESSAGE.to_owned() }
        );
    }

    #[tokio::test]
    async fn positive_verdict_carries_points() {
        let catalog = Catalog::default();
        let mut attempt = VerificationAttempt::new(&catalog, ActionKind::PlantATree, None).unwrap();
        let judge = JudgeBackend::Stub(StubJudge::new());
        let outcome = verify_evidence(&mut attempt, &catalog, &judge, &image()).await.unwrap();
        assert!(matches!(outcome, AttemptOutcome::Verified { points: 1000, .. }));
    }
}
