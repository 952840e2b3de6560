//! Admin review of newly created hackathons.
//!
//! Approval flips the flag. Disapproval deletes the hackathon and its
//! participant rows for good; there is no way back from it.

use std::str::FromStr;

use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::engine::LifecycleEngine;
use crate::error::{LifecycleError, Result};
use crate::gate::Action;
use crate::model::{Hackathon, HackathonId, Principal};

pub const APPROVAL_SUBJECT: &str = "Approval";
pub const APPROVED_CONTENT: &str = "Yay! your hackathon has been approved.";
pub const DISAPPROVED_CONTENT: &str = "Unfortunately your hackathon has been disapproved.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApprovalDecision {
    Approve,
    Disapprove,
}

impl FromStr for ApprovalDecision {
    type Err = LifecycleError;

    /// `"1"` approves, `"0"` disapproves.
    fn from_str(value: &str) -> Result<Self> {
        match value {
            "1" => Ok(ApprovalDecision::Approve),
            "0" => Ok(ApprovalDecision::Disapprove),
            other => Err(LifecycleError::Validation(format!(
                "approval value must be 1 or 0, got {other:?}"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalOutcome {
    Approved,
    /// The hackathon was approved before; nothing changed and nobody was mailed.
    AlreadyApproved,
    /// The hackathon and its participants were deleted.
    Disapproved,
}

impl ApprovalOutcome {
    pub fn message(self) -> &'static str {
        match self {
            ApprovalOutcome::Approved => "Hackathon approved",
            ApprovalOutcome::AlreadyApproved => "Hackathon already approved",
            ApprovalOutcome::Disapproved => "Hackathon disapproved and deleted from database",
        }
    }
}

impl LifecycleEngine {
    /// Apply an admin decision to a hackathon and tell the organiser.
    ///
    /// The decision is persisted before the organiser is mailed; a delivery
    /// failure is reported but does not undo it.
    #[instrument(skip(self, principal), fields(admin = %principal.username))]
    pub async fn review(
        &self,
        principal: &Principal,
        id: HackathonId,
        decision: ApprovalDecision,
    ) -> Result<ApprovalOutcome> {
        let admission = self
            .admit(principal, id, Action::ApproveOrDisapprove)
            .await?;
        self.decide(admission.hackathon, decision).await
    }

    /// Like [`review`](Self::review), but with the decision still in its `1`/`0`
    /// path form. The value is only parsed once the caller has been admitted.
    #[instrument(skip(self, principal), fields(admin = %principal.username))]
    pub async fn review_value(
        &self,
        principal: &Principal,
        id: HackathonId,
        value: &str,
    ) -> Result<ApprovalOutcome> {
        let admission = self
            .admit(principal, id, Action::ApproveOrDisapprove)
            .await?;
        let decision = value.parse()?;
        self.decide(admission.hackathon, decision).await
    }

    async fn decide(
        &self,
        mut hackathon: Hackathon,
        decision: ApprovalDecision,
    ) -> Result<ApprovalOutcome> {
        let id = hackathon.id;

        let (outcome, content) = match decision {
            ApprovalDecision::Approve if hackathon.admin_approved => {
                return Ok(ApprovalOutcome::AlreadyApproved);
            }
            ApprovalDecision::Approve => {
                hackathon.admin_approved = true;
                self.store.update_hackathon(&hackathon).await?;
                (ApprovalOutcome::Approved, APPROVED_CONTENT)
            }
            ApprovalDecision::Disapprove => {
                if !self.store.delete_hackathon(id).await? {
                    return Err(LifecycleError::not_found("hackathon"));
                }
                (ApprovalOutcome::Disapproved, DISAPPROVED_CONTENT)
            }
        };
        info!(hackathon_id = id, ?outcome, "Hackathon reviewed");

        match self.store.find_user(hackathon.organiser_id).await? {
            Some(organiser) => {
                self.notifier
                    .send(&organiser.email, APPROVAL_SUBJECT, content)
                    .await?;
            }
            None => warn!(
                organiser_id = hackathon.organiser_id,
                "Organiser has no live user record, review not mailed"
            ),
        }
        Ok(outcome)
    }
}
