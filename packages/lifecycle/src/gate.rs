//! Role and phase gate for hackathon actions.
//!
//! Roles are never stored. They are derived per request from facts about the
//! caller: the admin flag on the principal, whether the principal owns the
//! hackathon, and whether a participant row exists for the pair. A denial names
//! which of the two checks failed so callers can surface them differently.

use serde::Serialize;
use thiserror::Error;

use crate::model::{Hackathon, Principal};
use crate::phase::Phase;

/// Something a principal wants to do to a specific hackathon.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    ApproveOrDisapprove,
    Participate,
    SubmitWork,
    ViewParticipants,
    ViewSubmissions,
    JudgeSubmission,
    NotifyAll,
    NotifyParticipant,
    PrizeDistribution,
    ViewLeaderboard,
}

impl Action {
    pub const ALL: [Action; 10] = [
        Action::ApproveOrDisapprove,
        Action::Participate,
        Action::SubmitWork,
        Action::ViewParticipants,
        Action::ViewSubmissions,
        Action::JudgeSubmission,
        Action::NotifyAll,
        Action::NotifyParticipant,
        Action::PrizeDistribution,
        Action::ViewLeaderboard,
    ];

    fn organiser_only(self) -> bool {
        matches!(
            self,
            Action::ViewParticipants
                | Action::ViewSubmissions
                | Action::JudgeSubmission
                | Action::NotifyAll
                | Action::NotifyParticipant
                | Action::PrizeDistribution
        )
    }
}

/// Actions scoped to the caller's account rather than one hackathon.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AccountAction {
    ListOrganised,
    ListUnapproved,
}

/// Role facts about a principal relative to one hackathon.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RoleFacts {
    pub is_admin: bool,
    pub is_organiser: bool,
    pub is_participant: bool,
}

impl RoleFacts {
    pub fn derive(principal: &Principal, hackathon: &Hackathon, is_participant: bool) -> Self {
        Self {
            is_admin: principal.is_admin,
            is_organiser: principal.id == hackathon.organiser_id,
            is_participant,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum RoleReason {
    #[error("only an admin can do this")]
    AdminOnly,
    #[error("only the organiser can do this")]
    OrganiserOnly,
    #[error("can't participate in your own hackathon")]
    OwnHackathon,
    #[error("already participating in this hackathon")]
    AlreadyParticipating,
    #[error("user has not participated in this hackathon")]
    NotParticipant,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum PhaseReason {
    #[error("hackathon is awaiting admin approval")]
    AwaitingApproval,
    #[error("hackathon not started yet!")]
    NotStarted,
    #[error("hackathon ended already!")]
    AlreadyEnded,
    #[error("not available right now, try again once the hackathon ends")]
    NotEnded,
    #[error("results aren't declared yet")]
    ResultsNotDeclared,
}

/// Why the gate refused an action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum Denial {
    #[error(transparent)]
    Role(RoleReason),
    #[error(transparent)]
    Phase(PhaseReason),
}

/// Decide whether a principal with `facts` may perform `action` while the hackathon is in `phase`.
///
/// The role requirement is checked before the phase requirement.
pub fn authorize(facts: &RoleFacts, action: Action, phase: Phase) -> Result<(), Denial> {
    check_role(facts, action).map_err(Denial::Role)?;
    check_phase(action, phase).map_err(Denial::Phase)
}

pub fn allowed(facts: &RoleFacts, action: Action, phase: Phase) -> bool {
    authorize(facts, action, phase).is_ok()
}

pub fn authorize_account(principal: &Principal, action: AccountAction) -> Result<(), RoleReason> {
    match action {
        AccountAction::ListOrganised => Ok(()),
        AccountAction::ListUnapproved if principal.is_admin => Ok(()),
        AccountAction::ListUnapproved => Err(RoleReason::AdminOnly),
    }
}

fn check_role(facts: &RoleFacts, action: Action) -> Result<(), RoleReason> {
    match action {
        Action::ApproveOrDisapprove if !facts.is_admin => Err(RoleReason::AdminOnly),
        Action::Participate if facts.is_organiser => Err(RoleReason::OwnHackathon),
        Action::Participate if facts.is_participant => Err(RoleReason::AlreadyParticipating),
        Action::SubmitWork if !facts.is_participant => Err(RoleReason::NotParticipant),
        a if a.organiser_only() && !facts.is_organiser => Err(RoleReason::OrganiserOnly),
        _ => Ok(()),
    }
}

fn check_phase(action: Action, phase: Phase) -> Result<(), PhaseReason> {
    match action {
        Action::ApproveOrDisapprove | Action::ViewParticipants | Action::ViewLeaderboard => Ok(()),
        Action::Participate => match phase {
            Phase::Approved | Phase::Active => Ok(()),
            Phase::PendingApproval => Err(PhaseReason::AwaitingApproval),
            Phase::Ended | Phase::ResultsDeclared => Err(PhaseReason::AlreadyEnded),
        },
        Action::SubmitWork => match phase {
            Phase::Active => Ok(()),
            Phase::PendingApproval => Err(PhaseReason::AwaitingApproval),
            Phase::Approved => Err(PhaseReason::NotStarted),
            Phase::Ended | Phase::ResultsDeclared => Err(PhaseReason::AlreadyEnded),
        },
        Action::ViewSubmissions
        | Action::JudgeSubmission
        | Action::NotifyAll
        | Action::NotifyParticipant => {
            if phase.has_ended() {
                Ok(())
            } else {
                Err(PhaseReason::NotEnded)
            }
        }
        Action::PrizeDistribution => {
            if phase == Phase::ResultsDeclared {
                Ok(())
            } else {
                Err(PhaseReason::ResultsNotDeclared)
            }
        }
    }
}
