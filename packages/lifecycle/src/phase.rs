use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::Hackathon;

/// Where a hackathon is in its life, derived from its timestamps and approval flag.
///
/// Each interval is closed on its lower bound: a hackathon is `Active` at the exact
/// `starting_time` instant, `Ended` at `ending_time` and `ResultsDeclared` at `result_time`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    PendingApproval,
    Approved,
    Active,
    Ended,
    ResultsDeclared,
}

impl Phase {
    /// Submissions, judging and organiser notifications are open.
    pub fn has_ended(self) -> bool {
        matches!(self, Phase::Ended | Phase::ResultsDeclared)
    }

    /// New entrants are still accepted.
    pub fn accepts_entrants(self) -> bool {
        matches!(self, Phase::Approved | Phase::Active)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::PendingApproval => "pending_approval",
            Phase::Approved => "approved",
            Phase::Active => "active",
            Phase::Ended => "ended",
            Phase::ResultsDeclared => "results_declared",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compute the phase of `hackathon` at instant `now`.
pub fn evaluate(hackathon: &Hackathon, now: DateTime<Utc>) -> Phase {
    if !hackathon.admin_approved {
        Phase::PendingApproval
    } else if now < hackathon.starting_time {
        Phase::Approved
    } else if now < hackathon.ending_time {
        Phase::Active
    } else if now < hackathon.result_time {
        Phase::Ended
    } else {
        Phase::ResultsDeclared
    }
}
