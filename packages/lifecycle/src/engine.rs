//! Guarded hackathon operations.
//!
//! Every operation follows the same path: re-read the caller's account, load
//! the hackathon, evaluate its phase against the clock, derive role facts from
//! the live account, ask the gate, and only then touch the store or the
//! notifier.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

use crate::clock::Clock;
use crate::error::{LifecycleError, Result};
use crate::gate::{self, Action, Denial, RoleFacts, RoleReason};
use crate::model::{Hackathon, HackathonId, Participant, Principal, User};
use crate::notify::Notifier;
use crate::phase::{self, Phase};
use crate::ranking;
use crate::store::EntityStore;

pub const PRIZE_SUBJECT: &str = "Prize distribution";
pub const PRIZE_CONTENT: &str =
    "Congratulations! You've won the hackathon. Please follow this link to get your cash reward.";

/// Shown instead of the ranking until results are declared.
pub const RESULTS_PENDING: &str = "results not declared yet!!";

/// URLs a participant hands in while the hackathon is running.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct Submission {
    #[serde(default)]
    pub demo_url: String,
    #[serde(default)]
    pub code_url: String,
}

/// A free-form mail from the organiser.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Message {
    pub subject: String,
    pub content: String,
}

/// Public profile of an entrant as seen by the organiser.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EntrantProfile {
    pub id: i32,
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub linked_in: String,
    pub github: String,
    pub web_link: String,
    pub organisation: String,
}

impl From<&User> for EntrantProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            full_name: user.full_name.clone(),
            email: user.email.clone(),
            linked_in: user.linked_in.clone(),
            github: user.github.clone(),
            web_link: user.web_link.clone(),
            organisation: user.organisation.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Entrants {
    pub total: u64,
    pub participants: Vec<EntrantProfile>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SubmissionView {
    pub hackathon_id: HackathonId,
    pub username: String,
    pub demo_url: String,
    pub code_url: String,
    pub score: i32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub username: String,
    pub full_name: String,
    pub score: i32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Leaderboard {
    NotDeclared { message: String },
    Declared { entries: Vec<LeaderboardEntry> },
}

/// Result of a prize run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PrizeReport {
    /// Winners that were mailed, best first.
    pub notified: Vec<String>,
    /// Winners whose user record could not be resolved.
    pub skipped: usize,
}

/// A hackathon the caller was admitted to act on.
#[derive(Clone, Debug)]
pub struct Admission {
    /// The caller's live account.
    pub caller: User,
    pub hackathon: Hackathon,
    pub phase: Phase,
    pub facts: RoleFacts,
}

/// A request for one guarded action, for callers that dispatch generically.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActionRequest {
    Participate,
    SubmitWork(Submission),
    ViewParticipants,
    ViewSubmissions,
    ViewSubmission { username: String },
    Judge { username: String, score: i32 },
    NotifyAll(Message),
    NotifyParticipant { username: String, message: Message },
    DistributePrizes,
    ViewLeaderboard,
}

impl ActionRequest {
    pub fn action(&self) -> Action {
        match self {
            ActionRequest::Participate => Action::Participate,
            ActionRequest::SubmitWork(_) => Action::SubmitWork,
            ActionRequest::ViewParticipants => Action::ViewParticipants,
            ActionRequest::ViewSubmissions | ActionRequest::ViewSubmission { .. } => {
                Action::ViewSubmissions
            }
            ActionRequest::Judge { .. } => Action::JudgeSubmission,
            ActionRequest::NotifyAll(_) => Action::NotifyAll,
            ActionRequest::NotifyParticipant { .. } => Action::NotifyParticipant,
            ActionRequest::DistributePrizes => Action::PrizeDistribution,
            ActionRequest::ViewLeaderboard => Action::ViewLeaderboard,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActionOutcome {
    Participant(Participant),
    Entrants(Entrants),
    Submissions(Vec<SubmissionView>),
    Submission(SubmissionView),
    Notified(usize),
    Prizes(PrizeReport),
    Leaderboard(Leaderboard),
}

/// Orchestrates the phase evaluator, the gate and the collaborators.
#[derive(Clone)]
pub struct LifecycleEngine {
    pub(crate) store: Arc<dyn EntityStore>,
    pub(crate) notifier: Arc<dyn Notifier>,
    pub(crate) clock: Arc<dyn Clock>,
}

impl LifecycleEngine {
    pub fn new(
        store: Arc<dyn EntityStore>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            notifier,
            clock,
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub(crate) async fn load(&self, id: HackathonId) -> Result<Hackathon> {
        self.store
            .find_hackathon(id)
            .await?
            .ok_or_else(|| LifecycleError::not_found("hackathon"))
    }

    /// Current phase of a stored hackathon.
    pub async fn phase_of(&self, id: HackathonId) -> Result<Phase> {
        let hackathon = self.load(id).await?;
        Ok(phase::evaluate(&hackathon, self.now()))
    }

    /// Load the hackathon and run the gate for `action`.
    pub async fn admit(
        &self,
        principal: &Principal,
        id: HackathonId,
        action: Action,
    ) -> Result<Admission> {
        let caller = self.authenticate(principal).await?;
        let hackathon = self.load(id).await?;
        let phase = phase::evaluate(&hackathon, self.now());
        let is_participant = self.store.find_participant(id, caller.id).await?.is_some();
        let facts = RoleFacts::derive(&Principal::from(&caller), &hackathon, is_participant);
        gate::authorize(&facts, action, phase)?;
        Ok(Admission {
            caller,
            hackathon,
            phase,
            facts,
        })
    }

    /// Dispatch a request after resolving the principal.
    pub async fn execute(
        &self,
        principal: Option<&Principal>,
        id: HackathonId,
        request: ActionRequest,
    ) -> Result<ActionOutcome> {
        let principal = principal.ok_or(LifecycleError::Unauthenticated)?;
        let outcome = match request {
            ActionRequest::Participate => {
                ActionOutcome::Participant(self.participate(principal, id).await?)
            }
            ActionRequest::SubmitWork(submission) => {
                ActionOutcome::Participant(self.submit_work(principal, id, submission).await?)
            }
            ActionRequest::ViewParticipants => {
                ActionOutcome::Entrants(self.view_participants(principal, id).await?)
            }
            ActionRequest::ViewSubmissions => {
                ActionOutcome::Submissions(self.view_submissions(principal, id).await?)
            }
            ActionRequest::ViewSubmission { username } => {
                ActionOutcome::Submission(self.view_submission(principal, id, &username).await?)
            }
            ActionRequest::Judge { username, score } => {
                ActionOutcome::Participant(self.judge(principal, id, &username, score).await?)
            }
            ActionRequest::NotifyAll(message) => {
                ActionOutcome::Notified(self.notify_all(principal, id, &message).await?)
            }
            ActionRequest::NotifyParticipant { username, message } => {
                self.notify_participant(principal, id, &username, &message)
                    .await?;
                ActionOutcome::Notified(1)
            }
            ActionRequest::DistributePrizes => {
                ActionOutcome::Prizes(self.distribute_prizes(principal, id).await?)
            }
            ActionRequest::ViewLeaderboard => {
                ActionOutcome::Leaderboard(self.leaderboard(id).await?)
            }
        };
        Ok(outcome)
    }

    /// Enrol the caller and mail a confirmation.
    ///
    /// The participant row is kept even if the confirmation cannot be delivered.
    #[instrument(skip(self, principal), fields(user = %principal.username))]
    pub async fn participate(&self, principal: &Principal, id: HackathonId) -> Result<Participant> {
        let Admission {
            caller: entrant,
            hackathon,
            ..
        } = self.admit(principal, id, Action::Participate).await?;

        let participant = self
            .store
            .create_participant(Participant::enrol(id, principal.id, self.now()))
            .await?;

        self.notifier
            .send(
                &entrant.email,
                &format!("Participation in hackathon {}", hackathon.title),
                &format!(
                    "You have successfully participated in hackathon {}",
                    hackathon.title
                ),
            )
            .await?;
        Ok(participant)
    }

    #[instrument(skip(self, principal, submission), fields(user = %principal.username))]
    pub async fn submit_work(
        &self,
        principal: &Principal,
        id: HackathonId,
        submission: Submission,
    ) -> Result<Participant> {
        self.admit(principal, id, Action::SubmitWork).await?;
        let mut participant = self
            .store
            .find_participant(id, principal.id)
            .await?
            .ok_or(Denial::Role(RoleReason::NotParticipant))?;

        participant.demo_url = submission.demo_url;
        participant.code_url = submission.code_url;
        Ok(self.store.update_participant(&participant).await?)
    }

    #[instrument(skip(self, principal), fields(user = %principal.username))]
    pub async fn view_participants(&self, principal: &Principal, id: HackathonId) -> Result<Entrants> {
        self.admit(principal, id, Action::ViewParticipants).await?;
        let rows = self.store.list_participants(id).await?;
        let mut participants = Vec::with_capacity(rows.len());
        for row in &rows {
            match self.store.find_user(row.user_id).await? {
                Some(user) => participants.push(EntrantProfile::from(&user)),
                None => warn!(user_id = row.user_id, "Participant without a live user record"),
            }
        }
        Ok(Entrants {
            total: rows.len() as u64,
            participants,
        })
    }

    #[instrument(skip(self, principal), fields(user = %principal.username))]
    pub async fn view_submissions(
        &self,
        principal: &Principal,
        id: HackathonId,
    ) -> Result<Vec<SubmissionView>> {
        self.admit(principal, id, Action::ViewSubmissions).await?;
        let rows = self.store.list_participants(id).await?;
        let mut views = Vec::with_capacity(rows.len());
        for row in rows {
            let user = self.resolve_user(row.user_id).await?;
            views.push(submission_view(row, user.username));
        }
        Ok(views)
    }

    #[instrument(skip(self, principal), fields(user = %principal.username))]
    pub async fn view_submission(
        &self,
        principal: &Principal,
        id: HackathonId,
        username: &str,
    ) -> Result<SubmissionView> {
        self.admit(principal, id, Action::ViewSubmissions).await?;
        let (user, row) = self.entrant_by_username(id, username).await?;
        Ok(submission_view(row, user.username))
    }

    /// Record a score. Allowed once the hackathon has ended.
    #[instrument(skip(self, principal), fields(user = %principal.username))]
    pub async fn judge(
        &self,
        principal: &Principal,
        id: HackathonId,
        username: &str,
        score: i32,
    ) -> Result<Participant> {
        if score < 0 {
            return Err(LifecycleError::Validation(
                "score cannot be negative".into(),
            ));
        }
        self.admit(principal, id, Action::JudgeSubmission).await?;
        let (_, mut row) = self.entrant_by_username(id, username).await?;
        row.score = score;
        Ok(self.store.update_participant(&row).await?)
    }

    /// Mail every participant. Returns how many mails went out.
    ///
    /// Stops at the first failure; mails already sent stay sent.
    #[instrument(skip(self, principal, message), fields(user = %principal.username))]
    pub async fn notify_all(
        &self,
        principal: &Principal,
        id: HackathonId,
        message: &Message,
    ) -> Result<usize> {
        self.admit(principal, id, Action::NotifyAll).await?;
        let rows = self.store.list_participants(id).await?;
        let mut sent = 0;
        for row in rows {
            let user = self.resolve_user(row.user_id).await?;
            self.notifier
                .send(&user.email, &message.subject, &message.content)
                .await?;
            sent += 1;
        }
        Ok(sent)
    }

    #[instrument(skip(self, principal, message), fields(user = %principal.username))]
    pub async fn notify_participant(
        &self,
        principal: &Principal,
        id: HackathonId,
        username: &str,
        message: &Message,
    ) -> Result<()> {
        self.admit(principal, id, Action::NotifyParticipant).await?;
        let (user, _) = self.entrant_by_username(id, username).await?;
        self.notifier
            .send(&user.email, &message.subject, &message.content)
            .await?;
        Ok(())
    }

    /// Mail the top three of the leaderboard.
    ///
    /// Winners whose user record is gone are logged and skipped. A delivery
    /// failure ends the run; earlier winners have already been mailed.
    #[instrument(skip(self, principal), fields(user = %principal.username))]
    pub async fn distribute_prizes(
        &self,
        principal: &Principal,
        id: HackathonId,
    ) -> Result<PrizeReport> {
        self.admit(principal, id, Action::PrizeDistribution).await?;
        let winners = ranking::winners(self.store.list_participants(id).await?);

        let mut report = PrizeReport::default();
        for winner in winners {
            let user = match self.store.find_user(winner.user_id).await {
                Ok(Some(user)) => user,
                Ok(None) => {
                    warn!(user_id = winner.user_id, "Winner has no live user record, skipping");
                    report.skipped += 1;
                    continue;
                }
                Err(e) => {
                    warn!(user_id = winner.user_id, error = %e, "Failed to resolve winner, skipping");
                    report.skipped += 1;
                    continue;
                }
            };
            self.notifier
                .send(&user.email, PRIZE_SUBJECT, PRIZE_CONTENT)
                .await?;
            report.notified.push(user.username);
        }
        Ok(report)
    }

    /// Public ranking. Until results are declared only a placeholder is returned.
    #[instrument(skip(self))]
    pub async fn leaderboard(&self, id: HackathonId) -> Result<Leaderboard> {
        let hackathon = self.load(id).await?;
        let phase = phase::evaluate(&hackathon, self.now());
        gate::authorize(&RoleFacts::default(), Action::ViewLeaderboard, phase)?;
        if phase != Phase::ResultsDeclared {
            return Ok(Leaderboard::NotDeclared {
                message: RESULTS_PENDING.to_string(),
            });
        }

        let ranked = ranking::rank(self.store.list_participants(id).await?);
        let mut entries = Vec::with_capacity(ranked.len());
        for row in ranked {
            match self.store.find_user(row.user_id).await? {
                Some(user) => entries.push(LeaderboardEntry {
                    rank: entries.len() + 1,
                    username: user.username,
                    full_name: user.full_name,
                    score: row.score,
                }),
                None => warn!(user_id = row.user_id, "Leaderboard entry without a live user record"),
            }
        }
        Ok(Leaderboard::Declared { entries })
    }

    async fn resolve_user(&self, id: i32) -> Result<User> {
        self.store
            .find_user(id)
            .await?
            .ok_or_else(|| LifecycleError::not_found("user"))
    }

    /// The caller's live account. Tokens outlive soft-deleted accounts, so a
    /// principal without a live record is treated as unauthenticated.
    pub(crate) async fn authenticate(&self, principal: &Principal) -> Result<User> {
        self.store
            .find_user(principal.id)
            .await?
            .ok_or(LifecycleError::Unauthenticated)
    }

    async fn entrant_by_username(
        &self,
        id: HackathonId,
        username: &str,
    ) -> Result<(User, Participant)> {
        let user = self
            .store
            .find_user_by_username(username)
            .await?
            .ok_or_else(|| LifecycleError::not_found("user"))?;
        let row = self
            .store
            .find_participant(id, user.id)
            .await?
            .ok_or_else(|| LifecycleError::not_found("participant"))?;
        Ok((user, row))
    }
}

fn submission_view(row: Participant, username: String) -> SubmissionView {
    SubmissionView {
        hackathon_id: row.hackathon_id,
        username,
        demo_url: row.demo_url,
        code_url: row.code_url,
        score: row.score,
    }
}
