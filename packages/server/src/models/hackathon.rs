use chrono::{DateTime, Utc};
use lifecycle::approval::ApprovalOutcome;
use lifecycle::catalogue::HackathonSummary;
use lifecycle::engine::{
    EntrantProfile, Entrants, Leaderboard, LeaderboardEntry, Message, PrizeReport, Submission,
    SubmissionView,
};
use lifecycle::model::{HackathonDraft, Participant};
use serde::{Deserialize, Serialize};

/// Request body for creating a hackathon.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateHackathonRequest {
    /// Unique title (1-50 characters).
    #[schema(example = "Rust Jam")]
    pub title: String,
    pub starting_time: DateTime<Utc>,
    /// At least one hour after `starting_time`.
    pub ending_time: DateTime<Utc>,
    /// At least one hour after `ending_time`.
    pub result_time: DateTime<Utc>,
    #[serde(default)]
    #[schema(example = "Crabs Inc")]
    pub organisation_name: String,
    #[schema(example = "Build something fast in 24 hours.")]
    pub description: String,
}

impl From<CreateHackathonRequest> for HackathonDraft {
    fn from(req: CreateHackathonRequest) -> Self {
        HackathonDraft {
            title: req.title,
            starting_time: req.starting_time,
            ending_time: req.ending_time,
            result_time: req.result_time,
            organisation_name: req.organisation_name,
            description: req.description,
        }
    }
}

/// A hackathon with its current phase and number of entrants.
#[derive(Serialize, utoipa::ToSchema)]
pub struct HackathonResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Rust Jam")]
    pub title: String,
    pub starting_time: DateTime<Utc>,
    pub ending_time: DateTime<Utc>,
    pub result_time: DateTime<Utc>,
    pub organisation_name: String,
    pub description: String,
    pub admin_approved: bool,
    /// One of `pending_approval`, `approved`, `active`, `ended`, `results_declared`.
    #[schema(example = "approved")]
    pub phase: String,
    #[schema(example = 12)]
    pub participants: u64,
}

impl From<HackathonSummary> for HackathonResponse {
    fn from(s: HackathonSummary) -> Self {
        Self {
            id: s.id,
            title: s.title,
            starting_time: s.starting_time,
            ending_time: s.ending_time,
            result_time: s.result_time,
            organisation_name: s.organisation_name,
            description: s.description,
            admin_approved: s.admin_approved,
            phase: s.phase.to_string(),
            participants: s.participants,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct HackathonListResponse {
    pub hackathons: Vec<HackathonResponse>,
}

impl From<Vec<HackathonSummary>> for HackathonListResponse {
    fn from(list: Vec<HackathonSummary>) -> Self {
        Self {
            hackathons: list.into_iter().map(HackathonResponse::from).collect(),
        }
    }
}

/// Result of an approval decision.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ApprovalResponse {
    /// One of `approved`, `already_approved`, `disapproved`.
    #[schema(example = "approved")]
    pub outcome: String,
    #[schema(example = "Hackathon approved")]
    pub message: String,
}

impl From<ApprovalOutcome> for ApprovalResponse {
    fn from(outcome: ApprovalOutcome) -> Self {
        let code = match outcome {
            ApprovalOutcome::Approved => "approved",
            ApprovalOutcome::AlreadyApproved => "already_approved",
            ApprovalOutcome::Disapproved => "disapproved",
        };
        Self {
            outcome: code.into(),
            message: outcome.message().into(),
        }
    }
}

/// A participant row: the entrant's hand-in and score.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ParticipationResponse {
    pub hackathon_id: i32,
    pub user_id: i32,
    pub demo_url: String,
    pub code_url: String,
    pub score: i32,
    pub registered_at: DateTime<Utc>,
}

impl From<Participant> for ParticipationResponse {
    fn from(p: Participant) -> Self {
        Self {
            hackathon_id: p.hackathon_id,
            user_id: p.user_id,
            demo_url: p.demo_url,
            code_url: p.code_url,
            score: p.score,
            registered_at: p.registered_at,
        }
    }
}

/// Request body for handing in work. Both URLs are overwritten.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct SubmitWorkRequest {
    #[serde(default)]
    #[schema(example = "https://youtu.be/demo")]
    pub demo_url: String,
    #[serde(default)]
    #[schema(example = "https://github.com/ada/jam")]
    pub code_url: String,
}

impl From<SubmitWorkRequest> for Submission {
    fn from(req: SubmitWorkRequest) -> Self {
        Submission {
            demo_url: req.demo_url,
            code_url: req.code_url,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct EntrantResponse {
    pub id: i32,
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub linked_in: String,
    pub github: String,
    pub web_link: String,
    pub organisation: String,
}

impl From<EntrantProfile> for EntrantResponse {
    fn from(p: EntrantProfile) -> Self {
        Self {
            id: p.id,
            username: p.username,
            full_name: p.full_name,
            email: p.email,
            linked_in: p.linked_in,
            github: p.github,
            web_link: p.web_link,
            organisation: p.organisation,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct EntrantListResponse {
    #[schema(example = 2)]
    pub total_participants: u64,
    pub participants: Vec<EntrantResponse>,
}

impl From<Entrants> for EntrantListResponse {
    fn from(e: Entrants) -> Self {
        Self {
            total_participants: e.total,
            participants: e.participants.into_iter().map(EntrantResponse::from).collect(),
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct SubmissionResponse {
    pub hackathon_id: i32,
    #[schema(example = "ada")]
    pub username: String,
    pub demo_url: String,
    pub code_url: String,
    pub score: i32,
}

impl From<SubmissionView> for SubmissionResponse {
    fn from(v: SubmissionView) -> Self {
        Self {
            hackathon_id: v.hackathon_id,
            username: v.username,
            demo_url: v.demo_url,
            code_url: v.code_url,
            score: v.score,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct SubmissionListResponse {
    pub total_submissions: usize,
    pub submissions: Vec<SubmissionResponse>,
}

impl From<Vec<SubmissionView>> for SubmissionListResponse {
    fn from(list: Vec<SubmissionView>) -> Self {
        Self {
            total_submissions: list.len(),
            submissions: list.into_iter().map(SubmissionResponse::from).collect(),
        }
    }
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct JudgeRequest {
    /// Non-negative score.
    #[schema(example = 87)]
    pub score: i32,
}

/// A mail from the organiser.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct NotifyRequest {
    #[schema(example = "Schedule change")]
    pub subject: String,
    #[schema(example = "Judging starts an hour later.")]
    pub message: String,
}

impl NotifyRequest {
    pub fn into_message(self) -> Message {
        Message {
            subject: self.subject,
            content: self.message,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct NotifyResponse {
    /// Number of mails handed to the notifier.
    pub notified: usize,
    #[schema(example = "Notification sent")]
    pub message: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct PrizeResponse {
    /// Usernames of the mailed winners, best first.
    pub winners: Vec<String>,
    /// Winners that could not be resolved to an account.
    pub skipped: usize,
    #[schema(example = "Prizes distributed")]
    pub message: String,
}

impl From<PrizeReport> for PrizeResponse {
    fn from(report: PrizeReport) -> Self {
        Self {
            winners: report.notified,
            skipped: report.skipped,
            message: "Prizes distributed".into(),
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct LeaderboardRow {
    #[schema(example = 1)]
    pub rank: usize,
    pub username: String,
    pub full_name: String,
    pub score: i32,
}

impl From<LeaderboardEntry> for LeaderboardRow {
    fn from(e: LeaderboardEntry) -> Self {
        Self {
            rank: e.rank,
            username: e.username,
            full_name: e.full_name,
            score: e.score,
        }
    }
}

/// Ranking of a hackathon. Empty with a message until results are declared.
#[derive(Serialize, utoipa::ToSchema)]
pub struct LeaderboardResponse {
    pub declared: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "results not declared yet!!")]
    pub message: Option<String>,
    pub leaderboard: Vec<LeaderboardRow>,
}

impl From<Leaderboard> for LeaderboardResponse {
    fn from(board: Leaderboard) -> Self {
        match board {
            Leaderboard::NotDeclared { message } => Self {
                declared: false,
                message: Some(message),
                leaderboard: Vec::new(),
            },
            Leaderboard::Declared { entries } => Self {
                declared: true,
                message: None,
                leaderboard: entries.into_iter().map(LeaderboardRow::from).collect(),
            },
        }
    }
}
