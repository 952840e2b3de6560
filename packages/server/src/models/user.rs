use chrono::{DateTime, Utc};
use lifecycle::account::MyHackathons;
use lifecycle::catalogue::HackathonSummary;
use lifecycle::model::{ProfileUpdate, User};
use serde::{Deserialize, Serialize};

use super::hackathon::HackathonResponse;

/// A user's own profile. The password hash is never exposed.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ProfileResponse {
    #[schema(example = 42)]
    pub id: i32,
    #[schema(example = "ada")]
    pub username: String,
    #[schema(example = "Ada Lovelace")]
    pub full_name: String,
    #[schema(example = "ada@example.com")]
    pub email: String,
    pub linked_in: String,
    pub github: String,
    pub web_link: String,
    pub organisation: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for ProfileResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            full_name: user.full_name,
            email: user.email,
            linked_in: user.linked_in,
            github: user.github,
            web_link: user.web_link,
            organisation: user.organisation,
            is_admin: user.is_admin,
            created_at: user.created_at,
        }
    }
}

/// Profile fields to change. Omitted or empty fields keep their value.
#[derive(Deserialize, Default, utoipa::ToSchema)]
pub struct UpdateProfileRequest {
    #[schema(example = "ada@new.example")]
    pub email: Option<String>,
    pub linked_in: Option<String>,
    pub github: Option<String>,
    pub web_link: Option<String>,
    pub organisation: Option<String>,
}

impl From<UpdateProfileRequest> for ProfileUpdate {
    fn from(req: UpdateProfileRequest) -> Self {
        ProfileUpdate {
            email: req.email.map(|e| e.trim().to_string()).unwrap_or_default(),
            linked_in: req.linked_in.unwrap_or_default(),
            github: req.github.unwrap_or_default(),
            web_link: req.web_link.unwrap_or_default(),
            organisation: req.organisation.unwrap_or_default(),
        }
    }
}

/// Hackathons the caller takes part in, grouped by where they are in their lifecycle.
#[derive(Serialize, utoipa::ToSchema)]
pub struct MyHackathonsResponse {
    /// Running now.
    pub active: Vec<HackathonResponse>,
    /// Approved but not started yet.
    pub future: Vec<HackathonResponse>,
    /// Ended, being judged, or with results out.
    pub past: Vec<HackathonResponse>,
}

impl From<MyHackathons> for MyHackathonsResponse {
    fn from(mine: MyHackathons) -> Self {
        let convert = |list: Vec<HackathonSummary>| -> Vec<HackathonResponse> {
            list.into_iter().map(HackathonResponse::from).collect()
        };
        Self {
            active: convert(mine.active),
            future: convert(mine.future),
            past: convert(mine.past),
        }
    }
}
