use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::LifecycleError;

pub type HackathonId = i32;
pub type UserId = i32;

/// Maximum length of short text columns (title, organisation name, username).
pub const SHORT_TEXT_MAX: usize = 50;

/// Minimum length of both the hacking window and the judging window.
pub fn minimum_window() -> Duration {
    Duration::hours(1)
}

/// A hackathon as persisted by the entity store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hackathon {
    pub id: HackathonId,
    pub title: String,
    pub starting_time: DateTime<Utc>,
    pub ending_time: DateTime<Utc>,
    pub result_time: DateTime<Utc>,
    pub organiser_id: UserId,
    pub organisation_name: String,
    pub description: String,
    pub admin_approved: bool,
    pub created_at: DateTime<Utc>,
}

/// Caller-supplied fields of a hackathon that is about to be created.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct HackathonDraft {
    pub title: String,
    pub starting_time: DateTime<Utc>,
    pub ending_time: DateTime<Utc>,
    pub result_time: DateTime<Utc>,
    #[serde(default)]
    pub organisation_name: String,
    pub description: String,
}

impl HackathonDraft {
    /// Check the field and timeline invariants of a hackathon.
    pub fn validate(&self) -> Result<(), LifecycleError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(LifecycleError::Validation("Title cannot be empty".into()));
        }
        if title.chars().count() > SHORT_TEXT_MAX {
            return Err(LifecycleError::Validation(format!(
                "Title must be at most {SHORT_TEXT_MAX} characters"
            )));
        }
        if self.description.trim().is_empty() {
            return Err(LifecycleError::Validation(
                "Description cannot be empty".into(),
            ));
        }
        if self.organisation_name.chars().count() > SHORT_TEXT_MAX {
            return Err(LifecycleError::Validation(format!(
                "Organisation name must be at most {SHORT_TEXT_MAX} characters"
            )));
        }
        if self.ending_time <= self.starting_time {
            return Err(LifecycleError::Validation(
                "Ending time should be after starting time".into(),
            ));
        }
        if self.result_time <= self.ending_time {
            return Err(LifecycleError::Validation(
                "Result time should be after ending time".into(),
            ));
        }
        if self.ending_time - self.starting_time < minimum_window() {
            return Err(LifecycleError::Validation(
                "Hackathon should be at least an hour long".into(),
            ));
        }
        if self.result_time - self.ending_time < minimum_window() {
            return Err(LifecycleError::Validation(
                "Judging period should be at least an hour long".into(),
            ));
        }
        Ok(())
    }
}

/// Insert payload for the entity store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewHackathon {
    pub title: String,
    pub starting_time: DateTime<Utc>,
    pub ending_time: DateTime<Utc>,
    pub result_time: DateTime<Utc>,
    pub organiser_id: UserId,
    pub organisation_name: String,
    pub description: String,
    pub admin_approved: bool,
}

/// A registered account. `deleted_at` is set on profile deletion.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub full_name: String,
    #[serde(skip_serializing)]
    pub hashed_password: String,
    pub email: String,
    pub linked_in: String,
    pub github: String,
    pub web_link: String,
    pub organisation: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Insert payload for a user. The password arrives already hashed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub full_name: String,
    pub hashed_password: String,
    pub email: String,
    pub linked_in: String,
    pub github: String,
    pub web_link: String,
    pub organisation: String,
    pub is_admin: bool,
}

/// Profile fields that may be changed after signup. Empty strings mean "keep".
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub linked_in: String,
    #[serde(default)]
    pub github: String,
    #[serde(default)]
    pub web_link: String,
    #[serde(default)]
    pub organisation: String,
}

impl ProfileUpdate {
    /// Overwrite the fields of `user` that this update provides.
    pub fn apply_to(&self, user: &mut User) {
        let merge = |target: &mut String, value: &str| {
            if !value.is_empty() {
                *target = value.to_string();
            }
        };
        merge(&mut user.email, &self.email);
        merge(&mut user.linked_in, &self.linked_in);
        merge(&mut user.github, &self.github);
        merge(&mut user.web_link, &self.web_link);
        merge(&mut user.organisation, &self.organisation);
    }
}

/// One user's entry in one hackathon.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub hackathon_id: HackathonId,
    pub user_id: UserId,
    pub demo_url: String,
    pub code_url: String,
    pub score: i32,
    pub registered_at: DateTime<Utc>,
}

impl Participant {
    pub fn enrol(hackathon_id: HackathonId, user_id: UserId, at: DateTime<Utc>) -> Self {
        Self {
            hackathon_id,
            user_id,
            demo_url: String::new(),
            code_url: String::new(),
            score: 0,
            registered_at: at,
        }
    }
}

/// The authenticated caller, as vouched for by the authentication layer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: UserId,
    pub username: String,
    pub is_admin: bool,
}

impl From<&User> for Principal {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            is_admin: user.is_admin,
        }
    }
}
