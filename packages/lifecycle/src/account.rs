use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::catalogue::HackathonSummary;
use crate::engine::LifecycleEngine;
use crate::error::{LifecycleError, Result};
use crate::gate::{Denial, RoleReason};
use crate::model::{NewUser, Principal, ProfileUpdate, SHORT_TEXT_MAX, User};
use crate::phase::{self, Phase};

pub const MIN_PASSWORD_LEN: usize = 6;

/// Signup payload, password still in clear text.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Registration {
    pub username: String,
    pub password: String,
    pub full_name: String,
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

impl Registration {
    pub fn validate(&self) -> Result<()> {
        let username = self.username.as_str();
        if username.is_empty()
            || username.chars().count() > SHORT_TEXT_MAX
            || !username.chars().all(|c| c.is_ascii_alphanumeric())
        {
            return Err(LifecycleError::Validation(format!(
                "username must be 1-{SHORT_TEXT_MAX} alphanumeric characters"
            )));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(LifecycleError::Validation(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        if self.full_name.trim().is_empty() {
            return Err(LifecycleError::Validation("full name cannot be empty".into()));
        }
        validate_email(&self.email)
    }
}

fn validate_email(email: &str) -> Result<()> {
    if email.contains('@') {
        Ok(())
    } else {
        Err(LifecycleError::Validation("email address is invalid".into()))
    }
}

/// Hackathons a user has entered, grouped by where they are in their life.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MyHackathons {
    pub active: Vec<HackathonSummary>,
    pub future: Vec<HackathonSummary>,
    pub past: Vec<HackathonSummary>,
}

impl LifecycleEngine {
    /// Create an account. `hash` turns the clear-text password into its stored form
    /// and only runs once the registration is valid.
    #[instrument(skip(self, registration, hash), fields(username = %registration.username))]
    pub async fn sign_up<H>(&self, registration: Registration, hash: H) -> Result<User>
    where
        H: FnOnce(&str) -> Result<String> + Send,
    {
        self.register(registration, hash, false).await
    }

    /// Create an admin account on behalf of an existing admin.
    #[instrument(skip(self, principal, registration, hash), fields(admin = %principal.username))]
    pub async fn create_admin<H>(
        &self,
        principal: &Principal,
        registration: Registration,
        hash: H,
    ) -> Result<User>
    where
        H: FnOnce(&str) -> Result<String> + Send,
    {
        if !self.authenticate(principal).await?.is_admin {
            return Err(Denial::Role(RoleReason::AdminOnly).into());
        }
        self.register(registration, hash, true).await
    }

    /// Create an admin without a calling principal. Used for the bootstrap account.
    pub async fn bootstrap_admin<H>(&self, registration: Registration, hash: H) -> Result<User>
    where
        H: FnOnce(&str) -> Result<String> + Send,
    {
        self.register(registration, hash, true).await
    }

    async fn register<H>(&self, registration: Registration, hash: H, is_admin: bool) -> Result<User>
    where
        H: FnOnce(&str) -> Result<String> + Send,
    {
        registration.validate()?;
        let hashed_password = hash(&registration.password)?;
        let user = self
            .store
            .create_user(NewUser {
                username: registration.username,
                full_name: registration.full_name.trim().to_string(),
                hashed_password,
                email: registration.email,
                linked_in: registration.linked_in,
                github: registration.github,
                web_link: registration.web_link,
                organisation: registration.organisation,
                is_admin,
            })
            .await?;
        info!(user_id = user.id, is_admin, "User registered");
        Ok(user)
    }

    /// Live account by username, for credential checks.
    pub async fn account(&self, username: &str) -> Result<User> {
        self.store
            .find_user_by_username(username)
            .await?
            .ok_or_else(|| LifecycleError::not_found("user"))
    }

    pub async fn view_profile(&self, principal: &Principal) -> Result<User> {
        self.store
            .find_user(principal.id)
            .await?
            .ok_or_else(|| LifecycleError::not_found("user"))
    }

    /// Merge the provided profile fields into the caller's account.
    #[instrument(skip(self, principal, update), fields(user = %principal.username))]
    pub async fn update_profile(&self, principal: &Principal, update: ProfileUpdate) -> Result<User> {
        if !update.email.is_empty() {
            validate_email(&update.email)?;
        }
        let mut user = self.view_profile(principal).await?;
        update.apply_to(&mut user);
        Ok(self.store.update_user(&user).await?)
    }

    /// Soft-delete the caller's account.
    #[instrument(skip(self, principal), fields(user = %principal.username))]
    pub async fn delete_profile(&self, principal: &Principal) -> Result<()> {
        if self.store.soft_delete_user(principal.id).await? {
            Ok(())
        } else {
            Err(LifecycleError::not_found("user"))
        }
    }

    /// Approved hackathons the caller participates in.
    pub async fn my_hackathons(&self, principal: &Principal) -> Result<MyHackathons> {
        let caller = self.authenticate(principal).await?;
        let now = self.now();
        let mut mine = MyHackathons::default();
        for entry in self.store.list_participations(caller.id).await? {
            let Some(hackathon) = self.store.find_hackathon(entry.hackathon_id).await? else {
                continue;
            };
            if !hackathon.admin_approved {
                continue;
            }
            let count = self.store.count_participants(hackathon.id).await?;
            let phase = phase::evaluate(&hackathon, now);
            let summary = HackathonSummary::new(hackathon, phase, count);
            match phase {
                Phase::Active => mine.active.push(summary),
                Phase::Approved => mine.future.push(summary),
                _ => mine.past.push(summary),
            }
        }
        Ok(mine)
    }
}
