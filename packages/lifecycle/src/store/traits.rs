use async_trait::async_trait;

use super::error::StoreError;
use crate::model::{
    Hackathon, HackathonId, NewHackathon, NewUser, Participant, User, UserId,
};

/// Selects hackathons for listing. Results are ordered by `starting_time`, latest first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HackathonQuery {
    /// Hackathons whose `admin_approved` flag equals the given value.
    Approval(bool),
    /// Hackathons organised by the given user.
    OrganisedBy(UserId),
}

/// Persistence for hackathons, users and participants.
///
/// Lookups of users never return soft-deleted accounts.
#[async_trait]
pub trait EntityStore: Send + Sync {
    async fn find_hackathon(&self, id: HackathonId) -> Result<Option<Hackathon>, StoreError>;

    /// Insert a hackathon. Fails with `Conflict` when the title is taken.
    async fn create_hackathon(&self, new: NewHackathon) -> Result<Hackathon, StoreError>;

    /// Overwrite a stored hackathon. Fails with `NotFound` if it no longer exists.
    async fn update_hackathon(&self, hackathon: &Hackathon) -> Result<Hackathon, StoreError>;

    /// Hard-delete a hackathon together with its participant rows.
    ///
    /// Returns `true` if the hackathon was deleted, `false` if it did not exist.
    async fn delete_hackathon(&self, id: HackathonId) -> Result<bool, StoreError>;

    async fn list_hackathons(&self, query: HackathonQuery) -> Result<Vec<Hackathon>, StoreError>;

    async fn find_user(&self, id: UserId) -> Result<Option<User>, StoreError>;

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    /// Insert a user. Fails with `Conflict` when the username or email is taken.
    async fn create_user(&self, new: NewUser) -> Result<User, StoreError>;

    /// Overwrite a stored user's profile. Fails with `Conflict` when the new email is taken.
    async fn update_user(&self, user: &User) -> Result<User, StoreError>;

    /// Mark a user as deleted. Returns `false` if there was no live user to delete.
    async fn soft_delete_user(&self, id: UserId) -> Result<bool, StoreError>;

    async fn find_participant(
        &self,
        hackathon_id: HackathonId,
        user_id: UserId,
    ) -> Result<Option<Participant>, StoreError>;

    /// Insert a participant row. Fails with `Conflict` when the pair already exists.
    async fn create_participant(&self, participant: Participant)
    -> Result<Participant, StoreError>;

    /// Overwrite a participant row. Fails with `NotFound` if it does not exist.
    async fn update_participant(
        &self,
        participant: &Participant,
    ) -> Result<Participant, StoreError>;

    /// All participants of a hackathon, in insertion order.
    async fn list_participants(
        &self,
        hackathon_id: HackathonId,
    ) -> Result<Vec<Participant>, StoreError>;

    /// Every participation of one user, in insertion order.
    async fn list_participations(&self, user_id: UserId) -> Result<Vec<Participant>, StoreError>;

    async fn count_participants(&self, hackathon_id: HackathonId) -> Result<u64, StoreError> {
        Ok(self.list_participants(hackathon_id).await?.len() as u64)
    }
}
