use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use super::error::StoreError;
use super::traits::{EntityStore, HackathonQuery};
use crate::model::{
    Hackathon, HackathonId, NewHackathon, NewUser, Participant, User, UserId,
};

#[derive(Default)]
struct Tables {
    hackathons: BTreeMap<HackathonId, Hackathon>,
    users: BTreeMap<UserId, User>,
    /// Kept in insertion order.
    participants: Vec<Participant>,
    next_hackathon_id: HackathonId,
    next_user_id: UserId,
}

/// Process-local [`EntityStore`] with the same uniqueness rules as the SQL schema.
#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
    offline: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with a backend error (or recover).
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check_online(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            Err(StoreError::Backend("store offline".into()))
        } else {
            Ok(())
        }
    }
}

fn by_start_desc(mut hackathons: Vec<Hackathon>) -> Vec<Hackathon> {
    hackathons.sort_by(|a, b| b.starting_time.cmp(&a.starting_time));
    hackathons
}

#[async_trait]
impl EntityStore for InMemoryStore {
    async fn find_hackathon(&self, id: HackathonId) -> Result<Option<Hackathon>, StoreError> {
        self.check_online()?;
        Ok(self.tables.lock().await.hackathons.get(&id).cloned())
    }

    async fn create_hackathon(&self, new: NewHackathon) -> Result<Hackathon, StoreError> {
        self.check_online()?;
        let mut tables = self.tables.lock().await;
        if tables.hackathons.values().any(|h| h.title == new.title) {
            return Err(StoreError::Conflict("Hackathon title already exists".into()));
        }
        tables.next_hackathon_id += 1;
        let hackathon = Hackathon {
            id: tables.next_hackathon_id,
            title: new.title,
            starting_time: new.starting_time,
            ending_time: new.ending_time,
            result_time: new.result_time,
            organiser_id: new.organiser_id,
            organisation_name: new.organisation_name,
            description: new.description,
            admin_approved: new.admin_approved,
            created_at: Utc::now(),
        };
        tables.hackathons.insert(hackathon.id, hackathon.clone());
        Ok(hackathon)
    }

    async fn update_hackathon(&self, hackathon: &Hackathon) -> Result<Hackathon, StoreError> {
        self.check_online()?;
        let mut tables = self.tables.lock().await;
        if tables
            .hackathons
            .values()
            .any(|h| h.id != hackathon.id && h.title == hackathon.title)
        {
            return Err(StoreError::Conflict("Hackathon title already exists".into()));
        }
        let slot = tables
            .hackathons
            .get_mut(&hackathon.id)
            .ok_or(StoreError::NotFound("hackathon"))?;
        *slot = hackathon.clone();
        Ok(hackathon.clone())
    }

    async fn delete_hackathon(&self, id: HackathonId) -> Result<bool, StoreError> {
        self.check_online()?;
        let mut tables = self.tables.lock().await;
        if tables.hackathons.remove(&id).is_none() {
            return Ok(false);
        }
        tables.participants.retain(|p| p.hackathon_id != id);
        Ok(true)
    }

    async fn list_hackathons(&self, query: HackathonQuery) -> Result<Vec<Hackathon>, StoreError> {
        self.check_online()?;
        let tables = self.tables.lock().await;
        let selected = tables
            .hackathons
            .values()
            .filter(|h| match query {
                HackathonQuery::Approval(approved) => h.admin_approved == approved,
                HackathonQuery::OrganisedBy(user_id) => h.organiser_id == user_id,
            })
            .cloned()
            .collect();
        Ok(by_start_desc(selected))
    }

    async fn find_user(&self, id: UserId) -> Result<Option<User>, StoreError> {
        self.check_online()?;
        let tables = self.tables.lock().await;
        Ok(tables
            .users
            .get(&id)
            .filter(|u| u.deleted_at.is_none())
            .cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        self.check_online()?;
        let tables = self.tables.lock().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.username == username && u.deleted_at.is_none())
            .cloned())
    }

    async fn create_user(&self, new: NewUser) -> Result<User, StoreError> {
        self.check_online()?;
        let mut tables = self.tables.lock().await;
        if tables
            .users
            .values()
            .any(|u| u.username == new.username || u.email == new.email)
        {
            return Err(StoreError::Conflict("User already exists".into()));
        }
        tables.next_user_id += 1;
        let user = User {
            id: tables.next_user_id,
            username: new.username,
            full_name: new.full_name,
            hashed_password: new.hashed_password,
            email: new.email,
            linked_in: new.linked_in,
            github: new.github,
            web_link: new.web_link,
            organisation: new.organisation,
            is_admin: new.is_admin,
            created_at: Utc::now(),
            deleted_at: None,
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update_user(&self, user: &User) -> Result<User, StoreError> {
        self.check_online()?;
        let mut tables = self.tables.lock().await;
        if tables
            .users
            .values()
            .any(|u| u.id != user.id && u.email == user.email)
        {
            return Err(StoreError::Conflict("Email already in use".into()));
        }
        let slot = tables
            .users
            .get_mut(&user.id)
            .filter(|u| u.deleted_at.is_none())
            .ok_or(StoreError::NotFound("user"))?;
        *slot = user.clone();
        Ok(user.clone())
    }

    async fn soft_delete_user(&self, id: UserId) -> Result<bool, StoreError> {
        self.check_online()?;
        let mut tables = self.tables.lock().await;
        match tables.users.get_mut(&id) {
            Some(user) if user.deleted_at.is_none() => {
                user.deleted_at = Some(Utc::now());
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn find_participant(
        &self,
        hackathon_id: HackathonId,
        user_id: UserId,
    ) -> Result<Option<Participant>, StoreError> {
        self.check_online()?;
        let tables = self.tables.lock().await;
        Ok(tables
            .participants
            .iter()
            .find(|p| p.hackathon_id == hackathon_id && p.user_id == user_id)
            .cloned())
    }

    async fn create_participant(
        &self,
        participant: Participant,
    ) -> Result<Participant, StoreError> {
        self.check_online()?;
        let mut tables = self.tables.lock().await;
        if tables
            .participants
            .iter()
            .any(|p| p.hackathon_id == participant.hackathon_id && p.user_id == participant.user_id)
        {
            return Err(StoreError::Conflict(
                "already participating in this hackathon".into(),
            ));
        }
        if !tables.hackathons.contains_key(&participant.hackathon_id) {
            return Err(StoreError::NotFound("hackathon"));
        }
        tables.participants.push(participant.clone());
        Ok(participant)
    }

    async fn update_participant(
        &self,
        participant: &Participant,
    ) -> Result<Participant, StoreError> {
        self.check_online()?;
        let mut tables = self.tables.lock().await;
        let slot = tables
            .participants
            .iter_mut()
            .find(|p| p.hackathon_id == participant.hackathon_id && p.user_id == participant.user_id)
            .ok_or(StoreError::NotFound("participant"))?;
        *slot = participant.clone();
        Ok(participant.clone())
    }

    async fn list_participants(
        &self,
        hackathon_id: HackathonId,
    ) -> Result<Vec<Participant>, StoreError> {
        self.check_online()?;
        let tables = self.tables.lock().await;
        Ok(tables
            .participants
            .iter()
            .filter(|p| p.hackathon_id == hackathon_id)
            .cloned()
            .collect())
    }

    async fn list_participations(&self, user_id: UserId) -> Result<Vec<Participant>, StoreError> {
        self.check_online()?;
        let tables = self.tables.lock().await;
        Ok(tables
            .participants
            .iter()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect())
    }
}
