use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, instrument};

use crate::engine::LifecycleEngine;
use crate::error::{LifecycleError, Result};
use crate::gate::{self, AccountAction, Denial};
use crate::model::{Hackathon, HackathonDraft, HackathonId, NewHackathon, Principal};
use crate::phase::{self, Phase};
use crate::store::HackathonQuery;

/// A hackathon as listed to callers, with its phase and entrant count.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HackathonSummary {
    pub id: HackathonId,
    pub title: String,
    pub starting_time: DateTime<Utc>,
    pub ending_time: DateTime<Utc>,
    pub result_time: DateTime<Utc>,
    pub organisation_name: String,
    pub description: String,
    pub admin_approved: bool,
    pub phase: Phase,
    pub participants: u64,
}

impl HackathonSummary {
    pub fn new(hackathon: Hackathon, phase: Phase, participants: u64) -> Self {
        Self {
            id: hackathon.id,
            title: hackathon.title,
            starting_time: hackathon.starting_time,
            ending_time: hackathon.ending_time,
            result_time: hackathon.result_time,
            organisation_name: hackathon.organisation_name,
            description: hackathon.description,
            admin_approved: hackathon.admin_approved,
            phase,
            participants,
        }
    }
}

impl LifecycleEngine {
    /// Create a hackathon organised by the caller. Admins skip the review.
    #[instrument(skip(self, principal, draft), fields(user = %principal.username, title = %draft.title))]
    pub async fn create_hackathon(
        &self,
        principal: &Principal,
        draft: HackathonDraft,
    ) -> Result<Hackathon> {
        draft.validate()?;
        let organiser = self.authenticate(principal).await?;
        let hackathon = self
            .store
            .create_hackathon(NewHackathon {
                title: draft.title.trim().to_string(),
                starting_time: draft.starting_time,
                ending_time: draft.ending_time,
                result_time: draft.result_time,
                organiser_id: organiser.id,
                organisation_name: draft.organisation_name,
                description: draft.description,
                admin_approved: organiser.is_admin,
            })
            .await?;
        info!(
            hackathon_id = hackathon.id,
            approved = hackathon.admin_approved,
            "Hackathon created"
        );
        Ok(hackathon)
    }

    /// Approved hackathons, latest start first.
    pub async fn list_public(&self) -> Result<Vec<HackathonSummary>> {
        self.summarise(HackathonQuery::Approval(true)).await
    }

    /// One approved hackathon. Unreviewed hackathons are not visible.
    pub async fn details(&self, id: HackathonId) -> Result<HackathonSummary> {
        let hackathon = self
            .store
            .find_hackathon(id)
            .await?
            .filter(|h| h.admin_approved)
            .ok_or_else(|| LifecycleError::not_found("hackathon"))?;
        let count = self.store.count_participants(id).await?;
        let phase = phase::evaluate(&hackathon, self.now());
        Ok(HackathonSummary::new(hackathon, phase, count))
    }

    pub async fn list_organised(&self, principal: &Principal) -> Result<Vec<HackathonSummary>> {
        let caller = Principal::from(&self.authenticate(principal).await?);
        gate::authorize_account(&caller, AccountAction::ListOrganised).map_err(Denial::Role)?;
        self.summarise(HackathonQuery::OrganisedBy(caller.id)).await
    }

    pub async fn list_unapproved(&self, principal: &Principal) -> Result<Vec<HackathonSummary>> {
        let caller = Principal::from(&self.authenticate(principal).await?);
        gate::authorize_account(&caller, AccountAction::ListUnapproved).map_err(Denial::Role)?;
        self.summarise(HackathonQuery::Approval(false)).await
    }

    async fn summarise(&self, query: HackathonQuery) -> Result<Vec<HackathonSummary>> {
        let now = self.now();
        let hackathons = self.store.list_hackathons(query).await?;
        let mut summaries = Vec::with_capacity(hackathons.len());
        for hackathon in hackathons {
            let count = self.store.count_participants(hackathon.id).await?;
            let phase = phase::evaluate(&hackathon, now);
            summaries.push(HackathonSummary::new(hackathon, phase, count));
        }
        Ok(summaries)
    }
}
