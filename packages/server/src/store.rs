//! [`EntityStore`] backed by PostgreSQL through sea-orm.

use async_trait::async_trait;
use chrono::Utc;
use lifecycle::model::{
    Hackathon, HackathonId, NewHackathon, NewUser, Participant, User, UserId,
};
use lifecycle::store::{EntityStore, HackathonQuery, StoreError};
use sea_orm::prelude::Expr;
use sea_orm::*;

use crate::entity::{hackathon, participant, user};

#[derive(Clone)]
pub struct SeaOrmStore {
    db: DatabaseConnection,
}

impl SeaOrmStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn backend(err: DbErr) -> StoreError {
    StoreError::Backend(err.to_string())
}

/// Map a write error, turning unique-key violations into `Conflict`.
fn write_err(err: DbErr, conflict: &str, missing: &'static str) -> StoreError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => StoreError::Conflict(conflict.to_string()),
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => StoreError::NotFound(missing),
        _ => match err {
            DbErr::RecordNotUpdated => StoreError::NotFound(missing),
            other => backend(other),
        },
    }
}

impl From<hackathon::Model> for Hackathon {
    fn from(m: hackathon::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            starting_time: m.starting_time,
            ending_time: m.ending_time,
            result_time: m.result_time,
            organiser_id: m.organiser_id,
            organisation_name: m.organisation_name,
            description: m.description,
            admin_approved: m.admin_approved,
            created_at: m.created_at,
        }
    }
}

impl From<user::Model> for User {
    fn from(m: user::Model) -> Self {
        Self {
            id: m.id,
            username: m.username,
            full_name: m.full_name,
            hashed_password: m.password,
            email: m.email,
            linked_in: m.linked_in,
            github: m.github,
            web_link: m.web_link,
            organisation: m.organisation,
            is_admin: m.is_admin,
            created_at: m.created_at,
            deleted_at: m.deleted_at,
        }
    }
}

impl From<participant::Model> for Participant {
    fn from(m: participant::Model) -> Self {
        Self {
            hackathon_id: m.hackathon_id,
            user_id: m.user_id,
            demo_url: m.demo_url,
            code_url: m.code_url,
            score: m.score,
            registered_at: m.registered_at,
        }
    }
}

fn participant_row(hackathon_id: HackathonId, user_id: UserId) -> Select<participant::Entity> {
    participant::Entity::find()
        .filter(participant::Column::HackathonId.eq(hackathon_id))
        .filter(participant::Column::UserId.eq(user_id))
}

const TITLE_TAKEN: &str = "Hackathon title already exists";

#[async_trait]
impl EntityStore for SeaOrmStore {
    async fn find_hackathon(&self, id: HackathonId) -> Result<Option<Hackathon>, StoreError> {
        let found = hackathon::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(backend)?;
        Ok(found.map(Into::into))
    }

    async fn create_hackathon(&self, new: NewHackathon) -> Result<Hackathon, StoreError> {
        let model = hackathon::ActiveModel {
            title: Set(new.title),
            starting_time: Set(new.starting_time),
            ending_time: Set(new.ending_time),
            result_time: Set(new.result_time),
            organiser_id: Set(new.organiser_id),
            organisation_name: Set(new.organisation_name),
            description: Set(new.description),
            admin_approved: Set(new.admin_approved),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| write_err(e, TITLE_TAKEN, "user"))?;
        Ok(model.into())
    }

    async fn update_hackathon(&self, h: &Hackathon) -> Result<Hackathon, StoreError> {
        let model = hackathon::ActiveModel {
            id: Unchanged(h.id),
            title: Set(h.title.clone()),
            starting_time: Set(h.starting_time),
            ending_time: Set(h.ending_time),
            result_time: Set(h.result_time),
            organiser_id: Set(h.organiser_id),
            organisation_name: Set(h.organisation_name.clone()),
            description: Set(h.description.clone()),
            admin_approved: Set(h.admin_approved),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(|e| write_err(e, TITLE_TAKEN, "hackathon"))?;
        Ok(model.into())
    }

    async fn delete_hackathon(&self, id: HackathonId) -> Result<bool, StoreError> {
        let txn = self.db.begin().await.map_err(backend)?;
        participant::Entity::delete_many()
            .filter(participant::Column::HackathonId.eq(id))
            .exec(&txn)
            .await
            .map_err(backend)?;
        let deleted = hackathon::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(backend)?;
        txn.commit().await.map_err(backend)?;
        Ok(deleted.rows_affected > 0)
    }

    async fn list_hackathons(&self, query: HackathonQuery) -> Result<Vec<Hackathon>, StoreError> {
        let select = match query {
            HackathonQuery::Approval(approved) => {
                hackathon::Entity::find().filter(hackathon::Column::AdminApproved.eq(approved))
            }
            HackathonQuery::OrganisedBy(user_id) => {
                hackathon::Entity::find().filter(hackathon::Column::OrganiserId.eq(user_id))
            }
        };
        let rows = select
            .order_by_desc(hackathon::Column::StartingTime)
            .all(&self.db)
            .await
            .map_err(backend)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_user(&self, id: UserId) -> Result<Option<User>, StoreError> {
        let found = user::Entity::find_by_id(id)
            .filter(user::Column::DeletedAt.is_null())
            .one(&self.db)
            .await
            .map_err(backend)?;
        Ok(found.map(Into::into))
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let found = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .filter(user::Column::DeletedAt.is_null())
            .one(&self.db)
            .await
            .map_err(backend)?;
        Ok(found.map(Into::into))
    }

    async fn create_user(&self, new: NewUser) -> Result<User, StoreError> {
        let model = user::ActiveModel {
            username: Set(new.username),
            full_name: Set(new.full_name),
            password: Set(new.hashed_password),
            email: Set(new.email),
            linked_in: Set(new.linked_in),
            github: Set(new.github),
            web_link: Set(new.web_link),
            organisation: Set(new.organisation),
            is_admin: Set(new.is_admin),
            created_at: Set(Utc::now()),
            deleted_at: Set(None),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| write_err(e, "User already exists", "user"))?;
        Ok(model.into())
    }

    async fn update_user(&self, u: &User) -> Result<User, StoreError> {
        let model = user::ActiveModel {
            id: Unchanged(u.id),
            email: Set(u.email.clone()),
            linked_in: Set(u.linked_in.clone()),
            github: Set(u.github.clone()),
            web_link: Set(u.web_link.clone()),
            organisation: Set(u.organisation.clone()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(|e| write_err(e, "Email already in use", "user"))?;
        Ok(model.into())
    }

    async fn soft_delete_user(&self, id: UserId) -> Result<bool, StoreError> {
        let res = user::Entity::update_many()
            .col_expr(user::Column::DeletedAt, Expr::value(Utc::now()))
            .filter(user::Column::Id.eq(id))
            .filter(user::Column::DeletedAt.is_null())
            .exec(&self.db)
            .await
            .map_err(backend)?;
        Ok(res.rows_affected > 0)
    }

    async fn find_participant(
        &self,
        hackathon_id: HackathonId,
        user_id: UserId,
    ) -> Result<Option<Participant>, StoreError> {
        let found = participant_row(hackathon_id, user_id)
            .one(&self.db)
            .await
            .map_err(backend)?;
        Ok(found.map(Into::into))
    }

    async fn create_participant(&self, p: Participant) -> Result<Participant, StoreError> {
        let model = participant::ActiveModel {
            hackathon_id: Set(p.hackathon_id),
            user_id: Set(p.user_id),
            demo_url: Set(p.demo_url),
            code_url: Set(p.code_url),
            score: Set(p.score),
            registered_at: Set(p.registered_at),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| write_err(e, "already participating in this hackathon", "hackathon"))?;
        Ok(model.into())
    }

    async fn update_participant(&self, p: &Participant) -> Result<Participant, StoreError> {
        let res = participant::Entity::update_many()
            .col_expr(participant::Column::DemoUrl, Expr::value(p.demo_url.clone()))
            .col_expr(participant::Column::CodeUrl, Expr::value(p.code_url.clone()))
            .col_expr(participant::Column::Score, Expr::value(p.score))
            .filter(participant::Column::HackathonId.eq(p.hackathon_id))
            .filter(participant::Column::UserId.eq(p.user_id))
            .exec(&self.db)
            .await
            .map_err(backend)?;
        if res.rows_affected == 0 {
            return Err(StoreError::NotFound("participant"));
        }
        Ok(p.clone())
    }

    async fn list_participants(
        &self,
        hackathon_id: HackathonId,
    ) -> Result<Vec<Participant>, StoreError> {
        let rows = participant::Entity::find()
            .filter(participant::Column::HackathonId.eq(hackathon_id))
            .order_by_asc(participant::Column::Id)
            .all(&self.db)
            .await
            .map_err(backend)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list_participations(&self, user_id: UserId) -> Result<Vec<Participant>, StoreError> {
        let rows = participant::Entity::find()
            .filter(participant::Column::UserId.eq(user_id))
            .order_by_asc(participant::Column::Id)
            .all(&self.db)
            .await
            .map_err(backend)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn count_participants(&self, hackathon_id: HackathonId) -> Result<u64, StoreError> {
        participant::Entity::find()
            .filter(participant::Column::HackathonId.eq(hackathon_id))
            .count(&self.db)
            .await
            .map_err(backend)
    }
}
