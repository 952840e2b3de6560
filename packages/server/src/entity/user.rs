use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub username: String,
    pub full_name: String,
    pub password: String,
    #[sea_orm(unique)]
    pub email: String,
    pub linked_in: String,
    pub github: String,
    pub web_link: String,
    pub organisation: String,
    pub is_admin: bool,

    #[sea_orm(has_many)]
    pub participations: HasMany<super::participant::Entity>,

    pub created_at: DateTimeUtc,
    /// Set when the account is deleted; such rows are never returned to callers.
    pub deleted_at: Option<DateTimeUtc>,
}

impl ActiveModelBehavior for ActiveModel {}
