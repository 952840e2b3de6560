use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "hackathon")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub title: String,
    pub starting_time: DateTimeUtc,
    pub ending_time: DateTimeUtc,
    pub result_time: DateTimeUtc,

    pub organiser_id: i32,
    pub organisation_name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub admin_approved: bool,

    #[sea_orm(has_many)]
    pub participants: HasMany<super::participant::Entity>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
