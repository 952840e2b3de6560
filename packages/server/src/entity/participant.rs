use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "participant")]
pub struct Model {
    /// Insertion sequence; entrants are listed in this order.
    #[sea_orm(primary_key)]
    pub id: i64,

    #[sea_orm(unique_key = "hackathon_user")]
    pub hackathon_id: i32,
    #[sea_orm(unique_key = "hackathon_user")]
    pub user_id: i32,
    #[sea_orm(belongs_to, from = "hackathon_id", to = "id")]
    pub hackathon: HasOne<super::hackathon::Entity>,
    #[sea_orm(belongs_to, from = "user_id", to = "id")]
    pub user: HasOne<super::user::Entity>,

    pub demo_url: String,
    pub code_url: String,
    #[sea_orm(default_value = 0)]
    pub score: i32,

    pub registered_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
