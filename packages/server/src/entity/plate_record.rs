use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "plate_record")]
pub struct Model {
    /// UUIDv7 primary key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub plate_number: String,
    pub region: Option<String>,

    /// Public URL of the annotated image.
    pub image_url: String,

    /// Detection time in epoch milliseconds.
    pub detected_at: i64,

    pub owner: String,
    #[sea_orm(belongs_to, from = "owner", to = "id")]
    pub user: HasOne<super::user::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
