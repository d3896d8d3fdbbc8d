use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    /// Subject identifier issued by the identity provider.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub display_name: String,
    pub email: String,
    pub picture_url: Option<String>,

    /// JSON array of owned plate record IDs, in insertion order.
    #[sea_orm(column_type = "JsonBinary")]
    pub plate_refs: Json,

    #[sea_orm(has_many)]
    pub plate_records: HasMany<super::plate_record::Entity>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
