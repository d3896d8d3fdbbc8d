use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::refs::{plate_refs, with_ref, without_ref};
use super::{NewUser, RecordStore};
use crate::entity::{plate_record, user};

/// [`RecordStore`] backed by Postgres through SeaORM.
#[derive(Clone)]
pub struct PgRecordStore {
    db: DatabaseConnection,
}

impl PgRecordStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn ensure_user(&self, new_user: &NewUser) -> Result<bool, DbErr> {
        let model = user::ActiveModel {
            id: Set(new_user.id.clone()),
            display_name: Set(new_user.display_name.clone()),
            email: Set(new_user.email.clone()),
            picture_url: Set(new_user.picture_url.clone()),
            plate_refs: Set(serde_json::json!([])),
            created_at: Set(chrono::Utc::now()),
        };

        let result = user::Entity::insert(model)
            .on_conflict(OnConflict::column(user::Column::Id).do_nothing().to_owned())
            .exec_without_returning(&self.db)
            .await;

        match result {
            Ok(rows) if rows > 0 => {
                info!(user_id = %new_user.id, "User created");
                Ok(true)
            }
            Ok(_) | Err(DbErr::RecordNotInserted) => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn insert_plate(&self, record: plate_record::Model) -> Result<(), DbErr> {
        let txn = self.db.begin().await?;

        let id = record.id;
        let owner = record.owner.clone();

        // Owner row lock comes before the insert; the foreign-key check's
        // share lock cannot be upgraded while sibling inserts hold theirs.
        let existing = user::Entity::find_by_id(owner.clone())
            .lock_exclusive()
            .one(&txn)
            .await?;

        let model = plate_record::ActiveModel {
            id: Set(record.id),
            plate_number: Set(record.plate_number),
            region: Set(record.region),
            image_url: Set(record.image_url),
            detected_at: Set(record.detected_at),
            owner: Set(record.owner),
        };
        plate_record::Entity::insert(model)
            .exec_without_returning(&txn)
            .await?;

        match existing {
            Some(existing) => {
                let refs = with_ref(&existing.plate_refs, &id.to_string());
                let mut active: user::ActiveModel = existing.into();
                active.plate_refs = Set(refs);
                active.update(&txn).await?;
            }
            None => warn!(user_id = %owner, plate_id = %id, "Owner missing, ref not recorded"),
        }

        txn.commit().await?;
        debug!(plate_id = %id, user_id = %owner, "Plate record stored");
        Ok(())
    }

    async fn find_plate(&self, id: Uuid) -> Result<Option<plate_record::Model>, DbErr> {
        plate_record::Entity::find_by_id(id).one(&self.db).await
    }

    async fn delete_plate(&self, record: &plate_record::Model) -> Result<(), DbErr> {
        let txn = self.db.begin().await?;

        let existing = user::Entity::find_by_id(record.owner.clone())
            .lock_exclusive()
            .one(&txn)
            .await?;

        plate_record::Entity::delete_by_id(record.id)
            .exec(&txn)
            .await?;

        if let Some(existing) = existing {
            let refs = without_ref(&existing.plate_refs, &record.id.to_string());
            let mut active: user::ActiveModel = existing.into();
            active.plate_refs = Set(refs);
            active.update(&txn).await?;
        }

        txn.commit().await?;
        info!(plate_id = %record.id, user_id = %record.owner, "Plate record deleted");
        Ok(())
    }

    async fn list_owned(&self, owner: &str) -> Result<Vec<plate_record::Model>, DbErr> {
        let owner_user = user::Entity::find_by_id(owner.to_string())
            .one(&self.db)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("user {owner}")))?;

        let ids: Vec<Uuid> = plate_refs(&owner_user.plate_refs)
            .iter()
            .filter_map(|r| Uuid::parse_str(r).ok())
            .collect();
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut by_id: HashMap<Uuid, plate_record::Model> = plate_record::Entity::find()
            .filter(plate_record::Column::Id.is_in(ids.clone()))
            .filter(plate_record::Column::Owner.eq(owner))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|m| (m.id, m))
            .collect();

        // Dangling refs are skipped.
        Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
    }

    async fn count_owned(&self, owner: &str) -> Result<u64, DbErr> {
        plate_record::Entity::find()
            .filter(plate_record::Column::Owner.eq(owner))
            .count(&self.db)
            .await
    }

    async fn owned_regions(&self, owner: &str) -> Result<Vec<String>, DbErr> {
        plate_record::Entity::find()
            .select_only()
            .column(plate_record::Column::Region)
            .filter(plate_record::Column::Owner.eq(owner))
            .filter(plate_record::Column::Region.is_not_null())
            .order_by_asc(plate_record::Column::DetectedAt)
            .order_by_asc(plate_record::Column::Id)
            .into_tuple::<String>()
            .all(&self.db)
            .await
    }

    async fn owned_timestamps_since(
        &self,
        owner: &str,
        since_ms: i64,
    ) -> Result<Vec<i64>, DbErr> {
        plate_record::Entity::find()
            .select_only()
            .column(plate_record::Column::DetectedAt)
            .filter(plate_record::Column::Owner.eq(owner))
            .filter(plate_record::Column::DetectedAt.gte(since_ms))
            .order_by_asc(plate_record::Column::DetectedAt)
            .into_tuple::<i64>()
            .all(&self.db)
            .await
    }
}
