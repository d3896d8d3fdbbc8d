//! Persistence of users and plate records.
//!
//! Handlers and services only see the [`RecordStore`] trait; `main` wires in
//! [`PgRecordStore`] and unit tests use an in-memory store.

mod postgres;
mod refs;


use async_trait::async_trait;
use sea_orm::DbErr;
use uuid::Uuid;

use crate::entity::plate_record;

pub use postgres::PgRecordStore;
pub use refs::{plate_refs, with_ref, without_ref};

/// Profile data used to create a user on first login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub id: String,
    pub display_name: String,
    pub email: String,
    pub picture_url: Option<String>,
}

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Create the user if absent. Existing profiles are never overwritten.
    ///
    /// Returns `true` if a new user was created.
    async fn ensure_user(&self, user: &NewUser) -> Result<bool, DbErr>;

    /// Persist a plate record and append its ID to the owner's reference list.
    async fn insert_plate(&self, record: plate_record::Model) -> Result<(), DbErr>;

    /// Fetch a plate record by ID regardless of owner.
    async fn find_plate(&self, id: Uuid) -> Result<Option<plate_record::Model>, DbErr>;

    /// Delete a plate record and remove its ID from the owner's reference list.
    async fn delete_plate(&self, record: &plate_record::Model) -> Result<(), DbErr>;

    /// Records referenced by the owner's reference list, in list order.
    ///
    /// Fails with [`DbErr::RecordNotFound`] if the user does not exist.
    async fn list_owned(&self, owner: &str) -> Result<Vec<plate_record::Model>, DbErr>;

    async fn count_owned(&self, owner: &str) -> Result<u64, DbErr>;

    /// Non-null regions of the owner's records, ordered by `detected_at` then `id`.
    async fn owned_regions(&self, owner: &str) -> Result<Vec<String>, DbErr>;

    /// Detection timestamps (epoch ms) of the owner's records at or after `since_ms`.
    async fn owned_timestamps_since(&self, owner: &str, since_ms: i64)
    -> Result<Vec<i64>, DbErr>;
}
