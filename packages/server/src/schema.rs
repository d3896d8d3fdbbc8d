use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr};
use tracing::info;

/// Indexes the entity definitions cannot express.
pub async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    db.execute_unprepared(
        "CREATE INDEX IF NOT EXISTS idx_plate_record_owner_detected \
         ON plate_record (owner, detected_at)",
    )
    .await?;
    info!("Indexes ensured");
    Ok(())
}
