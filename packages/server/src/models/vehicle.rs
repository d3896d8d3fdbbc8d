use serde::Serialize;
use uuid::Uuid;

use crate::entity::plate_record;

/// A plate record as listed for its owner.
#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VehicleSummary {
    pub id: Uuid,
    #[schema(example = "B 1234 XY")]
    pub plate_number: String,
    #[schema(example = "Jakarta")]
    pub region: Option<String>,
    pub image_url: String,
    /// Detection time in epoch milliseconds.
    #[schema(example = 1718010000000_i64)]
    pub timestamp: i64,
}

impl From<plate_record::Model> for VehicleSummary {
    fn from(record: plate_record::Model) -> Self {
        Self {
            id: record.id,
            plate_number: record.plate_number,
            region: record.region,
            image_url: record.image_url,
            timestamp: record.detected_at,
        }
    }
}

/// The caller's plate records.
#[derive(Serialize, utoipa::ToSchema)]
pub struct VehicleListResponse {
    /// Present only when the caller has no records.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "No plate data paths found")]
    pub message: Option<String>,
    pub data: Vec<VehicleSummary>,
}

/// A single plate record, including its owner.
#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VehicleDetail {
    pub id: Uuid,
    pub plate_number: String,
    pub region: Option<String>,
    pub image_url: String,
    pub timestamp: i64,
    pub owner: String,
}

impl From<plate_record::Model> for VehicleDetail {
    fn from(record: plate_record::Model) -> Self {
        Self {
            id: record.id,
            plate_number: record.plate_number,
            region: record.region,
            image_url: record.image_url,
            timestamp: record.detected_at,
            owner: record.owner,
        }
    }
}
