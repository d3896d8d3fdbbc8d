//! Plate-detection ingestion: predict, then store one image and one record per plate.

use chrono::Utc;
use common::storage::ObjectStore;
use futures::future::try_join_all;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::entity::plate_record;
use crate::error::AppError;
use crate::prediction::{Detection, PlatePredictor};
use crate::store::RecordStore;
use crate::utils::image::{content_type_for, decode_base64_image};

/// Extension used for every stored annotated image.
const IMAGE_EXTENSION: &str = "jpg";

/// Collaborators the pipeline writes through.
pub struct IngestDeps<'a> {
    pub predictor: &'a dyn PlatePredictor,
    pub objects: &'a dyn ObjectStore,
    pub records: &'a dyn RecordStore,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    /// The predictor found nothing; nothing was written.
    NoPlate,
    /// Created record IDs, in the order the predictor returned the plates.
    Stored(Vec<Uuid>),
}

/// Run the pipeline for one uploaded image on behalf of `owner`.
///
/// Plates are stored concurrently. The first failing plate fails the whole
/// call and drops the remaining in-flight branches; images already uploaded
/// by other branches are not cleaned up.
#[instrument(skip(deps, image))]
pub async fn ingest(
    deps: &IngestDeps<'_>,
    owner: &str,
    image: Option<Vec<u8>>,
) -> Result<IngestOutcome, AppError> {
    let image = image
        .filter(|bytes| !bytes.is_empty())
        .ok_or(AppError::NoImageProvided)?;

    let detections = deps.predictor.predict(image).await?;
    if detections.is_empty() {
        info!("No plate detected");
        return Ok(IngestOutcome::NoPlate);
    }

    let ids = try_join_all(
        detections
            .into_iter()
            .map(|detection| store_detection(deps, owner, detection)),
    )
    .await?;

    info!(count = ids.len(), "Stored plate records");
    Ok(IngestOutcome::Stored(ids))
}

/// Upload the annotated image, then persist the record pointing at it.
async fn store_detection(
    deps: &IngestDeps<'_>,
    owner: &str,
    detection: Detection,
) -> Result<Uuid, AppError> {
    let image = decode_base64_image(&detection.annotated_image).map_err(|e| {
        AppError::Upstream(format!(
            "undecodable annotated image for plate {}: {e}",
            detection.plate_number
        ))
    })?;

    let detected_at = Utc::now().timestamp_millis();
    let key = object_key(&detection.plate_number, detected_at);
    let content_type = content_type_for(&image, &key);

    let image_url = deps.objects.upload(image, &key, &content_type).await?;

    let id = Uuid::now_v7();
    deps.records
        .insert_plate(plate_record::Model {
            id,
            plate_number: detection.plate_number,
            region: detection.region,
            image_url,
            detected_at,
            owner: owner.to_string(),
        })
        .await?;

    Ok(id)
}

/// Storage key `{plate}-{millis}.jpg`, with the plate reduced to `[A-Za-z0-9_-]`.
pub fn object_key(plate_number: &str, detected_at: i64) -> String {
    let plate: String = plate_number
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let plate = if plate.is_empty() {
        "unknown".to_string()
    } else {
        plate
    };
    format!("{plate}-{detected_at}.{IMAGE_EXTENSION}")
}

/// Redirect target reported to the client.
///
/// A single record redirects straight to its ID; several become an
/// `?items=` query listing every ID.
pub fn redirect_target(ids: &[Uuid]) -> String {
    match ids {
        [single] => single.to_string(),
        many => {
            let joined: Vec<String> = many.iter().map(Uuid::to_string).collect();
            format!("?items={}", joined.join(","))
        }
    }
}
