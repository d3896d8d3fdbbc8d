//! Client for the external license-plate recognition service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::{debug, instrument};

/// One plate found in an uploaded image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    pub plate_number: String,
    pub region: Option<String>,
    /// Base64 image with the plate annotated, optionally as a `data:` URL.
    pub annotated_image: String,
}

#[derive(Debug, thiserror::Error)]
pub enum PredictionError {
    #[error("prediction request failed: {0}")]
    Transport(String),
    #[error("prediction service returned status {0}")]
    Status(u16),
    #[error("malformed prediction response: {0}")]
    Malformed(String),
}

#[async_trait]
pub trait PlatePredictor: Send + Sync {
    /// Detect plates in `image`. An empty list means no plate was found.
    async fn predict(&self, image: Vec<u8>) -> Result<Vec<Detection>, PredictionError>;

    /// Nudge the service awake ahead of a likely `predict` call.
    async fn warm_up(&self) {}
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    /// Shared annotated image, used when plates carry none of their own.
    #[serde(default)]
    annotated_image: Option<String>,
    /// Missing or `null` both mean no plate was found.
    #[serde(default)]
    plates: Option<Vec<PredictedPlate>>,
}

#[derive(Debug, Deserialize)]
struct PredictedPlate {
    plate_number: String,
    #[serde(default)]
    region: Option<String>,
    #[serde(default)]
    annotated_image: Option<String>,
}

impl PredictResponse {
    fn into_detections(self) -> Result<Vec<Detection>, PredictionError> {
        let shared = self.annotated_image;
        self.plates
            .unwrap_or_default()
            .into_iter()
            .map(|plate| {
                let annotated_image = plate
                    .annotated_image
                    .or_else(|| shared.clone())
                    .ok_or_else(|| {
                        PredictionError::Malformed(format!(
                            "no annotated image for plate {}",
                            plate.plate_number
                        ))
                    })?;
                Ok(Detection {
                    plate_number: plate.plate_number,
                    region: plate.region.filter(|r| !r.trim().is_empty()),
                    annotated_image,
                })
            })
            .collect()
    }
}

/// [`PlatePredictor`] that posts the image as multipart `file` to an HTTP endpoint.
pub struct HttpPlatePredictor {
    url: String,
    http: reqwest::Client,
}

impl HttpPlatePredictor {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, PredictionError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PredictionError::Transport(e.to_string()))?;
        Ok(Self {
            url: url.into(),
            http,
        })
    }
}

#[async_trait]
impl PlatePredictor for HttpPlatePredictor {
    #[instrument(skip(self, image), fields(size = image.len()))]
    async fn predict(&self, image: Vec<u8>) -> Result<Vec<Detection>, PredictionError> {
        let part = Part::bytes(image)
            .file_name("image.jpg")
            .mime_str("image/jpeg")
            .map_err(|e| PredictionError::Transport(e.to_string()))?;
        let form = Form::new().part("file", part);

        let response = self
            .http
            .post(&self.url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| PredictionError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PredictionError::Status(status.as_u16()));
        }

        let body: PredictResponse = response
            .json()
            .await
            .map_err(|e| PredictionError::Malformed(e.to_string()))?;

        let detections = body.into_detections()?;
        debug!(count = detections.len(), "Prediction finished");
        Ok(detections)
    }

    async fn warm_up(&self) {
        if let Err(e) = self.http.get(&self.url).send().await {
            debug!(error = %e, "Prediction warm-up failed");
        }
    }
}
