use std::sync::Arc;

use common::storage::ObjectStore;

use crate::config::AppConfig;
use crate::identity::IdentityProvider;
use crate::prediction::PlatePredictor;
use crate::services::ingest::IngestDeps;
use crate::store::RecordStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub records: Arc<dyn RecordStore>,
    pub objects: Arc<dyn ObjectStore>,
    pub predictor: Arc<dyn PlatePredictor>,
    pub identity: Arc<dyn IdentityProvider>,
}

impl AppState {
    pub fn ingest_deps(&self) -> IngestDeps<'_> {
        IngestDeps {
            predictor: &*self.predictor,
            objects: &*self.objects,
            records: &*self.records,
        }
    }
}
