use std::sync::Arc;

use voxform_config::Settings;
use voxform_services::{JobOrchestrator, ResultStore, SheetsStore};

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<JobOrchestrator>,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        let store: Arc<dyn ResultStore> = Arc::new(SheetsStore::new(settings.store.clone()));
        Self::with_store(settings, store)
    }

    pub fn with_store(settings: Settings, store: Arc<dyn ResultStore>) -> Self {
        Self {
            orchestrator: Arc::new(JobOrchestrator::new(settings, store)),
        }
    }
}
