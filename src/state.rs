use std::sync::Arc;

use crate::disease_info::DiseaseInfoService;
use crate::model::Classifier;

/// Everything a request handler needs, built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub classifier: Arc<dyn Classifier>,
    pub disease_info: DiseaseInfoService,
    pub dashboard_api_base: String,
}

impl AppState {
    pub fn new(classifier: Arc<dyn Classifier>, disease_info: DiseaseInfoService) -> Self {
        Self {
            classifier,
            disease_info,
            dashboard_api_base: String::new(),
        }
    }

    pub fn with_dashboard_api_base(mut self, base: impl Into<String>) -> Self {
        self.dashboard_api_base = base.into();
        self
    }
}
