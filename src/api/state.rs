// Application state shared by handlers

use crate::services::{AppConfig, DetectionService};

pub struct AppState {
    pub config: AppConfig,
    pub detection: DetectionService,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let detection = DetectionService::new(&config.ai);
        Self { config, detection }
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.config.server.max_upload_bytes()
    }
}
