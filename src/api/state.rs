use std::sync::Arc;

use crate::config::Config;
use crate::job::JobController;
use crate::observability::Metrics;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub controller: Arc<JobController>,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    pub fn new(config: Config, controller: JobController) -> Self {
        Self {
            config: Arc::new(config),
            controller: Arc::new(controller),
            metrics: Arc::new(Metrics::new()),
        }
    }
}
