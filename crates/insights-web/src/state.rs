use crate::render::Pages;
use insights_finance::InsightPipeline;
use insights_utils::ServerConfig;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<InsightPipeline>,
    pub pages: Arc<Pages>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(config: ServerConfig, pipeline: InsightPipeline) -> Result<Self, minijinja::Error> {
        let pages = Pages::new(config.app_name.clone())?;
        Ok(Self {
            pipeline: Arc::new(pipeline),
            pages: Arc::new(pages),
            config: Arc::new(config),
        })
    }
}
