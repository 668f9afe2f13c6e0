use std::sync::Arc;

use crate::{
    config::Config,
    services::{AnalyticsStore, InMemoryAnalytics, RecommendationEngine},
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<RecommendationEngine>,
    pub analytics: Arc<dyn AnalyticsStore>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl AppState {
    /// Builds the engine and analytics store from configuration
    pub fn new(config: &Config) -> Self {
        Self {
            engine: Arc::new(RecommendationEngine::from_config(config)),
            analytics: Arc::new(InMemoryAnalytics::new(config.analytics_capacity)),
        }
    }

    pub fn from_parts(engine: Arc<RecommendationEngine>, analytics: Arc<dyn AnalyticsStore>) -> Self {
        Self { engine, analytics }
    }
}
