use std::sync::Arc;

use tokio::sync::RwLock;

use crate::aggregation::EngineRegistry;
use crate::config::Config;
use crate::extraction::FeatureExtractor;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub extractor: Arc<FeatureExtractor>,
    /// Live engine weights; `PUT /api/v1/profiles/:engine/weights` swaps them in place.
    pub engines: Arc<RwLock<EngineRegistry>>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let extractor = FeatureExtractor::new(config.extraction);
        Self {
            config,
            extractor: Arc::new(extractor),
            engines: Arc::new(RwLock::new(EngineRegistry::default())),
        }
    }
}
