use std::sync::Arc;

use mention_pipeline::RunConfig;
use mentionlens_core::{ContentSource, NarrativeGenerator};
use sentiment_engine::SentimentClassifier;

/// Injected services shared by all requests. Per-run state (filter,
/// aggregator) is constructed inside each request, so nothing here needs
/// interior mutability.
pub struct AppState {
    pub classifier: SentimentClassifier,
    pub content_source: Arc<dyn ContentSource>,
    /// `None` when no narrative API key is configured; report fields stay
    /// null and Q&A answers 503.
    pub narrative_engine: Option<Arc<dyn NarrativeGenerator>>,
    pub run_config: RunConfig,
}

impl AppState {
    pub fn new(
        classifier: SentimentClassifier,
        content_source: Arc<dyn ContentSource>,
        narrative_engine: Option<Arc<dyn NarrativeGenerator>>,
        run_config: RunConfig,
    ) -> Self {
        Self {
            classifier,
            content_source,
            narrative_engine,
            run_config,
        }
    }
}
