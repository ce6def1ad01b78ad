use std::sync::Arc;

use crate::{
    model::Model,
    services::{
        providers::{LocalSource, RecommendationSource},
        recommendations::RecommendationEngine,
        voice::VoiceHandler,
    },
};

/// Shared application state
///
/// The model is loaded once before the router is built and never mutated, so
/// handlers share it through an `Arc` without locking.
#[derive(Clone)]
pub struct AppState {
    pub model: Arc<Model>,
    pub engine: RecommendationEngine,
    pub voice: VoiceHandler,
}

impl AppState {
    /// Creates state whose voice adapter answers from the same in-process model
    pub fn new(model: Arc<Model>, engine: RecommendationEngine) -> Self {
        let local = LocalSource::new(Arc::clone(&model), engine);
        Self {
            model,
            engine,
            voice: VoiceHandler::new(Arc::new(local)),
        }
    }

    /// Routes voice lookups through another source, e.g. a remote service
    pub fn with_voice_source(mut self, source: Arc<dyn RecommendationSource>) -> Self {
        self.voice = VoiceHandler::new(source);
        self
    }
}
