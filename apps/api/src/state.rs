use std::sync::Arc;

use crate::config::Config;
use crate::extraction::router::ProcessingPipeline;
use crate::jobs::store::JobStore;
use crate::matching::fit_scoring::FitScorer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Lexicon, model extractor and blind-mode flag, handed to every job.
    pub pipeline: ProcessingPipeline,
    pub jobs: Arc<dyn JobStore>,
    /// Pluggable fit scorer. Default: KeywordOverlapScorer.
    pub fit_scorer: Arc<dyn FitScorer>,
}
