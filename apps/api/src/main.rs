mod cleaning;
mod config;
mod errors;
mod export;
mod extraction;
mod jobs;
mod llm_client;
mod matching;
mod models;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::cleaning::Lexicon;
use crate::config::Config;
use crate::extraction::intelligence::{GeminiExtractor, ResumeExtractor, MISSING_KEY_WARNING};
use crate::extraction::router::ProcessingPipeline;
use crate::jobs::store::RedisJobStore;
use crate::llm_client::LlmClient;
use crate::matching::fit_scoring::KeywordOverlapScorer;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting CV Extractor v{}", env!("CARGO_PKG_VERSION"));

    // Build the lexicon once; shared read-only by every job
    let lexicon = Arc::new(Lexicon::load(config.dictionary_path.as_deref())?);

    // Initialize the model extractor (optional: uploads still complete without it)
    let extractor: Option<Arc<dyn ResumeExtractor>> = match &config.gemini_api_key {
        Some(key) => {
            let llm = LlmClient::new(key.clone())?;
            info!("LLM client initialized (model: {})", llm_client::MODEL);
            Some(Arc::new(GeminiExtractor::new(llm)))
        }
        None => {
            warn!("{MISSING_KEY_WARNING}");
            None
        }
    };
    if config.blind_mode {
        info!("Blind mode enabled: contact details will be redacted");
    }

    // Initialize Redis job store
    let jobs = Arc::new(RedisJobStore::connect(&config.redis_url, config.job_ttl_secs).await?);
    info!("Redis job store initialized");

    tokio::fs::create_dir_all(&config.upload_dir).await?;

    // Build app state
    let state = AppState {
        config: config.clone(),
        pipeline: ProcessingPipeline::new(lexicon, extractor, config.blind_mode),
        jobs,
        fit_scorer: Arc::new(KeywordOverlapScorer::default()),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
