mod ai;
mod config;
mod db;
mod errors;
mod import;
mod llm_client;
mod models;
mod rate_limit;
mod routes;
mod state;
mod vagas;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::ai::analyzer::{HeuristicAnalyzer, LlmAnalyzer, VagaAnalyzer};
use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::LlmClient;
use crate::rate_limit::RateLimiter;
use crate::routes::build_router;
use crate::state::AppState;

/// How often the quota tracker sweeps fully expired entries.
const QUOTA_SWEEP_INTERVAL: Duration = Duration::from_secs(10 * 60);

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Vagas API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    // Initialize LLM client
    let llm = LlmClient::new(config.anthropic_api_key.clone());
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Initialize posting analyzer (LlmAnalyzer by default — swap via ENABLE_LLM_ANALYZER)
    let analyzer: Arc<dyn VagaAnalyzer> = if config.enable_llm_analyzer {
        Arc::new(LlmAnalyzer(llm.clone()))
    } else {
        info!("LLM analyzer disabled; using heuristic extraction only");
        Arc::new(HeuristicAnalyzer)
    };

    // Initialize AI quota tracker and its periodic sweep
    let limiter = RateLimiter::new(config.rate_limit);
    info!(
        "Rate limiter: {} requests/{}s, {} tokens/{}s per client",
        config.rate_limit.request_limit,
        config.rate_limit.request_window.as_secs(),
        config.rate_limit.token_budget,
        config.rate_limit.token_window.as_secs()
    );
    spawn_quota_sweeper(limiter.clone());

    // Build app state
    let state = AppState {
        db,
        llm,
        limiter,
        analyzer,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Periodic compaction of the quota map. Correctness never depends on this
/// running — entries roll over on access regardless.
fn spawn_quota_sweeper(limiter: RateLimiter) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(QUOTA_SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            limiter.cleanup_expired_entries();
        }
    });
}
