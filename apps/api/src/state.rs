use std::sync::Arc;

use sqlx::PgPool;

use crate::ai::analyzer::VagaAnalyzer;
use crate::llm_client::LlmClient;
use crate::rate_limit::RateLimiter;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub llm: LlmClient,
    /// Dual-window quota tracker gating the AI endpoints.
    pub limiter: RateLimiter,
    /// Pluggable posting analyzer. Default: LlmAnalyzer. Swap via ENABLE_LLM_ANALYZER.
    pub analyzer: Arc<dyn VagaAnalyzer>,
}
