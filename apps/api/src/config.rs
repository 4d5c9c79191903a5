use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Panics at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub anthropic_api_key: String,
    pub port: u16,
    pub rust_log: String,
    /// When false, the heuristic analyzer is used instead of the LLM.
    pub enable_llm_analyzer: bool,
    pub rate_limit: RateLimitConfig,
}

/// Ceilings and window lengths for the AI endpoint quota tracker.
/// Fixed at construction — the tracker never reads the environment itself.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    /// Max AI requests per client per request window.
    pub request_limit: u32,
    pub request_window: Duration,
    /// Max LLM tokens per client per token window.
    pub token_budget: u64,
    pub token_window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            request_limit: 10,
            request_window: Duration::from_secs(60),
            token_budget: 100_000,
            token_window: Duration::from_secs(24 * 60 * 60),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = RateLimitConfig::default();
        let rate_limit = RateLimitConfig {
            request_limit: env_parse("RATE_LIMIT_REQUESTS", defaults.request_limit)?,
            request_window: Duration::from_secs(env_parse(
                "RATE_LIMIT_WINDOW_SECS",
                defaults.request_window.as_secs(),
            )?),
            token_budget: env_parse("RATE_LIMIT_TOKEN_BUDGET", defaults.token_budget)?,
            token_window: Duration::from_secs(env_parse(
                "RATE_LIMIT_TOKEN_WINDOW_SECS",
                defaults.token_window.as_secs(),
            )?),
        };

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            port: env_parse("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            enable_llm_analyzer: env_parse("ENABLE_LLM_ANALYZER", true)?,
            rate_limit,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_parse<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value")),
        Err(_) => Ok(default),
    }
}
