//! Posting analysis — pluggable, trait-based analyzer behind `AppState`.
//!
//! Default: `LlmAnalyzer` (Claude produces a labeled markdown summary, the
//! importer extracts the draft from it). Fallback: `HeuristicAnalyzer`,
//! which runs the field extractor directly on the posting — deterministic,
//! zero tokens, useful offline and in tests. Swapped at startup via
//! `ENABLE_LLM_ANALYZER`.

use async_trait::async_trait;
use serde::Serialize;

use crate::ai::prompts::{ANALYZE_PROMPT_TEMPLATE, ANALYZE_SYSTEM};
use crate::errors::AppError;
use crate::import::{extract_vaga_draft, normalize_markdown, VagaDraft};
use crate::llm_client::LlmClient;

/// Result of analyzing one job posting.
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    /// Normalized markdown summary, suitable for display and re-import.
    pub markdown: String,
    /// Fields extracted from the summary for form auto-fill.
    pub draft: VagaDraft,
    /// Tokens the analysis cost; charged against the client's daily budget.
    pub tokens_used: u64,
}

/// Carried in `AppState` as `Arc<dyn VagaAnalyzer>`. Implement this to swap
/// backends without touching handlers.
#[async_trait]
pub trait VagaAnalyzer: Send + Sync {
    async fn analyze(&self, posting: &str) -> Result<Analysis, AppError>;
}

/// Claude-backed analyzer (default).
pub struct LlmAnalyzer(pub LlmClient);

#[async_trait]
impl VagaAnalyzer for LlmAnalyzer {
    async fn analyze(&self, posting: &str) -> Result<Analysis, AppError> {
        let prompt = ANALYZE_PROMPT_TEMPLATE.replace("{posting}", posting);
        let completion = self
            .0
            .complete(ANALYZE_SYSTEM, &prompt)
            .await
            .map_err(|e| AppError::Llm(format!("Posting analysis failed: {e}")))?;

        let markdown = normalize_markdown(&completion.text);
        let draft = extract_vaga_draft(&markdown);

        Ok(Analysis {
            markdown,
            draft,
            tokens_used: completion.tokens_used,
        })
    }
}

/// Extractor-only analyzer. Whatever labeled fields already exist in the
/// posting are surfaced; there is no summarization step.
pub struct HeuristicAnalyzer;

#[async_trait]
impl VagaAnalyzer for HeuristicAnalyzer {
    async fn analyze(&self, posting: &str) -> Result<Analysis, AppError> {
        let markdown = normalize_markdown(posting);
        let draft = extract_vaga_draft(&markdown);
        Ok(Analysis {
            markdown,
            draft,
            tokens_used: 0,
        })
    }
}
