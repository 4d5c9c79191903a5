//! Axum route handlers for the AI endpoints.
//!
//! Both endpoints are quota-gated: check, then consume one request, then
//! dispatch, then charge the tokens the call actually cost. The gap between
//! check and consume is the accepted fixed-window race (see rate_limit.rs).

use axum::{
    extract::State,
    http::HeaderMap,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ai::analyzer::Analysis;
use crate::ai::resume::generate_resume;
use crate::errors::AppError;
use crate::import::VagaDraft;
use crate::models::vaga::VagaRow;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub posting: String,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub analysis: String,
    /// Auto-fill draft; the client merges only the present fields.
    pub draft: VagaDraft,
}

#[derive(Debug, Deserialize)]
pub struct ResumeRequest {
    pub user_id: Uuid,
    pub vaga_id: Uuid,
    pub profile: String,
}

#[derive(Debug, Serialize)]
pub struct ResumeResponse {
    pub resume: String,
}

/// POST /api/v1/ai/analyze
///
/// Analyzes a raw job posting and returns the markdown summary plus the
/// extracted draft fields.
pub async fn handle_analyze(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    if request.posting.trim().is_empty() {
        return Err(AppError::Validation("posting cannot be empty".to_string()));
    }

    let client_id = admit(&state, &headers)?;
    let analysis: Analysis = state.analyzer.analyze(&request.posting).await?;
    state.limiter.consume_tokens(&client_id, analysis.tokens_used);

    Ok(Json(AnalyzeResponse {
        analysis: analysis.markdown,
        draft: analysis.draft,
    }))
}

/// POST /api/v1/ai/resume
///
/// Generates a resume tailored to a stored vaga from the user's profile text.
pub async fn handle_resume(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<ResumeRequest>,
) -> Result<Json<ResumeResponse>, AppError> {
    if request.profile.trim().is_empty() {
        return Err(AppError::Validation("profile cannot be empty".to_string()));
    }

    let client_id = admit(&state, &headers)?;

    let vaga = sqlx::query_as::<_, VagaRow>("SELECT * FROM vagas WHERE id = $1 AND user_id = $2")
        .bind(request.vaga_id)
        .bind(request.user_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Vaga {} not found", request.vaga_id)))?;
    let completion = generate_resume(&state.llm, &vaga, &request.profile).await?;
    state.limiter.consume_tokens(&client_id, completion.tokens_used);

    Ok(Json(ResumeResponse {
        resume: completion.text,
    }))
}

/// Quota gate: denies over-quota (or unidentifiable) clients, otherwise
/// records the request and returns the identifier for token charging.
fn admit(state: &AppState, headers: &HeaderMap) -> Result<String, AppError> {
    let client_id = client_id_from_headers(headers);
    let quota = state.limiter.check(&client_id);
    if !quota.allowed {
        tracing::warn!("AI request denied for client '{client_id}'");
        return Err(AppError::RateLimited(quota));
    }
    state.limiter.consume_request(&client_id);
    Ok(client_id)
}

/// Derives the quota key from proxy headers: first hop of `x-forwarded-for`,
/// else `x-real-ip`. An empty result fails the quota check closed — requests
/// with no attributable identity are never pooled into a shared bucket.
fn client_id_from_headers(headers: &HeaderMap) -> String {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    let real_ip = || {
        headers
            .get("x-real-ip")
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };

    forwarded.or_else(real_ip).unwrap_or_default().to_string()
}
