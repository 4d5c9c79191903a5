use axum::{
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::rate_limit::QuotaCheck;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Rate limited, retry after {}s", .0.request_reset_secs)]
    RateLimited(QuotaCheck),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Quota denials carry retry/limit headers on top of the JSON envelope.
        if let AppError::RateLimited(quota) = &self {
            return rate_limited_response(quota);
        }

        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::RateLimited(_) => unreachable!("handled above"),
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                )
            }
            AppError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "LLM_ERROR",
                    "An AI processing error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

fn rate_limited_response(quota: &QuotaCheck) -> Response {
    let body = Json(json!({
        "error": {
            "code": "RATE_LIMITED",
            "message": format!(
                "Rate limited. Retry after {} seconds.",
                quota.request_reset_secs
            ),
            "quota": quota,
        }
    }));

    let mut response = (StatusCode::TOO_MANY_REQUESTS, body).into_response();
    let headers = response.headers_mut();
    insert_header(headers, "retry-after", quota.request_reset_secs);
    insert_header(headers, "x-ratelimit-limit-requests", quota.request_limit);
    insert_header(
        headers,
        "x-ratelimit-remaining-requests",
        quota.remaining_requests,
    );
    insert_header(headers, "x-ratelimit-reset-requests", quota.request_reset_secs);
    insert_header(headers, "x-ratelimit-limit-tokens", quota.token_budget);
    insert_header(
        headers,
        "x-ratelimit-remaining-tokens",
        quota.remaining_tokens,
    );
    insert_header(headers, "x-ratelimit-reset-tokens", quota.token_reset_secs);
    response
}

fn insert_header(
    headers: &mut axum::http::HeaderMap,
    name: &'static str,
    value: impl std::fmt::Display,
) {
    if let Ok(value) = HeaderValue::from_str(&value.to_string()) {
        headers.insert(name, value);
    }
}
