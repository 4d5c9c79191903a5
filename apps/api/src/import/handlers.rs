//! Axum route handlers for the markdown import boundary.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::import::fields::{extract_vaga_draft, VagaDraft};
use crate::import::markdown::{is_markdown_file, normalize_markdown};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub filename: Option<String>,
    pub draft: VagaDraft,
    /// True when extraction found nothing; the UI falls back to manual entry.
    pub empty: bool,
}

#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    pub text: String,
}

/// POST /api/v1/vagas/import
///
/// Accepts a multipart upload of a single `.md` file and returns the draft
/// fields for form auto-fill. The extension gate runs before any content is
/// looked at.
pub async fn handle_import(
    State(_state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ImportResponse>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        let Some(filename) = field.file_name().map(String::from) else {
            continue; // not a file part
        };

        if !is_markdown_file(&filename) {
            return Err(AppError::Validation(format!(
                "'{filename}' is not a markdown file; only .md uploads are accepted"
            )));
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
        let text = String::from_utf8(bytes.to_vec())
            .map_err(|_| AppError::Validation("File is not valid UTF-8".to_string()))?;

        let draft = extract_vaga_draft(&normalize_markdown(&text));
        let empty = draft.is_empty();
        if empty {
            tracing::info!("No fields extracted from '{filename}'");
        }

        return Ok(Json(ImportResponse {
            filename: Some(filename),
            draft,
            empty,
        }));
    }

    Err(AppError::Validation(
        "No file found in multipart body".to_string(),
    ))
}

/// POST /api/v1/vagas/extract
///
/// Same extraction over pasted text instead of an uploaded file.
pub async fn handle_extract(
    State(_state): State<AppState>,
    Json(request): Json<ExtractRequest>,
) -> Result<Json<ImportResponse>, AppError> {
    let draft = extract_vaga_draft(&normalize_markdown(&request.text));
    let empty = draft.is_empty();

    Ok(Json(ImportResponse {
        filename: None,
        draft,
        empty,
    }))
}
