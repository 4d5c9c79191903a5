//! Axum route handlers for the Vagas CRUD API.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::vaga::VagaRow;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct CreateVagaRequest {
    pub user_id: Uuid,
    pub empresa: String,
    pub cargo: String,
    pub localizacao: Option<String>,
    pub modalidade: Option<String>,
    pub requisitos: Option<i32>,
    pub fit: Option<i16>,
    pub etapa: Option<String>,
    pub status: Option<String>,
    pub observacoes: Option<String>,
    pub link: Option<String>,
    pub data_aplicacao: Option<NaiveDate>,
}

/// All-optional update. Absent fields keep their stored value — the merge
/// policy is "only overwrite what the caller sent", matching the importer's
/// present-vs-absent contract. Clearing a field is not supported here.
#[derive(Debug, Deserialize)]
pub struct UpdateVagaRequest {
    pub empresa: Option<String>,
    pub cargo: Option<String>,
    pub localizacao: Option<String>,
    pub modalidade: Option<String>,
    pub requisitos: Option<i32>,
    pub fit: Option<i16>,
    pub etapa: Option<String>,
    pub status: Option<String>,
    pub observacoes: Option<String>,
    pub link: Option<String>,
    pub data_aplicacao: Option<NaiveDate>,
}

/// GET /api/v1/vagas
pub async fn handle_list_vagas(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Vec<VagaRow>>, AppError> {
    let vagas = sqlx::query_as::<_, VagaRow>(
        "SELECT * FROM vagas WHERE user_id = $1 ORDER BY updated_at DESC",
    )
    .bind(params.user_id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(vagas))
}

/// POST /api/v1/vagas
pub async fn handle_create_vaga(
    State(state): State<AppState>,
    Json(request): Json<CreateVagaRequest>,
) -> Result<(StatusCode, Json<VagaRow>), AppError> {
    if request.empresa.trim().is_empty() {
        return Err(AppError::Validation("empresa cannot be empty".to_string()));
    }
    if request.cargo.trim().is_empty() {
        return Err(AppError::Validation("cargo cannot be empty".to_string()));
    }
    validate_scores(request.requisitos, request.fit)?;

    let vaga = sqlx::query_as::<_, VagaRow>(
        r#"
        INSERT INTO vagas
            (id, user_id, empresa, cargo, localizacao, modalidade, requisitos,
             fit, etapa, status, observacoes, link, data_aplicacao)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(request.user_id)
    .bind(request.empresa.trim())
    .bind(request.cargo.trim())
    .bind(&request.localizacao)
    .bind(&request.modalidade)
    .bind(request.requisitos)
    .bind(request.fit)
    .bind(&request.etapa)
    .bind(request.status.as_deref().unwrap_or("pendente"))
    .bind(&request.observacoes)
    .bind(&request.link)
    .bind(request.data_aplicacao)
    .fetch_one(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(vaga)))
}

/// GET /api/v1/vagas/:id
pub async fn handle_get_vaga(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<VagaRow>, AppError> {
    let vaga = fetch_vaga(&state, id, params.user_id).await?;
    Ok(Json(vaga))
}

/// PATCH /api/v1/vagas/:id
pub async fn handle_update_vaga(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
    Json(request): Json<UpdateVagaRequest>,
) -> Result<Json<VagaRow>, AppError> {
    validate_scores(request.requisitos, request.fit)?;

    let vaga = sqlx::query_as::<_, VagaRow>(
        r#"
        UPDATE vagas SET
            empresa = COALESCE($3, empresa),
            cargo = COALESCE($4, cargo),
            localizacao = COALESCE($5, localizacao),
            modalidade = COALESCE($6, modalidade),
            requisitos = COALESCE($7, requisitos),
            fit = COALESCE($8, fit),
            etapa = COALESCE($9, etapa),
            status = COALESCE($10, status),
            observacoes = COALESCE($11, observacoes),
            link = COALESCE($12, link),
            data_aplicacao = COALESCE($13, data_aplicacao),
            updated_at = NOW()
        WHERE id = $1 AND user_id = $2
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(params.user_id)
    .bind(&request.empresa)
    .bind(&request.cargo)
    .bind(&request.localizacao)
    .bind(&request.modalidade)
    .bind(request.requisitos)
    .bind(request.fit)
    .bind(&request.etapa)
    .bind(&request.status)
    .bind(&request.observacoes)
    .bind(&request.link)
    .bind(request.data_aplicacao)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Vaga {id} not found")))?;

    Ok(Json(vaga))
}

/// DELETE /api/v1/vagas/:id
pub async fn handle_delete_vaga(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<StatusCode, AppError> {
    let result = sqlx::query("DELETE FROM vagas WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(params.user_id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Vaga {id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn fetch_vaga(state: &AppState, id: Uuid, user_id: Uuid) -> Result<VagaRow, AppError> {
    sqlx::query_as::<_, VagaRow>("SELECT * FROM vagas WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Vaga {id} not found")))
}

/// Score bounds mirror the importer's: requisitos 0–100, fit 0–10.
fn validate_scores(requisitos: Option<i32>, fit: Option<i16>) -> Result<(), AppError> {
    if let Some(requisitos) = requisitos {
        if !(0..=100).contains(&requisitos) {
            return Err(AppError::Validation(
                "requisitos must be between 0 and 100".to_string(),
            ));
        }
    }
    if let Some(fit) = fit {
        if !(0..=10).contains(&fit) {
            return Err(AppError::Validation(
                "fit must be between 0 and 10".to_string(),
            ));
        }
    }
    Ok(())
}
