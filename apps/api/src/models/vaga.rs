use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One tracked application. `modalidade` and `status` hold the normalized
/// category strings produced by the importer (`hibrido`, `pendente`, ...).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct VagaRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub empresa: String,
    pub cargo: String,
    pub localizacao: Option<String>,
    pub modalidade: Option<String>,
    /// Requirements-match score, 0–100.
    pub requisitos: Option<i32>,
    /// Fit score, 0–10. The UI rescales to stars; the API never does.
    pub fit: Option<i16>,
    pub etapa: Option<String>,
    pub status: String,
    pub observacoes: Option<String>,
    pub link: Option<String>,
    pub data_aplicacao: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
