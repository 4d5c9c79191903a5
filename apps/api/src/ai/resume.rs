use crate::ai::prompts::{RESUME_PROMPT_TEMPLATE, RESUME_SYSTEM};
use crate::errors::AppError;
use crate::llm_client::{Completion, LlmClient};
use crate::models::vaga::VagaRow;

/// Generates a resume tailored to `vaga` from the user's profile text.
/// Returns the completion so the caller can charge the token quota.
pub async fn generate_resume(
    llm: &LlmClient,
    vaga: &VagaRow,
    profile: &str,
) -> Result<Completion, AppError> {
    let prompt = RESUME_PROMPT_TEMPLATE
        .replace("{vaga}", &describe_vaga(vaga))
        .replace("{profile}", profile);

    llm.complete(RESUME_SYSTEM, &prompt)
        .await
        .map_err(|e| AppError::Llm(format!("Resume generation failed: {e}")))
}

/// Compact description of the target vaga for the prompt.
/// Optional fields are skipped rather than rendered as "unknown".
fn describe_vaga(vaga: &VagaRow) -> String {
    let mut lines = vec![
        format!("Empresa: {}", vaga.empresa),
        format!("Cargo: {}", vaga.cargo),
    ];
    if let Some(localizacao) = &vaga.localizacao {
        lines.push(format!("Localização: {localizacao}"));
    }
    if let Some(modalidade) = &vaga.modalidade {
        lines.push(format!("Modalidade: {modalidade}"));
    }
    if let Some(observacoes) = &vaga.observacoes {
        lines.push(format!("Observações: {observacoes}"));
    }
    lines.join("\n")
}
