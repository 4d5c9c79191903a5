pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::ai::handlers as ai_handlers;
use crate::import::handlers as import_handlers;
use crate::state::AppState;
use crate::vagas::handlers as vaga_handlers;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Vagas CRUD
        .route(
            "/api/v1/vagas",
            get(vaga_handlers::handle_list_vagas).post(vaga_handlers::handle_create_vaga),
        )
        .route(
            "/api/v1/vagas/:id",
            get(vaga_handlers::handle_get_vaga)
                .patch(vaga_handlers::handle_update_vaga)
                .delete(vaga_handlers::handle_delete_vaga),
        )
        // Markdown import
        .route("/api/v1/vagas/import", post(import_handlers::handle_import))
        .route(
            "/api/v1/vagas/extract",
            post(import_handlers::handle_extract),
        )
        // AI endpoints (quota-gated)
        .route("/api/v1/ai/analyze", post(ai_handlers::handle_analyze))
        .route("/api/v1/ai/resume", post(ai_handlers::handle_resume))
        .with_state(state)
}
