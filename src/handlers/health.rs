// src/handlers/health.rs

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{config::AppState, db::StoreBackend};

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthReport {
    #[schema(example = "ok")]
    pub status: &'static str,
    pub store: StoreBackend,
}

// GET /api/health
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "Health",
    responses((status = 200, description = "Servidor no ar", body = HealthReport))
)]
pub async fn health(State(app_state): State<AppState>) -> Json<HealthReport> {
    Json(HealthReport {
        status: "ok",
        store: app_state.backend,
    })
}
