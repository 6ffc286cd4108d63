// src/handlers/audit.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::i18n::Locale,
    models::audit::{AuditLog, AuditQuery},
};

// GET /api/audit-logs
#[utoipa::path(
    get,
    path = "/api/audit-logs",
    tag = "Audit",
    responses((status = 200, description = "Trilha de auditoria, mais antigos primeiro", body = Vec<AuditLog>)),
    params(
        ("entityType" = Option<String>, Query, description = "Ex.: leads, invoices"),
        ("entityId" = Option<Uuid>, Query, description = "ID da entidade")
    )
)]
pub async fn list_audit_logs(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<AuditQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let logs = app_state
        .audit_service
        .list(&query)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(logs)))
}
