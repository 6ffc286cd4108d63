// src/handlers/planning.rs

use std::collections::BTreeMap;

use axum::{
    extract::{multipart::Field, Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::de::DeserializeOwned;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
    services::planning_service::{PlanningReceipt, PlanningVariant},
    wizard::draft::{FileHandle, PlanningDraft, SelectionSet},
};

// POST /api/mobile-app-planning
#[utoipa::path(
    post,
    path = "/api/mobile-app-planning",
    tag = "Planning",
    request_body(
        content = String,
        content_type = "multipart/form-data",
        description = "appType, features, specializations, projectDetails, contactInfo (JSON), platforms (opcional) e file_{i}"
    ),
    responses(
        (status = 201, description = "Planejamento recebido e lead criado", body = PlanningReceipt),
        (status = 400, description = "Formulário inválido ou etapas incompletas")
    )
)]
pub async fn submit_planning(
    State(app_state): State<AppState>,
    locale: Locale,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let (variant, draft) = read_submission(multipart)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let receipt = app_state
        .planning_service
        .submit(variant, draft)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(receipt)))
}

/// Reconstrói o rascunho a partir das partes do formulário.
/// A presença de `platforms` indica a variante do app móvel.
async fn read_submission(mut multipart: Multipart) -> Result<(PlanningVariant, PlanningDraft), AppError> {
    let mut draft = PlanningDraft::default();
    let mut variant = PlanningVariant::Specialization;
    // Os arquivos entram na ordem do índice, não na ordem de chegada
    let mut files: BTreeMap<usize, FileHandle> = BTreeMap::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidPayload(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "appType" => draft.app_type = read_text(field).await?,
            "platforms" => {
                variant = PlanningVariant::MobileApp;
                draft.platforms = read_selection(field, &name).await?;
            }
            "features" => draft.features = read_selection(field, &name).await?,
            "specializations" => draft.specializations = read_selection(field, &name).await?,
            "projectDetails" => draft.project = read_json(field, &name).await?,
            "contactInfo" => draft.contact = read_json(field, &name).await?,
            other => match other.strip_prefix("file_").and_then(|i| i.parse::<usize>().ok()) {
                Some(index) => {
                    let file_name = field.file_name().unwrap_or("file").to_string();
                    let content_type = field
                        .content_type()
                        .unwrap_or("application/octet-stream")
                        .to_string();
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| AppError::InvalidPayload(e.to_string()))?;
                    files.insert(index, FileHandle::new(file_name, content_type, bytes.to_vec()));
                }
                None => tracing::debug!(field = other, "Parte desconhecida ignorada"),
            },
        }
    }

    for file in files.into_values() {
        draft.add_file(file);
    }
    Ok((variant, draft))
}

async fn read_text(field: Field<'_>) -> Result<String, AppError> {
    field.text().await.map_err(|e| AppError::InvalidPayload(e.to_string()))
}

async fn read_json<T: DeserializeOwned>(field: Field<'_>, name: &str) -> Result<T, AppError> {
    let raw = read_text(field).await?;
    serde_json::from_str(&raw).map_err(|e| AppError::InvalidPayload(format!("{name}: {e}")))
}

async fn read_selection(field: Field<'_>, name: &str) -> Result<SelectionSet, AppError> {
    let ids: Vec<String> = read_json(field, name).await?;
    Ok(ids.into_iter().collect())
}
