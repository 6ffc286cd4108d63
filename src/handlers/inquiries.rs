// src/handlers/inquiries.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
    models::inquiry::{ContactSubmission, NewContactSubmission},
};

// POST /api/contact-submissions
#[utoipa::path(
    post,
    path = "/api/contact-submissions",
    tag = "Contact",
    request_body = NewContactSubmission,
    responses(
        (status = 201, description = "Mensagem recebida", body = ContactSubmission),
        (status = 400, description = "Dados inválidos")
    )
)]
pub async fn submit_contact_form(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<NewContactSubmission>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let submission = app_state
        .inquiry_service
        .submit(payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(submission)))
}

// GET /api/contact-submissions
#[utoipa::path(
    get,
    path = "/api/contact-submissions",
    tag = "Contact",
    responses((status = 200, description = "Mensagens em ordem de chegada", body = Vec<ContactSubmission>))
)]
pub async fn list_contact_submissions(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let submissions = app_state
        .inquiry_service
        .list()
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(submissions)))
}
