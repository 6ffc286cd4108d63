// src/handlers/support.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{actor::ActorContext, i18n::Locale},
    models::support::{
        NewProject, NewSupportTicket, NewTicketMessage, NewTicketStatus, Project, SupportTicket,
        TicketMessage, TicketStatus,
    },
};

// =============================================================================
//  PROJETOS
// =============================================================================

// POST /api/projects
#[utoipa::path(
    post,
    path = "/api/projects",
    tag = "Support",
    request_body = NewProject,
    responses(
        (status = 201, description = "Projeto criado", body = Project),
        (status = 400, description = "Dados inválidos")
    ),
    params(("x-actor-id" = Option<Uuid>, Header, description = "Usuário responsável (auditoria)"))
)]
pub async fn create_project(
    State(app_state): State<AppState>,
    locale: Locale,
    actor: ActorContext,
    Json(payload): Json<NewProject>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let project = app_state
        .support_service
        .create_project(actor.0, payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(project)))
}

// GET /api/projects
#[utoipa::path(
    get,
    path = "/api/projects",
    tag = "Support",
    responses((status = 200, description = "Projetos", body = Vec<Project>))
)]
pub async fn list_projects(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let projects = app_state
        .support_service
        .list_projects()
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(projects)))
}

// =============================================================================
//  STATUS DE CHAMADOS
// =============================================================================

// POST /api/support/statuses
#[utoipa::path(
    post,
    path = "/api/support/statuses",
    tag = "Support",
    request_body = NewTicketStatus,
    responses(
        (status = 201, description = "Status criado", body = TicketStatus),
        (status = 409, description = "Nome já usado")
    ),
    params(("x-actor-id" = Option<Uuid>, Header, description = "Usuário responsável (auditoria)"))
)]
pub async fn create_ticket_status(
    State(app_state): State<AppState>,
    locale: Locale,
    actor: ActorContext,
    Json(payload): Json<NewTicketStatus>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let status = app_state
        .support_service
        .create_ticket_status(actor.0, payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(status)))
}

// GET /api/support/statuses
#[utoipa::path(
    get,
    path = "/api/support/statuses",
    tag = "Support",
    responses((status = 200, description = "Status em ordem de posição", body = Vec<TicketStatus>))
)]
pub async fn list_ticket_statuses(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let statuses = app_state
        .support_service
        .list_ticket_statuses()
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(statuses)))
}

// =============================================================================
//  CHAMADOS
// =============================================================================

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateTicketStatusPayload {
    // `null` volta para o status padrão ("open")
    pub status_id: Option<Uuid>,
}

// POST /api/support/tickets
#[utoipa::path(
    post,
    path = "/api/support/tickets",
    tag = "Support",
    request_body = NewSupportTicket,
    responses(
        (status = 201, description = "Chamado aberto", body = SupportTicket),
        (status = 404, description = "Status não encontrado")
    ),
    params(("x-actor-id" = Option<Uuid>, Header, description = "Usuário responsável (auditoria)"))
)]
pub async fn create_ticket(
    State(app_state): State<AppState>,
    locale: Locale,
    actor: ActorContext,
    Json(payload): Json<NewSupportTicket>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let ticket = app_state
        .support_service
        .create_ticket(actor.0, payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(ticket)))
}

// GET /api/support/tickets
#[utoipa::path(
    get,
    path = "/api/support/tickets",
    tag = "Support",
    responses((status = 200, description = "Chamados", body = Vec<SupportTicket>))
)]
pub async fn list_tickets(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let tickets = app_state
        .support_service
        .list_tickets()
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(tickets)))
}

// GET /api/support/tickets/{id}
#[utoipa::path(
    get,
    path = "/api/support/tickets/{id}",
    tag = "Support",
    responses(
        (status = 200, description = "Chamado", body = SupportTicket),
        (status = 404, description = "Chamado não encontrado")
    ),
    params(("id" = Uuid, Path, description = "ID do chamado"))
)]
pub async fn get_ticket(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let ticket = app_state
        .support_service
        .get_ticket(id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(ticket)))
}

// PUT /api/support/tickets/{id}/status
#[utoipa::path(
    put,
    path = "/api/support/tickets/{id}/status",
    tag = "Support",
    request_body = UpdateTicketStatusPayload,
    responses(
        (status = 200, description = "Status atualizado", body = SupportTicket),
        (status = 404, description = "Chamado ou status não encontrado")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do chamado"),
        ("x-actor-id" = Option<Uuid>, Header, description = "Usuário responsável (auditoria)")
    )
)]
pub async fn update_ticket_status(
    State(app_state): State<AppState>,
    locale: Locale,
    actor: ActorContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTicketStatusPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let ticket = app_state
        .support_service
        .update_ticket_status(actor.0, id, payload.status_id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(ticket)))
}

// =============================================================================
//  MENSAGENS
// =============================================================================

// POST /api/support/tickets/{id}/messages
#[utoipa::path(
    post,
    path = "/api/support/tickets/{id}/messages",
    tag = "Support",
    request_body = NewTicketMessage,
    responses(
        (status = 201, description = "Mensagem adicionada", body = TicketMessage),
        (status = 404, description = "Chamado ou usuário não encontrado")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do chamado"),
        ("x-actor-id" = Option<Uuid>, Header, description = "Usuário responsável (auditoria)")
    )
)]
pub async fn add_ticket_message(
    State(app_state): State<AppState>,
    locale: Locale,
    actor: ActorContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<NewTicketMessage>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let message = app_state
        .support_service
        .add_ticket_message(actor.0, id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(message)))
}

// GET /api/support/tickets/{id}/messages
#[utoipa::path(
    get,
    path = "/api/support/tickets/{id}/messages",
    tag = "Support",
    responses(
        (status = 200, description = "Conversa em ordem cronológica", body = Vec<TicketMessage>),
        (status = 404, description = "Chamado não encontrado")
    ),
    params(("id" = Uuid, Path, description = "ID do chamado"))
)]
pub async fn list_ticket_messages(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let messages = app_state
        .support_service
        .list_ticket_messages(id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(messages)))
}
