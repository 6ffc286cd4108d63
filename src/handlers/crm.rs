// src/handlers/crm.rs

use axum::{
    extract::{Path, Query, State},
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
    models::crm::{
        Account, Contact, CrmActivity, DealStage, Lead, LeadStatus, NewAccount, NewContact,
        NewCrmActivity, NewDealStage, NewLead, NewOpportunity, NewTask, Opportunity,
        OpportunityStage, Task,
    },
};

// =============================================================================
//  ÁREA 1: LEADS
// =============================================================================

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateLeadStatusPayload {
    #[schema(example = "qualified")]
    pub status: LeadStatus,
}

// POST /api/crm/leads
#[utoipa::path(
    post,
    path = "/api/crm/leads",
    tag = "CRM",
    request_body = NewLead,
    responses(
        (status = 201, description = "Lead criado", body = Lead),
        (status = 400, description = "Dados inválidos")
    ),
    params(("x-actor-id" = Option<Uuid>, Header, description = "Usuário responsável (auditoria)"))
)]
pub async fn create_lead(
    State(app_state): State<AppState>,
    locale: Locale,
    actor: ActorContext,
    Json(payload): Json<NewLead>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let lead = app_state
        .crm_service
        .create_lead(actor.0, payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(lead)))
}

// GET /api/crm/leads
#[utoipa::path(
    get,
    path = "/api/crm/leads",
    tag = "CRM",
    responses((status = 200, description = "Leads", body = Vec<Lead>))
)]
pub async fn list_leads(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let leads = app_state
        .crm_service
        .list_leads()
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(leads)))
}

// GET /api/crm/leads/{id}
#[utoipa::path(
    get,
    path = "/api/crm/leads/{id}",
    tag = "CRM",
    responses(
        (status = 200, description = "Lead", body = Lead),
        (status = 404, description = "Lead não encontrado")
    ),
    params(("id" = Uuid, Path, description = "ID do lead"))
)]
pub async fn get_lead(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let lead = app_state
        .crm_service
        .get_lead(id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(lead)))
}

// PUT /api/crm/leads/{id}/status
#[utoipa::path(
    put,
    path = "/api/crm/leads/{id}/status",
    tag = "CRM",
    request_body = UpdateLeadStatusPayload,
    responses(
        (status = 200, description = "Status atualizado", body = Lead),
        (status = 404, description = "Lead não encontrado")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do lead"),
        ("x-actor-id" = Option<Uuid>, Header, description = "Usuário responsável (auditoria)")
    )
)]
pub async fn update_lead_status(
    State(app_state): State<AppState>,
    locale: Locale,
    actor: ActorContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateLeadStatusPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let lead = app_state
        .crm_service
        .update_lead_status(actor.0, id, payload.status)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(lead)))
}

// =============================================================================
//  ÁREA 2: CONTAS
// =============================================================================

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SetAccountParentPayload {
    // `null` desanexa a conta da hierarquia
    pub parent_account_id: Option<Uuid>,
}

// POST /api/crm/accounts
#[utoipa::path(
    post,
    path = "/api/crm/accounts",
    tag = "CRM",
    request_body = NewAccount,
    responses(
        (status = 201, description = "Conta criada", body = Account),
        (status = 404, description = "Conta pai não encontrada")
    ),
    params(("x-actor-id" = Option<Uuid>, Header, description = "Usuário responsável (auditoria)"))
)]
pub async fn create_account(
    State(app_state): State<AppState>,
    locale: Locale,
    actor: ActorContext,
    Json(payload): Json<NewAccount>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let account = app_state
        .crm_service
        .create_account(actor.0, payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(account)))
}

// GET /api/crm/accounts
#[utoipa::path(
    get,
    path = "/api/crm/accounts",
    tag = "CRM",
    responses((status = 200, description = "Contas", body = Vec<Account>))
)]
pub async fn list_accounts(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let accounts = app_state
        .crm_service
        .list_accounts()
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(accounts)))
}

// GET /api/crm/accounts/{id}
#[utoipa::path(
    get,
    path = "/api/crm/accounts/{id}",
    tag = "CRM",
    responses(
        (status = 200, description = "Conta", body = Account),
        (status = 404, description = "Conta não encontrada")
    ),
    params(("id" = Uuid, Path, description = "ID da conta"))
)]
pub async fn get_account(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let account = app_state
        .crm_service
        .get_account(id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(account)))
}

// PUT /api/crm/accounts/{id}/parent
#[utoipa::path(
    put,
    path = "/api/crm/accounts/{id}/parent",
    tag = "CRM",
    request_body = SetAccountParentPayload,
    responses(
        (status = 200, description = "Hierarquia atualizada", body = Account),
        (status = 404, description = "Conta não encontrada"),
        (status = 409, description = "A mudança formaria um ciclo")
    ),
    params(
        ("id" = Uuid, Path, description = "ID da conta"),
        ("x-actor-id" = Option<Uuid>, Header, description = "Usuário responsável (auditoria)")
    )
)]
pub async fn set_account_parent(
    State(app_state): State<AppState>,
    locale: Locale,
    actor: ActorContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetAccountParentPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let account = app_state
        .crm_service
        .set_account_parent(actor.0, id, payload.parent_account_id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(account)))
}

// =============================================================================
//  ÁREA 3: CONTATOS
// =============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactFilter {
    pub account_id: Option<Uuid>,
}

// POST /api/crm/contacts
#[utoipa::path(
    post,
    path = "/api/crm/contacts",
    tag = "CRM",
    request_body = NewContact,
    responses(
        (status = 201, description = "Contato criado", body = Contact),
        (status = 409, description = "A conta já tem um contato principal")
    ),
    params(("x-actor-id" = Option<Uuid>, Header, description = "Usuário responsável (auditoria)"))
)]
pub async fn create_contact(
    State(app_state): State<AppState>,
    locale: Locale,
    actor: ActorContext,
    Json(payload): Json<NewContact>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let contact = app_state
        .crm_service
        .create_contact(actor.0, payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(contact)))
}

// GET /api/crm/contacts
#[utoipa::path(
    get,
    path = "/api/crm/contacts",
    tag = "CRM",
    responses((status = 200, description = "Contatos", body = Vec<Contact>)),
    params(("accountId" = Option<Uuid>, Query, description = "Filtra pela conta"))
)]
pub async fn list_contacts(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(filter): Query<ContactFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let contacts = app_state
        .crm_service
        .list_contacts(filter.account_id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(contacts)))
}

// =============================================================================
//  ÁREA 4: OPORTUNIDADES
// =============================================================================

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateOpportunityStagePayload {
    #[schema(example = "closed-won")]
    pub stage: OpportunityStage,
    pub stage_id: Option<Uuid>,
}

// POST /api/crm/opportunities
#[utoipa::path(
    post,
    path = "/api/crm/opportunities",
    tag = "CRM",
    request_body = NewOpportunity,
    responses(
        (status = 201, description = "Oportunidade criada", body = Opportunity),
        (status = 400, description = "Dados inválidos")
    ),
    params(("x-actor-id" = Option<Uuid>, Header, description = "Usuário responsável (auditoria)"))
)]
pub async fn create_opportunity(
    State(app_state): State<AppState>,
    locale: Locale,
    actor: ActorContext,
    Json(payload): Json<NewOpportunity>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let opportunity = app_state
        .crm_service
        .create_opportunity(actor.0, payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(opportunity)))
}

// GET /api/crm/opportunities
#[utoipa::path(
    get,
    path = "/api/crm/opportunities",
    tag = "CRM",
    responses((status = 200, description = "Oportunidades", body = Vec<Opportunity>))
)]
pub async fn list_opportunities(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let opportunities = app_state
        .crm_service
        .list_opportunities()
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(opportunities)))
}

// PUT /api/crm/opportunities/{id}/stage
#[utoipa::path(
    put,
    path = "/api/crm/opportunities/{id}/stage",
    tag = "CRM",
    request_body = UpdateOpportunityStagePayload,
    responses(
        (status = 200, description = "Etapa atualizada", body = Opportunity),
        (status = 404, description = "Oportunidade não encontrada")
    ),
    params(
        ("id" = Uuid, Path, description = "ID da oportunidade"),
        ("x-actor-id" = Option<Uuid>, Header, description = "Usuário responsável (auditoria)")
    )
)]
pub async fn update_opportunity_stage(
    State(app_state): State<AppState>,
    locale: Locale,
    actor: ActorContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateOpportunityStagePayload>,
) -> Result<impl IntoResponse, ApiError> {
    let opportunity = app_state
        .crm_service
        .update_opportunity_stage(actor.0, id, payload.stage, payload.stage_id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(opportunity)))
}

// =============================================================================
//  ÁREA 5: TAREFAS E ATIVIDADES
// =============================================================================

// POST /api/crm/tasks
#[utoipa::path(
    post,
    path = "/api/crm/tasks",
    tag = "CRM",
    request_body = NewTask,
    responses(
        (status = 201, description = "Tarefa criada", body = Task),
        (status = 400, description = "Dados inválidos")
    ),
    params(("x-actor-id" = Option<Uuid>, Header, description = "Usuário responsável (auditoria)"))
)]
pub async fn create_task(
    State(app_state): State<AppState>,
    locale: Locale,
    actor: ActorContext,
    Json(payload): Json<NewTask>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let task = app_state
        .crm_service
        .create_task(actor.0, payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(task)))
}

// GET /api/crm/tasks
#[utoipa::path(
    get,
    path = "/api/crm/tasks",
    tag = "CRM",
    responses((status = 200, description = "Tarefas", body = Vec<Task>))
)]
pub async fn list_tasks(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let tasks = app_state
        .crm_service
        .list_tasks()
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(tasks)))
}

// POST /api/crm/activities
#[utoipa::path(
    post,
    path = "/api/crm/activities",
    tag = "CRM",
    request_body = NewCrmActivity,
    responses(
        (status = 201, description = "Atividade registrada", body = CrmActivity),
        (status = 400, description = "Dados inválidos")
    ),
    params(("x-actor-id" = Option<Uuid>, Header, description = "Usuário responsável (auditoria)"))
)]
pub async fn create_activity(
    State(app_state): State<AppState>,
    locale: Locale,
    actor: ActorContext,
    Json(payload): Json<NewCrmActivity>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let activity = app_state
        .crm_service
        .create_activity(actor.0, payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(activity)))
}

// GET /api/crm/activities
#[utoipa::path(
    get,
    path = "/api/crm/activities",
    tag = "CRM",
    responses((status = 200, description = "Atividades", body = Vec<CrmActivity>))
)]
pub async fn list_activities(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let activities = app_state
        .crm_service
        .list_activities()
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(activities)))
}

// =============================================================================
//  ÁREA 6: ETAPAS DO FUNIL
// =============================================================================

// POST /api/crm/deal-stages
#[utoipa::path(
    post,
    path = "/api/crm/deal-stages",
    tag = "CRM",
    request_body = NewDealStage,
    responses(
        (status = 201, description = "Etapa criada", body = DealStage),
        (status = 409, description = "Nome já usado")
    ),
    params(("x-actor-id" = Option<Uuid>, Header, description = "Usuário responsável (auditoria)"))
)]
pub async fn create_deal_stage(
    State(app_state): State<AppState>,
    locale: Locale,
    actor: ActorContext,
    Json(payload): Json<NewDealStage>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let stage = app_state
        .crm_service
        .create_deal_stage(actor.0, payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(stage)))
}

// GET /api/crm/deal-stages
#[utoipa::path(
    get,
    path = "/api/crm/deal-stages",
    tag = "CRM",
    responses((status = 200, description = "Etapas em ordem de posição", body = Vec<DealStage>))
)]
pub async fn list_deal_stages(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let stages = app_state
        .crm_service
        .list_deal_stages()
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(stages)))
}
