// src/handlers/billing.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{actor::ActorContext, i18n::Locale},
    models::billing::{Invoice, NewInvoice, PayInvoicePayload},
};

// POST /api/invoices
#[utoipa::path(
    post,
    path = "/api/invoices",
    tag = "Billing",
    request_body = NewInvoice,
    responses(
        (status = 201, description = "Fatura emitida", body = Invoice),
        (status = 400, description = "Dados inválidos"),
        (status = 409, description = "Número de fatura já usado")
    ),
    params(("x-actor-id" = Option<Uuid>, Header, description = "Usuário responsável (auditoria)"))
)]
pub async fn create_invoice(
    State(app_state): State<AppState>,
    locale: Locale,
    actor: ActorContext,
    Json(payload): Json<NewInvoice>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let invoice = app_state
        .billing_service
        .create_invoice(actor.0, payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(invoice)))
}

// GET /api/invoices
#[utoipa::path(
    get,
    path = "/api/invoices",
    tag = "Billing",
    responses((status = 200, description = "Faturas", body = Vec<Invoice>))
)]
pub async fn list_invoices(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let invoices = app_state
        .billing_service
        .list_invoices()
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(invoices)))
}

// GET /api/invoices/{id}
#[utoipa::path(
    get,
    path = "/api/invoices/{id}",
    tag = "Billing",
    responses(
        (status = 200, description = "Fatura", body = Invoice),
        (status = 404, description = "Fatura não encontrada")
    ),
    params(("id" = Uuid, Path, description = "ID da fatura"))
)]
pub async fn get_invoice(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let invoice = app_state
        .billing_service
        .get_invoice(id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(invoice)))
}

// POST /api/invoices/{id}/pay
#[utoipa::path(
    post,
    path = "/api/invoices/{id}/pay",
    tag = "Billing",
    request_body = PayInvoicePayload,
    responses(
        (status = 200, description = "Fatura paga", body = Invoice),
        (status = 404, description = "Fatura não encontrada")
    ),
    params(
        ("id" = Uuid, Path, description = "ID da fatura"),
        ("x-actor-id" = Option<Uuid>, Header, description = "Usuário responsável (auditoria)")
    )
)]
pub async fn pay_invoice(
    State(app_state): State<AppState>,
    locale: Locale,
    actor: ActorContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<PayInvoicePayload>,
) -> Result<impl IntoResponse, ApiError> {
    let invoice = app_state
        .billing_service
        .mark_invoice_paid(actor.0, id, payload.paid_date, payload.payment_method)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(invoice)))
}
