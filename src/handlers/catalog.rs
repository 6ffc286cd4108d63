// src/handlers/catalog.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    catalog::{fragment_for, CatalogEntry, CategoryOption},
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
    models::catalog::{NewService, Service},
};

// =============================================================================
//  SERVIÇOS
// =============================================================================

// POST /api/services
#[utoipa::path(
    post,
    path = "/api/services",
    tag = "Catalog",
    request_body = NewService,
    responses(
        (status = 201, description = "Serviço publicado", body = Service),
        (status = 400, description = "Dados inválidos")
    )
)]
pub async fn create_service(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<NewService>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let service = app_state
        .catalog_service
        .create_service(payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(service)))
}

// GET /api/services
#[utoipa::path(
    get,
    path = "/api/services",
    tag = "Catalog",
    responses((status = 200, description = "Serviços oferecidos", body = Vec<Service>))
)]
pub async fn list_services(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let services = app_state
        .catalog_service
        .list_services()
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(services)))
}

// GET /api/services/{id}
#[utoipa::path(
    get,
    path = "/api/services/{id}",
    tag = "Catalog",
    responses(
        (status = 200, description = "Serviço", body = Service),
        (status = 404, description = "Serviço não encontrado")
    ),
    params(("id" = Uuid, Path, description = "ID do serviço"))
)]
pub async fn get_service(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let service = app_state
        .catalog_service
        .get_service(id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(service)))
}

// =============================================================================
//  CATÁLOGO DE APPS
// =============================================================================

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CatalogCard {
    #[schema(example = "ec1")]
    pub id: String,
    #[schema(example = "ecommerce")]
    pub category: String,
    pub title: String,
    pub short_desc: String,
    pub key_features: Vec<String>,
    pub tag: Option<String>,
    pub stack: Vec<String>,
    #[schema(example = "#details-ec1")]
    pub fragment: String,
}

impl From<&CatalogEntry> for CatalogCard {
    fn from(entry: &CatalogEntry) -> Self {
        Self {
            id: entry.id.to_string(),
            category: entry.category.to_string(),
            title: entry.title.to_string(),
            short_desc: entry.short_desc.to_string(),
            key_features: entry.key_features.iter().map(|s| s.to_string()).collect(),
            tag: entry.tag.map(str::to_string),
            stack: entry.stack.iter().map(|s| s.to_string()).collect(),
            fragment: fragment_for(entry.id),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryLabel {
    #[schema(example = "all")]
    pub key: String,
    pub label: String,
}

impl CategoryLabel {
    fn localized(option: &CategoryOption, locale: &Locale) -> Self {
        Self {
            key: option.key.to_string(),
            label: option.label.get(locale.0).to_string(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DetailResolution {
    pub open: bool,
    pub entry: Option<CatalogCard>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AppsQuery {
    pub category: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct FragmentQuery {
    #[serde(default)]
    pub fragment: String,
}

// GET /api/catalog/categories
#[utoipa::path(
    get,
    path = "/api/catalog/categories",
    tag = "Catalog",
    responses((status = 200, description = "Categorias com rótulo no idioma da requisição", body = Vec<CategoryLabel>))
)]
pub async fn list_categories(State(app_state): State<AppState>, locale: Locale) -> impl IntoResponse {
    let categories: Vec<CategoryLabel> = app_state
        .catalog_service
        .categories()
        .iter()
        .map(|option| CategoryLabel::localized(option, &locale))
        .collect();

    (StatusCode::OK, Json(categories))
}

// GET /api/catalog/apps?category=
#[utoipa::path(
    get,
    path = "/api/catalog/apps",
    tag = "Catalog",
    responses((status = 200, description = "Cartões na ordem original; lista vazia se nada casar", body = Vec<CatalogCard>)),
    params(("category" = Option<String>, Query, description = "Categoria ou `all`"))
)]
pub async fn list_apps(State(app_state): State<AppState>, Query(query): Query<AppsQuery>) -> impl IntoResponse {
    let cards: Vec<CatalogCard> = app_state
        .catalog_service
        .list_apps(query.category.as_deref())
        .into_iter()
        .map(CatalogCard::from)
        .collect();

    (StatusCode::OK, Json(cards))
}

// GET /api/catalog/apps/resolve?fragment=
#[utoipa::path(
    get,
    path = "/api/catalog/apps/resolve",
    tag = "Catalog",
    responses((status = 200, description = "Cartão a abrir; id desconhecido não é erro", body = DetailResolution)),
    params(("fragment" = String, Query, description = "Ex.: #details-ec1"))
)]
pub async fn resolve_fragment(
    State(app_state): State<AppState>,
    Query(query): Query<FragmentQuery>,
) -> impl IntoResponse {
    let entry = app_state.catalog_service.resolve_fragment(&query.fragment);
    let resolution = DetailResolution {
        open: entry.is_some(),
        entry: entry.map(CatalogCard::from),
    };

    (StatusCode::OK, Json(resolution))
}
