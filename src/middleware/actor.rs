// src/middleware/actor.rs

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};
use uuid::Uuid;

use crate::common::error::ApiError;

// Cabeçalho que identifica quem está executando a ação (para a auditoria)
const ACTOR_ID_HEADER: &str = "x-actor-id";

/// Usuário responsável pela requisição, quando informado.
/// Sem o cabeçalho a ação acontece, mas não gera registro de auditoria.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActorContext(pub Option<Uuid>);

impl<S> FromRequestParts<S> for ActorContext
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(ACTOR_ID_HEADER) else {
            return Ok(ActorContext(None));
        };

        let actor_id = value
            .to_str()
            .ok()
            .and_then(|raw| Uuid::parse_str(raw.trim()).ok())
            .ok_or_else(|| ApiError {
                status: StatusCode::BAD_REQUEST,
                error: "x-actor-id must be a UUID".to_string(),
                details: None,
            })?;

        Ok(ActorContext(Some(actor_id)))
    }
}
