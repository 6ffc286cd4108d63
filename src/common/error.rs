// src/common/error.rs

use std::collections::HashMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::common::i18n::Language;
use crate::middleware::i18n::Locale;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Payload inválido: {0}")]
    InvalidPayload(String),

    #[error("Recurso não encontrado: {0}")]
    ResourceNotFound(String),

    #[error("Violação de unicidade: {0}")]
    UniqueConstraintViolation(String),

    #[error("A hierarquia de contas formaria um ciclo")]
    HierarchyCycle,

    // Etapas do assistente que ainda não estão completas
    #[error("Planejamento incompleto: etapas {0:?}")]
    PlanningIncomplete(Vec<u8>),

    #[error("Erro de banco de dados")]
    DatabaseError(#[source] sqlx::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

/// Erro já "traduzido", pronto para virar resposta HTTP.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.error, "details": details }),
            None => json!({ "error": self.error }),
        };
        (self.status, Json(body)).into_response()
    }
}

impl AppError {
    pub fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        AppError::ResourceNotFound(format!("{entity} {id}"))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::InvalidPayload(_)
            | AppError::PlanningIncomplete(_) => StatusCode::BAD_REQUEST,
            AppError::ResourceNotFound(_) => StatusCode::NOT_FOUND,
            AppError::UniqueConstraintViolation(_) | AppError::HierarchyCycle => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Converte o erro interno na resposta pública, no idioma da requisição.
    pub fn to_api_error(self, locale: &Locale) -> ApiError {
        let lang = locale.0;
        let status = self.status();

        let (message, details) = match &self {
            AppError::ValidationError(errors) => {
                let mut details: HashMap<String, Vec<String>> = HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let codes = field_errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                        })
                        .collect();
                    details.insert(field.to_string(), codes);
                }
                (
                    lang.pick("حقل واحد أو أكثر غير صالح.", "One or more fields are invalid."),
                    Some(json!(details)),
                )
            }
            AppError::InvalidPayload(reason) => (
                lang.pick("البيانات المرسلة غير صالحة.", "The submitted data is invalid."),
                Some(json!({ "reason": reason })),
            ),
            AppError::ResourceNotFound(what) => (
                lang.pick("العنصر المطلوب غير موجود.", "The requested resource was not found."),
                Some(json!({ "resource": what })),
            ),
            AppError::UniqueConstraintViolation(what) => (
                lang.pick("القيمة مستخدمة مسبقاً.", "This value is already in use."),
                Some(json!({ "conflict": what })),
            ),
            AppError::HierarchyCycle => (
                lang.pick(
                    "لا يمكن أن يكون الحساب أصلاً لنفسه أو لأحد فروعه.",
                    "An account cannot be the parent of itself or of its descendants.",
                ),
                None,
            ),
            AppError::PlanningIncomplete(steps) => (
                lang.pick("يرجى إكمال جميع خطوات التخطيط.", "Please complete every planning step."),
                Some(json!({ "incompleteSteps": steps })),
            ),
            // Todos os outros erros viram 500. O `tracing` loga a mensagem detalhada.
            e => {
                tracing::error!("Erro Interno do Servidor: {:?}", e);
                (
                    lang.pick("حدث خطأ غير متوقع.", "An unexpected error occurred."),
                    None,
                )
            }
        };

        ApiError {
            status,
            error: message.to_string(),
            details,
        }
    }
}

// Chave estrangeira inexistente vira 404, como no armazenamento em memória
impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.is_foreign_key_violation() {
                let constraint = db_err.constraint().unwrap_or("foreign key");
                return AppError::ResourceNotFound(format!("reference {constraint}"));
            }
        }
        AppError::DatabaseError(e)
    }
}

// Fallback para handlers que não recebem o `Locale`.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.to_api_error(&Locale(Language::default())).into_response()
    }
}

/// Traduz violações de unicidade do Postgres para `UniqueConstraintViolation`.
pub fn map_unique_violation(e: sqlx::Error, what: impl FnOnce() -> String) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            return AppError::UniqueConstraintViolation(what());
        }
    }
    e.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_and_cycle_map_to_409() {
        assert_eq!(AppError::HierarchyCycle.status(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::UniqueConstraintViolation("username".into()).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(AppError::not_found("lead", 1).status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn plain_database_errors_stay_internal() {
        let err = AppError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, AppError::DatabaseError(_)));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn messages_follow_the_request_language() {
        let en = AppError::HierarchyCycle.to_api_error(&Locale(Language::English));
        assert!(en.error.starts_with("An account"));

        let ar = AppError::PlanningIncomplete(vec![2, 4]).to_api_error(&Locale(Language::Arabic));
        assert_eq!(ar.status, StatusCode::BAD_REQUEST);
        assert_eq!(ar.details, Some(json!({ "incompleteSteps": [2, 4] })));
    }
}
