// src/models/inquiry.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Formulário "fale conosco" do site. Só inserção e leitura.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactSubmission {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    #[schema(example = "mobile-development")]
    pub service: Option<String>,
    #[schema(example = "ecommerce")]
    pub service_application: Option<String>,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewContactSubmission {
    #[validate(length(min = 1, message = "required"))]
    pub name: String,
    #[validate(email(message = "invalid_email"))]
    pub email: String,
    pub phone: Option<String>,
    pub service: Option<String>,
    pub service_application: Option<String>,
    #[validate(length(min = 1, message = "required"))]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn requires_a_valid_email_and_message() {
        let ok: NewContactSubmission = serde_json::from_value(json!({
            "name": "Salem",
            "email": "salem@example.com",
            "serviceApplication": "fintech",
            "message": "نريد تطبيق محفظة",
        }))
        .unwrap();
        assert!(ok.validate().is_ok());

        let bad: NewContactSubmission = serde_json::from_value(json!({
            "name": "Salem",
            "email": "salem",
            "message": "",
        }))
        .unwrap();
        let errors = bad.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
        assert!(errors.field_errors().contains_key("message"));
    }

    #[test]
    fn rejects_server_fields() {
        let payload = json!({
            "name": "Salem",
            "email": "salem@example.com",
            "message": "hi",
            "createdAt": "2026-01-01T00:00:00Z",
        });
        assert!(serde_json::from_value::<NewContactSubmission>(payload).is_err());
    }
}
