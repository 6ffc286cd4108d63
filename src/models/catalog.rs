// src/models/catalog.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Registro de serviço lido pela página de detalhes
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: Uuid,
    #[schema(example = "تطوير تطبيقات الموبايل")]
    pub title: String,
    pub description: String,
    #[schema(example = "Smartphone")]
    pub icon: String,
    #[schema(example = "development")]
    pub category: String,
    pub featured: bool,
    pub technologies: Vec<String>,
    #[schema(example = "8-12 أسبوع")]
    pub delivery_time: Option<String>,
    pub starting_price: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewService {
    #[validate(length(min = 1, message = "required"))]
    pub title: String,
    #[validate(length(min = 1, message = "required"))]
    pub description: String,
    #[validate(length(min = 1, message = "required"))]
    pub icon: String,
    #[validate(length(min = 1, message = "required"))]
    pub category: String,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub technologies: Vec<String>,
    pub delivery_time: Option<String>,
    pub starting_price: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn service_insert_rejects_server_fields() {
        let minimal = json!({
            "title": "Web",
            "description": "Sites",
            "icon": "Globe",
            "category": "development"
        });
        let service: NewService = serde_json::from_value(minimal.clone()).unwrap();
        assert!(service.validate().is_ok());
        assert!(!service.featured);

        for key in ["id", "createdAt", "updatedAt"] {
            let mut payload = minimal.clone();
            payload[key] = json!("2026-01-01T00:00:00Z");
            assert!(serde_json::from_value::<NewService>(payload).is_err(), "{key}");
        }
    }
}
