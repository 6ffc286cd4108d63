// src/models/support.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::{crm::default_color, crm::Priority, Attachment};

// Nome usado no cache `status` quando o chamado não aponta para nenhum TicketStatus
pub const DEFAULT_TICKET_STATUS: &str = "open";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "ticket_category", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum TicketCategory {
    #[default]
    General,
    Technical,
    Billing,
    FeatureRequest,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "project_status", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum ProjectStatus {
    #[default]
    Planning,
    InProgress,
    Review,
    Completed,
    Cancelled,
}

// --- PROJETOS ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub title: String,
    pub description: String,
    pub status: ProjectStatus,
    #[schema(example = 40)]
    pub progress: i16,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewProject {
    pub user_id: Option<Uuid>,
    #[validate(length(min = 1, message = "required"))]
    pub title: String,
    #[validate(length(min = 1, message = "required"))]
    pub description: String,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default)]
    #[validate(range(min = 0, max = 100, message = "invalid_progress"))]
    pub progress: i16,
}

// --- STATUS DE CHAMADO (tabela de ordenação) ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TicketStatus {
    pub id: Uuid,
    #[schema(example = "in-progress")]
    pub name: String,
    #[schema(example = 2)]
    pub position: i32,
    pub color: String,
    pub is_closed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewTicketStatus {
    #[validate(length(min = 1, message = "required"))]
    pub name: String,
    #[validate(range(min = 0, message = "invalid_position"))]
    pub position: i32,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default)]
    pub is_closed: bool,
}

// --- CHAMADOS ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SupportTicket {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub project_id: Option<Uuid>,
    // Fonte da verdade do status
    pub status_id: Option<Uuid>,
    pub subject: String,
    pub description: String,
    // Cache do nome do TicketStatus referenciado
    #[schema(example = "open")]
    pub status: String,
    pub priority: Priority,
    pub category: TicketCategory,
    pub assigned_to: Option<Uuid>,
    #[sqlx(json)]
    pub attachments: Vec<Attachment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewSupportTicket {
    pub user_id: Option<Uuid>,
    pub project_id: Option<Uuid>,
    pub status_id: Option<Uuid>,
    #[validate(length(min = 1, message = "required"))]
    pub subject: String,
    #[validate(length(min = 1, message = "required"))]
    pub description: String,
    // Aceito por compatibilidade; é recalculado a partir de `statusId`
    pub status: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub category: TicketCategory,
    pub assigned_to: Option<Uuid>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

// --- MENSAGENS DE CHAMADO ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TicketMessage {
    pub id: Uuid,
    pub ticket_id: Uuid,
    pub user_id: Option<Uuid>,
    pub message: String,
    // Resposta da equipe (e não do cliente)
    pub is_staff: bool,
    #[sqlx(json)]
    pub attachments: Vec<Attachment>,
    pub created_at: DateTime<Utc>,
}

/// O chamado vem do caminho (`/tickets/{id}/messages`), não do corpo.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewTicketMessage {
    pub user_id: Option<Uuid>,
    #[validate(length(min = 1, message = "required"))]
    pub message: String,
    #[serde(default)]
    pub is_staff: bool,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ticket_defaults() {
        let ticket: NewSupportTicket =
            serde_json::from_value(json!({ "subject": "App crashes", "description": "On login" })).unwrap();
        assert_eq!(ticket.priority, Priority::Medium);
        assert_eq!(ticket.category, TicketCategory::General);
        assert!(ticket.attachments.is_empty());
    }

    #[test]
    fn ticket_insert_rejects_server_fields() {
        let payload = json!({
            "subject": "x",
            "description": "y",
            "createdAt": "2026-01-01T00:00:00Z",
        });
        assert!(serde_json::from_value::<NewSupportTicket>(payload).is_err());
    }

    #[test]
    fn status_and_project_inserts_reject_server_fields() {
        let status = json!({ "name": "waiting", "position": 4 });
        let project = json!({ "title": "Store app", "description": "Flutter" });
        assert!(serde_json::from_value::<NewTicketStatus>(status.clone()).is_ok());
        assert!(serde_json::from_value::<NewProject>(project.clone()).is_ok());

        for key in ["id", "createdAt", "updatedAt"] {
            let mut with_key = status.clone();
            with_key[key] = json!("2026-01-01T00:00:00Z");
            assert!(serde_json::from_value::<NewTicketStatus>(with_key).is_err(), "status {key}");

            let mut with_key = project.clone();
            with_key[key] = json!("2026-01-01T00:00:00Z");
            assert!(serde_json::from_value::<NewProject>(with_key).is_err(), "project {key}");
        }
    }

    #[test]
    fn message_defaults_to_a_client_reply() {
        let message: NewTicketMessage = serde_json::from_value(json!({ "message": "Still broken" })).unwrap();
        assert!(!message.is_staff);
        assert!(message.attachments.is_empty());
        assert!(message.validate().is_ok());

        let empty: NewTicketMessage = serde_json::from_value(json!({ "message": "" })).unwrap();
        assert!(empty.validate().is_err());
    }

    #[test]
    fn message_insert_rejects_server_fields() {
        let payload = json!({ "message": "hi", "ticketId": Uuid::new_v4() });
        assert!(serde_json::from_value::<NewTicketMessage>(payload).is_err());
    }
}
