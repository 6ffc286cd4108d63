// src/models/audit.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::empty_object;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "audit_action", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
    Export,
    Assign,
    Approve,
    Escalate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FieldChange {
    pub field: String,
    pub old_value: Value,
    pub new_value: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuditDiff {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<Value>,
    #[serde(default)]
    pub changes: Vec<FieldChange>,
}

impl AuditDiff {
    /// Foto do registro recém-criado.
    pub fn created<T: Serialize>(after: &T) -> Self {
        Self { before: None, after: serde_json::to_value(after).ok(), changes: Vec::new() }
    }

    /// Um único campo alterado.
    pub fn changed<O: Serialize, N: Serialize>(field: &str, old_value: &O, new_value: &N) -> Self {
        let change = FieldChange {
            field: field.to_string(),
            old_value: serde_json::to_value(old_value).unwrap_or(Value::Null),
            new_value: serde_json::to_value(new_value).unwrap_or(Value::Null),
        };
        Self { before: None, after: None, changes: vec![change] }
    }
}

/// Registro de auditoria. Só existe inserção.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuditLog {
    pub id: Uuid,
    pub actor_id: Uuid,
    pub action: AuditAction,
    #[schema(example = "leads")]
    pub entity_type: String,
    pub entity_id: Uuid,
    #[sqlx(json)]
    pub diff: AuditDiff,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub metadata: Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewAuditLog {
    pub actor_id: Uuid,
    pub action: AuditAction,
    #[validate(length(min = 1, message = "required"))]
    pub entity_type: String,
    pub entity_id: Uuid,
    #[serde(default)]
    pub diff: AuditDiff,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    #[serde(default = "empty_object")]
    pub metadata: Value,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuditQuery {
    pub entity_type: Option<String>,
    pub entity_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn diff_records_field_changes() {
        let diff = AuditDiff::changed("status", &"new", &"won");
        assert_eq!(
            serde_json::to_value(&diff).unwrap(),
            json!({ "changes": [{ "field": "status", "oldValue": "new", "newValue": "won" }] })
        );
    }

    #[test]
    fn audit_insert_rejects_server_fields() {
        let payload = json!({
            "id": Uuid::new_v4(),
            "actorId": Uuid::new_v4(),
            "action": "create",
            "entityType": "leads",
            "entityId": Uuid::new_v4(),
        });
        assert!(serde_json::from_value::<NewAuditLog>(payload).is_err());
    }
}
