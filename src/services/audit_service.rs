// src/services/audit_service.rs

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::store::AuditStore,
    models::audit::{AuditAction, AuditDiff, AuditLog, AuditQuery, NewAuditLog},
};

#[derive(Clone)]
pub struct AuditService {
    store: Arc<dyn AuditStore>,
}

impl AuditService {
    pub fn new(store: Arc<dyn AuditStore>) -> Self {
        Self { store }
    }

    /// Registra a ação se houver um ator conhecido.
    /// Uma falha aqui não desfaz a operação auditada; só fica no log.
    pub async fn record(
        &self,
        actor: Option<Uuid>,
        action: AuditAction,
        entity_type: &str,
        entity_id: Uuid,
        diff: AuditDiff,
    ) {
        let Some(actor_id) = actor else {
            return;
        };

        let entry = NewAuditLog {
            actor_id,
            action,
            entity_type: entity_type.to_string(),
            entity_id,
            diff,
            ip: None,
            user_agent: None,
            metadata: crate::models::empty_object(),
        };

        if let Err(e) = self.store.append_audit_log(&entry).await {
            tracing::warn!(%actor_id, entity_type, %entity_id, "Falha ao gravar auditoria: {e}");
        }
    }

    pub async fn list(&self, query: &AuditQuery) -> Result<Vec<AuditLog>, AppError> {
        self.store.list_audit_logs(query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::{store::UserStore, MemoryStore},
        models::auth::NewUser,
    };
    use serde_json::json;

    #[tokio::test]
    async fn anonymous_actions_are_not_audited() {
        let store = Arc::new(MemoryStore::new());
        let service = AuditService::new(store.clone());
        let entity_id = Uuid::new_v4();

        service.record(None, AuditAction::Create, "leads", entity_id, AuditDiff::default()).await;
        assert!(service.list(&AuditQuery::default()).await.unwrap().is_empty());

        let staff: NewUser = serde_json::from_value(json!({ "username": "agent", "password": "pw-12345" })).unwrap();
        let actor = store.create_user(&staff, "hash").await.unwrap().id;
        service.record(Some(actor), AuditAction::Create, "leads", entity_id, AuditDiff::default()).await;
        let logs = service.list(&AuditQuery::default()).await.unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].actor_id, actor);
    }

    #[tokio::test]
    async fn unknown_actor_is_logged_not_raised() {
        let service = AuditService::new(Arc::new(MemoryStore::new()));
        // Não pode falhar: só registra um warn
        service
            .record(Some(Uuid::new_v4()), AuditAction::Update, "leads", Uuid::new_v4(), AuditDiff::default())
            .await;
        assert!(service.list(&AuditQuery::default()).await.unwrap().is_empty());
    }
}
