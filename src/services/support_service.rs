// src/services/support_service.rs

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::store::SupportStore,
    models::{
        audit::{AuditAction, AuditDiff},
        support::{
            NewProject, NewSupportTicket, NewTicketMessage, NewTicketStatus, Project, SupportTicket,
            TicketMessage, TicketStatus, DEFAULT_TICKET_STATUS,
        },
    },
    services::audit_service::AuditService,
};

#[derive(Clone)]
pub struct SupportService {
    store: Arc<dyn SupportStore>,
    audit: AuditService,
}

impl SupportService {
    pub fn new(store: Arc<dyn SupportStore>, audit: AuditService) -> Self {
        Self { store, audit }
    }

    // `status_id` manda; o texto `status` é só o nome em cache
    async fn resolve_status_name(&self, status_id: Option<Uuid>) -> Result<String, AppError> {
        match status_id {
            None => Ok(DEFAULT_TICKET_STATUS.to_string()),
            Some(id) => self
                .store
                .get_ticket_status(id)
                .await?
                .map(|status| status.name)
                .ok_or_else(|| AppError::not_found("ticket status", id)),
        }
    }

    // --- Projetos ---

    pub async fn create_project(&self, actor: Option<Uuid>, new: NewProject) -> Result<Project, AppError> {
        let project = self.store.create_project(&new).await?;
        self.audit
            .record(actor, AuditAction::Create, "projects", project.id, AuditDiff::created(&project))
            .await;
        Ok(project)
    }

    pub async fn list_projects(&self) -> Result<Vec<Project>, AppError> {
        self.store.list_projects().await
    }

    // --- Status ---

    pub async fn create_ticket_status(
        &self,
        actor: Option<Uuid>,
        new: NewTicketStatus,
    ) -> Result<TicketStatus, AppError> {
        let status = self.store.create_ticket_status(&new).await?;
        self.audit
            .record(actor, AuditAction::Create, "ticket_status", status.id, AuditDiff::created(&status))
            .await;
        Ok(status)
    }

    pub async fn list_ticket_statuses(&self) -> Result<Vec<TicketStatus>, AppError> {
        self.store.list_ticket_statuses().await
    }

    // --- Chamados ---

    pub async fn create_ticket(&self, actor: Option<Uuid>, new: NewSupportTicket) -> Result<SupportTicket, AppError> {
        let status_name = self.resolve_status_name(new.status_id).await?;
        if let Some(sent) = new.status.as_deref() {
            if sent != status_name {
                tracing::debug!(sent, derived = %status_name, "Status em texto ignorado em favor de statusId");
            }
        }

        let ticket = self.store.create_ticket(&new, &status_name).await?;
        tracing::info!(ticket_id = %ticket.id, priority = ?ticket.priority, "Chamado aberto");
        self.audit
            .record(actor, AuditAction::Create, "support_tickets", ticket.id, AuditDiff::created(&ticket))
            .await;
        Ok(ticket)
    }

    pub async fn get_ticket(&self, id: Uuid) -> Result<SupportTicket, AppError> {
        self.store.get_ticket(id).await?.ok_or_else(|| AppError::not_found("ticket", id))
    }

    pub async fn list_tickets(&self) -> Result<Vec<SupportTicket>, AppError> {
        self.store.list_tickets().await
    }

    pub async fn update_ticket_status(
        &self,
        actor: Option<Uuid>,
        id: Uuid,
        status_id: Option<Uuid>,
    ) -> Result<SupportTicket, AppError> {
        let before = self.get_ticket(id).await?;
        let status_name = self.resolve_status_name(status_id).await?;
        let ticket = self.store.update_ticket_status(id, status_id, &status_name).await?;

        self.audit
            .record(
                actor,
                AuditAction::Update,
                "support_tickets",
                id,
                AuditDiff::changed("status", &before.status, &ticket.status),
            )
            .await;
        Ok(ticket)
    }

    // --- Mensagens ---

    pub async fn add_ticket_message(
        &self,
        actor: Option<Uuid>,
        ticket_id: Uuid,
        new: NewTicketMessage,
    ) -> Result<TicketMessage, AppError> {
        let message = self.store.create_ticket_message(ticket_id, &new).await?;
        tracing::info!(%ticket_id, message_id = %message.id, staff = message.is_staff, "Mensagem no chamado");
        self.audit
            .record(actor, AuditAction::Create, "ticket_messages", message.id, AuditDiff::created(&message))
            .await;
        Ok(message)
    }

    pub async fn list_ticket_messages(&self, ticket_id: Uuid) -> Result<Vec<TicketMessage>, AppError> {
        // Chamado inexistente é 404, não uma conversa vazia
        self.get_ticket(ticket_id).await?;
        self.store.list_ticket_messages(ticket_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use serde_json::json;

    fn service() -> SupportService {
        let store = Arc::new(MemoryStore::seeded());
        SupportService::new(store.clone(), AuditService::new(store))
    }

    #[tokio::test]
    async fn status_text_is_derived_from_status_id() {
        let service = service();
        let new: NewSupportTicket = serde_json::from_value(json!({
            "subject": "Login broken",
            "description": "500 on submit",
            "status": "resolved",
        }))
        .unwrap();

        let ticket = service.create_ticket(None, new).await.unwrap();
        assert_eq!(ticket.status, DEFAULT_TICKET_STATUS);
        assert_eq!(ticket.status_id, None);

        let statuses = service.list_ticket_statuses().await.unwrap();
        let closed = statuses.iter().find(|s| s.name == "closed").unwrap();

        let updated = service.update_ticket_status(None, ticket.id, Some(closed.id)).await.unwrap();
        assert_eq!(updated.status, "closed");
        assert_eq!(updated.status_id, Some(closed.id));
    }

    #[tokio::test]
    async fn unknown_status_id_is_rejected() {
        let service = service();
        let new: NewSupportTicket = serde_json::from_value(json!({
            "subject": "x",
            "description": "y",
            "statusId": Uuid::new_v4(),
        }))
        .unwrap();
        let err = service.create_ticket(None, new).await.unwrap_err();
        assert!(matches!(err, AppError::ResourceNotFound(_)));
    }

    #[tokio::test]
    async fn messages_belong_to_an_existing_ticket() {
        let service = service();
        let new: NewSupportTicket =
            serde_json::from_value(json!({ "subject": "Payment", "description": "Card declined" })).unwrap();
        let ticket = service.create_ticket(None, new).await.unwrap();

        for (text, staff) in [("Still failing", false), ("Fixed on our side", true)] {
            let reply: NewTicketMessage =
                serde_json::from_value(json!({ "message": text, "isStaff": staff })).unwrap();
            service.add_ticket_message(None, ticket.id, reply).await.unwrap();
        }
        let thread = service.list_ticket_messages(ticket.id).await.unwrap();
        let texts: Vec<_> = thread.iter().map(|m| m.message.as_str()).collect();
        assert_eq!(texts, ["Still failing", "Fixed on our side"]);
        assert!(thread[1].is_staff);

        let orphan: NewTicketMessage = serde_json::from_value(json!({ "message": "hello?" })).unwrap();
        let err = service.add_ticket_message(None, Uuid::new_v4(), orphan).await.unwrap_err();
        assert!(matches!(err, AppError::ResourceNotFound(_)));
        let err = service.list_ticket_messages(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::ResourceNotFound(_)));
    }
}
