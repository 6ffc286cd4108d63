// src/db/store.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        audit::{AuditLog, AuditQuery, NewAuditLog},
        auth::{NewUser, User},
        billing::{Invoice, NewInvoice, PaymentMethod},
        catalog::{NewService, Service},
        crm::{
            Account, Contact, CrmActivity, DealStage, Lead, LeadStatus, NewAccount, NewContact,
            NewCrmActivity, NewDealStage, NewLead, NewOpportunity, NewTask, Opportunity,
            OpportunityStage, Task,
        },
        inquiry::{ContactSubmission, NewContactSubmission},
        support::{
            NewProject, NewSupportTicket, NewTicketMessage, NewTicketStatus, Project, SupportTicket,
            TicketMessage, TicketStatus,
        },
    },
};

// Cada preocupação tem um trait próprio; o Postgres e a memória implementam todos.
// Os `get_*` devolvem `None` quando o id não existe; os updates devolvem `ResourceNotFound`.

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create_user(&self, new: &NewUser, password_hash: &str) -> Result<User, AppError>;
    async fn get_user(&self, id: Uuid) -> Result<Option<User>, AppError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError>;
    async fn list_users(&self) -> Result<Vec<User>, AppError>;
    async fn touch_last_login(&self, id: Uuid) -> Result<User, AppError>;
}

#[async_trait]
pub trait CrmStore: Send + Sync {
    // --- Leads ---
    async fn create_lead(&self, new: &NewLead) -> Result<Lead, AppError>;
    async fn get_lead(&self, id: Uuid) -> Result<Option<Lead>, AppError>;
    async fn list_leads(&self) -> Result<Vec<Lead>, AppError>;
    async fn update_lead_status(&self, id: Uuid, status: LeadStatus) -> Result<Lead, AppError>;

    // --- Contas ---
    async fn create_account(&self, new: &NewAccount) -> Result<Account, AppError>;
    async fn get_account(&self, id: Uuid) -> Result<Option<Account>, AppError>;
    async fn list_accounts(&self) -> Result<Vec<Account>, AppError>;
    /// Atômico: recusa com `HierarchyCycle` se `parent_id` for a própria conta ou um descendente.
    async fn set_account_parent(&self, id: Uuid, parent_id: Option<Uuid>) -> Result<Account, AppError>;

    // --- Contatos ---
    async fn create_contact(&self, new: &NewContact) -> Result<Contact, AppError>;
    async fn list_contacts(&self, account_id: Option<Uuid>) -> Result<Vec<Contact>, AppError>;

    // --- Oportunidades ---
    async fn create_opportunity(&self, new: &NewOpportunity) -> Result<Opportunity, AppError>;
    async fn get_opportunity(&self, id: Uuid) -> Result<Option<Opportunity>, AppError>;
    async fn list_opportunities(&self) -> Result<Vec<Opportunity>, AppError>;
    async fn update_opportunity_stage(
        &self,
        id: Uuid,
        stage: OpportunityStage,
        stage_id: Option<Uuid>,
        actual_close_date: Option<DateTime<Utc>>,
    ) -> Result<Opportunity, AppError>;

    // --- Tarefas e atividades ---
    async fn create_task(&self, new: &NewTask) -> Result<Task, AppError>;
    async fn list_tasks(&self) -> Result<Vec<Task>, AppError>;
    async fn create_activity(&self, new: &NewCrmActivity) -> Result<CrmActivity, AppError>;
    async fn list_activities(&self) -> Result<Vec<CrmActivity>, AppError>;

    // --- Etapas do funil ---
    async fn create_deal_stage(&self, new: &NewDealStage) -> Result<DealStage, AppError>;
    async fn list_deal_stages(&self) -> Result<Vec<DealStage>, AppError>;
}

#[async_trait]
pub trait SupportStore: Send + Sync {
    async fn create_project(&self, new: &NewProject) -> Result<Project, AppError>;
    async fn list_projects(&self) -> Result<Vec<Project>, AppError>;

    async fn create_ticket_status(&self, new: &NewTicketStatus) -> Result<TicketStatus, AppError>;
    async fn get_ticket_status(&self, id: Uuid) -> Result<Option<TicketStatus>, AppError>;
    async fn list_ticket_statuses(&self) -> Result<Vec<TicketStatus>, AppError>;

    /// `status_name` é o cache já resolvido a partir de `new.status_id`.
    async fn create_ticket(&self, new: &NewSupportTicket, status_name: &str) -> Result<SupportTicket, AppError>;
    async fn get_ticket(&self, id: Uuid) -> Result<Option<SupportTicket>, AppError>;
    async fn list_tickets(&self) -> Result<Vec<SupportTicket>, AppError>;
    async fn update_ticket_status(
        &self,
        id: Uuid,
        status_id: Option<Uuid>,
        status_name: &str,
    ) -> Result<SupportTicket, AppError>;

    async fn create_ticket_message(&self, ticket_id: Uuid, new: &NewTicketMessage) -> Result<TicketMessage, AppError>;
    // Ordem cronológica
    async fn list_ticket_messages(&self, ticket_id: Uuid) -> Result<Vec<TicketMessage>, AppError>;
}

#[async_trait]
pub trait BillingStore: Send + Sync {
    async fn create_invoice(&self, new: &NewInvoice) -> Result<Invoice, AppError>;
    async fn get_invoice(&self, id: Uuid) -> Result<Option<Invoice>, AppError>;
    async fn list_invoices(&self) -> Result<Vec<Invoice>, AppError>;
    async fn mark_invoice_paid(
        &self,
        id: Uuid,
        paid_date: DateTime<Utc>,
        payment_method: Option<PaymentMethod>,
    ) -> Result<Invoice, AppError>;
}

// Somente inserção e leitura
#[async_trait]
pub trait AuditStore: Send + Sync {
    async fn append_audit_log(&self, new: &NewAuditLog) -> Result<AuditLog, AppError>;
    async fn list_audit_logs(&self, query: &AuditQuery) -> Result<Vec<AuditLog>, AppError>;
}

#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn create_service(&self, new: &NewService) -> Result<Service, AppError>;
    async fn get_service(&self, id: Uuid) -> Result<Option<Service>, AppError>;
    async fn list_services(&self) -> Result<Vec<Service>, AppError>;
}

// Somente inserção e leitura
#[async_trait]
pub trait InquiryStore: Send + Sync {
    async fn create_contact_submission(&self, new: &NewContactSubmission) -> Result<ContactSubmission, AppError>;
    async fn list_contact_submissions(&self) -> Result<Vec<ContactSubmission>, AppError>;
}
