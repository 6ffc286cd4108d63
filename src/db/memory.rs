// src/db/memory.rs

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{
        seed,
        store::{AuditStore, BillingStore, CatalogStore, CrmStore, InquiryStore, SupportStore, UserStore},
    },
    models::{
        audit::{AuditLog, AuditQuery, NewAuditLog},
        auth::{NewUser, User},
        billing::{Invoice, InvoiceStatus, NewInvoice, PaymentMethod},
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

// Equivalente a `GREATEST(NOW(), updated_at)`
fn bump(updated_at: DateTime<Utc>) -> DateTime<Utc> {
    Utc::now().max(updated_at)
}

// Vetores em ordem de inserção = ordem de `created_at`
#[derive(Default)]
struct Tables {
    users: Vec<User>,
    leads: Vec<Lead>,
    accounts: Vec<Account>,
    contacts: Vec<Contact>,
    opportunities: Vec<Opportunity>,
    tasks: Vec<Task>,
    activities: Vec<CrmActivity>,
    deal_stages: Vec<DealStage>,
    projects: Vec<Project>,
    ticket_statuses: Vec<TicketStatus>,
    tickets: Vec<SupportTicket>,
    ticket_messages: Vec<TicketMessage>,
    invoices: Vec<Invoice>,
    audit_logs: Vec<AuditLog>,
    services: Vec<Service>,
    contact_submissions: Vec<ContactSubmission>,
}

impl Tables {
    fn insert_deal_stage(&mut self, new: &NewDealStage) -> Result<DealStage, AppError> {
        if self.deal_stages.iter().any(|s| s.name == new.name) {
            return Err(AppError::UniqueConstraintViolation(format!("deal stage '{}'", new.name)));
        }
        let now = Utc::now();
        let stage = DealStage {
            id: Uuid::new_v4(),
            name: new.name.clone(),
            position: new.position,
            probability: new.probability,
            color: new.color.clone(),
            is_closed: new.is_closed,
            is_won: new.is_won,
            created_at: now,
            updated_at: now,
        };
        self.deal_stages.push(stage.clone());
        Ok(stage)
    }

    fn insert_ticket_status(&mut self, new: &NewTicketStatus) -> Result<TicketStatus, AppError> {
        if self.ticket_statuses.iter().any(|s| s.name == new.name) {
            return Err(AppError::UniqueConstraintViolation(format!("ticket status '{}'", new.name)));
        }
        let now = Utc::now();
        let status = TicketStatus {
            id: Uuid::new_v4(),
            name: new.name.clone(),
            position: new.position,
            color: new.color.clone(),
            is_closed: new.is_closed,
            created_at: now,
            updated_at: now,
        };
        self.ticket_statuses.push(status.clone());
        Ok(status)
    }

    // Sobe a cadeia a partir do novo pai; encontrar `id` nela formaria um ciclo
    fn ensure_not_descendant(&self, id: Uuid, parent_id: Uuid) -> Result<(), AppError> {
        let mut visited = HashSet::new();
        let mut current = Some(parent_id);

        while let Some(ancestor_id) = current {
            if ancestor_id == id {
                return Err(AppError::HierarchyCycle);
            }
            if !visited.insert(ancestor_id) {
                break;
            }
            current = self
                .accounts
                .iter()
                .find(|a| a.id == ancestor_id)
                .ok_or_else(|| AppError::not_found("account", ancestor_id))?
                .parent_account_id;
        }
        Ok(())
    }

    fn insert_service(&mut self, new: &NewService) -> Service {
        let now = Utc::now();
        let service = Service {
            id: Uuid::new_v4(),
            title: new.title.clone(),
            description: new.description.clone(),
            icon: new.icon.clone(),
            category: new.category.clone(),
            featured: new.featured,
            technologies: new.technologies.clone(),
            delivery_time: new.delivery_time.clone(),
            starting_price: new.starting_price.clone(),
            created_at: now,
            updated_at: now,
        };
        self.services.push(service.clone());
        service
    }
}

// Ordem das tabelas de consulta: posição numérica, empate pelo nome
fn sort_by_position<T>(rows: &mut [T], key: impl Fn(&T) -> (i32, &str)) {
    rows.sort_by(|a, b| key(a).cmp(&key(b)));
}

// Mesmas chaves estrangeiras do esquema: referência inexistente é 404
fn ensure_ref<T>(rows: &[T], id: Option<Uuid>, entity: &str, key: impl Fn(&T) -> Uuid) -> Result<(), AppError> {
    match id {
        Some(id) if !rows.iter().any(|row| key(row) == id) => Err(AppError::not_found(entity, id)),
        _ => Ok(()),
    }
}

/// Armazenamento usado quando não há banco configurado (ou ele está inacessível).
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Já com as etapas do funil, os status de chamado e o catálogo de serviços padrão.
    pub fn seeded() -> Self {
        let mut tables = Tables::default();

        for stage in seed::deal_stages() {
            if let Err(e) = tables.insert_deal_stage(&stage) {
                tracing::warn!("Semente de etapa ignorada: {e}");
            }
        }
        for status in seed::ticket_statuses() {
            if let Err(e) = tables.insert_ticket_status(&status) {
                tracing::warn!("Semente de status ignorada: {e}");
            }
        }
        for service in seed::services() {
            tables.insert_service(&service);
        }

        Self { tables: RwLock::new(tables) }
    }
}

// =============================================================================
//  USUÁRIOS
// =============================================================================

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, new: &NewUser, password_hash: &str) -> Result<User, AppError> {
        let mut t = self.tables.write().await;
        if t.users.iter().any(|u| u.username == new.username) {
            return Err(AppError::UniqueConstraintViolation(format!("username '{}'", new.username)));
        }
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            username: new.username.clone(),
            password_hash: password_hash.to_string(),
            force_password_change: new.force_password_change,
            role: new.role,
            name: new.name.clone(),
            email: new.email.clone(),
            phone: new.phone.clone(),
            department: new.department.clone(),
            position: new.position.clone(),
            avatar: new.avatar.clone(),
            is_active: new.is_active,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        };
        t.users.push(user.clone());
        Ok(user)
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self.tables.read().await.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        Ok(self.tables.read().await.users.iter().find(|u| u.username == username).cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>, AppError> {
        Ok(self.tables.read().await.users.clone())
    }

    async fn touch_last_login(&self, id: Uuid) -> Result<User, AppError> {
        let mut t = self.tables.write().await;
        let user = t
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| AppError::not_found("user", id))?;
        user.last_login_at = Some(Utc::now());
        user.updated_at = bump(user.updated_at);
        Ok(user.clone())
    }
}

// =============================================================================
//  CRM
// =============================================================================

#[async_trait]
impl CrmStore for MemoryStore {
    async fn create_lead(&self, new: &NewLead) -> Result<Lead, AppError> {
        let mut t = self.tables.write().await;
        ensure_ref(&t.users, new.assigned_to, "user", |u| u.id)?;

        let now = Utc::now();
        let lead = Lead {
            id: Uuid::new_v4(),
            name: new.name.clone(),
            email: new.email.clone(),
            phone: new.phone.clone(),
            company: new.company.clone(),
            job_title: new.job_title.clone(),
            lead_source: new.lead_source,
            status: new.status,
            rating: new.rating,
            estimated_value: new.estimated_value,
            expected_close_date: new.expected_close_date,
            assigned_to: new.assigned_to,
            notes: new.notes.clone(),
            tags: new.tags.clone(),
            custom_fields: new.custom_fields.clone(),
            created_at: now,
            updated_at: now,
        };
        t.leads.push(lead.clone());
        Ok(lead)
    }

    async fn get_lead(&self, id: Uuid) -> Result<Option<Lead>, AppError> {
        Ok(self.tables.read().await.leads.iter().find(|l| l.id == id).cloned())
    }

    async fn list_leads(&self) -> Result<Vec<Lead>, AppError> {
        Ok(self.tables.read().await.leads.clone())
    }

    async fn update_lead_status(&self, id: Uuid, status: LeadStatus) -> Result<Lead, AppError> {
        let mut t = self.tables.write().await;
        let lead = t
            .leads
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or_else(|| AppError::not_found("lead", id))?;
        lead.status = status;
        lead.updated_at = bump(lead.updated_at);
        Ok(lead.clone())
    }

    async fn create_account(&self, new: &NewAccount) -> Result<Account, AppError> {
        let mut t = self.tables.write().await;
        ensure_ref(&t.users, new.assigned_to, "user", |u| u.id)?;
        ensure_ref(&t.accounts, new.parent_account_id, "account", |a| a.id)?;

        let now = Utc::now();
        let account = Account {
            id: Uuid::new_v4(),
            name: new.name.clone(),
            account_type: new.account_type,
            industry: new.industry.clone(),
            website: new.website.clone(),
            phone: new.phone.clone(),
            email: new.email.clone(),
            billing_address: new.billing_address.clone(),
            shipping_address: new.shipping_address.clone(),
            annual_revenue: new.annual_revenue,
            number_of_employees: new.number_of_employees,
            assigned_to: new.assigned_to,
            parent_account_id: new.parent_account_id,
            description: new.description.clone(),
            tags: new.tags.clone(),
            custom_fields: new.custom_fields.clone(),
            is_active: new.is_active,
            created_at: now,
            updated_at: now,
        };
        t.accounts.push(account.clone());
        Ok(account)
    }

    async fn get_account(&self, id: Uuid) -> Result<Option<Account>, AppError> {
        Ok(self.tables.read().await.accounts.iter().find(|a| a.id == id).cloned())
    }

    async fn list_accounts(&self) -> Result<Vec<Account>, AppError> {
        Ok(self.tables.read().await.accounts.clone())
    }

    async fn set_account_parent(&self, id: Uuid, parent_id: Option<Uuid>) -> Result<Account, AppError> {
        let mut t = self.tables.write().await;
        if !t.accounts.iter().any(|a| a.id == id) {
            return Err(AppError::not_found("account", id));
        }
        // Checagem e escrita sob o mesmo guard
        if let Some(parent_id) = parent_id {
            t.ensure_not_descendant(id, parent_id)?;
        }
        let account = t
            .accounts
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| AppError::not_found("account", id))?;
        account.parent_account_id = parent_id;
        account.updated_at = bump(account.updated_at);
        Ok(account.clone())
    }

    async fn create_contact(&self, new: &NewContact) -> Result<Contact, AppError> {
        let mut t = self.tables.write().await;
        ensure_ref(&t.leads, new.lead_id, "lead", |l| l.id)?;
        ensure_ref(&t.accounts, new.account_id, "account", |a| a.id)?;

        // Mesma regra do índice parcial `contacts_primary_account_idx`
        if new.is_primary {
            if let Some(account_id) = new.account_id {
                if t.contacts.iter().any(|c| c.is_primary && c.account_id == Some(account_id)) {
                    return Err(AppError::UniqueConstraintViolation(format!(
                        "primary contact for account {account_id}"
                    )));
                }
            }
        }

        let now = Utc::now();
        let contact = Contact {
            id: Uuid::new_v4(),
            lead_id: new.lead_id,
            account_id: new.account_id,
            name: new.name.clone(),
            email: new.email.clone(),
            phone: new.phone.clone(),
            mobile: new.mobile.clone(),
            job_title: new.job_title.clone(),
            department: new.department.clone(),
            is_primary: new.is_primary,
            is_active: new.is_active,
            date_of_birth: new.date_of_birth,
            social_profiles: new.social_profiles.clone(),
            preferences: new.preferences.clone(),
            tags: new.tags.clone(),
            notes: new.notes.clone(),
            created_at: now,
            updated_at: now,
        };
        t.contacts.push(contact.clone());
        Ok(contact)
    }

    async fn list_contacts(&self, account_id: Option<Uuid>) -> Result<Vec<Contact>, AppError> {
        let t = self.tables.read().await;
        Ok(t
            .contacts
            .iter()
            .filter(|c| account_id.is_none() || c.account_id == account_id)
            .cloned()
            .collect())
    }

    async fn create_opportunity(&self, new: &NewOpportunity) -> Result<Opportunity, AppError> {
        let mut t = self.tables.write().await;
        ensure_ref(&t.accounts, new.account_id, "account", |a| a.id)?;
        ensure_ref(&t.contacts, new.contact_id, "contact", |c| c.id)?;
        ensure_ref(&t.deal_stages, new.stage_id, "deal stage", |s| s.id)?;
        ensure_ref(&t.users, new.assigned_to, "user", |u| u.id)?;

        let now = Utc::now();
        let opportunity = Opportunity {
            id: Uuid::new_v4(),
            name: new.name.clone(),
            account_id: new.account_id,
            contact_id: new.contact_id,
            stage_id: new.stage_id,
            stage: new.stage,
            amount: new.amount,
            probability: new.probability,
            expected_close_date: new.expected_close_date,
            actual_close_date: new.actual_close_date,
            lead_source: new.lead_source.clone(),
            description: new.description.clone(),
            loss_reason: new.loss_reason.clone(),
            next_step: new.next_step.clone(),
            assigned_to: new.assigned_to,
            competitor_id: new.competitor_id,
            tags: new.tags.clone(),
            custom_fields: new.custom_fields.clone(),
            created_at: now,
            updated_at: now,
        };
        t.opportunities.push(opportunity.clone());
        Ok(opportunity)
    }

    async fn get_opportunity(&self, id: Uuid) -> Result<Option<Opportunity>, AppError> {
        Ok(self.tables.read().await.opportunities.iter().find(|o| o.id == id).cloned())
    }

    async fn list_opportunities(&self) -> Result<Vec<Opportunity>, AppError> {
        Ok(self.tables.read().await.opportunities.clone())
    }

    async fn update_opportunity_stage(
        &self,
        id: Uuid,
        stage: OpportunityStage,
        stage_id: Option<Uuid>,
        actual_close_date: Option<DateTime<Utc>>,
    ) -> Result<Opportunity, AppError> {
        let mut t = self.tables.write().await;
        ensure_ref(&t.deal_stages, stage_id, "deal stage", |s| s.id)?;
        let opportunity = t
            .opportunities
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or_else(|| AppError::not_found("opportunity", id))?;
        opportunity.stage = stage;
        opportunity.stage_id = stage_id;
        opportunity.actual_close_date = actual_close_date;
        opportunity.updated_at = bump(opportunity.updated_at);
        Ok(opportunity.clone())
    }

    async fn create_task(&self, new: &NewTask) -> Result<Task, AppError> {
        let mut t = self.tables.write().await;
        ensure_ref(&t.users, new.assigned_to, "user", |u| u.id)?;
        ensure_ref(&t.users, new.created_by, "user", |u| u.id)?;

        let now = Utc::now();
        let task = Task {
            id: Uuid::new_v4(),
            title: new.title.clone(),
            description: new.description.clone(),
            task_type: new.task_type,
            status: new.status,
            priority: new.priority,
            assigned_to: new.assigned_to,
            created_by: new.created_by,
            related: new.related,
            due_date: new.due_date,
            completed_date: new.completed_date,
            reminder_date: new.reminder_date,
            estimated_duration: new.estimated_duration,
            actual_duration: new.actual_duration,
            tags: new.tags.clone(),
            attachments: new.attachments.clone(),
            custom_fields: new.custom_fields.clone(),
            created_at: now,
            updated_at: now,
        };
        t.tasks.push(task.clone());
        Ok(task)
    }

    async fn list_tasks(&self) -> Result<Vec<Task>, AppError> {
        Ok(self.tables.read().await.tasks.clone())
    }

    async fn create_activity(&self, new: &NewCrmActivity) -> Result<CrmActivity, AppError> {
        let mut t = self.tables.write().await;
        ensure_ref(&t.users, new.user_id, "user", |u| u.id)?;

        let activity = CrmActivity {
            id: Uuid::new_v4(),
            activity_type: new.activity_type,
            title: new.title.clone(),
            description: new.description.clone(),
            user_id: new.user_id,
            related: new.related,
            metadata: new.metadata.clone(),
            duration: new.duration,
            outcome: new.outcome.clone(),
            scheduled_at: new.scheduled_at,
            completed_at: new.completed_at,
            created_at: Utc::now(),
        };
        t.activities.push(activity.clone());
        Ok(activity)
    }

    async fn list_activities(&self) -> Result<Vec<CrmActivity>, AppError> {
        Ok(self.tables.read().await.activities.clone())
    }

    async fn create_deal_stage(&self, new: &NewDealStage) -> Result<DealStage, AppError> {
        self.tables.write().await.insert_deal_stage(new)
    }

    async fn list_deal_stages(&self) -> Result<Vec<DealStage>, AppError> {
        let mut stages = self.tables.read().await.deal_stages.clone();
        sort_by_position(&mut stages, |s| (s.position, s.name.as_str()));
        Ok(stages)
    }
}

// =============================================================================
//  SUPORTE
// =============================================================================

#[async_trait]
impl SupportStore for MemoryStore {
    async fn create_project(&self, new: &NewProject) -> Result<Project, AppError> {
        let mut t = self.tables.write().await;
        ensure_ref(&t.users, new.user_id, "user", |u| u.id)?;

        let now = Utc::now();
        let project = Project {
            id: Uuid::new_v4(),
            user_id: new.user_id,
            title: new.title.clone(),
            description: new.description.clone(),
            status: new.status,
            progress: new.progress,
            created_at: now,
            updated_at: now,
        };
        t.projects.push(project.clone());
        Ok(project)
    }

    async fn list_projects(&self) -> Result<Vec<Project>, AppError> {
        Ok(self.tables.read().await.projects.clone())
    }

    async fn create_ticket_status(&self, new: &NewTicketStatus) -> Result<TicketStatus, AppError> {
        self.tables.write().await.insert_ticket_status(new)
    }

    async fn get_ticket_status(&self, id: Uuid) -> Result<Option<TicketStatus>, AppError> {
        Ok(self.tables.read().await.ticket_statuses.iter().find(|s| s.id == id).cloned())
    }

    async fn list_ticket_statuses(&self) -> Result<Vec<TicketStatus>, AppError> {
        let mut statuses = self.tables.read().await.ticket_statuses.clone();
        sort_by_position(&mut statuses, |s| (s.position, s.name.as_str()));
        Ok(statuses)
    }

    async fn create_ticket(&self, new: &NewSupportTicket, status_name: &str) -> Result<SupportTicket, AppError> {
        let mut t = self.tables.write().await;
        ensure_ref(&t.users, new.user_id, "user", |u| u.id)?;
        ensure_ref(&t.projects, new.project_id, "project", |p| p.id)?;
        ensure_ref(&t.ticket_statuses, new.status_id, "ticket status", |s| s.id)?;
        ensure_ref(&t.users, new.assigned_to, "user", |u| u.id)?;

        let now = Utc::now();
        let ticket = SupportTicket {
            id: Uuid::new_v4(),
            user_id: new.user_id,
            project_id: new.project_id,
            status_id: new.status_id,
            subject: new.subject.clone(),
            description: new.description.clone(),
            status: status_name.to_string(),
            priority: new.priority,
            category: new.category,
            assigned_to: new.assigned_to,
            attachments: new.attachments.clone(),
            created_at: now,
            updated_at: now,
        };
        t.tickets.push(ticket.clone());
        Ok(ticket)
    }

    async fn get_ticket(&self, id: Uuid) -> Result<Option<SupportTicket>, AppError> {
        Ok(self.tables.read().await.tickets.iter().find(|t| t.id == id).cloned())
    }

    async fn list_tickets(&self) -> Result<Vec<SupportTicket>, AppError> {
        Ok(self.tables.read().await.tickets.clone())
    }

    async fn update_ticket_status(
        &self,
        id: Uuid,
        status_id: Option<Uuid>,
        status_name: &str,
    ) -> Result<SupportTicket, AppError> {
        let mut t = self.tables.write().await;
        ensure_ref(&t.ticket_statuses, status_id, "ticket status", |s| s.id)?;
        let ticket = t
            .tickets
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| AppError::not_found("ticket", id))?;
        ticket.status_id = status_id;
        ticket.status = status_name.to_string();
        ticket.updated_at = bump(ticket.updated_at);
        Ok(ticket.clone())
    }

    async fn create_ticket_message(&self, ticket_id: Uuid, new: &NewTicketMessage) -> Result<TicketMessage, AppError> {
        let mut t = self.tables.write().await;
        ensure_ref(&t.tickets, Some(ticket_id), "ticket", |ticket| ticket.id)?;
        ensure_ref(&t.users, new.user_id, "user", |u| u.id)?;

        let message = TicketMessage {
            id: Uuid::new_v4(),
            ticket_id,
            user_id: new.user_id,
            message: new.message.clone(),
            is_staff: new.is_staff,
            attachments: new.attachments.clone(),
            created_at: Utc::now(),
        };
        t.ticket_messages.push(message.clone());
        Ok(message)
    }

    async fn list_ticket_messages(&self, ticket_id: Uuid) -> Result<Vec<TicketMessage>, AppError> {
        let t = self.tables.read().await;
        Ok(t
            .ticket_messages
            .iter()
            .filter(|m| m.ticket_id == ticket_id)
            .cloned()
            .collect())
    }
}

// =============================================================================
//  FATURAMENTO
// =============================================================================

#[async_trait]
impl BillingStore for MemoryStore {
    async fn create_invoice(&self, new: &NewInvoice) -> Result<Invoice, AppError> {
        let mut t = self.tables.write().await;
        ensure_ref(&t.users, new.user_id, "user", |u| u.id)?;
        ensure_ref(&t.projects, new.project_id, "project", |p| p.id)?;
        if t.invoices.iter().any(|i| i.invoice_number == new.invoice_number) {
            return Err(AppError::UniqueConstraintViolation(format!(
                "invoice number '{}'",
                new.invoice_number
            )));
        }
        let now = Utc::now();
        let invoice = Invoice {
            id: Uuid::new_v4(),
            user_id: new.user_id,
            project_id: new.project_id,
            invoice_number: new.invoice_number.clone(),
            amount: new.amount,
            currency: new.currency,
            status: new.status,
            description: new.description.clone(),
            items: new.items.clone(),
            due_date: new.due_date,
            paid_date: new.paid_date,
            payment_method: new.payment_method,
            created_at: now,
            updated_at: now,
        };
        t.invoices.push(invoice.clone());
        Ok(invoice)
    }

    async fn get_invoice(&self, id: Uuid) -> Result<Option<Invoice>, AppError> {
        Ok(self.tables.read().await.invoices.iter().find(|i| i.id == id).cloned())
    }

    async fn list_invoices(&self) -> Result<Vec<Invoice>, AppError> {
        Ok(self.tables.read().await.invoices.clone())
    }

    async fn mark_invoice_paid(
        &self,
        id: Uuid,
        paid_date: DateTime<Utc>,
        payment_method: Option<PaymentMethod>,
    ) -> Result<Invoice, AppError> {
        let mut t = self.tables.write().await;
        let invoice = t
            .invoices
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| AppError::not_found("invoice", id))?;
        invoice.status = InvoiceStatus::Paid;
        invoice.paid_date = Some(paid_date);
        if payment_method.is_some() {
            invoice.payment_method = payment_method;
        }
        invoice.updated_at = bump(invoice.updated_at);
        Ok(invoice.clone())
    }
}

// =============================================================================
//  AUDITORIA
// =============================================================================

#[async_trait]
impl AuditStore for MemoryStore {
    async fn append_audit_log(&self, new: &NewAuditLog) -> Result<AuditLog, AppError> {
        let mut t = self.tables.write().await;
        ensure_ref(&t.users, Some(new.actor_id), "user", |u| u.id)?;

        let log = AuditLog {
            id: Uuid::new_v4(),
            actor_id: new.actor_id,
            action: new.action,
            entity_type: new.entity_type.clone(),
            entity_id: new.entity_id,
            diff: new.diff.clone(),
            ip: new.ip.clone(),
            user_agent: new.user_agent.clone(),
            metadata: new.metadata.clone(),
            created_at: Utc::now(),
        };
        t.audit_logs.push(log.clone());
        Ok(log)
    }

    async fn list_audit_logs(&self, query: &AuditQuery) -> Result<Vec<AuditLog>, AppError> {
        let t = self.tables.read().await;
        Ok(t
            .audit_logs
            .iter()
            .filter(|l| query.entity_type.as_deref().is_none_or(|ty| l.entity_type == ty))
            .filter(|l| query.entity_id.is_none_or(|id| l.entity_id == id))
            .cloned()
            .collect())
    }
}

// =============================================================================
//  CATÁLOGO
// =============================================================================

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn create_service(&self, new: &NewService) -> Result<Service, AppError> {
        Ok(self.tables.write().await.insert_service(new))
    }

    async fn get_service(&self, id: Uuid) -> Result<Option<Service>, AppError> {
        Ok(self.tables.read().await.services.iter().find(|s| s.id == id).cloned())
    }

    async fn list_services(&self) -> Result<Vec<Service>, AppError> {
        Ok(self.tables.read().await.services.clone())
    }
}

// =============================================================================
//  FORMULÁRIO DE CONTATO
// =============================================================================

#[async_trait]
impl InquiryStore for MemoryStore {
    async fn create_contact_submission(&self, new: &NewContactSubmission) -> Result<ContactSubmission, AppError> {
        let submission = ContactSubmission {
            id: Uuid::new_v4(),
            name: new.name.clone(),
            email: new.email.clone(),
            phone: new.phone.clone(),
            service: new.service.clone(),
            service_application: new.service_application.clone(),
            message: new.message.clone(),
            created_at: Utc::now(),
        };
        self.tables.write().await.contact_submissions.push(submission.clone());
        Ok(submission)
    }

    async fn list_contact_submissions(&self) -> Result<Vec<ContactSubmission>, AppError> {
        Ok(self.tables.read().await.contact_submissions.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn new_user(username: &str) -> NewUser {
        serde_json::from_value(json!({ "username": username, "password": "s3cret-pass" })).unwrap()
    }

    #[tokio::test]
    async fn usernames_are_unique() {
        let store = MemoryStore::new();
        store.create_user(&new_user("sara"), "hash").await.unwrap();
        let err = store.create_user(&new_user("sara"), "hash").await.unwrap_err();
        assert!(matches!(err, AppError::UniqueConstraintViolation(_)));
    }

    #[tokio::test]
    async fn one_primary_contact_per_account() {
        let store = MemoryStore::new();
        let account: NewAccount = serde_json::from_value(json!({ "name": "Acme" })).unwrap();
        let account_id = store.create_account(&account).await.unwrap().id;
        let primary = |name: &str| -> NewContact {
            serde_json::from_value(json!({ "name": name, "accountId": account_id, "isPrimary": true })).unwrap()
        };

        store.create_contact(&primary("Ali")).await.unwrap();
        let err = store.create_contact(&primary("Huda")).await.unwrap_err();
        assert!(matches!(err, AppError::UniqueConstraintViolation(_)));

        // Sem a flag, a mesma conta aceita outros contatos
        let other: NewContact =
            serde_json::from_value(json!({ "name": "Omar", "accountId": account_id })).unwrap();
        store.create_contact(&other).await.unwrap();
        assert_eq!(store.list_contacts(Some(account_id)).await.unwrap().len(), 2);
        assert!(store.list_contacts(Some(Uuid::new_v4())).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn lookup_tables_sort_numerically() {
        let store = MemoryStore::new();
        for (name, position) in [("ten", 10), ("two", 2), ("one", 1)] {
            let stage: NewDealStage =
                serde_json::from_value(json!({ "name": name, "position": position })).unwrap();
            store.create_deal_stage(&stage).await.unwrap();
        }
        let names: Vec<_> = store
            .list_deal_stages()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, ["one", "two", "ten"]);
    }

    #[tokio::test]
    async fn updates_never_move_updated_at_backwards() {
        let store = MemoryStore::new();
        let lead: NewLead = serde_json::from_value(json!({ "name": "Ali" })).unwrap();
        let created = store.create_lead(&lead).await.unwrap();

        let updated = store.update_lead_status(created.id, LeadStatus::Contacted).await.unwrap();
        assert_eq!(updated.status, LeadStatus::Contacted);
        assert!(updated.updated_at >= created.updated_at);
        assert!(updated.updated_at >= updated.created_at);

        let missing = store.update_lead_status(Uuid::new_v4(), LeadStatus::Won).await;
        assert!(matches!(missing, Err(AppError::ResourceNotFound(_))));
    }

    #[tokio::test]
    async fn audit_logs_filter_by_entity() {
        let store = MemoryStore::new();
        let actor = store.create_user(&new_user("auditor"), "hash").await.unwrap();
        let lead_id = Uuid::new_v4();
        for (entity_type, entity_id) in [("leads", lead_id), ("invoices", Uuid::new_v4())] {
            let log: NewAuditLog = serde_json::from_value(json!({
                "actorId": actor.id,
                "action": "create",
                "entityType": entity_type,
                "entityId": entity_id,
            }))
            .unwrap();
            store.append_audit_log(&log).await.unwrap();
        }

        let query = AuditQuery { entity_type: Some("leads".into()), entity_id: Some(lead_id) };
        let logs = store.list_audit_logs(&query).await.unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].entity_id, lead_id);
        assert_eq!(store.list_audit_logs(&AuditQuery::default()).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn audit_requires_a_known_actor() {
        let store = MemoryStore::new();
        let log: NewAuditLog = serde_json::from_value(json!({
            "actorId": Uuid::new_v4(),
            "action": "create",
            "entityType": "leads",
            "entityId": Uuid::new_v4(),
        }))
        .unwrap();
        let err = store.append_audit_log(&log).await.unwrap_err();
        assert!(matches!(err, AppError::ResourceNotFound(_)));
    }

    #[tokio::test]
    async fn foreign_keys_match_the_schema() {
        let store = MemoryStore::seeded();
        let stage = store.list_deal_stages().await.unwrap()[0].id;

        let dangling: NewOpportunity =
            serde_json::from_value(json!({ "name": "Deal", "stageId": Uuid::new_v4() })).unwrap();
        assert!(matches!(
            store.create_opportunity(&dangling).await,
            Err(AppError::ResourceNotFound(_))
        ));

        let valid: NewOpportunity = serde_json::from_value(json!({ "name": "Deal", "stageId": stage })).unwrap();
        let opportunity = store.create_opportunity(&valid).await.unwrap();
        let moved = store
            .update_opportunity_stage(opportunity.id, OpportunityStage::Proposal, Some(Uuid::new_v4()), None)
            .await;
        assert!(matches!(moved, Err(AppError::ResourceNotFound(_))));

        let ticket: NewSupportTicket = serde_json::from_value(json!({
            "subject": "Login",
            "description": "Cannot sign in",
            "projectId": Uuid::new_v4(),
        }))
        .unwrap();
        assert!(matches!(
            store.create_ticket(&ticket, "open").await,
            Err(AppError::ResourceNotFound(_))
        ));

        let invoice: NewInvoice = serde_json::from_value(json!({
            "invoiceNumber": "INV-7",
            "amount": "10.00",
            "userId": Uuid::new_v4(),
        }))
        .unwrap();
        assert!(matches!(
            store.create_invoice(&invoice).await,
            Err(AppError::ResourceNotFound(_))
        ));
    }

    #[tokio::test]
    async fn parent_changes_check_cycles_under_the_write_lock() {
        let store = MemoryStore::new();
        let new = |name: &str, parent: Option<Uuid>| -> NewAccount {
            serde_json::from_value(json!({ "name": name, "parentAccountId": parent })).unwrap()
        };
        let root = store.create_account(&new("Root", None)).await.unwrap();
        let leaf = store.create_account(&new("Leaf", Some(root.id))).await.unwrap();

        let err = store.set_account_parent(root.id, Some(leaf.id)).await.unwrap_err();
        assert!(matches!(err, AppError::HierarchyCycle));
        let err = store.set_account_parent(root.id, Some(Uuid::new_v4())).await.unwrap_err();
        assert!(matches!(err, AppError::ResourceNotFound(_)));
        assert_eq!(store.get_account(root.id).await.unwrap().unwrap().parent_account_id, None);
    }

    #[tokio::test]
    async fn seeded_store_has_catalog_and_lookups() {
        let store = MemoryStore::seeded();
        assert!(!store.list_services().await.unwrap().is_empty());
        let stages = store.list_deal_stages().await.unwrap();
        assert!(stages.windows(2).all(|w| w[0].position <= w[1].position));
        let statuses = store.list_ticket_statuses().await.unwrap();
        assert!(statuses.iter().any(|s| s.name == "open"));
    }
}
