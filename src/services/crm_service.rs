// src/services/crm_service.rs

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::store::CrmStore,
    models::{
        audit::{AuditAction, AuditDiff},
        crm::{
            Account, Contact, CrmActivity, DealStage, Lead, LeadStatus, NewAccount, NewContact,
            NewCrmActivity, NewDealStage, NewLead, NewOpportunity, NewTask, Opportunity,
            OpportunityStage, Task,
        },
    },
    services::audit_service::AuditService,
};

#[derive(Clone)]
pub struct CrmService {
    store: Arc<dyn CrmStore>,
    audit: AuditService,
}

impl CrmService {
    pub fn new(store: Arc<dyn CrmStore>, audit: AuditService) -> Self {
        Self { store, audit }
    }

    // =========================================================================
    //  1. LEADS
    // =========================================================================

    pub async fn create_lead(&self, actor: Option<Uuid>, new: NewLead) -> Result<Lead, AppError> {
        let lead = self.store.create_lead(&new).await?;
        tracing::info!(lead_id = %lead.id, source = ?lead.lead_source, "Lead criado");
        self.audit
            .record(actor, AuditAction::Create, "leads", lead.id, AuditDiff::created(&lead))
            .await;
        Ok(lead)
    }

    pub async fn get_lead(&self, id: Uuid) -> Result<Lead, AppError> {
        self.store.get_lead(id).await?.ok_or_else(|| AppError::not_found("lead", id))
    }

    pub async fn list_leads(&self) -> Result<Vec<Lead>, AppError> {
        self.store.list_leads().await
    }

    // Sem tabela de transições: qualquer status é aceito
    pub async fn update_lead_status(
        &self,
        actor: Option<Uuid>,
        id: Uuid,
        status: LeadStatus,
    ) -> Result<Lead, AppError> {
        let before = self.get_lead(id).await?;
        let lead = self.store.update_lead_status(id, status).await?;
        self.audit
            .record(
                actor,
                AuditAction::Update,
                "leads",
                id,
                AuditDiff::changed("status", &before.status, &lead.status),
            )
            .await;
        Ok(lead)
    }

    // =========================================================================
    //  2. CONTAS (hierarquia acíclica)
    // =========================================================================

    pub async fn create_account(&self, actor: Option<Uuid>, new: NewAccount) -> Result<Account, AppError> {
        if let Some(parent_id) = new.parent_account_id {
            self.get_account(parent_id).await?;
        }
        let account = self.store.create_account(&new).await?;
        self.audit
            .record(actor, AuditAction::Create, "accounts", account.id, AuditDiff::created(&account))
            .await;
        Ok(account)
    }

    pub async fn get_account(&self, id: Uuid) -> Result<Account, AppError> {
        self.store.get_account(id).await?.ok_or_else(|| AppError::not_found("account", id))
    }

    pub async fn list_accounts(&self) -> Result<Vec<Account>, AppError> {
        self.store.list_accounts().await
    }

    pub async fn set_account_parent(
        &self,
        actor: Option<Uuid>,
        id: Uuid,
        parent_id: Option<Uuid>,
    ) -> Result<Account, AppError> {
        let before = self.get_account(id).await?;
        // A checagem de ciclo acontece no armazenamento, na mesma operação da escrita
        let account = self.store.set_account_parent(id, parent_id).await?;
        self.audit
            .record(
                actor,
                AuditAction::Update,
                "accounts",
                id,
                AuditDiff::changed("parentAccountId", &before.parent_account_id, &account.parent_account_id),
            )
            .await;
        Ok(account)
    }

    // =========================================================================
    //  3. CONTATOS
    // =========================================================================

    pub async fn create_contact(&self, actor: Option<Uuid>, new: NewContact) -> Result<Contact, AppError> {
        if let Some(account_id) = new.account_id {
            self.get_account(account_id).await?;
        }
        let contact = self.store.create_contact(&new).await?;
        self.audit
            .record(actor, AuditAction::Create, "contacts", contact.id, AuditDiff::created(&contact))
            .await;
        Ok(contact)
    }

    pub async fn list_contacts(&self, account_id: Option<Uuid>) -> Result<Vec<Contact>, AppError> {
        self.store.list_contacts(account_id).await
    }

    // =========================================================================
    //  4. OPORTUNIDADES
    // =========================================================================

    pub async fn create_opportunity(
        &self,
        actor: Option<Uuid>,
        mut new: NewOpportunity,
    ) -> Result<Opportunity, AppError> {
        if new.stage.is_closed() && new.actual_close_date.is_none() {
            new.actual_close_date = Some(Utc::now());
        }
        let opportunity = self.store.create_opportunity(&new).await?;
        self.audit
            .record(
                actor,
                AuditAction::Create,
                "opportunities",
                opportunity.id,
                AuditDiff::created(&opportunity),
            )
            .await;
        Ok(opportunity)
    }

    pub async fn get_opportunity(&self, id: Uuid) -> Result<Opportunity, AppError> {
        self.store
            .get_opportunity(id)
            .await?
            .ok_or_else(|| AppError::not_found("opportunity", id))
    }

    pub async fn list_opportunities(&self) -> Result<Vec<Opportunity>, AppError> {
        self.store.list_opportunities().await
    }

    /// Fechar carimba `actual_close_date` (mantendo a data anterior, se houver);
    /// reabrir limpa a data. A probabilidade não é tocada.
    pub async fn update_opportunity_stage(
        &self,
        actor: Option<Uuid>,
        id: Uuid,
        stage: OpportunityStage,
        stage_id: Option<Uuid>,
    ) -> Result<Opportunity, AppError> {
        let before = self.get_opportunity(id).await?;

        let actual_close_date = if stage.is_closed() {
            before.actual_close_date.or_else(|| Some(Utc::now()))
        } else {
            None
        };

        let opportunity = self
            .store
            .update_opportunity_stage(id, stage, stage_id, actual_close_date)
            .await?;

        let action = if stage.is_closed() && !before.stage.is_closed() {
            AuditAction::Approve
        } else {
            AuditAction::Update
        };
        self.audit
            .record(
                actor,
                action,
                "opportunities",
                id,
                AuditDiff::changed("stage", &before.stage, &opportunity.stage),
            )
            .await;
        Ok(opportunity)
    }

    // =========================================================================
    //  5. TAREFAS E ATIVIDADES
    // =========================================================================

    pub async fn create_task(&self, actor: Option<Uuid>, new: NewTask) -> Result<Task, AppError> {
        let task = self.store.create_task(&new).await?;
        let action = if task.assigned_to.is_some() {
            AuditAction::Assign
        } else {
            AuditAction::Create
        };
        self.audit.record(actor, action, "tasks", task.id, AuditDiff::created(&task)).await;
        Ok(task)
    }

    pub async fn list_tasks(&self) -> Result<Vec<Task>, AppError> {
        self.store.list_tasks().await
    }

    pub async fn create_activity(&self, actor: Option<Uuid>, new: NewCrmActivity) -> Result<CrmActivity, AppError> {
        let activity = self.store.create_activity(&new).await?;
        self.audit
            .record(
                actor,
                AuditAction::Create,
                "crm_activities",
                activity.id,
                AuditDiff::created(&activity),
            )
            .await;
        Ok(activity)
    }

    pub async fn list_activities(&self) -> Result<Vec<CrmActivity>, AppError> {
        self.store.list_activities().await
    }

    // =========================================================================
    //  6. ETAPAS DO FUNIL
    // =========================================================================

    pub async fn create_deal_stage(&self, actor: Option<Uuid>, new: NewDealStage) -> Result<DealStage, AppError> {
        let stage = self.store.create_deal_stage(&new).await?;
        self.audit
            .record(actor, AuditAction::Create, "deal_stages", stage.id, AuditDiff::created(&stage))
            .await;
        Ok(stage)
    }

    pub async fn list_deal_stages(&self) -> Result<Vec<DealStage>, AppError> {
        self.store.list_deal_stages().await
    }
}
