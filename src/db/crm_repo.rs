// src/db/crm_repo.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use crate::{
    common::error::{map_unique_violation, AppError},
    db::store::CrmStore,
    models::crm::{
        Account, Contact, CrmActivity, DealStage, Lead, LeadStatus, NewAccount, NewContact,
        NewCrmActivity, NewDealStage, NewLead, NewOpportunity, NewTask, Opportunity,
        OpportunityStage, Task,
    },
};

// Chave do advisory lock que protege `accounts.parent_account_id`
const ACCOUNT_HIERARCHY_LOCK: i64 = 0x4143_4354_4852_4559;

#[derive(Clone)]
pub struct CrmRepository {
    pool: PgPool,
}

impl CrmRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CrmStore for CrmRepository {
    // =========================================================================
    //  LEADS
    // =========================================================================

    async fn create_lead(&self, new: &NewLead) -> Result<Lead, AppError> {
        let lead = sqlx::query_as::<_, Lead>(
            r#"
            INSERT INTO leads (
                name, email, phone, company, job_title, lead_source, status, rating,
                estimated_value, expected_close_date, assigned_to, notes, tags, custom_fields
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING *
            "#,
        )
        .bind(&new.name)
        .bind(&new.email)
        .bind(&new.phone)
        .bind(&new.company)
        .bind(&new.job_title)
        .bind(new.lead_source)
        .bind(new.status)
        .bind(new.rating)
        .bind(new.estimated_value)
        .bind(new.expected_close_date)
        .bind(new.assigned_to)
        .bind(&new.notes)
        .bind(&new.tags)
        .bind(&new.custom_fields)
        .fetch_one(&self.pool)
        .await?;
        Ok(lead)
    }

    async fn get_lead(&self, id: Uuid) -> Result<Option<Lead>, AppError> {
        let lead = sqlx::query_as::<_, Lead>("SELECT * FROM leads WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(lead)
    }

    async fn list_leads(&self) -> Result<Vec<Lead>, AppError> {
        let leads = sqlx::query_as::<_, Lead>("SELECT * FROM leads ORDER BY created_at ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(leads)
    }

    async fn update_lead_status(&self, id: Uuid, status: LeadStatus) -> Result<Lead, AppError> {
        sqlx::query_as::<_, Lead>(
            r#"
            UPDATE leads
            SET status = $2, updated_at = GREATEST(NOW(), updated_at)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::not_found("lead", id))
    }

    // =========================================================================
    //  CONTAS
    // =========================================================================

    async fn create_account(&self, new: &NewAccount) -> Result<Account, AppError> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO accounts (
                name, account_type, industry, website, phone, email,
                billing_address, shipping_address, annual_revenue, number_of_employees,
                assigned_to, parent_account_id, description, tags, custom_fields, is_active
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING *
            "#,
        )
        .bind(&new.name)
        .bind(new.account_type)
        .bind(&new.industry)
        .bind(&new.website)
        .bind(&new.phone)
        .bind(&new.email)
        .bind(new.billing_address.as_ref().map(Json))
        .bind(new.shipping_address.as_ref().map(Json))
        .bind(new.annual_revenue)
        .bind(new.number_of_employees)
        .bind(new.assigned_to)
        .bind(new.parent_account_id)
        .bind(&new.description)
        .bind(&new.tags)
        .bind(&new.custom_fields)
        .bind(new.is_active)
        .fetch_one(&self.pool)
        .await?;
        Ok(account)
    }

    async fn get_account(&self, id: Uuid) -> Result<Option<Account>, AppError> {
        let account = sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(account)
    }

    async fn list_accounts(&self) -> Result<Vec<Account>, AppError> {
        let accounts = sqlx::query_as::<_, Account>("SELECT * FROM accounts ORDER BY created_at ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(accounts)
    }

    async fn set_account_parent(&self, id: Uuid, parent_id: Option<Uuid>) -> Result<Account, AppError> {
        let mut tx = self.pool.begin().await?;

        // Serializa as mudanças de hierarquia: duas trocas cruzadas não passam juntas pela checagem
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(ACCOUNT_HIERARCHY_LOCK)
            .execute(&mut *tx)
            .await?;

        if let Some(parent_id) = parent_id {
            let parent_exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM accounts WHERE id = $1)")
                .bind(parent_id)
                .fetch_one(&mut *tx)
                .await?;
            if !parent_exists {
                return Err(AppError::not_found("account", parent_id));
            }

            // UNION (sem ALL) termina mesmo se já houver um ciclo gravado
            let would_cycle: bool = sqlx::query_scalar(
                r#"
                WITH RECURSIVE ancestors AS (
                    SELECT id, parent_account_id FROM accounts WHERE id = $1
                    UNION
                    SELECT a.id, a.parent_account_id
                    FROM accounts a
                    JOIN ancestors an ON a.id = an.parent_account_id
                )
                SELECT EXISTS (SELECT 1 FROM ancestors WHERE id = $2)
                "#,
            )
            .bind(parent_id)
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
            if would_cycle {
                return Err(AppError::HierarchyCycle);
            }
        }

        let account = sqlx::query_as::<_, Account>(
            r#"
            UPDATE accounts
            SET parent_account_id = $2, updated_at = GREATEST(NOW(), updated_at)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(parent_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::not_found("account", id))?;

        tx.commit().await?;
        Ok(account)
    }

    // =========================================================================
    //  CONTATOS
    // =========================================================================

    async fn create_contact(&self, new: &NewContact) -> Result<Contact, AppError> {
        sqlx::query_as::<_, Contact>(
            r#"
            INSERT INTO contacts (
                lead_id, account_id, name, email, phone, mobile, job_title, department,
                is_primary, is_active, date_of_birth, social_profiles, preferences, tags, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING *
            "#,
        )
        .bind(new.lead_id)
        .bind(new.account_id)
        .bind(&new.name)
        .bind(&new.email)
        .bind(&new.phone)
        .bind(&new.mobile)
        .bind(&new.job_title)
        .bind(&new.department)
        .bind(new.is_primary)
        .bind(new.is_active)
        .bind(new.date_of_birth)
        .bind(&new.social_profiles)
        .bind(&new.preferences)
        .bind(&new.tags)
        .bind(&new.notes)
        .fetch_one(&self.pool)
        .await
        // Só o índice parcial de contato principal é único nesta tabela
        .map_err(|e| {
            map_unique_violation(e, || {
                format!(
                    "primary contact for account {}",
                    new.account_id.map(|id| id.to_string()).unwrap_or_default()
                )
            })
        })
    }

    async fn list_contacts(&self, account_id: Option<Uuid>) -> Result<Vec<Contact>, AppError> {
        let contacts = sqlx::query_as::<_, Contact>(
            r#"
            SELECT * FROM contacts
            WHERE ($1::uuid IS NULL OR account_id = $1)
            ORDER BY created_at ASC
            "#,
        )
        .bind(account_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(contacts)
    }

    // =========================================================================
    //  OPORTUNIDADES
    // =========================================================================

    async fn create_opportunity(&self, new: &NewOpportunity) -> Result<Opportunity, AppError> {
        let opportunity = sqlx::query_as::<_, Opportunity>(
            r#"
            INSERT INTO opportunities (
                name, account_id, contact_id, stage_id, stage, amount, probability,
                expected_close_date, actual_close_date, lead_source, description,
                loss_reason, next_step, assigned_to, competitor_id, tags, custom_fields
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            RETURNING *
            "#,
        )
        .bind(&new.name)
        .bind(new.account_id)
        .bind(new.contact_id)
        .bind(new.stage_id)
        .bind(new.stage)
        .bind(new.amount)
        .bind(new.probability)
        .bind(new.expected_close_date)
        .bind(new.actual_close_date)
        .bind(&new.lead_source)
        .bind(&new.description)
        .bind(&new.loss_reason)
        .bind(&new.next_step)
        .bind(new.assigned_to)
        .bind(new.competitor_id)
        .bind(&new.tags)
        .bind(&new.custom_fields)
        .fetch_one(&self.pool)
        .await?;
        Ok(opportunity)
    }

    async fn get_opportunity(&self, id: Uuid) -> Result<Option<Opportunity>, AppError> {
        let opportunity = sqlx::query_as::<_, Opportunity>("SELECT * FROM opportunities WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(opportunity)
    }

    async fn list_opportunities(&self) -> Result<Vec<Opportunity>, AppError> {
        let opportunities =
            sqlx::query_as::<_, Opportunity>("SELECT * FROM opportunities ORDER BY created_at ASC")
                .fetch_all(&self.pool)
                .await?;
        Ok(opportunities)
    }

    async fn update_opportunity_stage(
        &self,
        id: Uuid,
        stage: OpportunityStage,
        stage_id: Option<Uuid>,
        actual_close_date: Option<DateTime<Utc>>,
    ) -> Result<Opportunity, AppError> {
        sqlx::query_as::<_, Opportunity>(
            r#"
            UPDATE opportunities
            SET stage = $2,
                stage_id = $3,
                actual_close_date = $4,
                updated_at = GREATEST(NOW(), updated_at)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(stage)
        .bind(stage_id)
        .bind(actual_close_date)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::not_found("opportunity", id))
    }

    // =========================================================================
    //  TAREFAS E ATIVIDADES
    // =========================================================================

    async fn create_task(&self, new: &NewTask) -> Result<Task, AppError> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (
                title, description, task_type, status, priority, assigned_to, created_by,
                related_to, related_id, due_date, completed_date, reminder_date,
                estimated_duration, actual_duration, tags, attachments, custom_fields
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            RETURNING *
            "#,
        )
        .bind(&new.title)
        .bind(&new.description)
        .bind(new.task_type)
        .bind(new.status)
        .bind(new.priority)
        .bind(new.assigned_to)
        .bind(new.created_by)
        .bind(new.related.map(|r| r.tag()))
        .bind(new.related.map(|r| r.id()))
        .bind(new.due_date)
        .bind(new.completed_date)
        .bind(new.reminder_date)
        .bind(new.estimated_duration)
        .bind(new.actual_duration)
        .bind(&new.tags)
        .bind(Json(&new.attachments))
        .bind(&new.custom_fields)
        .fetch_one(&self.pool)
        .await?;
        Ok(task)
    }

    async fn list_tasks(&self) -> Result<Vec<Task>, AppError> {
        let tasks = sqlx::query_as::<_, Task>("SELECT * FROM tasks ORDER BY created_at ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(tasks)
    }

    async fn create_activity(&self, new: &NewCrmActivity) -> Result<CrmActivity, AppError> {
        let activity = sqlx::query_as::<_, CrmActivity>(
            r#"
            INSERT INTO crm_activities (
                activity_type, title, description, user_id, related_to, related_id,
                metadata, duration, outcome, scheduled_at, completed_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(new.activity_type)
        .bind(&new.title)
        .bind(&new.description)
        .bind(new.user_id)
        .bind(new.related.map(|r| r.tag()))
        .bind(new.related.map(|r| r.id()))
        .bind(&new.metadata)
        .bind(new.duration)
        .bind(&new.outcome)
        .bind(new.scheduled_at)
        .bind(new.completed_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(activity)
    }

    async fn list_activities(&self) -> Result<Vec<CrmActivity>, AppError> {
        let activities =
            sqlx::query_as::<_, CrmActivity>("SELECT * FROM crm_activities ORDER BY created_at ASC")
                .fetch_all(&self.pool)
                .await?;
        Ok(activities)
    }

    // =========================================================================
    //  ETAPAS DO FUNIL
    // =========================================================================

    async fn create_deal_stage(&self, new: &NewDealStage) -> Result<DealStage, AppError> {
        sqlx::query_as::<_, DealStage>(
            r#"
            INSERT INTO deal_stages (name, position, probability, color, is_closed, is_won)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&new.name)
        .bind(new.position)
        .bind(new.probability)
        .bind(&new.color)
        .bind(new.is_closed)
        .bind(new.is_won)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || format!("deal stage '{}'", new.name)))
    }

    async fn list_deal_stages(&self) -> Result<Vec<DealStage>, AppError> {
        let stages =
            sqlx::query_as::<_, DealStage>("SELECT * FROM deal_stages ORDER BY position ASC, name ASC")
                .fetch_all(&self.pool)
                .await?;
        Ok(stages)
    }
}
