// src/db/support_repo.rs

use async_trait::async_trait;
use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use crate::{
    common::error::{map_unique_violation, AppError},
    db::store::SupportStore,
    models::support::{
        NewProject, NewSupportTicket, NewTicketMessage, NewTicketStatus, Project, SupportTicket,
        TicketMessage, TicketStatus,
    },
};

#[derive(Clone)]
pub struct SupportRepository {
    pool: PgPool,
}

impl SupportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SupportStore for SupportRepository {
    async fn create_project(&self, new: &NewProject) -> Result<Project, AppError> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (user_id, title, description, status, progress)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(new.user_id)
        .bind(&new.title)
        .bind(&new.description)
        .bind(new.status)
        .bind(new.progress)
        .fetch_one(&self.pool)
        .await?;
        Ok(project)
    }

    async fn list_projects(&self) -> Result<Vec<Project>, AppError> {
        let projects = sqlx::query_as::<_, Project>("SELECT * FROM projects ORDER BY created_at ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(projects)
    }

    // =========================================================================
    //  STATUS DE CHAMADO
    // =========================================================================

    async fn create_ticket_status(&self, new: &NewTicketStatus) -> Result<TicketStatus, AppError> {
        sqlx::query_as::<_, TicketStatus>(
            r#"
            INSERT INTO ticket_status (name, position, color, is_closed)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&new.name)
        .bind(new.position)
        .bind(&new.color)
        .bind(new.is_closed)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || format!("ticket status '{}'", new.name)))
    }

    async fn get_ticket_status(&self, id: Uuid) -> Result<Option<TicketStatus>, AppError> {
        let status = sqlx::query_as::<_, TicketStatus>("SELECT * FROM ticket_status WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(status)
    }

    async fn list_ticket_statuses(&self) -> Result<Vec<TicketStatus>, AppError> {
        let statuses = sqlx::query_as::<_, TicketStatus>(
            "SELECT * FROM ticket_status ORDER BY position ASC, name ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(statuses)
    }

    // =========================================================================
    //  CHAMADOS
    // =========================================================================

    async fn create_ticket(&self, new: &NewSupportTicket, status_name: &str) -> Result<SupportTicket, AppError> {
        let ticket = sqlx::query_as::<_, SupportTicket>(
            r#"
            INSERT INTO support_tickets (
                user_id, project_id, status_id, subject, description, status,
                priority, category, assigned_to, attachments
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(new.user_id)
        .bind(new.project_id)
        .bind(new.status_id)
        .bind(&new.subject)
        .bind(&new.description)
        .bind(status_name)
        .bind(new.priority)
        .bind(new.category)
        .bind(new.assigned_to)
        .bind(Json(&new.attachments))
        .fetch_one(&self.pool)
        .await?;
        Ok(ticket)
    }

    async fn get_ticket(&self, id: Uuid) -> Result<Option<SupportTicket>, AppError> {
        let ticket = sqlx::query_as::<_, SupportTicket>("SELECT * FROM support_tickets WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(ticket)
    }

    async fn list_tickets(&self) -> Result<Vec<SupportTicket>, AppError> {
        let tickets =
            sqlx::query_as::<_, SupportTicket>("SELECT * FROM support_tickets ORDER BY created_at ASC")
                .fetch_all(&self.pool)
                .await?;
        Ok(tickets)
    }

    async fn update_ticket_status(
        &self,
        id: Uuid,
        status_id: Option<Uuid>,
        status_name: &str,
    ) -> Result<SupportTicket, AppError> {
        sqlx::query_as::<_, SupportTicket>(
            r#"
            UPDATE support_tickets
            SET status_id = $2, status = $3, updated_at = GREATEST(NOW(), updated_at)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status_id)
        .bind(status_name)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::not_found("ticket", id))
    }

    // =========================================================================
    //  MENSAGENS
    // =========================================================================

    async fn create_ticket_message(&self, ticket_id: Uuid, new: &NewTicketMessage) -> Result<TicketMessage, AppError> {
        let message = sqlx::query_as::<_, TicketMessage>(
            r#"
            INSERT INTO ticket_messages (ticket_id, user_id, message, is_staff, attachments)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(ticket_id)
        .bind(new.user_id)
        .bind(&new.message)
        .bind(new.is_staff)
        .bind(Json(&new.attachments))
        .fetch_one(&self.pool)
        .await?;
        Ok(message)
    }

    async fn list_ticket_messages(&self, ticket_id: Uuid) -> Result<Vec<TicketMessage>, AppError> {
        let messages = sqlx::query_as::<_, TicketMessage>(
            "SELECT * FROM ticket_messages WHERE ticket_id = $1 ORDER BY created_at ASC",
        )
        .bind(ticket_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(messages)
    }
}
