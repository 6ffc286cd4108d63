// src/db/audit_repo.rs

use async_trait::async_trait;
use sqlx::{types::Json, PgPool};

use crate::{
    common::error::AppError,
    db::store::AuditStore,
    models::audit::{AuditLog, AuditQuery, NewAuditLog},
};

// Não existe UPDATE nem DELETE aqui
#[derive(Clone)]
pub struct AuditRepository {
    pool: PgPool,
}

impl AuditRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditStore for AuditRepository {
    async fn append_audit_log(&self, new: &NewAuditLog) -> Result<AuditLog, AppError> {
        let log = sqlx::query_as::<_, AuditLog>(
            r#"
            INSERT INTO audit_logs (
                actor_id, action, entity_type, entity_id, diff, ip, user_agent, metadata
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(new.actor_id)
        .bind(new.action)
        .bind(&new.entity_type)
        .bind(new.entity_id)
        .bind(Json(&new.diff))
        .bind(&new.ip)
        .bind(&new.user_agent)
        .bind(&new.metadata)
        .fetch_one(&self.pool)
        .await?;
        Ok(log)
    }

    async fn list_audit_logs(&self, query: &AuditQuery) -> Result<Vec<AuditLog>, AppError> {
        let logs = sqlx::query_as::<_, AuditLog>(
            r#"
            SELECT * FROM audit_logs
            WHERE ($1::text IS NULL OR entity_type = $1)
              AND ($2::uuid IS NULL OR entity_id = $2)
            ORDER BY created_at ASC
            "#,
        )
        .bind(&query.entity_type)
        .bind(query.entity_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(logs)
    }
}
