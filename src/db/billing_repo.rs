// src/db/billing_repo.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use crate::{
    common::error::{map_unique_violation, AppError},
    db::store::BillingStore,
    models::billing::{Invoice, NewInvoice, PaymentMethod},
};

#[derive(Clone)]
pub struct BillingRepository {
    pool: PgPool,
}

impl BillingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BillingStore for BillingRepository {
    async fn create_invoice(&self, new: &NewInvoice) -> Result<Invoice, AppError> {
        sqlx::query_as::<_, Invoice>(
            r#"
            INSERT INTO invoices (
                user_id, project_id, invoice_number, amount, currency, status,
                description, items, due_date, paid_date, payment_method
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(new.user_id)
        .bind(new.project_id)
        .bind(&new.invoice_number)
        .bind(new.amount)
        .bind(new.currency)
        .bind(new.status)
        .bind(&new.description)
        .bind(Json(&new.items))
        .bind(new.due_date)
        .bind(new.paid_date)
        .bind(new.payment_method)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || format!("invoice number '{}'", new.invoice_number)))
    }

    async fn get_invoice(&self, id: Uuid) -> Result<Option<Invoice>, AppError> {
        let invoice = sqlx::query_as::<_, Invoice>("SELECT * FROM invoices WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(invoice)
    }

    async fn list_invoices(&self) -> Result<Vec<Invoice>, AppError> {
        let invoices = sqlx::query_as::<_, Invoice>("SELECT * FROM invoices ORDER BY created_at ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(invoices)
    }

    // Status e data de pagamento mudam juntos
    async fn mark_invoice_paid(
        &self,
        id: Uuid,
        paid_date: DateTime<Utc>,
        payment_method: Option<PaymentMethod>,
    ) -> Result<Invoice, AppError> {
        sqlx::query_as::<_, Invoice>(
            r#"
            UPDATE invoices
            SET status = 'paid',
                paid_date = $2,
                payment_method = COALESCE($3, payment_method),
                updated_at = GREATEST(NOW(), updated_at)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(paid_date)
        .bind(payment_method)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::not_found("invoice", id))
    }
}
