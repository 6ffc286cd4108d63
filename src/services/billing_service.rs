// src/services/billing_service.rs

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::store::BillingStore,
    models::{
        audit::{AuditAction, AuditDiff},
        billing::{Invoice, InvoiceStatus, NewInvoice, PaymentMethod},
    },
    services::audit_service::AuditService,
};

#[derive(Clone)]
pub struct BillingService {
    store: Arc<dyn BillingStore>,
    audit: AuditService,
}

impl BillingService {
    pub fn new(store: Arc<dyn BillingStore>, audit: AuditService) -> Self {
        Self { store, audit }
    }

    /// Fatura paga sem data recebe o momento atual.
    pub async fn create_invoice(&self, actor: Option<Uuid>, mut new: NewInvoice) -> Result<Invoice, AppError> {
        if new.status == InvoiceStatus::Paid && new.paid_date.is_none() {
            new.paid_date = Some(Utc::now());
        }

        let invoice = self.store.create_invoice(&new).await?;
        tracing::info!(
            invoice_number = %invoice.invoice_number,
            currency = ?invoice.currency,
            "Fatura emitida"
        );
        self.audit
            .record(actor, AuditAction::Create, "invoices", invoice.id, AuditDiff::created(&invoice))
            .await;
        Ok(invoice)
    }

    pub async fn get_invoice(&self, id: Uuid) -> Result<Invoice, AppError> {
        self.store.get_invoice(id).await?.ok_or_else(|| AppError::not_found("invoice", id))
    }

    pub async fn list_invoices(&self) -> Result<Vec<Invoice>, AppError> {
        self.store.list_invoices().await
    }

    pub async fn mark_invoice_paid(
        &self,
        actor: Option<Uuid>,
        id: Uuid,
        paid_date: Option<DateTime<Utc>>,
        payment_method: Option<PaymentMethod>,
    ) -> Result<Invoice, AppError> {
        let before = self.get_invoice(id).await?;
        let paid_date = paid_date.unwrap_or_else(Utc::now);
        let invoice = self.store.mark_invoice_paid(id, paid_date, payment_method).await?;

        self.audit
            .record(
                actor,
                AuditAction::Approve,
                "invoices",
                id,
                AuditDiff::changed("status", &before.status, &invoice.status),
            )
            .await;
        Ok(invoice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use serde_json::json;

    fn service() -> BillingService {
        let store = Arc::new(MemoryStore::new());
        BillingService::new(store.clone(), AuditService::new(store))
    }

    fn invoice(number: &str, status: &str) -> NewInvoice {
        serde_json::from_value(json!({ "invoiceNumber": number, "amount": "1500.00", "status": status }))
            .unwrap()
    }

    #[tokio::test]
    async fn paid_invoices_always_have_a_paid_date() {
        let service = service();

        let created_paid = service.create_invoice(None, invoice("INV-1", "paid")).await.unwrap();
        assert!(created_paid.paid_date.is_some());

        let pending = service.create_invoice(None, invoice("INV-2", "pending")).await.unwrap();
        assert!(pending.paid_date.is_none());

        let paid = service
            .mark_invoice_paid(None, pending.id, None, Some(PaymentMethod::Jaib))
            .await
            .unwrap();
        assert_eq!(paid.status, InvoiceStatus::Paid);
        assert!(paid.paid_date.is_some());
        assert_eq!(paid.payment_method, Some(PaymentMethod::Jaib));
    }

    #[tokio::test]
    async fn invoice_numbers_are_unique() {
        let service = service();
        service.create_invoice(None, invoice("INV-9", "pending")).await.unwrap();
        let err = service.create_invoice(None, invoice("INV-9", "pending")).await.unwrap_err();
        assert!(matches!(err, AppError::UniqueConstraintViolation(_)));
    }
}
