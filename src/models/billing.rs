// src/models/billing.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::non_negative;

// --- Enums (Mapeando o Postgres) ---

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "currency", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Yer, // Rial iemenita
    Usd,
    Sar,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "invoice_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    #[default]
    Pending,
    Paid,
    Overdue,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "payment_method", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    CreditCard,
    Jaib,
    Cash,
    Jawali,
    Floosak,
    Onecash,
}

// --- Structs ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceItem {
    #[schema(example = "تصميم واجهات التطبيق")]
    pub description: String,
    #[schema(value_type = f64, example = 1)]
    pub quantity: Decimal,
    #[schema(value_type = String, example = "250000")]
    pub rate: Decimal,
    #[schema(value_type = String, example = "250000")]
    pub amount: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub project_id: Option<Uuid>,
    #[schema(example = "INV-2026-0001")]
    pub invoice_number: String,
    #[schema(value_type = String, example = "250000.00")]
    pub amount: Decimal,
    pub currency: Currency,
    pub status: InvoiceStatus,
    pub description: Option<String>,
    #[sqlx(json)]
    pub items: Vec<InvoiceItem>,
    pub due_date: Option<DateTime<Utc>>,
    // Preenchida sempre que o status é `paid`
    pub paid_date: Option<DateTime<Utc>>,
    pub payment_method: Option<PaymentMethod>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewInvoice {
    pub user_id: Option<Uuid>,
    pub project_id: Option<Uuid>,
    #[validate(length(min = 1, message = "required"))]
    pub invoice_number: String,
    #[validate(custom(function = "non_negative"))]
    #[schema(value_type = String)]
    pub amount: Decimal,
    #[serde(default)]
    pub currency: Currency,
    #[serde(default)]
    pub status: InvoiceStatus,
    pub description: Option<String>,
    #[serde(default)]
    pub items: Vec<InvoiceItem>,
    pub due_date: Option<DateTime<Utc>>,
    pub paid_date: Option<DateTime<Utc>>,
    pub payment_method: Option<PaymentMethod>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PayInvoicePayload {
    pub payment_method: Option<PaymentMethod>,
    // Sem data, usa o momento atual
    pub paid_date: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn enum_wire_names() {
        assert_eq!(serde_json::to_value(Currency::Sar).unwrap(), json!("SAR"));
        assert_eq!(serde_json::to_value(PaymentMethod::CreditCard).unwrap(), json!("credit_card"));
    }

    #[test]
    fn invoice_defaults_to_pending_rial() {
        let invoice: NewInvoice =
            serde_json::from_value(json!({ "invoiceNumber": "INV-1", "amount": 100 })).unwrap();
        assert_eq!(invoice.currency, Currency::Yer);
        assert_eq!(invoice.status, InvoiceStatus::Pending);
    }

    #[test]
    fn invoice_insert_rejects_server_fields() {
        let minimal = json!({ "invoiceNumber": "INV-2", "amount": 50 });
        assert!(serde_json::from_value::<NewInvoice>(minimal.clone()).is_ok());
        for key in ["id", "createdAt", "updatedAt"] {
            let mut payload = minimal.clone();
            payload[key] = json!("2026-01-01T00:00:00Z");
            assert!(serde_json::from_value::<NewInvoice>(payload).is_err(), "{key}");
        }
    }
}
