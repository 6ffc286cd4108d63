pub mod audit;
pub mod auth;
pub mod billing;
pub mod catalog;
pub mod crm;
pub mod inquiry;
pub mod support;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;
use validator::ValidationError;

// Arquivo anexado (guardado como JSONB, sem integridade referencial)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Attachment {
    pub id: String,
    pub name: String,
    pub url: String,
}

pub(crate) fn default_true() -> bool {
    true
}

pub(crate) fn empty_object() -> Value {
    Value::Object(Map::new())
}

pub(crate) fn non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ValidationError::new("negative_amount"));
    }
    Ok(())
}

pub(crate) fn json_object(value: &Value) -> Result<(), ValidationError> {
    if !value.is_object() {
        return Err(ValidationError::new("expected_object"));
    }
    Ok(())
}
