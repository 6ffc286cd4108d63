// src/models/crm.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value; // <--- JSONB opaco (campos customizados, preferências)
use sqlx::{postgres::PgRow, FromRow, Row};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::{default_true, empty_object, json_object, non_negative, Attachment};

// --- ENUMS ---

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "lead_source", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum LeadSource {
    #[default]
    Website,
    Referral,
    Advertising,
    ColdCall,
    SocialMedia,
}

// Funil "para frente", mas sem tabela de transições: qualquer mudança é aceita
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "lead_status", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum LeadStatus {
    #[default]
    New,
    Contacted,
    Qualified,
    Proposal,
    Negotiation,
    Won,
    Lost,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "lead_rating", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LeadRating {
    Hot,
    Warm,
    #[default]
    Cold,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "account_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    #[default]
    Prospect,
    Customer,
    Partner,
    Vendor,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "opportunity_stage", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum OpportunityStage {
    #[default]
    Prospecting,
    Qualification,
    Proposal,
    Negotiation,
    ClosedWon,
    ClosedLost,
}

impl OpportunityStage {
    pub fn is_closed(self) -> bool {
        matches!(self, OpportunityStage::ClosedWon | OpportunityStage::ClosedLost)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "task_type", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum TaskType {
    #[default]
    Call,
    Email,
    Meeting,
    FollowUp,
    Demo,
    Other,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "task_status", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "activity_type", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum ActivityType {
    Call,
    Email,
    Meeting,
    Note,
    Task,
    DealUpdate,
}

// --- ASSOCIAÇÃO POLIMÓRFICA ---

/// Registro ao qual uma tarefa ou atividade se refere.
/// No banco são duas colunas (`related_to`, `related_id`); aqui é um enum fechado.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "kind", content = "id", rename_all = "kebab-case")]
pub enum RelatedEntity {
    Lead(Uuid),
    Contact(Uuid),
    Account(Uuid),
    Opportunity(Uuid),
    Task(Uuid),
}

impl RelatedEntity {
    pub fn tag(&self) -> &'static str {
        match self {
            RelatedEntity::Lead(_) => "lead",
            RelatedEntity::Contact(_) => "contact",
            RelatedEntity::Account(_) => "account",
            RelatedEntity::Opportunity(_) => "opportunity",
            RelatedEntity::Task(_) => "task",
        }
    }

    pub fn id(&self) -> Uuid {
        match *self {
            RelatedEntity::Lead(id)
            | RelatedEntity::Contact(id)
            | RelatedEntity::Account(id)
            | RelatedEntity::Opportunity(id)
            | RelatedEntity::Task(id) => id,
        }
    }

    /// Reconstrói a associação a partir das duas colunas do banco.
    pub fn from_columns(tag: Option<&str>, id: Option<Uuid>) -> Result<Option<Self>, String> {
        match (tag, id) {
            (None, None) => Ok(None),
            (Some(tag), Some(id)) => match tag {
                "lead" => Ok(Some(RelatedEntity::Lead(id))),
                "contact" => Ok(Some(RelatedEntity::Contact(id))),
                "account" => Ok(Some(RelatedEntity::Account(id))),
                "opportunity" => Ok(Some(RelatedEntity::Opportunity(id))),
                "task" => Ok(Some(RelatedEntity::Task(id))),
                other => Err(format!("tipo de relação desconhecido: {other}")),
            },
            _ => Err("related_to e related_id devem vir juntos".to_string()),
        }
    }
}

fn related_from_row(row: &PgRow) -> Result<Option<RelatedEntity>, sqlx::Error> {
    let tag: Option<String> = row.try_get("related_to")?;
    let id: Option<Uuid> = row.try_get("related_id")?;
    RelatedEntity::from_columns(tag.as_deref(), id).map_err(|e| sqlx::Error::ColumnDecode {
        index: "related_to".to_string(),
        source: e.into(),
    })
}

// --- ENDEREÇO (JSONB estruturado) ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[schema(example = "شارع الزبيري")]
    pub street: String,
    #[schema(example = "صنعاء")]
    pub city: String,
    pub state: String,
    #[schema(example = "YE")]
    pub country: String,
    pub postal_code: String,
}

// =============================================================================
//  LEADS
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: Uuid,
    #[schema(example = "محمد علي")]
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub job_title: Option<String>,
    pub lead_source: LeadSource,
    pub status: LeadStatus,
    pub rating: LeadRating,
    #[schema(value_type = Option<String>, example = "15000.00")]
    pub estimated_value: Option<Decimal>,
    pub expected_close_date: Option<DateTime<Utc>>,
    pub assigned_to: Option<Uuid>,
    pub notes: Option<String>,
    pub tags: Vec<String>,
    pub custom_fields: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewLead {
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "محمد علي")]
    pub name: String,
    #[validate(email(message = "invalid_email"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub job_title: Option<String>,
    #[serde(default)]
    pub lead_source: LeadSource,
    #[serde(default)]
    pub status: LeadStatus,
    #[serde(default)]
    pub rating: LeadRating,
    #[validate(custom(function = "non_negative"))]
    #[schema(value_type = Option<String>)]
    pub estimated_value: Option<Decimal>,
    pub expected_close_date: Option<DateTime<Utc>>,
    pub assigned_to: Option<Uuid>,
    pub notes: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "empty_object")]
    #[validate(custom(function = "json_object"))]
    pub custom_fields: Value,
}

// =============================================================================
//  CONTAS
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: Uuid,
    #[schema(example = "شركة الأفق")]
    pub name: String,
    #[serde(rename = "type")]
    pub account_type: AccountType,
    pub industry: Option<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    #[sqlx(json(nullable))]
    pub billing_address: Option<Address>,
    #[sqlx(json(nullable))]
    pub shipping_address: Option<Address>,
    #[schema(value_type = Option<String>)]
    pub annual_revenue: Option<Decimal>,
    pub number_of_employees: Option<i32>,
    pub assigned_to: Option<Uuid>,
    // Auto-referência: a hierarquia é mantida acíclica pelo serviço
    pub parent_account_id: Option<Uuid>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub custom_fields: Value,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewAccount {
    #[validate(length(min = 1, message = "required"))]
    pub name: String,
    #[serde(rename = "type", default)]
    pub account_type: AccountType,
    pub industry: Option<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
    #[validate(email(message = "invalid_email"))]
    pub email: Option<String>,
    pub billing_address: Option<Address>,
    pub shipping_address: Option<Address>,
    #[validate(custom(function = "non_negative"))]
    #[schema(value_type = Option<String>)]
    pub annual_revenue: Option<Decimal>,
    #[validate(range(min = 0, message = "invalid_employee_count"))]
    pub number_of_employees: Option<i32>,
    pub assigned_to: Option<Uuid>,
    pub parent_account_id: Option<Uuid>,
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "empty_object")]
    #[validate(custom(function = "json_object"))]
    pub custom_fields: Value,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

// =============================================================================
//  CONTATOS
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: Uuid,
    pub lead_id: Option<Uuid>,
    pub account_id: Option<Uuid>,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub mobile: Option<String>,
    pub job_title: Option<String>,
    pub department: Option<String>,
    // Único por conta (índice parcial no banco)
    pub is_primary: bool,
    pub is_active: bool,
    pub date_of_birth: Option<DateTime<Utc>>,
    pub social_profiles: Value,
    pub preferences: Value,
    pub tags: Vec<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewContact {
    pub lead_id: Option<Uuid>,
    pub account_id: Option<Uuid>,
    #[validate(length(min = 1, message = "required"))]
    pub name: String,
    #[validate(email(message = "invalid_email"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub mobile: Option<String>,
    pub job_title: Option<String>,
    pub department: Option<String>,
    #[serde(default)]
    pub is_primary: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub date_of_birth: Option<DateTime<Utc>>,
    #[serde(default = "empty_object")]
    #[validate(custom(function = "json_object"))]
    pub social_profiles: Value,
    #[serde(default = "empty_object")]
    #[validate(custom(function = "json_object"))]
    pub preferences: Value,
    #[serde(default)]
    pub tags: Vec<String>,
    pub notes: Option<String>,
}

// =============================================================================
//  ETAPAS DO FUNIL (posição numérica)
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DealStage {
    pub id: Uuid,
    #[schema(example = "Negotiation")]
    pub name: String,
    #[schema(example = 3)]
    pub position: i32,
    #[schema(example = 60)]
    pub probability: i16,
    #[schema(example = "#3b82f6")]
    pub color: String,
    pub is_closed: bool,
    pub is_won: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewDealStage {
    #[validate(length(min = 1, message = "required"))]
    pub name: String,
    #[validate(range(min = 0, message = "invalid_position"))]
    pub position: i32,
    #[serde(default)]
    #[validate(range(min = 0, max = 100, message = "invalid_probability"))]
    pub probability: i16,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default)]
    pub is_closed: bool,
    #[serde(default)]
    pub is_won: bool,
}

pub(crate) fn default_color() -> String {
    "#3b82f6".to_string()
}

// =============================================================================
//  OPORTUNIDADES
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Opportunity {
    pub id: Uuid,
    pub name: String,
    pub account_id: Option<Uuid>,
    pub contact_id: Option<Uuid>,
    pub stage_id: Option<Uuid>,
    pub stage: OpportunityStage,
    #[schema(value_type = Option<String>)]
    pub amount: Option<Decimal>,
    // Independente da etapa: nenhuma regra amarra os dois
    pub probability: i16,
    pub expected_close_date: Option<DateTime<Utc>>,
    pub actual_close_date: Option<DateTime<Utc>>,
    pub lead_source: Option<String>,
    pub description: Option<String>,
    pub loss_reason: Option<String>,
    pub next_step: Option<String>,
    pub assigned_to: Option<Uuid>,
    pub competitor_id: Option<Uuid>,
    pub tags: Vec<String>,
    pub custom_fields: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewOpportunity {
    #[validate(length(min = 1, message = "required"))]
    pub name: String,
    pub account_id: Option<Uuid>,
    pub contact_id: Option<Uuid>,
    pub stage_id: Option<Uuid>,
    #[serde(default)]
    pub stage: OpportunityStage,
    #[validate(custom(function = "non_negative"))]
    #[schema(value_type = Option<String>)]
    pub amount: Option<Decimal>,
    #[serde(default)]
    #[validate(range(min = 0, max = 100, message = "invalid_probability"))]
    pub probability: i16,
    pub expected_close_date: Option<DateTime<Utc>>,
    pub actual_close_date: Option<DateTime<Utc>>,
    pub lead_source: Option<String>,
    pub description: Option<String>,
    pub loss_reason: Option<String>,
    pub next_step: Option<String>,
    pub assigned_to: Option<Uuid>,
    pub competitor_id: Option<Uuid>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "empty_object")]
    #[validate(custom(function = "json_object"))]
    pub custom_fields: Value,
}

// =============================================================================
//  TAREFAS
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub task_type: TaskType,
    pub status: TaskStatus,
    pub priority: Priority,
    pub assigned_to: Option<Uuid>,
    pub created_by: Option<Uuid>,
    pub related: Option<RelatedEntity>,
    pub due_date: Option<DateTime<Utc>>,
    pub completed_date: Option<DateTime<Utc>>,
    pub reminder_date: Option<DateTime<Utc>>,
    // Em minutos
    pub estimated_duration: Option<i32>,
    pub actual_duration: Option<i32>,
    pub tags: Vec<String>,
    pub attachments: Vec<Attachment>,
    pub custom_fields: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Manual por causa da associação polimórfica (duas colunas -> um enum)
impl<'r> FromRow<'r, PgRow> for Task {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Task {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            task_type: row.try_get("task_type")?,
            status: row.try_get("status")?,
            priority: row.try_get("priority")?,
            assigned_to: row.try_get("assigned_to")?,
            created_by: row.try_get("created_by")?,
            related: related_from_row(row)?,
            due_date: row.try_get("due_date")?,
            completed_date: row.try_get("completed_date")?,
            reminder_date: row.try_get("reminder_date")?,
            estimated_duration: row.try_get("estimated_duration")?,
            actual_duration: row.try_get("actual_duration")?,
            tags: row.try_get("tags")?,
            attachments: row.try_get::<sqlx::types::Json<Vec<Attachment>>, _>("attachments")?.0,
            custom_fields: row.try_get("custom_fields")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewTask {
    #[validate(length(min = 1, message = "required"))]
    pub title: String,
    pub description: Option<String>,
    #[serde(rename = "type", default)]
    pub task_type: TaskType,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: Priority,
    pub assigned_to: Option<Uuid>,
    pub created_by: Option<Uuid>,
    pub related: Option<RelatedEntity>,
    pub due_date: Option<DateTime<Utc>>,
    pub completed_date: Option<DateTime<Utc>>,
    pub reminder_date: Option<DateTime<Utc>>,
    #[validate(range(min = 0, message = "invalid_duration"))]
    pub estimated_duration: Option<i32>,
    #[validate(range(min = 0, message = "invalid_duration"))]
    pub actual_duration: Option<i32>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    #[serde(default = "empty_object")]
    #[validate(custom(function = "json_object"))]
    pub custom_fields: Value,
}

// =============================================================================
//  ATIVIDADES (log imutável de interações)
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CrmActivity {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    pub title: String,
    pub description: Option<String>,
    pub user_id: Option<Uuid>,
    pub related: Option<RelatedEntity>,
    pub metadata: Value,
    pub duration: Option<i32>,
    pub outcome: Option<String>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl<'r> FromRow<'r, PgRow> for CrmActivity {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(CrmActivity {
            id: row.try_get("id")?,
            activity_type: row.try_get("activity_type")?,
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            user_id: row.try_get("user_id")?,
            related: related_from_row(row)?,
            metadata: row.try_get("metadata")?,
            duration: row.try_get("duration")?,
            outcome: row.try_get("outcome")?,
            scheduled_at: row.try_get("scheduled_at")?,
            completed_at: row.try_get("completed_at")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewCrmActivity {
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    #[validate(length(min = 1, message = "required"))]
    pub title: String,
    pub description: Option<String>,
    pub user_id: Option<Uuid>,
    pub related: Option<RelatedEntity>,
    #[serde(default = "empty_object")]
    #[validate(custom(function = "json_object"))]
    pub metadata: Value,
    #[validate(range(min = 0, message = "invalid_duration"))]
    pub duration: Option<i32>,
    pub outcome: Option<String>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}
