// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    Client,
    Admin,
    Manager,
    Agent,
    Viewer,
}

// Representa um usuário vindo do banco de dados
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    #[schema(example = "admin")]
    pub username: String,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    #[schema(ignore)]
    pub password_hash: String,

    pub force_password_change: bool,
    pub role: UserRole,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub position: Option<String>,
    pub avatar: Option<String>,
    pub is_active: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Dados aceitos na criação de um usuário.
/// `id`, datas e `lastLoginAt` são do servidor; a senha chega em texto e vira hash.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewUser {
    #[validate(length(min = 3, message = "username_too_short"))]
    #[schema(example = "sara.agent")]
    pub username: String,

    #[validate(length(min = 8, message = "password_too_short"))]
    pub password: String,

    #[serde(default)]
    pub force_password_change: bool,
    #[serde(default)]
    pub role: UserRole,
    pub name: Option<String>,
    #[validate(email(message = "invalid_email"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub position: Option<String>,
    pub avatar: Option<String>,
    #[serde(default = "crate::models::default_true")]
    pub is_active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn password_hash_is_never_serialized() {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            username: "sara".into(),
            password_hash: "$2b$12$secret".into(),
            force_password_change: false,
            role: UserRole::Agent,
            name: None,
            email: None,
            phone: None,
            department: None,
            position: None,
            avatar: None,
            is_active: true,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        };
        let value = serde_json::to_value(&user).unwrap();
        assert!(value.get("passwordHash").is_none());
        assert_eq!(value["role"], "agent");
    }

    #[test]
    fn new_user_rejects_server_fields() {
        let ok = json!({ "username": "sara", "password": "long-enough" });
        let parsed: NewUser = serde_json::from_value(ok).unwrap();
        assert!(parsed.is_active);
        assert_eq!(parsed.role, UserRole::Client);

        let with_login = json!({ "username": "sara", "password": "long-enough", "lastLoginAt": null });
        assert!(serde_json::from_value::<NewUser>(with_login).is_err());
    }
}
