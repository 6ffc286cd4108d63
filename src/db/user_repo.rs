// src/db/user_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::{map_unique_violation, AppError},
    db::store::UserStore,
    models::auth::{NewUser, User},
};

// O repositório de usuários, responsável por todas as interações com a tabela 'users'
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    // Cria um novo usuário, convertendo username duplicado em conflito
    async fn create_user(&self, new: &NewUser, password_hash: &str) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (
                username, password_hash, force_password_change, role,
                name, email, phone, department, position, avatar, is_active
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(&new.username)
        .bind(password_hash)
        .bind(new.force_password_change)
        .bind(new.role)
        .bind(&new.name)
        .bind(&new.email)
        .bind(&new.phone)
        .bind(&new.department)
        .bind(&new.position)
        .bind(&new.avatar)
        .bind(new.is_active)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || format!("username '{}'", new.username)))
    }

    // Busca um usuário pelo seu ID
    async fn get_user(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn list_users(&self) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY created_at ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    async fn touch_last_login(&self, id: Uuid) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET last_login_at = NOW(), updated_at = GREATEST(NOW(), updated_at)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::not_found("user", id))
    }
}
