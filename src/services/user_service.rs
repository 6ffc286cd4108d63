// src/services/user_service.rs

use std::sync::Arc;

use bcrypt::hash;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::store::UserStore,
    models::auth::{NewUser, User},
};

#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    pub async fn create_user(&self, new: NewUser) -> Result<User, AppError> {
        // Evita o custo do bcrypt para um nome já usado; a constraint continua valendo
        if self.store.find_by_username(&new.username).await?.is_some() {
            return Err(AppError::UniqueConstraintViolation(format!("username '{}'", new.username)));
        }

        // Hashing fora do runtime assíncrono
        let password = new.password.clone();
        let password_hash = tokio::task::spawn_blocking(move || hash(&password, bcrypt::DEFAULT_COST))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        let user = self.store.create_user(&new, &password_hash).await?;
        tracing::info!(user_id = %user.id, role = ?user.role, "Usuário criado");
        Ok(user)
    }

    pub async fn get_user(&self, id: Uuid) -> Result<User, AppError> {
        self.store
            .get_user(id)
            .await?
            .ok_or_else(|| AppError::not_found("user", id))
    }

    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        self.store.list_users().await
    }

    /// Registra um login informado pela camada de autenticação externa.
    pub async fn record_login(&self, id: Uuid) -> Result<User, AppError> {
        self.store.touch_last_login(id).await
    }
}
