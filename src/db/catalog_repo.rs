// src/db/catalog_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::store::CatalogStore,
    models::catalog::{NewService, Service},
};

#[derive(Clone)]
pub struct CatalogRepository {
    pool: PgPool,
}

impl CatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogStore for CatalogRepository {
    async fn create_service(&self, new: &NewService) -> Result<Service, AppError> {
        let service = sqlx::query_as::<_, Service>(
            r#"
            INSERT INTO services (
                title, description, icon, category, featured, technologies,
                delivery_time, starting_price
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(&new.title)
        .bind(&new.description)
        .bind(&new.icon)
        .bind(&new.category)
        .bind(new.featured)
        .bind(&new.technologies)
        .bind(&new.delivery_time)
        .bind(&new.starting_price)
        .fetch_one(&self.pool)
        .await?;
        Ok(service)
    }

    async fn get_service(&self, id: Uuid) -> Result<Option<Service>, AppError> {
        let service = sqlx::query_as::<_, Service>("SELECT * FROM services WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(service)
    }

    async fn list_services(&self) -> Result<Vec<Service>, AppError> {
        let services = sqlx::query_as::<_, Service>("SELECT * FROM services ORDER BY created_at ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(services)
    }
}
