// src/db/inquiry_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::store::InquiryStore,
    models::inquiry::{ContactSubmission, NewContactSubmission},
};

#[derive(Clone)]
pub struct InquiryRepository {
    pool: PgPool,
}

impl InquiryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InquiryStore for InquiryRepository {
    async fn create_contact_submission(&self, new: &NewContactSubmission) -> Result<ContactSubmission, AppError> {
        let submission = sqlx::query_as::<_, ContactSubmission>(
            r#"
            INSERT INTO contact_submissions (name, email, phone, service, service_application, message)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&new.name)
        .bind(&new.email)
        .bind(&new.phone)
        .bind(&new.service)
        .bind(&new.service_application)
        .bind(&new.message)
        .fetch_one(&self.pool)
        .await?;
        Ok(submission)
    }

    async fn list_contact_submissions(&self) -> Result<Vec<ContactSubmission>, AppError> {
        let submissions = sqlx::query_as::<_, ContactSubmission>(
            "SELECT * FROM contact_submissions ORDER BY created_at ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(submissions)
    }
}
