// src/services/inquiry_service.rs

use std::sync::Arc;

use crate::{
    common::error::AppError,
    db::store::InquiryStore,
    models::inquiry::{ContactSubmission, NewContactSubmission},
};

// Formulário público: sem ator, sem auditoria
#[derive(Clone)]
pub struct InquiryService {
    store: Arc<dyn InquiryStore>,
}

impl InquiryService {
    pub fn new(store: Arc<dyn InquiryStore>) -> Self {
        Self { store }
    }

    pub async fn submit(&self, new: NewContactSubmission) -> Result<ContactSubmission, AppError> {
        let submission = self.store.create_contact_submission(&new).await?;
        tracing::info!(
            submission_id = %submission.id,
            service = submission.service.as_deref().unwrap_or("-"),
            "Mensagem de contato recebida"
        );
        Ok(submission)
    }

    pub async fn list(&self) -> Result<Vec<ContactSubmission>, AppError> {
        self.store.list_contact_submissions().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use serde_json::json;

    #[tokio::test]
    async fn submissions_are_listed_in_arrival_order() {
        let service = InquiryService::new(Arc::new(MemoryStore::new()));
        for name in ["Ali", "Huda"] {
            let new: NewContactSubmission = serde_json::from_value(json!({
                "name": name,
                "email": "hello@example.com",
                "message": "Quote please",
            }))
            .unwrap();
            service.submit(new).await.unwrap();
        }

        let names: Vec<_> = service.list().await.unwrap().into_iter().map(|s| s.name).collect();
        assert_eq!(names, ["Ali", "Huda"]);
    }
}
