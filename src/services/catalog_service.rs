// src/services/catalog_service.rs

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    catalog::{self, CatalogEntry, CategoryFilter, CategoryOption},
    common::error::AppError,
    db::store::CatalogStore,
    models::catalog::{NewService, Service},
};

#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn CatalogStore>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    // --- Serviços (persistidos) ---

    pub async fn create_service(&self, new: NewService) -> Result<Service, AppError> {
        let service = self.store.create_service(&new).await?;
        tracing::info!(service_id = %service.id, category = %service.category, "Serviço publicado");
        Ok(service)
    }

    pub async fn get_service(&self, id: Uuid) -> Result<Service, AppError> {
        self.store.get_service(id).await?.ok_or_else(|| AppError::not_found("service", id))
    }

    pub async fn list_services(&self) -> Result<Vec<Service>, AppError> {
        self.store.list_services().await
    }

    // --- Catálogo de apps (estático) ---

    pub fn categories(&self) -> &'static [CategoryOption] {
        catalog::CATEGORIES
    }

    pub fn list_apps(&self, category: Option<&str>) -> Vec<&'static CatalogEntry> {
        let selected = category.map(CategoryFilter::parse).unwrap_or_default();
        catalog::filter(catalog::ENTRIES, &selected)
    }

    /// Fragmento desconhecido não é erro: só não há o que abrir.
    pub fn resolve_fragment(&self, fragment: &str) -> Option<&'static CatalogEntry> {
        catalog::resolve(fragment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;

    #[tokio::test]
    async fn seeded_services_are_listed_and_fetched() {
        let service = CatalogService::new(Arc::new(MemoryStore::seeded()));
        let services = service.list_services().await.unwrap();
        assert!(!services.is_empty());

        let first = service.get_service(services[0].id).await.unwrap();
        assert_eq!(first.title, services[0].title);
        assert!(matches!(
            service.get_service(Uuid::new_v4()).await,
            Err(AppError::ResourceNotFound(_))
        ));
    }

    #[test]
    fn apps_default_to_the_full_list() {
        let service = CatalogService::new(Arc::new(MemoryStore::new()));
        assert_eq!(service.list_apps(None).len(), catalog::ENTRIES.len());
        assert_eq!(service.list_apps(Some("media")).len(), 2);
        assert_eq!(service.resolve_fragment("#details-ec2").map(|e| e.id), Some("ec2"));
    }
}
