// src/config.rs

use std::{env, path::PathBuf, sync::Arc, time::Duration};

use crate::{
    db::{self, StoreBackend, Stores},
    services::{
        audit_service::AuditService, billing_service::BillingService,
        catalog_service::CatalogService, crm_service::CrmService, inquiry_service::InquiryService,
        planning_service::PlanningService, support_service::SupportService,
        user_service::UserService,
    },
};

/// Configuração lida do ambiente (e do `.env`, se existir).
#[derive(Debug, Clone)]
pub struct Config {
    // Sem DATABASE_URL a aplicação usa o armazenamento em memória
    pub database_url: Option<String>,
    pub bind_addr: String,
    pub db_max_connections: u32,
    pub db_acquire_timeout: Duration,
    pub run_migrations: bool,
    pub upload_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: None,
            bind_addr: "0.0.0.0:3000".to_string(),
            db_max_connections: 5,
            db_acquire_timeout: Duration::from_secs(3),
            run_migrations: true,
            upload_dir: PathBuf::from("uploads"),
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let defaults = Config::default();

        let database_url = env::var("DATABASE_URL").ok().filter(|url| !url.trim().is_empty());

        let db_max_connections = match env::var("DB_MAX_CONNECTIONS") {
            Ok(raw) => raw.parse()?,
            Err(_) => defaults.db_max_connections,
        };

        let db_acquire_timeout = match env::var("DB_ACQUIRE_TIMEOUT_SECS") {
            Ok(raw) => Duration::from_secs(raw.parse()?),
            Err(_) => defaults.db_acquire_timeout,
        };

        let run_migrations = match env::var("RUN_MIGRATIONS") {
            Ok(raw) => parse_flag(&raw)?,
            Err(_) => defaults.run_migrations,
        };

        Ok(Self {
            database_url,
            bind_addr: env::var("BIND_ADDR").unwrap_or(defaults.bind_addr),
            db_max_connections,
            db_acquire_timeout,
            run_migrations,
            upload_dir: env::var("UPLOAD_DIR").map(PathBuf::from).unwrap_or(defaults.upload_dir),
        })
    }
}

fn parse_flag(raw: &str) -> anyhow::Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("valor booleano inválido: {other}"),
    }
}

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub backend: StoreBackend,
    pub audit_service: AuditService,
    pub user_service: UserService,
    pub crm_service: CrmService,
    pub support_service: SupportService,
    pub billing_service: BillingService,
    pub catalog_service: CatalogService,
    pub inquiry_service: InquiryService,
    pub planning_service: PlanningService,
}

impl AppState {
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        let stores = db::init_stores(config).await?;
        Ok(Self::from_stores(stores, config))
    }

    // --- Monta o gráfico de dependências ---
    pub fn from_stores(stores: Stores, config: &Config) -> Self {
        let audit_service = AuditService::new(stores.audit.clone());
        let user_service = UserService::new(stores.users.clone());
        let crm_service = CrmService::new(stores.crm.clone(), audit_service.clone());
        let support_service = SupportService::new(stores.support.clone(), audit_service.clone());
        let billing_service = BillingService::new(stores.billing.clone(), audit_service.clone());
        let catalog_service = CatalogService::new(stores.catalog.clone());
        let inquiry_service = InquiryService::new(stores.inquiries.clone());
        let planning_service = PlanningService::new(crm_service.clone(), config.upload_dir.clone());

        Self {
            backend: stores.backend,
            audit_service,
            user_service,
            crm_service,
            support_service,
            billing_service,
            catalog_service,
            inquiry_service,
            planning_service,
        }
    }

    /// Estado completo sobre o armazenamento em memória (usado pelos testes).
    pub fn in_memory(config: &Config) -> Self {
        Self::from_stores(Stores::in_memory(Arc::new(db::MemoryStore::seeded())), config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_accept_common_spellings() {
        assert!(parse_flag("TRUE").unwrap());
        assert!(!parse_flag("off").unwrap());
        assert!(parse_flag("maybe").is_err());
    }
}
