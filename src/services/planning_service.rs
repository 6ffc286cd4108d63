// src/services/planning_service.rs

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    models::crm::{LeadSource, NewLead},
    services::crm_service::CrmService,
    wizard::{
        draft::{FileHandle, PlanningDraft},
        engine::{StepDefinition, submission_gaps},
        steps::{mobile_app_steps, specialization_steps},
    },
};

/// Qual tabela de etapas valida o envio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum PlanningVariant {
    MobileApp,
    Specialization,
}

impl PlanningVariant {
    pub fn steps(self) -> Vec<StepDefinition<PlanningDraft>> {
        match self {
            PlanningVariant::MobileApp => mobile_app_steps(),
            PlanningVariant::Specialization => specialization_steps(),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoredFile {
    pub field: String,
    pub name: String,
    pub size: u64,
    pub content_type: String,
    pub path: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlanningReceipt {
    pub success: bool,
    pub submission_id: Uuid,
    pub lead_id: Uuid,
    pub variant: PlanningVariant,
    pub files: Vec<StoredFile>,
}

#[derive(Clone)]
pub struct PlanningService {
    crm: CrmService,
    upload_dir: PathBuf,
}

impl PlanningService {
    pub fn new(crm: CrmService, upload_dir: PathBuf) -> Self {
        Self { crm, upload_dir }
    }

    /// Recebe um planejamento: confere as etapas, guarda os arquivos e abre um lead.
    pub async fn submit(&self, variant: PlanningVariant, draft: PlanningDraft) -> Result<PlanningReceipt, AppError> {
        let gaps = submission_gaps(&variant.steps(), &draft);
        if !gaps.is_empty() {
            tracing::debug!(?variant, ?gaps, "Planejamento recusado: etapas incompletas");
            return Err(AppError::PlanningIncomplete(gaps));
        }

        let lead = lead_from_draft(variant, &draft, &[]);
        lead.validate()?;

        // Arquivos e lead entram juntos: qualquer falha apaga o diretório do envio
        let submission_id = Uuid::new_v4();
        let files = match self.store_files(submission_id, &draft.files).await {
            Ok(files) => files,
            Err(e) => {
                self.discard_files(submission_id).await;
                return Err(e);
            }
        };

        let lead = match self.crm.create_lead(None, lead_from_draft(variant, &draft, &files)).await {
            Ok(lead) => lead,
            Err(e) => {
                self.discard_files(submission_id).await;
                return Err(e);
            }
        };

        tracing::info!(
            %submission_id,
            lead_id = %lead.id,
            app_type = %draft.app_type,
            files = files.len(),
            "Planejamento recebido"
        );

        Ok(PlanningReceipt {
            success: true,
            submission_id,
            lead_id: lead.id,
            variant,
            files,
        })
    }

    fn submission_dir(&self, submission_id: Uuid) -> PathBuf {
        self.upload_dir.join(submission_id.to_string())
    }

    async fn discard_files(&self, submission_id: Uuid) {
        let dir = self.submission_dir(submission_id);
        match tokio::fs::remove_dir_all(&dir).await {
            Ok(()) => tracing::warn!(%submission_id, "Envio desfeito; arquivos removidos"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::error!(%submission_id, "Falha ao remover {}: {e}", dir.display()),
        }
    }

    async fn store_files(&self, submission_id: Uuid, files: &[FileHandle]) -> Result<Vec<StoredFile>, AppError> {
        if files.is_empty() {
            return Ok(Vec::new());
        }

        let dir = self.submission_dir(submission_id);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| anyhow::anyhow!("Falha ao criar {}: {e}", dir.display()))?;

        let mut stored = Vec::with_capacity(files.len());
        for (index, file) in files.iter().enumerate() {
            let path = dir.join(format!("{index}-{}", safe_file_name(&file.name)));
            tokio::fs::write(&path, &file.bytes)
                .await
                .map_err(|e| anyhow::anyhow!("Falha ao gravar {}: {e}", path.display()))?;

            stored.push(StoredFile {
                field: format!("file_{index}"),
                name: file.name.clone(),
                size: file.size,
                content_type: file.content_type.clone(),
                path: path.to_string_lossy().into_owned(),
            });
        }
        Ok(stored)
    }
}

// Só o último componente; nada de `../`
fn safe_file_name(name: &str) -> String {
    Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty() && *n != "..")
        .unwrap_or("file")
        .to_string()
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

fn lead_from_draft(variant: PlanningVariant, draft: &PlanningDraft, files: &[StoredFile]) -> NewLead {
    NewLead {
        name: draft.contact.name.clone(),
        email: non_empty(&draft.contact.email),
        phone: non_empty(&draft.contact.phone),
        company: non_empty(&draft.contact.company),
        job_title: None,
        lead_source: LeadSource::Website,
        status: Default::default(),
        rating: Default::default(),
        estimated_value: None,
        expected_close_date: None,
        assigned_to: None,
        notes: non_empty(&draft.project.app_description),
        tags: vec!["mobile-app".to_string(), draft.app_type.clone()],
        custom_fields: json!({
            "planning": {
                "variant": variant,
                "appType": draft.app_type,
                "platforms": draft.platforms,
                "features": draft.features,
                "specializations": draft.specializations,
                "projectDetails": draft.project,
                "files": files,
            }
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::{store::CrmStore, MemoryStore},
        models::crm::{
            Account, Contact, CrmActivity, DealStage, Lead, LeadStatus, NewAccount, NewContact,
            NewCrmActivity, NewDealStage, NewOpportunity, NewTask, Opportunity, OpportunityStage,
            Task,
        },
        services::audit_service::AuditService,
    };
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use std::sync::Arc;

    fn service(dir: &Path) -> (PlanningService, CrmService) {
        let store = Arc::new(MemoryStore::new());
        let crm = CrmService::new(store.clone(), AuditService::new(store));
        (PlanningService::new(crm.clone(), dir.to_path_buf()), crm)
    }

    fn temp_dir(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("agency-uploads-{tag}-{}", Uuid::new_v4()))
    }

    fn complete_draft() -> PlanningDraft {
        let mut draft = PlanningDraft::default();
        draft.app_type = "ecommerce".into();
        draft.platforms.toggle("ios");
        draft.features.toggle("payments");
        draft.project.app_name = "Souq".into();
        draft.project.app_description = "Marketplace for local shops".into();
        draft.contact.name = "Huda".into();
        draft.contact.email = "huda@example.com".into();
        draft.contact.company = "Souq Ltd".into();
        draft
    }

    #[tokio::test]
    async fn incomplete_drafts_are_rejected_with_their_steps() {
        let dir = temp_dir("gaps");
        let (service, _) = service(&dir);
        let mut draft = complete_draft();
        draft.features = Default::default();

        let err = service.submit(PlanningVariant::MobileApp, draft).await.unwrap_err();
        assert!(matches!(err, AppError::PlanningIncomplete(ref steps) if steps == &[3]));
    }

    #[tokio::test]
    async fn accepted_submission_becomes_a_website_lead() {
        let dir = temp_dir("lead");
        let (service, crm) = service(&dir);
        let mut draft = complete_draft();
        draft.add_file(FileHandle::new("../../etc/brief.pdf", "application/pdf", b"%PDF-1.4".to_vec()));

        let receipt = service.submit(PlanningVariant::MobileApp, draft).await.unwrap();
        assert_eq!(receipt.files.len(), 1);
        assert!(receipt.files[0].path.ends_with("0-brief.pdf"));
        let written = tokio::fs::read(&receipt.files[0].path).await.unwrap();
        assert_eq!(written, b"%PDF-1.4");

        let lead = crm.get_lead(receipt.lead_id).await.unwrap();
        assert_eq!(lead.lead_source, LeadSource::Website);
        assert_eq!(lead.tags, ["mobile-app", "ecommerce"]);
        assert_eq!(lead.company.as_deref(), Some("Souq Ltd"));
        assert_eq!(lead.notes.as_deref(), Some("Marketplace for local shops"));
        assert_eq!(lead.custom_fields["planning"]["platforms"], json!(["ios"]));

        tokio::fs::remove_dir_all(&dir).await.ok();
    }

    #[tokio::test]
    async fn invalid_contact_email_fails_validation() {
        let dir = temp_dir("email");
        let (service, _) = service(&dir);
        let mut draft = complete_draft();
        draft.contact.email = "not-an-email".into();

        let err = service.submit(PlanningVariant::MobileApp, draft).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    // Leads sempre falham; o resto delega para a memória
    struct LeadsDown(MemoryStore);

    #[async_trait]
    impl CrmStore for LeadsDown {
        async fn create_lead(&self, _: &NewLead) -> Result<Lead, AppError> {
            Err(anyhow::anyhow!("connection reset").into())
        }
        async fn get_lead(&self, id: Uuid) -> Result<Option<Lead>, AppError> {
            self.0.get_lead(id).await
        }
        async fn list_leads(&self) -> Result<Vec<Lead>, AppError> {
            self.0.list_leads().await
        }
        async fn update_lead_status(&self, id: Uuid, status: LeadStatus) -> Result<Lead, AppError> {
            self.0.update_lead_status(id, status).await
        }
        async fn create_account(&self, new: &NewAccount) -> Result<Account, AppError> {
            self.0.create_account(new).await
        }
        async fn get_account(&self, id: Uuid) -> Result<Option<Account>, AppError> {
            self.0.get_account(id).await
        }
        async fn list_accounts(&self) -> Result<Vec<Account>, AppError> {
            self.0.list_accounts().await
        }
        async fn set_account_parent(&self, id: Uuid, parent_id: Option<Uuid>) -> Result<Account, AppError> {
            self.0.set_account_parent(id, parent_id).await
        }
        async fn create_contact(&self, new: &NewContact) -> Result<Contact, AppError> {
            self.0.create_contact(new).await
        }
        async fn list_contacts(&self, account_id: Option<Uuid>) -> Result<Vec<Contact>, AppError> {
            self.0.list_contacts(account_id).await
        }
        async fn create_opportunity(&self, new: &NewOpportunity) -> Result<Opportunity, AppError> {
            self.0.create_opportunity(new).await
        }
        async fn get_opportunity(&self, id: Uuid) -> Result<Option<Opportunity>, AppError> {
            self.0.get_opportunity(id).await
        }
        async fn list_opportunities(&self) -> Result<Vec<Opportunity>, AppError> {
            self.0.list_opportunities().await
        }
        async fn update_opportunity_stage(
            &self,
            id: Uuid,
            stage: OpportunityStage,
            stage_id: Option<Uuid>,
            actual_close_date: Option<DateTime<Utc>>,
        ) -> Result<Opportunity, AppError> {
            self.0.update_opportunity_stage(id, stage, stage_id, actual_close_date).await
        }
        async fn create_task(&self, new: &NewTask) -> Result<Task, AppError> {
            self.0.create_task(new).await
        }
        async fn list_tasks(&self) -> Result<Vec<Task>, AppError> {
            self.0.list_tasks().await
        }
        async fn create_activity(&self, new: &NewCrmActivity) -> Result<CrmActivity, AppError> {
            self.0.create_activity(new).await
        }
        async fn list_activities(&self) -> Result<Vec<CrmActivity>, AppError> {
            self.0.list_activities().await
        }
        async fn create_deal_stage(&self, new: &NewDealStage) -> Result<DealStage, AppError> {
            self.0.create_deal_stage(new).await
        }
        async fn list_deal_stages(&self) -> Result<Vec<DealStage>, AppError> {
            self.0.list_deal_stages().await
        }
    }

    #[tokio::test]
    async fn failed_lead_leaves_no_files_behind() {
        let dir = temp_dir("rollback");
        let store = Arc::new(MemoryStore::new());
        let crm = CrmService::new(Arc::new(LeadsDown(MemoryStore::new())), AuditService::new(store));
        let service = PlanningService::new(crm, dir.clone());

        let mut draft = complete_draft();
        draft.add_file(FileHandle::new("brief.pdf", "application/pdf", b"%PDF".to_vec()));

        let err = service.submit(PlanningVariant::MobileApp, draft).await.unwrap_err();
        assert!(matches!(err, AppError::InternalServerError(_)));

        // O diretório base pode existir, mas nenhum envio ficou nele
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(_) => return,
        };
        assert!(entries.next_entry().await.unwrap().is_none());
        tokio::fs::remove_dir_all(&dir).await.ok();
    }

    #[test]
    fn file_names_lose_their_directories() {
        assert_eq!(safe_file_name("a/b/c.png"), "c.png");
        assert_eq!(safe_file_name(".."), "file");
        assert_eq!(safe_file_name(""), "file");
    }
}
