// src/wizard/submit.rs

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use thiserror::Error;

use crate::wizard::draft::PlanningDraft;

pub const PLANNING_ENDPOINT: &str = "/api/mobile-app-planning";

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("O envio só é possível na última etapa (atual: {current})")]
    NotAtFinalStep { current: usize },

    #[error("Etapas incompletas: {steps:?}")]
    Incomplete { steps: Vec<u8> },

    // Qualquer status fora de 2xx é tratado do mesmo jeito
    #[error("Endpoint recusou o envio com status {status}")]
    Rejected { status: u16, body: String },

    #[error("Falha de transporte: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Falha ao serializar o rascunho: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Operação de envio externa. Atômica do ponto de vista do assistente.
#[async_trait]
pub trait PlanningSubmitter<D: Sync>: Send + Sync {
    async fn submit(&self, draft: &D) -> Result<Value, SubmitError>;
}

/// Monta o formulário multipart do contrato de envio.
pub fn build_form(draft: &PlanningDraft) -> Result<Form, SubmitError> {
    let mut form = Form::new()
        .text("appType", draft.app_type.clone())
        .text("features", serde_json::to_string(&draft.features)?)
        .text("specializations", serde_json::to_string(&draft.specializations)?)
        .text("projectDetails", serde_json::to_string(&draft.project)?)
        .text("contactInfo", serde_json::to_string(&draft.contact)?);

    if !draft.platforms.is_empty() {
        form = form.text("platforms", serde_json::to_string(&draft.platforms)?);
    }

    for (index, file) in draft.files.iter().enumerate() {
        let part = Part::bytes(file.bytes.clone())
            .file_name(file.name.clone())
            .mime_str(&file.content_type)?;
        form = form.part(format!("file_{index}"), part);
    }
    Ok(form)
}

/// Envia via HTTP para `{base_url}/api/mobile-app-planning`.
#[derive(Clone)]
pub struct HttpSubmitter {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpSubmitter {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            endpoint: format!("{}{PLANNING_ENDPOINT}", base_url.trim_end_matches('/')),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl PlanningSubmitter<PlanningDraft> for HttpSubmitter {
    async fn submit(&self, draft: &PlanningDraft) -> Result<Value, SubmitError> {
        let form = build_form(draft)?;
        tracing::debug!(endpoint = %self.endpoint, files = draft.files.len(), "Enviando planejamento");

        let response = self.client.post(&self.endpoint).multipart(form).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SubmitError::Rejected {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json::<Value>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::draft::FileHandle;

    #[test]
    fn endpoint_joins_without_double_slash() {
        let submitter = HttpSubmitter::new("http://localhost:5000/");
        assert_eq!(submitter.endpoint(), "http://localhost:5000/api/mobile-app-planning");
    }

    #[test]
    fn invalid_mime_type_is_a_transport_error() {
        let mut draft = PlanningDraft::default();
        draft.add_file(FileHandle::new("x.bin", "not a mime", vec![0]));
        assert!(matches!(build_form(&draft), Err(SubmitError::Transport(_))));
    }

    #[test]
    fn form_builds_with_file_parts() {
        let mut draft = PlanningDraft::default();
        draft.app_type = "fintech".into();
        draft.add_file(FileHandle::new("brief.pdf", "application/pdf", b"%PDF".to_vec()));
        let form = build_form(&draft).unwrap();
        assert!(!form.boundary().is_empty());
    }

    mod against_router {
        use super::*;
        use crate::{
            app,
            common::i18n::Language,
            config::{AppState, Config},
            wizard::{
                context::{NoticeKind, UiContext},
                engine::{ResetPolicy, Wizard},
                steps::mobile_app_steps,
            },
        };
        use tokio::net::TcpListener;

        async fn serve() -> (String, std::path::PathBuf) {
            let upload_dir = std::env::temp_dir().join(format!("agency-submit-{}", uuid::Uuid::new_v4()));
            let config = Config {
                upload_dir: upload_dir.clone(),
                ..Config::default()
            };
            let router = app::router(AppState::in_memory(&config));
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            tokio::spawn(async move { axum::serve(listener, router).await });
            (format!("http://{addr}"), upload_dir)
        }

        #[tokio::test]
        async fn wizard_submits_multipart_and_resets() {
            let (base_url, upload_dir) = serve().await;
            let submitter = HttpSubmitter::new(&base_url);
            let mut ctx = UiContext::new(Language::English);

            let mut wizard = Wizard::new(mobile_app_steps(), ResetPolicy::ResetToStart);
            wizard.update(|d| {
                d.app_type = "health".into();
                d.platforms.toggle("android");
                d.features.toggle("video-calls");
                d.project.app_name = "Tabib".into();
                d.project.app_description = "Remote clinic".into();
                d.contact.name = "Omar".into();
                d.contact.email = "omar@example.com".into();
                d.add_file(FileHandle::new("brief.txt", "text/plain", b"hello".to_vec()));
            });
            while wizard.advance() {}

            let receipt = wizard.submit(&submitter, &mut ctx).await.unwrap();
            assert_eq!(receipt["success"], true);
            assert_eq!(receipt["variant"], "mobile-app");
            assert_eq!(receipt["files"][0]["name"], "brief.txt");
            assert_eq!(receipt["files"][0]["size"], 5);

            assert_eq!(wizard.current_step(), 1);
            assert_eq!(wizard.draft(), &PlanningDraft::default());
            let notice = ctx.notices().back().unwrap();
            assert_eq!(notice.kind, NoticeKind::Success);
            assert_eq!(notice.title_in(ctx.language()), "Request submitted successfully");

            tokio::fs::remove_dir_all(&upload_dir).await.ok();
        }

        #[tokio::test]
        async fn incomplete_payload_is_rejected_by_the_server() {
            let (base_url, _) = serve().await;
            let submitter = HttpSubmitter::new(&base_url);

            let mut draft = PlanningDraft::default();
            draft.app_type = "media".into();
            let err = submitter.submit(&draft).await.unwrap_err();
            match err {
                SubmitError::Rejected { status, body } => {
                    assert_eq!(status, 400);
                    assert!(body.contains("incompleteSteps"));
                }
                other => panic!("esperava Rejected, veio {other:?}"),
            }
        }

        #[tokio::test]
        async fn unreachable_endpoint_is_a_transport_error() {
            // Porta reservada e fechada
            let submitter = HttpSubmitter::new("http://127.0.0.1:1");
            let err = submitter.submit(&PlanningDraft::default()).await.unwrap_err();
            assert!(matches!(err, SubmitError::Transport(_)));
        }
    }
}
