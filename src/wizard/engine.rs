// src/wizard/engine.rs

use serde_json::Value;

use crate::{
    common::i18n::Localized,
    wizard::{
        context::{NoticeKind, UiContext},
        submit::{PlanningSubmitter, SubmitError},
    },
};

/// Quando uma etapa conta como concluída.
pub enum Completion<D> {
    Predicate(fn(&D) -> bool),
    Always,
    /// Só conclui depois de um envio aceito; `ready` libera o envio.
    AfterSubmit { ready: fn(&D) -> bool },
}

// Manual: `derive` exigiria `D: Clone`
impl<D> Clone for Completion<D> {
    fn clone(&self) -> Self {
        match self {
            Completion::Predicate(f) => Completion::Predicate(*f),
            Completion::Always => Completion::Always,
            Completion::AfterSubmit { ready } => Completion::AfterSubmit { ready: *ready },
        }
    }
}

/// Uma linha da tabela declarativa de etapas.
pub struct StepDefinition<D> {
    pub key: &'static str,
    pub title: Localized,
    pub fields: &'static [&'static str],
    pub completion: Completion<D>,
}

impl<D> Clone for StepDefinition<D> {
    fn clone(&self) -> Self {
        Self {
            key: self.key,
            title: self.title,
            fields: self.fields,
            completion: self.completion.clone(),
        }
    }
}

/// O que acontece com o rascunho depois de um envio aceito.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResetPolicy {
    #[default]
    ResetToStart,
    KeepDraft,
}

/// Etapas (numeradas a partir de 1) que ainda impedem o envio.
pub fn submission_gaps<D>(steps: &[StepDefinition<D>], draft: &D) -> Vec<u8> {
    steps
        .iter()
        .enumerate()
        .filter(|(_, step)| match &step.completion {
            Completion::Predicate(done) => !done(draft),
            Completion::Always => false,
            Completion::AfterSubmit { ready } => !ready(draft),
        })
        .map(|(index, _)| (index + 1) as u8)
        .collect()
}

/// Máquina de estados linear sobre uma tabela de etapas.
pub struct Wizard<D> {
    steps: Vec<StepDefinition<D>>,
    current: usize,
    draft: D,
    submitted: bool,
    policy: ResetPolicy,
}

impl<D: Default> Wizard<D> {
    pub fn new(steps: Vec<StepDefinition<D>>, policy: ResetPolicy) -> Self {
        debug_assert!(!steps.is_empty(), "um assistente precisa de ao menos uma etapa");
        Self {
            steps,
            current: 1,
            draft: D::default(),
            submitted: false,
            policy,
        }
    }
}

impl<D> Wizard<D> {
    pub fn current_step(&self) -> usize {
        self.current
    }

    pub fn total_steps(&self) -> usize {
        self.steps.len()
    }

    pub fn steps(&self) -> &[StepDefinition<D>] {
        &self.steps
    }

    pub fn draft(&self) -> &D {
        &self.draft
    }

    /// Qualquer mutação do rascunho passa por aqui.
    pub fn update(&mut self, edit: impl FnOnce(&mut D)) {
        edit(&mut self.draft);
        self.submitted = false;
    }

    pub fn is_step_complete(&self, step: usize) -> bool {
        let Some(definition) = step.checked_sub(1).and_then(|i| self.steps.get(i)) else {
            return false;
        };
        match &definition.completion {
            Completion::Predicate(done) => done(&self.draft),
            Completion::Always => true,
            Completion::AfterSubmit { .. } => self.submitted,
        }
    }

    /// A etapa atual está concluída e existe uma próxima.
    pub fn can_advance(&self) -> bool {
        self.current < self.steps.len() && self.is_step_complete(self.current)
    }

    /// Sem efeito (retorna `false`) quando bloqueado.
    pub fn advance(&mut self) -> bool {
        if !self.can_advance() {
            return false;
        }
        self.current += 1;
        true
    }

    pub fn retreat(&mut self) -> bool {
        if self.current <= 1 {
            return false;
        }
        self.current -= 1;
        true
    }

    /// Para trás sempre; para frente só a próxima etapa e se ela estiver liberada.
    pub fn jump_to(&mut self, target: usize) -> bool {
        if target == 0 || target > self.steps.len() {
            return false;
        }
        if target <= self.current || (target == self.current + 1 && self.can_advance()) {
            self.current = target;
            return true;
        }
        false
    }

    /// Recalculado a cada chamada; desmarcar algo pode reduzir o valor.
    pub fn progress_percent(&self) -> f64 {
        if self.steps.is_empty() {
            return 0.0;
        }
        let done = (1..=self.steps.len()).filter(|&s| self.is_step_complete(s)).count();
        done as f64 / self.steps.len() as f64 * 100.0
    }

    pub fn can_submit(&self) -> bool {
        self.current == self.steps.len() && submission_gaps(&self.steps, &self.draft).is_empty()
    }
}

impl<D: Default + Sync> Wizard<D> {
    /// Envia o rascunho. Em caso de falha nada muda além do aviso de erro,
    /// e o usuário pode tentar de novo.
    pub async fn submit<S>(&mut self, submitter: &S, ctx: &mut UiContext) -> Result<Value, SubmitError>
    where
        S: PlanningSubmitter<D> + ?Sized,
    {
        if self.current != self.steps.len() {
            return Err(SubmitError::NotAtFinalStep { current: self.current });
        }
        let gaps = submission_gaps(&self.steps, &self.draft);
        if !gaps.is_empty() {
            return Err(SubmitError::Incomplete { steps: gaps });
        }

        match submitter.submit(&self.draft).await {
            Ok(receipt) => {
                match self.policy {
                    ResetPolicy::ResetToStart => {
                        self.draft = D::default();
                        self.current = 1;
                        self.submitted = false;
                    }
                    ResetPolicy::KeepDraft => self.submitted = true,
                }
                ctx.push(NoticeKind::Success, SUBMIT_SUCCESS_TITLE, SUBMIT_SUCCESS_BODY);
                Ok(receipt)
            }
            Err(e) => {
                tracing::warn!("Envio do planejamento falhou: {e}");
                ctx.push(NoticeKind::Error, SUBMIT_ERROR_TITLE, SUBMIT_ERROR_BODY);
                Err(e)
            }
        }
    }
}

const SUBMIT_SUCCESS_TITLE: Localized = Localized::new("تم إرسال الطلب بنجاح", "Request submitted successfully");
const SUBMIT_SUCCESS_BODY: Localized = Localized::new("سيتم التواصل معك قريباً", "We will contact you soon");
const SUBMIT_ERROR_TITLE: Localized = Localized::new("خطأ في إرسال الطلب", "Error submitting request");
const SUBMIT_ERROR_BODY: Localized = Localized::new(
    "حدث خطأ، يرجى المحاولة مرة أخرى",
    "An error occurred, please try again",
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        common::i18n::Language,
        wizard::{
            draft::{FileHandle, PlanningDraft},
            steps::{mobile_app_steps, specialization_steps},
        },
    };
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn mobile() -> Wizard<PlanningDraft> {
        Wizard::new(mobile_app_steps(), ResetPolicy::ResetToStart)
    }

    fn fill_all(draft: &mut PlanningDraft) {
        draft.app_type = "ecommerce".into();
        draft.platforms.toggle("ios");
        draft.features.toggle("payments");
        draft.project.app_name = "Souq".into();
        draft.project.app_description = "Marketplace".into();
        draft.contact.name = "Huda".into();
        draft.contact.email = "huda@example.com".into();
    }

    // Avança até a última etapa (o rascunho precisa estar completo)
    fn walk_to_end(wizard: &mut Wizard<PlanningDraft>) {
        while wizard.advance() {}
        assert_eq!(wizard.current_step(), wizard.total_steps());
    }

    struct Scripted {
        status: Option<u16>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl PlanningSubmitter<PlanningDraft> for Scripted {
        async fn submit(&self, _draft: &PlanningDraft) -> Result<Value, SubmitError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.status {
                None => Ok(json!({ "ok": true })),
                Some(status) => Err(SubmitError::Rejected { status, body: String::new() }),
            }
        }
    }

    #[test]
    fn step_predicates_follow_the_table() {
        let mut wizard = mobile();
        assert!(!wizard.is_step_complete(1));
        assert!(!wizard.is_step_complete(2));
        assert!(!wizard.is_step_complete(3));
        assert!(!wizard.is_step_complete(4));
        assert!(wizard.is_step_complete(5));
        assert!(!wizard.is_step_complete(6));

        // Qualquer texto não vazio conta, inclusive só espaços
        wizard.update(|d| d.app_type = " ".into());
        assert!(wizard.is_step_complete(1));
        wizard.update(|d| d.app_type.clear());
        assert!(!wizard.is_step_complete(1));

        wizard.update(|d| {
            d.platforms.toggle("android");
        });
        assert!(wizard.is_step_complete(2));

        wizard.update(|d| {
            d.features.toggle("chat");
        });
        assert!(wizard.is_step_complete(3));

        // Etapa 4 exige os quatro campos
        wizard.update(|d| {
            d.project.app_name = "Souq".into();
            d.project.app_description = "Marketplace".into();
            d.contact.name = "Huda".into();
        });
        assert!(!wizard.is_step_complete(4));
        wizard.update(|d| d.contact.email = "huda@example.com".into());
        assert!(wizard.is_step_complete(4));
    }

    #[test]
    fn advance_is_a_no_op_while_blocked() {
        let mut wizard = mobile();
        assert!(!wizard.can_advance());
        assert!(!wizard.advance());
        assert_eq!(wizard.current_step(), 1);

        wizard.update(|d| d.app_type = "health".into());
        assert!(wizard.advance());
        assert_eq!(wizard.current_step(), 2);

        assert!(wizard.retreat());
        assert!(!wizard.retreat());
        assert_eq!(wizard.current_step(), 1);
    }

    #[test]
    fn direct_jumps_cannot_skip_ahead() {
        let mut wizard = mobile();
        wizard.update(fill_all);
        assert!(wizard.advance());
        assert!(wizard.advance());
        assert_eq!(wizard.current_step(), 3);

        assert!(!wizard.jump_to(5), "s + 2 is never allowed");
        assert!(wizard.jump_to(4), "s + 1 is allowed when the step is complete");
        assert!(wizard.jump_to(1));
        assert!(wizard.jump_to(1), "jumping to the current step is accepted");
        assert!(!wizard.jump_to(0));
        assert!(!wizard.jump_to(7));

        // Etapa atual incompleta bloqueia s + 1
        wizard.update(|d| d.app_type.clear());
        assert!(!wizard.jump_to(2));
    }

    #[test]
    fn progress_is_recomputed_from_the_draft() {
        let mut wizard = mobile();
        // Só a etapa 5 (sempre concluída) conta no rascunho vazio
        assert!((wizard.progress_percent() - 100.0 / 6.0).abs() < 1e-9);

        wizard.update(fill_all);
        assert!((wizard.progress_percent() - 500.0 / 6.0).abs() < 1e-9);

        wizard.update(|d| {
            d.features.toggle("payments");
        });
        assert!((wizard.progress_percent() - 400.0 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn progress_without_the_always_step_starts_at_zero() {
        let wizard: Wizard<PlanningDraft> = Wizard::new(
            mobile_app_steps().into_iter().filter(|s| !matches!(s.completion, Completion::Always)).collect(),
            ResetPolicy::ResetToStart,
        );
        assert_eq!(wizard.progress_percent(), 0.0);
    }

    #[tokio::test]
    async fn failed_submit_leaves_the_draft_untouched() {
        let mut wizard = mobile();
        wizard.update(|d| {
            fill_all(d);
            d.add_file(FileHandle::new("brief.pdf", "application/pdf", vec![1, 2, 3]));
        });
        walk_to_end(&mut wizard);

        let before = wizard.draft().clone();
        let submitter = Scripted { status: Some(500), calls: AtomicUsize::new(0) };
        let mut ctx = UiContext::new(Language::English);

        let err = wizard.submit(&submitter, &mut ctx).await.unwrap_err();
        assert!(matches!(err, SubmitError::Rejected { status: 500, .. }));
        assert_eq!(wizard.draft(), &before);
        assert_eq!(wizard.current_step(), 6);
        assert!(!wizard.is_step_complete(6));
        assert_eq!(ctx.notices().back().map(|n| n.kind), Some(NoticeKind::Error));
    }

    #[tokio::test]
    async fn successful_submit_resets_to_start() {
        let mut wizard = mobile();
        wizard.update(fill_all);
        walk_to_end(&mut wizard);

        let submitter = Scripted { status: None, calls: AtomicUsize::new(0) };
        let mut ctx = UiContext::new(Language::Arabic);
        wizard.submit(&submitter, &mut ctx).await.unwrap();

        assert_eq!(wizard.current_step(), 1);
        assert_eq!(wizard.draft(), &PlanningDraft::default());
        assert_eq!(submitter.calls.load(Ordering::SeqCst), 1);
        assert_eq!(ctx.notices().back().map(|n| n.kind), Some(NoticeKind::Success));
    }

    #[tokio::test]
    async fn keep_draft_marks_the_final_step_complete() {
        let mut wizard = Wizard::new(mobile_app_steps(), ResetPolicy::KeepDraft);
        wizard.update(fill_all);
        walk_to_end(&mut wizard);

        let submitter = Scripted { status: None, calls: AtomicUsize::new(0) };
        wizard.submit(&submitter, &mut UiContext::default()).await.unwrap();

        assert_eq!(wizard.current_step(), 6);
        assert!(wizard.is_step_complete(6));
        assert_eq!(wizard.progress_percent(), 100.0);

        // Editar de novo reabre a última etapa
        wizard.update(|d| d.project.budget = "5000".into());
        assert!(!wizard.is_step_complete(6));
    }

    #[tokio::test]
    async fn submit_is_refused_before_the_last_step() {
        let mut wizard = mobile();
        wizard.update(fill_all);
        let submitter = Scripted { status: None, calls: AtomicUsize::new(0) };

        let err = wizard.submit(&submitter, &mut UiContext::default()).await.unwrap_err();
        assert!(matches!(err, SubmitError::NotAtFinalStep { current: 1 }));
        assert_eq!(submitter.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn specialization_flow_needs_contact_before_submit() {
        let mut wizard = Wizard::new(specialization_steps(), ResetPolicy::ResetToStart);
        wizard.update(|d| {
            d.app_type = "ecommerce".into();
            d.features.toggle("payments");
            d.specializations.toggle("retail");
            d.project.app_name = "Souq".into();
            d.project.app_description = "Marketplace".into();
        });
        while wizard.advance() {}
        assert_eq!(wizard.current_step(), 6);
        assert!(!wizard.can_submit());

        let submitter = Scripted { status: None, calls: AtomicUsize::new(0) };
        let err = wizard.submit(&submitter, &mut UiContext::default()).await.unwrap_err();
        assert!(matches!(err, SubmitError::Incomplete { ref steps } if steps == &[6]));

        wizard.update(|d| {
            d.contact.name = "Huda".into();
            d.contact.email = "huda@example.com".into();
        });
        assert!(wizard.can_submit());
        wizard.submit(&submitter, &mut UiContext::default()).await.unwrap();
    }
}
