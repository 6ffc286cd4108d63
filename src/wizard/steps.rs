// src/wizard/steps.rs

use crate::{
    common::i18n::Localized,
    wizard::{
        draft::PlanningDraft,
        engine::{Completion, StepDefinition},
    },
};

fn has_app_type(d: &PlanningDraft) -> bool {
    !d.app_type.is_empty()
}

fn has_platforms(d: &PlanningDraft) -> bool {
    !d.platforms.is_empty()
}

fn has_features(d: &PlanningDraft) -> bool {
    !d.features.is_empty()
}

fn has_specializations(d: &PlanningDraft) -> bool {
    !d.specializations.is_empty()
}

fn has_project_basics(d: &PlanningDraft) -> bool {
    !d.project.app_name.is_empty() && !d.project.app_description.is_empty()
}

fn has_contact(d: &PlanningDraft) -> bool {
    !d.contact.name.is_empty() && !d.contact.email.is_empty()
}

fn has_project_and_contact(d: &PlanningDraft) -> bool {
    has_project_basics(d) && has_contact(d)
}

fn always_ready(_: &PlanningDraft) -> bool {
    true
}

/// Planejamento de app móvel: tipo, plataformas, recursos, detalhes
/// (projeto e contato juntos), arquivos e revisão.
pub fn mobile_app_steps() -> Vec<StepDefinition<PlanningDraft>> {
    vec![
        StepDefinition {
            key: "app-type",
            title: Localized::new("نوع التطبيق", "App Type"),
            fields: &["appType"],
            completion: Completion::Predicate(has_app_type),
        },
        StepDefinition {
            key: "platforms",
            title: Localized::new("المنصات", "Platforms"),
            fields: &["platforms"],
            completion: Completion::Predicate(has_platforms),
        },
        StepDefinition {
            key: "features",
            title: Localized::new("الميزات", "Features"),
            fields: &["features"],
            completion: Completion::Predicate(has_features),
        },
        StepDefinition {
            key: "details",
            title: Localized::new("تفاصيل المشروع", "Project Details"),
            fields: &["projectDetails.appName", "projectDetails.appDescription", "contactInfo.name", "contactInfo.email"],
            completion: Completion::Predicate(has_project_and_contact),
        },
        StepDefinition {
            key: "files",
            title: Localized::new("الملفات", "Files"),
            fields: &["files"],
            completion: Completion::Always,
        },
        StepDefinition {
            key: "review",
            title: Localized::new("المراجعة والإرسال", "Review & Submit"),
            fields: &[],
            completion: Completion::AfterSubmit { ready: always_ready },
        },
    ]
}

/// Variante com especializações; o contato fica na última etapa.
pub fn specialization_steps() -> Vec<StepDefinition<PlanningDraft>> {
    vec![
        StepDefinition {
            key: "app-type",
            title: Localized::new("نوع التطبيق", "App Type"),
            fields: &["appType"],
            completion: Completion::Predicate(has_app_type),
        },
        StepDefinition {
            key: "features",
            title: Localized::new("الميزات", "Features"),
            fields: &["features"],
            completion: Completion::Predicate(has_features),
        },
        StepDefinition {
            key: "specializations",
            title: Localized::new("التخصصات", "Specializations"),
            fields: &["specializations"],
            completion: Completion::Predicate(has_specializations),
        },
        StepDefinition {
            key: "details",
            title: Localized::new("تفاصيل المشروع", "Project Details"),
            fields: &["projectDetails.appName", "projectDetails.appDescription"],
            completion: Completion::Predicate(has_project_basics),
        },
        StepDefinition {
            key: "files",
            title: Localized::new("الملفات", "Files"),
            fields: &["files"],
            completion: Completion::Always,
        },
        StepDefinition {
            key: "contact",
            title: Localized::new("معلومات التواصل", "Contact Info"),
            fields: &["contactInfo.name", "contactInfo.email"],
            completion: Completion::AfterSubmit { ready: has_contact },
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::engine::submission_gaps;

    #[test]
    fn both_flows_have_six_steps() {
        assert_eq!(mobile_app_steps().len(), 6);
        assert_eq!(specialization_steps().len(), 6);
    }

    #[test]
    fn gaps_list_every_incomplete_step() {
        let empty = PlanningDraft::default();
        assert_eq!(submission_gaps(&mobile_app_steps(), &empty), [1, 2, 3, 4]);
        assert_eq!(submission_gaps(&specialization_steps(), &empty), [1, 2, 3, 4, 6]);

        let mut draft = PlanningDraft::default();
        draft.app_type = "education".into();
        draft.features.toggle("video");
        draft.specializations.toggle("k12");
        draft.project.app_name = "Madrasa".into();
        draft.project.app_description = "Virtual school".into();
        assert_eq!(submission_gaps(&specialization_steps(), &draft), [6]);
        // A variante móvel também exige plataformas e contato na etapa 4
        assert_eq!(submission_gaps(&mobile_app_steps(), &draft), [2, 4]);
    }
}
