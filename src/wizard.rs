// src/wizard.rs

//! Assistente de planejamento em seis etapas. O motor é genérico sobre o
//! rascunho; as tabelas de etapas de cada variante ficam em `steps`.

pub mod context;
pub mod draft;
pub mod engine;
pub mod steps;
pub mod submit;

pub use context::{Notice, NoticeKind, UiContext};
pub use draft::{ContactInfo, FileHandle, PlanningDraft, ProjectDetails, SelectionSet};
pub use engine::{Completion, ResetPolicy, StepDefinition, Wizard, submission_gaps};
pub use submit::{HttpSubmitter, PlanningSubmitter, SubmitError};
