// src/wizard/context.rs

use std::collections::VecDeque;

use serde::Serialize;

use crate::common::i18n::{Direction, Language, Localized};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Success,
    Error,
}

/// Aviso efêmero (toast) mostrado depois de uma ação.
#[derive(Debug, Clone, Serialize)]
pub struct Notice {
    pub id: u64,
    pub kind: NoticeKind,
    pub title: Localized,
    pub description: Localized,
}

impl Notice {
    pub fn title_in(&self, lang: Language) -> &'static str {
        self.title.get(lang)
    }

    pub fn description_in(&self, lang: Language) -> &'static str {
        self.description.get(lang)
    }
}

/// Contexto da interface passado explicitamente: idioma atual e fila de avisos.
#[derive(Debug, Default)]
pub struct UiContext {
    language: Language,
    notices: VecDeque<Notice>,
    next_id: u64,
}

impl UiContext {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            ..Self::default()
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn direction(&self) -> Direction {
        self.language.direction()
    }

    pub fn switch_language(&mut self, language: Language) {
        self.language = language;
    }

    pub fn push(&mut self, kind: NoticeKind, title: Localized, description: Localized) -> u64 {
        self.next_id += 1;
        self.notices.push_back(Notice {
            id: self.next_id,
            kind,
            title,
            description,
        });
        self.next_id
    }

    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.notices.len();
        self.notices.retain(|n| n.id != id);
        self.notices.len() != before
    }

    pub fn notices(&self) -> &VecDeque<Notice> {
        &self.notices
    }
}
