// src/wizard/draft.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Conjunto de ids selecionados. Selecionar de novo remove (toggle);
/// a ordem de inserção é mantida só para exibição.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct SelectionSet(Vec<String>);

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Devolve `true` se o id ficou selecionado.
    pub fn toggle(&mut self, id: &str) -> bool {
        if let Some(index) = self.0.iter().position(|s| s == id) {
            self.0.remove(index);
            false
        } else {
            self.0.push(id.to_string());
            true
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.iter().any(|s| s == id)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for SelectionSet {
    // Duplicatas na entrada colapsam em um único item
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = SelectionSet::new();
        for id in iter {
            let id = id.into();
            if !set.contains(&id) {
                set.0.push(id);
            }
        }
        set
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectDetails {
    pub app_name: String,
    pub app_description: String,
    pub target_audience: String,
    pub budget: String,
    pub timeline: String,
    pub additional_requirements: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
}

/// Arquivo anexado ao rascunho, ainda não persistido.
#[derive(Clone, PartialEq, Eq)]
pub struct FileHandle {
    pub name: String,
    pub size: u64,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl FileHandle {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            size: bytes.len() as u64,
            content_type: content_type.into(),
            bytes,
        }
    }
}

// Sem o conteúdo: só nome, tamanho e tipo
impl std::fmt::Debug for FileHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileHandle")
            .field("name", &self.name)
            .field("size", &self.size)
            .field("content_type", &self.content_type)
            .finish()
    }
}

/// Estado em memória de uma sessão do assistente de planejamento.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanningDraft {
    pub app_type: String,
    pub platforms: SelectionSet,
    pub features: SelectionSet,
    pub specializations: SelectionSet,
    pub project: ProjectDetails,
    pub contact: ContactInfo,
    pub files: Vec<FileHandle>,
}

impl PlanningDraft {
    pub fn add_file(&mut self, file: FileHandle) {
        self.files.push(file);
    }

    /// Remove pela posição; índice fora da lista não faz nada.
    pub fn remove_file(&mut self, index: usize) -> Option<FileHandle> {
        (index < self.files.len()).then(|| self.files.remove(index))
    }
}
