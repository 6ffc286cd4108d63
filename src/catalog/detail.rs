// src/catalog/detail.rs

use crate::catalog::entries::{self, CatalogEntry};

pub const FRAGMENT_PREFIX: &str = "#details-";

pub fn fragment_for(id: &str) -> String {
    format!("{FRAGMENT_PREFIX}{id}")
}

/// Extrai o id de `#details-<id>`. Aceita também sem o `#`.
pub fn parse_fragment(fragment: &str) -> Option<&str> {
    let fragment = fragment.trim();
    let id = fragment
        .strip_prefix(FRAGMENT_PREFIX)
        .or_else(|| fragment.strip_prefix(&FRAGMENT_PREFIX[1..]))?;
    (!id.is_empty()).then_some(id)
}

/// Resolve um fragmento para um cartão conhecido; ids desconhecidos viram `None`.
pub fn resolve(fragment: &str) -> Option<&'static CatalogEntry> {
    parse_fragment(fragment).and_then(entries::find)
}

/// Estado da visão de detalhe, sincronizado com o fragmento da URL.
#[derive(Debug, Default)]
pub struct DetailView {
    selected: Option<&'static CatalogEntry>,
}

impl DetailView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Na carga da página: abre se o fragmento aponta para um id conhecido.
    pub fn restore(fragment: &str) -> Self {
        Self { selected: resolve(fragment) }
    }

    pub fn selected(&self) -> Option<&'static CatalogEntry> {
        self.selected
    }

    pub fn is_open(&self) -> bool {
        self.selected.is_some()
    }

    /// Abre e devolve o fragmento a gravar (substituindo, sem navegar).
    pub fn open(&mut self, id: &str) -> Option<String> {
        let entry = entries::find(id)?;
        self.selected = Some(entry);
        Some(fragment_for(entry.id))
    }

    /// Fecha. `true` quando o fragmento deve ser limpo.
    pub fn close(&mut self) -> bool {
        self.selected.take().is_some()
    }

    /// Mudança de fragmento vinda de fora (voltar, link colado).
    pub fn on_fragment_change(&mut self, fragment: &str) {
        if parse_fragment(fragment).is_some() {
            if let Some(entry) = resolve(fragment) {
                self.selected = Some(entry);
            }
        } else {
            self.selected = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_fragment_opens_on_load() {
        let view = DetailView::restore("#details-lg2");
        assert_eq!(view.selected().map(|e| e.id), Some("lg2"));
    }

    #[test]
    fn unknown_or_malformed_fragment_is_ignored() {
        assert!(!DetailView::restore("#details-zz9").is_open());
        assert!(!DetailView::restore("#details-").is_open());
        assert!(!DetailView::restore("#pricing").is_open());
        assert!(!DetailView::restore("").is_open());
    }

    #[test]
    fn open_and_close_drive_the_fragment() {
        let mut view = DetailView::new();
        assert_eq!(view.open("ed1").as_deref(), Some("#details-ed1"));
        assert!(view.open("nope").is_none());
        // Um id desconhecido não fecha o que já estava aberto
        assert_eq!(view.selected().map(|e| e.id), Some("ed1"));

        assert!(view.close());
        assert!(!view.close());
    }

    #[test]
    fn fragment_changes_follow_the_page_rules() {
        let mut view = DetailView::restore("#details-ec1");

        view.on_fragment_change("#details-unknown");
        assert_eq!(view.selected().map(|e| e.id), Some("ec1"));

        view.on_fragment_change("#details-md1");
        assert_eq!(view.selected().map(|e| e.id), Some("md1"));

        view.on_fragment_change("");
        assert!(!view.is_open());
    }

    #[test]
    fn parses_with_or_without_hash() {
        assert_eq!(parse_fragment("details-sv3"), Some("sv3"));
        assert_eq!(parse_fragment("#details-sv3"), Some("sv3"));
        assert_eq!(parse_fragment("#sv3"), None);
    }
}
