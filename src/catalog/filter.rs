// src/catalog/filter.rs

use crate::catalog::entries::{ALL_CATEGORIES, CatalogEntry};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    /// `"all"` (ou vazio) é a sentinela; qualquer outro token filtra por igualdade.
    pub fn parse(token: &str) -> Self {
        let token = token.trim();
        if token.is_empty() || token == ALL_CATEGORIES {
            CategoryFilter::All
        } else {
            CategoryFilter::Only(token.to_string())
        }
    }

    pub fn matches(&self, entry: &CatalogEntry) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(category) => entry.category == category.as_str(),
        }
    }
}

/// Mantém a ordem de origem. Categoria sem cartões devolve lista vazia.
pub fn filter<'a>(entries: &'a [CatalogEntry], selected: &CategoryFilter) -> Vec<&'a CatalogEntry> {
    entries.iter().filter(|entry| selected.matches(entry)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::entries::ENTRIES;

    #[test]
    fn all_returns_everything_in_source_order() {
        let visible = filter(ENTRIES, &CategoryFilter::parse("all"));
        let ids: Vec<_> = visible.iter().map(|e| e.id).collect();
        let expected: Vec<_> = ENTRIES.iter().map(|e| e.id).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn category_returns_the_exact_subset_in_order() {
        let visible = filter(ENTRIES, &CategoryFilter::parse("health"));
        let ids: Vec<_> = visible.iter().map(|e| e.id).collect();
        assert_eq!(ids, ["he1", "he2", "he3"]);
        assert!(visible.iter().all(|e| e.category == "health"));
    }

    #[test]
    fn unmatched_category_is_empty_not_an_error() {
        assert!(filter(ENTRIES, &CategoryFilter::parse("gaming")).is_empty());
        // Comparação exata, sem normalizar maiúsculas
        assert!(filter(ENTRIES, &CategoryFilter::parse("Health")).is_empty());
    }
}
