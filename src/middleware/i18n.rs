// src/middleware/i18n.rs

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};

use crate::common::i18n::Language;

// Nosso extrator de idioma
#[derive(Debug, Clone, Copy)]
pub struct Locale(pub Language);

impl Locale {
    pub fn from_header(raw: &str) -> Self {
        // O primeiro idioma suportado na ordem de preferência do cliente
        let lang = accept_language::parse(raw)
            .iter()
            .find_map(|tag| Language::from_tag(tag))
            .unwrap_or_default();
        Locale(lang)
    }
}

impl<S> FromRequestParts<S> for Locale
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let locale = parts
            .headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|header_value| header_value.to_str().ok())
            .map(Locale::from_header)
            .unwrap_or(Locale(Language::default()));

        Ok(locale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_first_supported_language() {
        assert_eq!(Locale::from_header("fr-FR, en;q=0.8, ar;q=0.5").0, Language::English);
        assert_eq!(Locale::from_header("ar-YE").0, Language::Arabic);
        assert_eq!(Locale::from_header("de").0, Language::Arabic);
    }
}
