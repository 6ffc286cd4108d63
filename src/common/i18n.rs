// src/common/i18n.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Idiomas suportados pelo site. O árabe é o idioma principal.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Language {
    #[default]
    #[serde(rename = "ar")]
    Arabic,
    #[serde(rename = "en")]
    English,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Rtl,
    Ltr,
}

impl Language {
    /// "ar-YE" -> Arabic, "en" -> English; o resto é desconhecido.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let primary = tag.split('-').next().unwrap_or(tag).trim();
        match primary.to_ascii_lowercase().as_str() {
            "ar" => Some(Language::Arabic),
            "en" => Some(Language::English),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Language::Arabic => "ar",
            Language::English => "en",
        }
    }

    pub fn direction(self) -> Direction {
        match self {
            Language::Arabic => Direction::Rtl,
            Language::English => Direction::Ltr,
        }
    }

    pub fn pick<'a>(self, ar: &'a str, en: &'a str) -> &'a str {
        match self {
            Language::Arabic => ar,
            Language::English => en,
        }
    }
}

/// Texto com as duas traduções.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Localized {
    pub ar: &'static str,
    pub en: &'static str,
}

impl Localized {
    pub const fn new(ar: &'static str, en: &'static str) -> Self {
        Self { ar, en }
    }

    pub fn get(&self, lang: Language) -> &'static str {
        match lang {
            Language::Arabic => self.ar,
            Language::English => self.en,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_region_tags() {
        assert_eq!(Language::from_tag("ar-YE"), Some(Language::Arabic));
        assert_eq!(Language::from_tag("EN-us"), Some(Language::English));
        assert_eq!(Language::from_tag("fr"), None);
        assert_eq!(Language::English.direction(), Direction::Ltr);
    }
}
