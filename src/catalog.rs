// src/catalog.rs

//! Catálogo estático de apps: filtro por categoria e visão de detalhe
//! endereçável por `#details-<id>`.

pub mod detail;
pub mod entries;
pub mod filter;

pub use detail::{DetailView, fragment_for, parse_fragment, resolve};
pub use entries::{ALL_CATEGORIES, CATEGORIES, CatalogEntry, CategoryOption, ENTRIES};
pub use filter::{CategoryFilter, filter};
