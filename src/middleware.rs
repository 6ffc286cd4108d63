pub mod actor;
pub mod i18n;
