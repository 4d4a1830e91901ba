//! Database models and DTOs for events, questions, settings, and audit entries.

pub mod audit;
pub mod event;
pub mod i18n;
pub mod question;
pub mod regex_config;
