//! Business logic services.

pub mod audit;
pub mod auth;
pub mod config_store;
pub mod event;
pub mod hooks;
pub mod injector;
pub mod nav;
pub mod regex_settings;
pub mod settings_form;
