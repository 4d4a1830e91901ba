pub mod config;
pub mod db;
pub mod errors;
pub mod middleware;
pub mod models;
pub mod plugin;
pub mod routes;
pub mod services;

use std::sync::Arc;

use sqlx::PgPool;

use crate::services::hooks::Hooks;

/// Shared application state passed to all Axum handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: config::AppConfig,
    pub hooks: Arc<Hooks>,
}

impl AppState {
    /// State with the regex validation receivers registered.
    pub fn new(db: PgPool, config: config::AppConfig) -> Self {
        Self {
            db,
            config,
            hooks: Arc::new(plugin::hooks()),
        }
    }
}
