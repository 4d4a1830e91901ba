//! Loading and saving the regex settings of an event.
//!
//! A changed configuration is written together with its audit entry in one
//! transaction, so the stored settings and the audit trail never diverge.

use serde_json::{Map, Value};
use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::audit::CreateAuditLog;
use crate::models::event::Event;
use crate::models::regex_config::{ConfigMap, SETTINGS_KEY};
use crate::services::settings_form::{plan_submission, FormField, SettingsForm, Submission};
use crate::services::{audit, config_store, event as event_service};

/// Audit action recorded for settings changes.
pub const SETTINGS_ACTION: &str = "event.settings";

/// Acting user for audit attribution.
#[derive(Debug, Clone)]
pub struct Actor {
    pub id: uuid::Uuid,
    pub username: String,
}

/// Outcome of a settings submission.
#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    Saved,
    Unchanged,
    Rejected(Vec<FormField>),
}

/// Build the settings form for an event together with its stored configuration.
pub async fn load_form(pool: &PgPool, event: &Event) -> Result<(SettingsForm, ConfigMap), AppError> {
    let settings = event_service::load_settings(pool, event.id).await?;
    let questions = event_service::list_questions(pool, event.id).await?;
    let stored = config_store::load(pool, event.id).await?;
    Ok((SettingsForm::new(&settings, &questions), stored))
}

/// Validate and apply a submitted settings form.
pub async fn submit(
    pool: &PgPool,
    event: &Event,
    actor: &Actor,
    data: &Map<String, Value>,
) -> Result<SubmitOutcome, AppError> {
    let (form, stored) = load_form(pool, event).await?;

    let config = match plan_submission(&form, &stored, data) {
        Submission::Invalid(fields) => {
            tracing::info!(event_id = %event.id, "Rejected regex settings submission");
            return Ok(SubmitOutcome::Rejected(fields));
        }
        Submission::Unchanged => return Ok(SubmitOutcome::Unchanged),
        Submission::Changed(config) => config,
    };

    let mut details = Map::new();
    details.insert(SETTINGS_KEY.to_string(), Value::Object(config.to_flat()));

    let mut tx = pool.begin().await?;

    config_store::save(&mut *tx, event.id, &config).await?;

    audit::log_action(
        &mut *tx,
        &CreateAuditLog {
            entity_type: "event".to_string(),
            entity_id: Some(event.id),
            action: SETTINGS_ACTION.to_string(),
            actor_id: Some(actor.id),
            actor_name: actor.username.clone(),
            details: Some(Value::Object(details)),
        },
    )
    .await?;

    tx.commit().await?;

    tracing::info!(
        event_id = %event.id,
        actor = %actor.username,
        rules = config.len(),
        "Regex validation settings saved"
    );

    Ok(SubmitOutcome::Saved)
}
