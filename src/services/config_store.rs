//! Persistence of the per-event regex configuration.
//!
//! The configuration lives in one event settings entry under
//! [`SETTINGS_KEY`]. A missing entry reads as an empty map.

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::regex_config::{ConfigMap, SETTINGS_KEY};

/// Load the configuration of an event.
///
/// An unreadable stored value is logged and treated as empty so that
/// checkout forms keep working.
pub async fn load(pool: &PgPool, event_id: Uuid) -> Result<ConfigMap, AppError> {
    let raw = sqlx::query_scalar::<_, String>(
        "SELECT value FROM event_settings WHERE event_id = $1 AND key = $2",
    )
    .bind(event_id)
    .bind(SETTINGS_KEY)
    .fetch_optional(pool)
    .await?;

    Ok(raw.map(|v| parse(event_id, &v)).unwrap_or_default())
}

fn parse(event_id: Uuid, raw: &str) -> ConfigMap {
    match serde_json::from_str::<ConfigMap>(raw) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(%event_id, error = %e, "Stored regex configuration is not a JSON object");
            ConfigMap::default()
        }
    }
}

/// Replace the stored configuration of an event.
///
/// Takes a connection so callers can run it inside their transaction.
pub async fn save(
    conn: &mut PgConnection,
    event_id: Uuid,
    config: &ConfigMap,
) -> Result<(), AppError> {
    let value = serde_json::to_string(config)
        .map_err(|e| AppError::Internal(format!("Failed to serialize regex config: {e}")))?;

    sqlx::query(
        r#"
        INSERT INTO event_settings (event_id, key, value)
        VALUES ($1, $2, $3)
        ON CONFLICT (event_id, key) DO UPDATE SET value = EXCLUDED.value
        "#,
    )
    .bind(event_id)
    .bind(SETTINGS_KEY)
    .bind(&value)
    .execute(&mut *conn)
    .await?;

    Ok(())
}
