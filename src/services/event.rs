//! Event lookup, event settings, questions, and permission checks.

use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::event::{Event, EventSetting, EventSettings};
use crate::models::question::Question;

/// Find an event by organizer slug and event slug.
pub async fn find_by_slugs(
    pool: &PgPool,
    organizer: &str,
    event: &str,
) -> Result<Event, AppError> {
    sqlx::query_as::<_, Event>(
        r#"
        SELECT e.id, e.organizer_id, o.slug AS organizer_slug, e.slug, e.name
        FROM events e
        JOIN organizers o ON o.id = e.organizer_id
        WHERE o.slug = $1 AND e.slug = $2
        "#,
    )
    .bind(organizer)
    .bind(event)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Event '{organizer}/{event}' not found")))
}

/// Load the settings the regex editor depends on, falling back to defaults.
pub async fn load_settings(pool: &PgPool, event_id: Uuid) -> Result<EventSettings, AppError> {
    let rows = sqlx::query_as::<_, EventSetting>(
        "SELECT key, value FROM event_settings WHERE event_id = $1 AND key = ANY($2)",
    )
    .bind(event_id)
    .bind(&EventSettings::KEYS[..])
    .fetch_all(pool)
    .await?;

    let mut settings = EventSettings::default();
    for row in &rows {
        settings.apply(&row.key, &row.value);
    }
    Ok(settings)
}

/// All questions of an event in their natural order.
pub async fn list_questions(pool: &PgPool, event_id: Uuid) -> Result<Vec<Question>, AppError> {
    let questions = sqlx::query_as::<_, Question>(
        r#"
        SELECT id, event_id, identifier, question, type, position
        FROM questions
        WHERE event_id = $1
        ORDER BY position, id
        "#,
    )
    .bind(event_id)
    .fetch_all(pool)
    .await?;
    Ok(questions)
}

/// Whether the user may change settings of `event`.
///
/// A grant without an event id covers every event of the organizer.
pub async fn can_change_event_settings(
    pool: &PgPool,
    user_id: Uuid,
    event: &Event,
) -> Result<bool, AppError> {
    let allowed = sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM event_permissions
            WHERE user_id = $1
              AND organizer_id = $2
              AND (event_id IS NULL OR event_id = $3)
              AND can_change_event_settings
        )
        "#,
    )
    .bind(user_id)
    .bind(event.organizer_id)
    .bind(event.id)
    .fetch_one(pool)
    .await?;
    Ok(allowed)
}
