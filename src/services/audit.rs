//! Audit log writes.

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::audit::{AuditLog, CreateAuditLog};

/// Append an audit entry on `conn`, typically inside the caller's transaction.
pub async fn log_action(conn: &mut PgConnection, entry: &CreateAuditLog) -> Result<(), AppError> {
    sqlx::query(
        r#"
        INSERT INTO audit_log (entity_type, entity_id, action, actor_id, actor_name, details)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(&entry.entity_type)
    .bind(entry.entity_id)
    .bind(&entry.action)
    .bind(entry.actor_id)
    .bind(&entry.actor_name)
    .bind(&entry.details)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

/// Audit entries recorded for an entity, newest first.
pub async fn list_for_entity(
    pool: &PgPool,
    entity_type: &str,
    entity_id: Uuid,
) -> Result<Vec<AuditLog>, AppError> {
    let entries = sqlx::query_as::<_, AuditLog>(
        r#"
        SELECT id, entity_type, entity_id, action, actor_id, actor_name, details, created_at
        FROM audit_log
        WHERE entity_type = $1 AND entity_id = $2
        ORDER BY created_at DESC
        "#,
    )
    .bind(entity_type)
    .bind(entity_id)
    .fetch_all(pool)
    .await?;
    Ok(entries)
}
