//! Event permission extractor for Axum handlers.

use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::middleware::auth::CurrentUser;
use crate::models::event::Event;
use crate::services::event as event_service;
use crate::AppState;

/// Organizer and event slugs of control routes.
#[derive(Debug, Clone, Deserialize)]
pub struct EventPath {
    pub organizer: String,
    pub event: String,
}

/// Extractor that requires the "can change event settings" permission on the
/// event named in the path.
#[derive(Debug, Clone)]
pub struct RequireEventSettings {
    pub user: CurrentUser,
    pub event: Event,
}

impl FromRequestParts<AppState> for RequireEventSettings {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = CurrentUser::from_request_parts(parts, state).await?;

        let Path(path) = Path::<EventPath>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::NotFound(e.to_string()))?;

        let event = event_service::find_by_slugs(&state.db, &path.organizer, &path.event).await?;

        if !event_service::can_change_event_settings(&state.db, user.id, &event).await? {
            tracing::warn!(
                user = %user.username,
                event_id = %event.id,
                "Denied access to event settings"
            );
            return Err(AppError::Forbidden(
                "You do not have permission to change event settings".to_string(),
            ));
        }

        Ok(RequireEventSettings { user, event })
    }
}
