//! Control panel routes: the regex settings page and the event settings navigation.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::{ApiResponse, AppError};
use crate::middleware::auth::CurrentUser;
use crate::middleware::permission::{EventPath, RequireEventSettings};
use crate::services::event as event_service;
use crate::services::nav::{self, NavContext, NavEntry};
use crate::services::regex_settings::{self, Actor, SubmitOutcome};
use crate::services::settings_form::FormField;
use crate::AppState;

/// Cookie carrying a one-shot notification across the post/redirect/get cycle.
const FLASH_COOKIE: &str = "regex_validation_flash";
const FLASH_SAVED: &str = "saved";

const SAVED_MESSAGE: &str = "Your changes have been saved.";
const SAVE_FAILED_MESSAGE: &str = "We could not save your changes. See below for details.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub level: MessageLevel,
    pub text: String,
}

/// The rendered settings page.
#[derive(Debug, Serialize)]
pub struct SettingsPage {
    pub action: String,
    pub fields: Vec<FormField>,
    pub messages: Vec<Notification>,
}

fn flash_cookie(url: &str) -> Cookie<'static> {
    Cookie::build((FLASH_COOKIE, FLASH_SAVED))
        .path(url.to_string())
        .http_only(true)
        .build()
}

/// GET /control/event/{organizer}/{event}/settings/regex-validation/ — render the form.
pub async fn show(
    State(state): State<AppState>,
    RequireEventSettings { event, .. }: RequireEventSettings,
    jar: CookieJar,
) -> Result<(CookieJar, Json<ApiResponse<SettingsPage>>), AppError> {
    let (form, stored) = regex_settings::load_form(&state.db, &event).await?;
    let url = nav::settings_url(&event.organizer_slug, &event.slug);

    let mut messages = Vec::new();
    let jar = match jar.get(FLASH_COOKIE) {
        Some(c) => {
            if c.value() == FLASH_SAVED {
                messages.push(Notification {
                    level: MessageLevel::Success,
                    text: SAVED_MESSAGE.to_string(),
                });
            }
            jar.remove(Cookie::build(FLASH_COOKIE).path(url.clone()))
        }
        None => jar,
    };

    let page = SettingsPage {
        action: url,
        fields: form.render(&stored),
        messages,
    };
    Ok((jar, ApiResponse::success(page)))
}

/// POST /control/event/{organizer}/{event}/settings/regex-validation/ — save the form.
///
/// Redirects back to the page on success; re-renders the submitted form with
/// field errors when any pattern is invalid.
pub async fn update(
    State(state): State<AppState>,
    RequireEventSettings { user, event }: RequireEventSettings,
    jar: CookieJar,
    Json(body): Json<Map<String, Value>>,
) -> Result<Response, AppError> {
    let actor = Actor {
        id: user.id,
        username: user.username,
    };
    let url = nav::settings_url(&event.organizer_slug, &event.slug);

    match regex_settings::submit(&state.db, &event, &actor, &body).await? {
        SubmitOutcome::Saved | SubmitOutcome::Unchanged => {
            let jar = jar.add(flash_cookie(&url));
            Ok((jar, Redirect::to(&url)).into_response())
        }
        SubmitOutcome::Rejected(fields) => {
            let page = SettingsPage {
                action: url,
                fields,
                messages: vec![Notification {
                    level: MessageLevel::Error,
                    text: SAVE_FAILED_MESSAGE.to_string(),
                }],
            };
            let body = ApiResponse::rejected(page, "VALIDATION_ERROR", SAVE_FAILED_MESSAGE);
            Ok((StatusCode::BAD_REQUEST, body).into_response())
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct NavQuery {
    /// Path of the page the navigation is rendered for.
    pub path: Option<String>,
}

/// GET /control/event/{organizer}/{event}/nav — event settings navigation entries.
pub async fn navigation(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(path): Path<EventPath>,
    Query(query): Query<NavQuery>,
) -> Result<Json<ApiResponse<Vec<NavEntry>>>, AppError> {
    let event = event_service::find_by_slugs(&state.db, &path.organizer, &path.event).await?;
    let allowed = event_service::can_change_event_settings(&state.db, current_user.id, &event).await?;

    let ctx = NavContext {
        organizer_slug: event.organizer_slug,
        event_slug: event.slug,
        path: query.path.unwrap_or_default(),
        can_change_event_settings: allowed,
    };
    Ok(ApiResponse::success(state.hooks.collect_nav(&ctx)))
}
