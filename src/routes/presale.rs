//! Presale routes used by the checkout frontend while building and submitting forms.

use std::collections::{BTreeMap, HashMap};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::{ApiResponse, AppError};
use crate::services::hooks::{FormContext, FormKind};
use crate::services::injector::FieldOverrides;
use crate::services::settings_form::live_rules;
use crate::services::{config_store, event as event_service};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct FormPath {
    pub organizer: String,
    pub event: String,
    pub kind: FormKind,
}

#[derive(Debug, Deserialize)]
pub struct LocaleQuery {
    pub locale: Option<String>,
}

/// Outcome of validating submitted answers.
#[derive(Debug, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: BTreeMap<String, Vec<String>>,
}

async fn form_context(
    state: &AppState,
    path: &FormPath,
    locale: Option<String>,
) -> Result<FormContext, AppError> {
    let event = event_service::find_by_slugs(&state.db, &path.organizer, &path.event).await?;
    let settings = event_service::load_settings(&state.db, event.id).await?;
    let questions = event_service::list_questions(&state.db, event.id).await?;
    let stored = config_store::load(&state.db, event.id).await?;
    let regex_config = live_rules(&settings, &questions, &stored);

    Ok(FormContext {
        locale: locale.unwrap_or_else(|| settings.locale.clone()),
        default_locale: settings.locale,
        regex_config,
        event,
    })
}

/// GET /api/v1/presale/{organizer}/{event}/forms/{kind}/overrides — field overrides for a form.
pub async fn overrides(
    State(state): State<AppState>,
    Path(path): Path<FormPath>,
    Query(query): Query<LocaleQuery>,
) -> Result<Json<ApiResponse<FieldOverrides>>, AppError> {
    let ctx = form_context(&state, &path, query.locale).await?;
    let overrides = state.hooks.collect_overrides(path.kind, &ctx);
    Ok(ApiResponse::success(overrides))
}

/// POST /api/v1/presale/{organizer}/{event}/forms/{kind}/validate — check submitted answers.
pub async fn validate(
    State(state): State<AppState>,
    Path(path): Path<FormPath>,
    Query(query): Query<LocaleQuery>,
    Json(answers): Json<HashMap<String, String>>,
) -> Result<(StatusCode, Json<ApiResponse<ValidationResult>>), AppError> {
    let ctx = form_context(&state, &path, query.locale).await?;
    let errors = state
        .hooks
        .collect_overrides(path.kind, &ctx)
        .validate(&answers);

    if errors.is_empty() {
        let result = ValidationResult {
            valid: true,
            errors,
        };
        return Ok((StatusCode::OK, ApiResponse::success(result)));
    }

    tracing::debug!(
        event_id = %ctx.event.id,
        fields = errors.len(),
        "Form answers failed regex validation"
    );
    let result = ValidationResult {
        valid: false,
        errors,
    };
    Ok((
        StatusCode::UNPROCESSABLE_ENTITY,
        ApiResponse::rejected(result, "VALIDATION_ERROR", "Please correct the marked fields."),
    ))
}
