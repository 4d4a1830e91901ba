//! Event settings navigation entries.

use serde::{Deserialize, Serialize};

/// Request context for building the event settings navigation.
#[derive(Debug, Clone)]
pub struct NavContext {
    pub organizer_slug: String,
    pub event_slug: String,
    /// Path of the page being rendered.
    pub path: String,
    pub can_change_event_settings: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavEntry {
    pub label: String,
    pub url: String,
    pub active: bool,
}

/// URL of the regex settings page of an event.
pub fn settings_url(organizer: &str, event: &str) -> String {
    format!("/control/event/{organizer}/{event}/settings/regex-validation/")
}

/// The regex settings entry, shown only to users who may change event settings.
pub fn regex_settings_entry(ctx: &NavContext) -> Vec<NavEntry> {
    if !ctx.can_change_event_settings {
        return Vec::new();
    }

    let url = settings_url(&ctx.organizer_slug, &ctx.event_slug);
    vec![NavEntry {
        label: "Regex validation".to_string(),
        active: ctx.path.starts_with(&url),
        url,
    }]
}
