//! Event model and the event settings the regex editor depends on.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Event row joined with its organizer's slug.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: Uuid,
    pub organizer_id: Uuid,
    pub organizer_slug: String,
    pub slug: String,
    pub name: String,
}

/// Typed view over the event's key/value settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSettings {
    pub attendee_emails_asked: bool,
    pub attendee_company_asked: bool,
    pub attendee_addresses_asked: bool,
    pub locales: Vec<String>,
    pub locale: String,
}

impl Default for EventSettings {
    fn default() -> Self {
        Self {
            attendee_emails_asked: false,
            attendee_company_asked: false,
            attendee_addresses_asked: false,
            locales: vec!["en".to_string()],
            locale: "en".to_string(),
        }
    }
}

impl EventSettings {
    /// Settings keys read by [`EventSettings::apply`].
    pub const KEYS: [&'static str; 5] = [
        "attendee_emails_asked",
        "attendee_company_asked",
        "attendee_addresses_asked",
        "locales",
        "locale",
    ];

    /// Overlay one stored `key`/`value` pair, keeping the default on malformed values.
    pub fn apply(&mut self, key: &str, value: &str) {
        let parsed = serde_json::from_str::<serde_json::Value>(value);
        let value = match parsed {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(key, error = %e, "Ignoring malformed event setting");
                return;
            }
        };

        match key {
            "attendee_emails_asked" => {
                if let Some(b) = value.as_bool() {
                    self.attendee_emails_asked = b;
                }
            }
            "attendee_company_asked" => {
                if let Some(b) = value.as_bool() {
                    self.attendee_company_asked = b;
                }
            }
            "attendee_addresses_asked" => {
                if let Some(b) = value.as_bool() {
                    self.attendee_addresses_asked = b;
                }
            }
            "locales" => {
                if let Ok(locales) = serde_json::from_value::<Vec<String>>(value) {
                    if !locales.is_empty() {
                        self.locales = locales;
                    }
                }
            }
            "locale" => {
                if let Some(s) = value.as_str() {
                    self.locale = s.to_string();
                }
            }
            _ => {}
        }
    }
}

/// One row of the event settings table.
#[derive(Debug, Clone, FromRow)]
pub struct EventSetting {
    pub key: String,
    pub value: String,
}
