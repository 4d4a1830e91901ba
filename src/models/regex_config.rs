//! Per-event regex rules and their flat settings representation.
//!
//! In memory every field owns one [`RegexRule`]. On the wire the pattern is
//! stored under the field id and the message under `"{field_id}:message"`,
//! which is the shape persisted in event settings and written to audit logs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::i18n::I18nString;

/// Settings key holding the serialized [`ConfigMap`] of an event.
pub const SETTINGS_KEY: &str = "regex_validation_config";

/// Suffix of the sibling key carrying a field's error message.
pub const MESSAGE_SUFFIX: &str = ":message";

/// Message shown when a rule has no configured message.
pub const DEFAULT_MESSAGE: &str = "Please enter a valid value.";

/// Pattern and error message configured for one form field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegexRule {
    pub pattern: String,
    pub message: Option<I18nString>,
}

/// Name of the sibling key holding the message for `field_id`.
pub fn message_key(field_id: &str) -> String {
    format!("{field_id}{MESSAGE_SUFFIX}")
}

/// All regex rules of one event, keyed by field id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct ConfigMap {
    rules: BTreeMap<String, RegexRule>,
}

impl ConfigMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field_id: impl Into<String>, rule: RegexRule) {
        self.rules.insert(field_id.into(), rule);
    }

    pub fn get(&self, field_id: &str) -> Option<&RegexRule> {
        self.rules.get(field_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RegexRule)> {
        self.rules.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Whether the rules for `field_ids` differ between `self` and `other`.
    ///
    /// Missing rules and empty rules compare equal; ids outside `field_ids`
    /// are not considered.
    pub fn differs_on<'a, I>(&self, other: &ConfigMap, field_ids: I) -> bool
    where
        I: IntoIterator<Item = &'a str>,
    {
        let empty = RegexRule::default();
        field_ids.into_iter().any(|id| {
            let a = self.get(id).unwrap_or(&empty);
            let b = other.get(id).unwrap_or(&empty);
            a != b
        })
    }

    /// The rules whose field id is in `field_ids`.
    pub fn restrict_to<'a, I>(&self, field_ids: I) -> ConfigMap
    where
        I: IntoIterator<Item = &'a str>,
    {
        let rules = field_ids
            .into_iter()
            .filter_map(|id| self.rules.get_key_value(id))
            .map(|(id, rule)| (id.clone(), rule.clone()))
            .collect();
        Self { rules }
    }

    /// Flat settings representation.
    pub fn to_flat(&self) -> Map<String, Value> {
        let mut out = Map::new();
        for (id, rule) in &self.rules {
            out.insert(id.clone(), Value::String(rule.pattern.clone()));
            if let Some(message) = &rule.message {
                // Serializing an untagged string/map enum cannot fail.
                let value = serde_json::to_value(message).unwrap_or(Value::Null);
                out.insert(message_key(id), value);
            }
        }
        out
    }

    /// Parse the flat settings representation, skipping malformed values.
    pub fn from_flat(flat: Map<String, Value>) -> Self {
        let mut rules: BTreeMap<String, RegexRule> = BTreeMap::new();

        for (key, value) in flat {
            if let Some(id) = key.strip_suffix(MESSAGE_SUFFIX) {
                if value.is_null() {
                    continue;
                }
                match serde_json::from_value::<I18nString>(value) {
                    Ok(message) if !message.is_blank() => {
                        rules.entry(id.to_string()).or_default().message = Some(message);
                    }
                    Ok(_) => {}
                    Err(e) => {
                        tracing::warn!(field = %id, error = %e, "Ignoring malformed regex message");
                    }
                }
                continue;
            }

            match value {
                Value::String(pattern) => {
                    rules.entry(key).or_default().pattern = pattern;
                }
                Value::Null => {
                    rules.entry(key).or_default();
                }
                other => {
                    tracing::warn!(field = %key, value = %other, "Ignoring non-string regex pattern");
                }
            }
        }

        Self { rules }
    }
}

impl From<Map<String, Value>> for ConfigMap {
    fn from(flat: Map<String, Value>) -> Self {
        Self::from_flat(flat)
    }
}

impl From<ConfigMap> for Map<String, Value> {
    fn from(config: ConfigMap) -> Self {
        config.to_flat()
    }
}
