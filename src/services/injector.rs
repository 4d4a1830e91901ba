//! Validator injection for checkout forms.
//!
//! [`field_overrides`] turns an event's [`ConfigMap`] into the per-field
//! override mapping merged into the contact and question forms. It runs on
//! every form build, so it stays pure and proportional to the number of
//! configured fields.

use std::collections::{BTreeMap, HashMap};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::regex_config::{ConfigMap, DEFAULT_MESSAGE};

/// One regex validator attached to a form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorDescriptor {
    pub regex: String,
    pub message: String,
}

impl ValidatorDescriptor {
    /// Check `value` against the pattern, returning the error message on mismatch.
    ///
    /// Empty values are not validated. A pattern that no longer compiles is
    /// logged and the value is accepted.
    pub fn check(&self, field_id: &str, value: &str) -> Option<&str> {
        if value.is_empty() {
            return None;
        }

        let re = match Regex::new(&self.regex) {
            Ok(re) => re,
            Err(e) => {
                tracing::warn!(
                    field = %field_id,
                    pattern = %self.regex,
                    error = %e,
                    "Stored regex no longer compiles, skipping validation"
                );
                return None;
            }
        };

        (!re.is_match(value)).then_some(self.message.as_str())
    }
}

/// Overrides for a single field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOverride {
    pub validators: Vec<ValidatorDescriptor>,
}

/// Field overrides keyed by field id, in the shape the form builder consumes:
/// `{field_id: {"validators": [{"regex": ..., "message": ...}]}}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldOverrides(pub BTreeMap<String, FieldOverride>);

impl FieldOverrides {
    pub fn get(&self, field_id: &str) -> Option<&FieldOverride> {
        self.0.get(field_id)
    }

    /// Merge another receiver's overrides; validators for the same field accumulate.
    pub fn merge(&mut self, other: FieldOverrides) {
        for (field_id, o) in other.0 {
            self.0
                .entry(field_id)
                .or_default()
                .validators
                .extend(o.validators);
        }
    }

    /// Validate submitted answers, returning the error messages per failing field.
    ///
    /// Answers for fields without overrides are not checked.
    pub fn validate(&self, answers: &HashMap<String, String>) -> BTreeMap<String, Vec<String>> {
        let mut errors: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (field_id, value) in answers {
            let Some(o) = self.get(field_id) else {
                continue;
            };
            for validator in &o.validators {
                if let Some(message) = validator.check(field_id, value) {
                    errors
                        .entry(field_id.clone())
                        .or_default()
                        .push(message.to_string());
                }
            }
        }
        errors
    }
}

/// Build the validator overrides for an event's configuration.
///
/// Rules with an empty pattern produce nothing. Messages are localized to
/// `locale`, falling back to `default_locale`, and default to
/// [`DEFAULT_MESSAGE`] when unset.
pub fn field_overrides(config: &ConfigMap, locale: &str, default_locale: &str) -> FieldOverrides {
    let overrides = config
        .iter()
        .filter(|(_, rule)| !rule.pattern.is_empty())
        .map(|(field_id, rule)| {
            let message = rule
                .message
                .as_ref()
                .map(|m| m.localize(locale, default_locale))
                .unwrap_or_else(|| DEFAULT_MESSAGE.to_string());
            let validator = ValidatorDescriptor {
                regex: rule.pattern.clone(),
                message,
            };
            (
                field_id.to_string(),
                FieldOverride {
                    validators: vec![validator],
                },
            )
        })
        .collect();

    FieldOverrides(overrides)
}
