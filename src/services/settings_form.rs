//! The regex settings form: candidate fields, rendering, and binding.
//!
//! Every candidate field contributes a pattern input named after the field id
//! and a localized message input named `"{field_id}:message"`. Binding a
//! submitted body validates every pattern; a single invalid pattern rejects
//! the whole submission.

use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::models::event::EventSettings;
use crate::models::i18n::I18nString;
use crate::models::question::Question;
use crate::models::regex_config::{message_key, ConfigMap, RegexRule, DEFAULT_MESSAGE};

pub const INVALID_REGEX: &str = "Not a valid regular expression";
pub const INVALID_VALUE: &str = "Enter a valid value.";

/// A form field the organizer may attach a rule to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateField {
    pub id: String,
    pub label: String,
}

impl CandidateField {
    fn new(id: &str, label: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
        }
    }
}

/// Enumerate the fields of an event that accept a regex rule, in display order.
pub fn candidate_fields(settings: &EventSettings, questions: &[Question]) -> Vec<CandidateField> {
    let mut fields = vec![CandidateField::new("email", "E-mail")];

    if settings.attendee_emails_asked {
        fields.push(CandidateField::new("attendee_email", "Attendee email"));
    }
    if settings.attendee_company_asked {
        fields.push(CandidateField::new("company", "Company"));
    }
    if settings.attendee_addresses_asked {
        fields.push(CandidateField::new("street", "Address"));
        fields.push(CandidateField::new("zipcode", "ZIP code"));
        fields.push(CandidateField::new("city", "City"));
    }

    fields.extend(
        questions
            .iter()
            .filter(|q| q.question_type.accepts_regex())
            .map(|q| CandidateField {
                id: q.identifier.clone(),
                label: q.question.localize(&settings.locale, &settings.locale),
            }),
    );

    fields
}

/// The stored rules that still belong to a candidate field of the event.
///
/// Rules for fields the event no longer asks for, deleted questions, or
/// questions whose type no longer accepts a pattern are left out.
pub fn live_rules(settings: &EventSettings, questions: &[Question], config: &ConfigMap) -> ConfigMap {
    let candidates = candidate_fields(settings, questions);
    config.restrict_to(candidates.iter().map(|c| c.id.as_str()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Pattern,
    Message,
}

/// A rendered form input, with its current value and errors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormField {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locales: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    pub value: Value,
    pub errors: Vec<String>,
}

/// Settings form for one event.
#[derive(Debug, Clone)]
pub struct SettingsForm {
    candidates: Vec<CandidateField>,
    locales: Vec<String>,
}

/// Result of binding a submitted body to the form.
#[derive(Debug, Clone)]
pub struct BoundForm {
    fields: Vec<FormField>,
    cleaned: ConfigMap,
}

impl SettingsForm {
    pub fn new(settings: &EventSettings, questions: &[Question]) -> Self {
        Self {
            candidates: candidate_fields(settings, questions),
            locales: settings.locales.clone(),
        }
    }

    pub fn field_ids(&self) -> impl Iterator<Item = &str> {
        self.candidates.iter().map(|c| c.id.as_str())
    }

    /// Render the unbound form pre-populated from the stored configuration.
    pub fn render(&self, initial: &ConfigMap) -> Vec<FormField> {
        let mut fields = Vec::with_capacity(self.candidates.len() * 2);
        for candidate in &self.candidates {
            let rule = initial.get(&candidate.id);
            let pattern = rule.map(|r| r.pattern.clone()).unwrap_or_default();
            let message = rule
                .and_then(|r| r.message.as_ref())
                .and_then(|m| serde_json::to_value(m).ok())
                .unwrap_or(Value::Null);

            fields.push(self.pattern_field(candidate, Value::String(pattern), Vec::new()));
            fields.push(self.message_field(candidate, message, Vec::new()));
        }
        fields
    }

    /// Bind and validate a submitted body.
    pub fn bind(&self, data: &Map<String, Value>) -> BoundForm {
        let mut fields = Vec::with_capacity(self.candidates.len() * 2);
        let mut cleaned = ConfigMap::new();

        for candidate in &self.candidates {
            let raw_pattern = data.get(&candidate.id).cloned().unwrap_or(Value::Null);
            let (pattern, pattern_errors) = clean_pattern(&raw_pattern);

            let key = message_key(&candidate.id);
            let raw_message = data.get(&key).cloned().unwrap_or(Value::Null);
            let (message, message_errors) = self.clean_message(&raw_message);

            fields.push(self.pattern_field(candidate, raw_pattern, pattern_errors));
            fields.push(self.message_field(candidate, raw_message, message_errors));
            cleaned.insert(candidate.id.clone(), RegexRule { pattern, message });
        }

        BoundForm { fields, cleaned }
    }

    fn pattern_field(&self, candidate: &CandidateField, value: Value, errors: Vec<String>) -> FormField {
        FormField {
            name: candidate.id.clone(),
            label: format!("Regular expression for \"{}\"", candidate.label),
            kind: FieldKind::Pattern,
            required: false,
            locales: None,
            placeholder: None,
            value,
            errors,
        }
    }

    fn message_field(&self, candidate: &CandidateField, value: Value, errors: Vec<String>) -> FormField {
        FormField {
            name: message_key(&candidate.id),
            label: format!("Error message for \"{}\"", candidate.label),
            kind: FieldKind::Message,
            required: false,
            locales: Some(self.locales.clone()),
            placeholder: Some(DEFAULT_MESSAGE.to_string()),
            value,
            errors,
        }
    }

    fn clean_message(&self, raw: &Value) -> (Option<I18nString>, Vec<String>) {
        match raw {
            Value::Null => (None, Vec::new()),
            Value::String(s) if s.trim().is_empty() => (None, Vec::new()),
            Value::String(s) => (Some(I18nString::Plain(s.trim().to_string())), Vec::new()),
            Value::Object(map) => {
                if map.values().any(|v| !(v.is_string() || v.is_null())) {
                    return (None, vec![INVALID_VALUE.to_string()]);
                }
                let pairs = self.locales.iter().filter_map(|locale| {
                    map.get(locale)
                        .and_then(Value::as_str)
                        .map(|text| (locale.clone(), text))
                });
                (I18nString::from_pairs(pairs), Vec::new())
            }
            _ => (None, vec![INVALID_VALUE.to_string()]),
        }
    }
}

fn clean_pattern(raw: &Value) -> (String, Vec<String>) {
    let pattern = match raw {
        Value::Null => return (String::new(), Vec::new()),
        Value::String(s) => s.trim().to_string(),
        _ => return (String::new(), vec![INVALID_VALUE.to_string()]),
    };

    if pattern.is_empty() {
        return (pattern, Vec::new());
    }
    match Regex::new(&pattern) {
        Ok(_) => (pattern, Vec::new()),
        Err(e) => {
            tracing::debug!(pattern = %pattern, error = %e, "Rejected regex pattern");
            (pattern, vec![INVALID_REGEX.to_string()])
        }
    }
}

impl BoundForm {
    pub fn is_valid(&self) -> bool {
        self.fields.iter().all(|f| f.errors.is_empty())
    }

    /// The form as submitted, with values and errors, for redisplay.
    pub fn into_fields(self) -> Vec<FormField> {
        self.fields
    }

    /// The cleaned configuration, only meaningful when the form is valid.
    pub fn cleaned(&self) -> &ConfigMap {
        &self.cleaned
    }
}

/// What a submitted settings form amounts to.
#[derive(Debug, Clone)]
pub enum Submission {
    /// At least one field failed validation; nothing may be written.
    Invalid(Vec<FormField>),
    /// Valid but identical to the stored configuration.
    Unchanged,
    /// Valid and different; the full configuration to store.
    Changed(ConfigMap),
}

/// Decide what a submission does relative to the stored configuration.
pub fn plan_submission(form: &SettingsForm, stored: &ConfigMap, data: &Map<String, Value>) -> Submission {
    let bound = form.bind(data);
    if !bound.is_valid() {
        return Submission::Invalid(bound.into_fields());
    }

    if bound.cleaned().differs_on(stored, form.field_ids()) {
        Submission::Changed(bound.cleaned)
    } else {
        Submission::Unchanged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question::QuestionType;
    use serde_json::json;
    use sqlx::types::Json;
    use uuid::Uuid;

    fn question(identifier: &str, question_type: QuestionType, position: i32) -> Question {
        Question {
            id: Uuid::new_v4(),
            event_id: Uuid::nil(),
            identifier: identifier.to_string(),
            question: Json(I18nString::from_pairs([("en", identifier)]).unwrap()),
            question_type,
            position,
        }
    }

    fn ids(fields: &[CandidateField]) -> Vec<&str> {
        fields.iter().map(|f| f.id.as_str()).collect()
    }

    fn body(json: Value) -> Map<String, Value> {
        json.as_object().cloned().unwrap()
    }

    fn field<'a>(fields: &'a [FormField], name: &str) -> &'a FormField {
        fields.iter().find(|f| f.name == name).unwrap()
    }

    #[test]
    fn email_is_always_a_candidate() {
        let fields = candidate_fields(&EventSettings::default(), &[]);
        assert_eq!(ids(&fields), vec!["email"]);
    }

    #[test]
    fn address_fields_without_attendee_email() {
        let settings = EventSettings {
            attendee_emails_asked: false,
            attendee_addresses_asked: true,
            ..EventSettings::default()
        };
        let fields = candidate_fields(&settings, &[]);
        assert_eq!(ids(&fields), vec!["email", "street", "zipcode", "city"]);
        assert!(!ids(&fields).contains(&"attendee_email"));
    }

    #[test]
    fn all_fixed_fields_in_order() {
        let settings = EventSettings {
            attendee_emails_asked: true,
            attendee_company_asked: true,
            attendee_addresses_asked: true,
            ..EventSettings::default()
        };
        let fields = candidate_fields(&settings, &[]);
        assert_eq!(
            ids(&fields),
            vec!["email", "attendee_email", "company", "street", "zipcode", "city"]
        );
    }

    #[test]
    fn only_text_string_number_questions_in_given_order() {
        let questions = vec![
            question("vat", QuestionType::String, 1),
            question("shirt", QuestionType::Choice, 2),
            question("bio", QuestionType::Text, 3),
            question("birthday", QuestionType::Date, 4),
            question("age", QuestionType::Number, 5),
        ];
        let fields = candidate_fields(&EventSettings::default(), &questions);
        assert_eq!(ids(&fields), vec!["email", "vat", "bio", "age"]);
        assert_eq!(fields[1].label, "vat");
    }

    #[test]
    fn two_inputs_per_candidate() {
        let form = SettingsForm::new(&EventSettings::default(), &[]);
        let fields = form.render(&ConfigMap::new());
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].name, "email");
        assert_eq!(fields[0].kind, FieldKind::Pattern);
        assert_eq!(fields[0].label, "Regular expression for \"E-mail\"");
        assert_eq!(fields[1].name, "email:message");
        assert_eq!(fields[1].kind, FieldKind::Message);
        assert_eq!(fields[1].placeholder.as_deref(), Some("Please enter a valid value."));
        assert_eq!(fields[1].locales, Some(vec!["en".to_string()]));
    }

    #[test]
    fn submitted_values_prepopulate_reloaded_form() {
        let form = SettingsForm::new(&EventSettings::default(), &[]);
        let submitted = body(json!({"email": "^[a-z]+$", "email:message": "bad"}));

        let Submission::Changed(config) = plan_submission(&form, &ConfigMap::new(), &submitted)
        else {
            panic!("expected a change");
        };

        // Reload from what would be stored.
        let stored: ConfigMap =
            serde_json::from_value(serde_json::to_value(&config).unwrap()).unwrap();
        let fields = form.render(&stored);
        assert_eq!(field(&fields, "email").value, json!("^[a-z]+$"));
        assert_eq!(field(&fields, "email:message").value, json!("bad"));
    }

    #[test]
    fn invalid_pattern_rejects_whole_submission_and_keeps_input() {
        let settings = EventSettings {
            attendee_company_asked: true,
            ..EventSettings::default()
        };
        let form = SettingsForm::new(&settings, &[]);
        let submitted = body(json!({"email": "[", "company": "^[A-Z]"}));

        let Submission::Invalid(fields) = plan_submission(&form, &ConfigMap::new(), &submitted)
        else {
            panic!("expected rejection");
        };
        let email = field(&fields, "email");
        assert_eq!(email.value, json!("["));
        assert_eq!(email.errors, vec![INVALID_REGEX.to_string()]);
        let company = field(&fields, "company");
        assert_eq!(company.value, json!("^[A-Z]"));
        assert!(company.errors.is_empty());
    }

    #[test]
    fn resubmitting_identical_values_is_unchanged() {
        let form = SettingsForm::new(&EventSettings::default(), &[]);
        let submitted = body(json!({"email": "^x", "email:message": {"en": "bad"}}));

        let Submission::Changed(stored) = plan_submission(&form, &ConfigMap::new(), &submitted)
        else {
            panic!("expected a change");
        };
        assert!(matches!(
            plan_submission(&form, &stored, &submitted),
            Submission::Unchanged
        ));
    }

    #[test]
    fn blank_submission_against_empty_config_is_unchanged() {
        let form = SettingsForm::new(&EventSettings::default(), &[]);
        let submitted = body(json!({"email": "", "email:message": {"en": ""}}));
        assert!(matches!(
            plan_submission(&form, &ConfigMap::new(), &submitted),
            Submission::Unchanged
        ));
    }

    #[test]
    fn patterns_are_trimmed() {
        let form = SettingsForm::new(&EventSettings::default(), &[]);
        let bound = form.bind(&body(json!({"email": "  ^x$ "})));
        assert!(bound.is_valid());
        assert_eq!(bound.cleaned().get("email").unwrap().pattern, "^x$");
    }

    #[test]
    fn non_string_pattern_is_rejected() {
        let form = SettingsForm::new(&EventSettings::default(), &[]);
        let bound = form.bind(&body(json!({"email": 42})));
        assert!(!bound.is_valid());
        let fields = bound.into_fields();
        assert_eq!(field(&fields, "email").errors, vec![INVALID_VALUE.to_string()]);
    }

    #[test]
    fn message_keeps_only_event_locales() {
        let settings = EventSettings {
            locales: vec!["en".to_string(), "de".to_string()],
            ..EventSettings::default()
        };
        let form = SettingsForm::new(&settings, &[]);
        let bound = form.bind(&body(json!({
            "email": "^x",
            "email:message": {"en": "bad", "de": "schlecht", "fr": "mauvais"}
        })));
        let message = bound.cleaned().get("email").unwrap().message.clone().unwrap();
        assert_eq!(
            message,
            I18nString::from_pairs([("de", "schlecht"), ("en", "bad")]).unwrap()
        );
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let form = SettingsForm::new(&EventSettings::default(), &[]);
        let bound = form.bind(&body(json!({"email": "^x", "deleted_question": "^y"})));
        assert!(bound.is_valid());
        assert!(bound.cleaned().get("deleted_question").is_none());
    }

    #[test]
    fn stale_rules_are_not_live() {
        let config: ConfigMap = serde_json::from_value(json!({
            "email": "^x",
            "company": "^A",
            "deleted_q": "^[0-9]+$",
            "shirt": "^[SML]$",
            "vat": "^[A-Z]{2}"
        }))
        .unwrap();
        let questions = vec![
            question("vat", QuestionType::String, 1),
            question("shirt", QuestionType::Choice, 2),
        ];

        let live = live_rules(&EventSettings::default(), &questions, &config);
        assert_eq!(live.iter().map(|(id, _)| id).collect::<Vec<_>>(), vec!["email", "vat"]);

        let live = live_rules(&EventSettings::default(), &[], &config);
        assert_eq!(live.iter().map(|(id, _)| id).collect::<Vec<_>>(), vec!["email"]);
    }
}
