//! Named extension points the host invokes while building pages and forms.
//!
//! Receivers are plain functions registered under a dispatch uid; registering
//! the same uid twice on one extension point is a no-op. Invoking an extension
//! point calls every receiver in registration order.

use serde::Deserialize;

use crate::models::event::Event;
use crate::models::regex_config::ConfigMap;
use crate::services::injector::FieldOverrides;
use crate::services::nav::{NavContext, NavEntry};

pub type Receiver<A, R> = fn(&A) -> R;

/// One named extension point with its registered receivers.
#[derive(Debug, Clone)]
pub struct ExtensionPoint<A, R> {
    name: &'static str,
    receivers: Vec<(&'static str, Receiver<A, R>)>,
}

impl<A, R> ExtensionPoint<A, R> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            receivers: Vec::new(),
        }
    }

    /// Register `receiver` under `dispatch_uid`. Returns false if the uid is taken.
    pub fn register(&mut self, dispatch_uid: &'static str, receiver: Receiver<A, R>) -> bool {
        if self.receivers.iter().any(|(uid, _)| *uid == dispatch_uid) {
            return false;
        }
        tracing::debug!(extension_point = self.name, dispatch_uid, "Registered receiver");
        self.receivers.push((dispatch_uid, receiver));
        true
    }

    /// Call every receiver with `args`, returning each result with its uid.
    pub fn send(&self, args: &A) -> Vec<(&'static str, R)> {
        self.receivers
            .iter()
            .map(|(uid, receiver)| (*uid, receiver(args)))
            .collect()
    }
}

/// Which checkout form is being built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormKind {
    Contact,
    Questions,
}

/// Input to the form field override extension points.
#[derive(Debug, Clone)]
pub struct FormContext {
    pub event: Event,
    pub regex_config: ConfigMap,
    pub locale: String,
    pub default_locale: String,
}

/// All extension points known to the service.
#[derive(Debug, Clone)]
pub struct Hooks {
    pub contact_form_fields_overrides: ExtensionPoint<FormContext, FieldOverrides>,
    pub question_form_fields_overrides: ExtensionPoint<FormContext, FieldOverrides>,
    pub nav_event_settings: ExtensionPoint<NavContext, Vec<NavEntry>>,
}

impl Default for Hooks {
    fn default() -> Self {
        Self {
            contact_form_fields_overrides: ExtensionPoint::new("contact_form_fields_overrides"),
            question_form_fields_overrides: ExtensionPoint::new("question_form_fields_overrides"),
            nav_event_settings: ExtensionPoint::new("nav_event_settings"),
        }
    }
}

impl Hooks {
    pub fn form_fields_overrides(&self, kind: FormKind) -> &ExtensionPoint<FormContext, FieldOverrides> {
        match kind {
            FormKind::Contact => &self.contact_form_fields_overrides,
            FormKind::Questions => &self.question_form_fields_overrides,
        }
    }

    /// Merged overrides of every receiver for the given form.
    pub fn collect_overrides(&self, kind: FormKind, ctx: &FormContext) -> FieldOverrides {
        let mut merged = FieldOverrides::default();
        for (_, overrides) in self.form_fields_overrides(kind).send(ctx) {
            merged.merge(overrides);
        }
        merged
    }

    /// Navigation entries of every receiver, in registration order.
    pub fn collect_nav(&self, ctx: &NavContext) -> Vec<NavEntry> {
        self.nav_event_settings
            .send(ctx)
            .into_iter()
            .flat_map(|(_, entries)| entries)
            .collect()
    }
}
