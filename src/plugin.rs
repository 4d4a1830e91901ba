//! Registration of the regex validation receivers on the host extension points.

use serde::Serialize;

use crate::services::hooks::{FormContext, Hooks};
use crate::services::injector::{self, FieldOverrides};
use crate::services::nav;

/// Registration metadata shown in the host's plugin list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PluginMeta {
    pub name: &'static str,
    pub description: &'static str,
    pub version: &'static str,
    pub category: &'static str,
    pub visible: bool,
}

pub const META: PluginMeta = PluginMeta {
    name: "Regex Validation",
    description: "Allows to add arbitrary regex validation to fields",
    version: env!("CARGO_PKG_VERSION"),
    category: "CUSTOMIZATION",
    visible: true,
};

fn form_fields_overrides(ctx: &FormContext) -> FieldOverrides {
    injector::field_overrides(&ctx.regex_config, &ctx.locale, &ctx.default_locale)
}

/// Attach the plugin's receivers to `hooks`.
pub fn register(hooks: &mut Hooks) {
    hooks
        .contact_form_fields_overrides
        .register("regex_validation_fields_overrides", form_fields_overrides);
    hooks
        .question_form_fields_overrides
        .register("regex_validations_fields_overrides", form_fields_overrides);
    hooks
        .nav_event_settings
        .register("regex_validation_nav", nav::regex_settings_entry);
}

/// Hooks with the plugin registered.
pub fn hooks() -> Hooks {
    let mut hooks = Hooks::default();
    register(&mut hooks);
    hooks
}
