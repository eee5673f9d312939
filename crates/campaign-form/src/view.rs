//! What a host should render for the current controller state, and the DOM
//! contract shared by the server-rendered page and the browser shell.

use crate::controller::{FieldId, FormController, FormOptions, SubmissionState};
use crate::copy::{SUBMIT_LABEL, SUBMITTING_LABEL};

pub const FORM_ROOT_ID: &str = "wash-campaign";
pub const FORM_PANEL_ID: &str = "lead-form-panel";
pub const FORM_ID: &str = "lead-form";
pub const CONSENT_INPUT_ID: &str = "consent";
pub const SUBMIT_BUTTON_ID: &str = "lead-submit";
pub const ERROR_SLOT_ID: &str = "lead-error";
pub const ISSUED_PANEL_ID: &str = "panel-issued";
pub const ISSUED_MESSAGE_ID: &str = "panel-issued-message";
pub const WELCOME_BACK_PANEL_ID: &str = "panel-welcome-back";

pub const ATTR_CONSENT_REQUIRED: &str = "data-consent-required";
pub const ATTR_SESSION_TIMEOUT_ENABLED: &str = "data-session-timeout-enabled";
pub const ATTR_COOLDOWN_ENABLED: &str = "data-cooldown-enabled";
pub const ATTR_RELAY_PATH: &str = "data-relay-path";

#[must_use]
pub fn input_id(field: FieldId) -> &'static str {
    match field {
        FieldId::FirstName => "first-name",
        FieldId::LastName => "last-name",
        FieldId::MobilePhone => "mobile-phone",
    }
}

#[must_use]
pub fn bool_attr(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

impl FormOptions {
    /// Reads the option switches off the form root. Missing or unreadable
    /// attributes keep their defaults.
    pub fn from_attributes<F>(mut attribute: F) -> Self
    where
        F: FnMut(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let mut flag = |name: &str, default: bool| {
            attribute(name)
                .and_then(|value| parse_flag(&value))
                .unwrap_or(default)
        };
        Self {
            consent_required: flag(ATTR_CONSENT_REQUIRED, defaults.consent_required),
            session_timeout_enabled: flag(
                ATTR_SESSION_TIMEOUT_ENABLED,
                defaults.session_timeout_enabled,
            ),
            cooldown_enabled: flag(ATTR_COOLDOWN_ENABLED, defaults.cooldown_enabled),
            ..defaults
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Form,
    Issued,
    WelcomeBack,
}

/// Render snapshot of a [`FormController`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormView {
    pub panel: Panel,
    pub first_name: String,
    pub last_name: String,
    pub phone_display: String,
    pub consent: bool,
    pub error: Option<String>,
    pub issued_message: Option<String>,
    pub submit_label: &'static str,
    pub submit_disabled: bool,
    /// Inputs are locked while a request is in flight; a success reply
    /// clears the fields and would drop anything typed meanwhile.
    pub inputs_disabled: bool,
}

impl FormView {
    #[must_use]
    pub fn of(controller: &FormController) -> Self {
        let state = controller.state();
        let fields = controller.fields();
        let submitting = matches!(state, SubmissionState::Submitting);
        Self {
            panel: match state {
                SubmissionState::Success { .. } => Panel::Issued,
                SubmissionState::AlreadyRedeemed => Panel::WelcomeBack,
                _ => Panel::Form,
            },
            first_name: fields.first_name.clone(),
            last_name: fields.last_name.clone(),
            phone_display: fields.phone_display.clone(),
            consent: controller.consent(),
            error: state.error().map(ToString::to_string),
            issued_message: match state {
                SubmissionState::Success { message } => message.clone(),
                _ => None,
            },
            submit_label: if submitting { SUBMITTING_LABEL } else { SUBMIT_LABEL },
            submit_disabled: submitting,
            inputs_disabled: submitting,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::transport::RemoteResult;

    fn attrs(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect()
    }

    #[test]
    fn options_read_from_attributes() {
        let map = attrs(&[
            (ATTR_CONSENT_REQUIRED, "false"),
            (ATTR_COOLDOWN_ENABLED, " NO "),
            (ATTR_SESSION_TIMEOUT_ENABLED, "1"),
        ]);
        let options = FormOptions::from_attributes(|name| map.get(name).cloned());
        assert!(!options.consent_required);
        assert!(!options.cooldown_enabled);
        assert!(options.session_timeout_enabled);
    }

    #[test]
    fn unknown_attribute_values_keep_defaults() {
        let map = attrs(&[(ATTR_CONSENT_REQUIRED, "maybe")]);
        let options = FormOptions::from_attributes(|name| map.get(name).cloned());
        assert_eq!(options, FormOptions::default());
    }

    #[test]
    fn submitting_view_disables_the_button() {
        let mut controller = FormController::without_expiry_timer(FormOptions {
            consent_required: false,
            ..FormOptions::default()
        });
        controller.set_field(FieldId::FirstName, "ada");
        controller.set_field(FieldId::LastName, "lovelace");
        controller.set_field(FieldId::MobilePhone, "5551234567");

        assert_eq!(FormView::of(&controller).submit_label, SUBMIT_LABEL);
        let pending = controller.begin_submit(0).expect("begin submit");

        let view = FormView::of(&controller);
        assert_eq!(view.submit_label, SUBMITTING_LABEL);
        assert!(view.submit_disabled);
        assert!(view.inputs_disabled);
        assert_eq!(view.phone_display, "(555)-123-4567");

        controller.complete_submit(
            pending.ticket,
            RemoteResult::Issued {
                message: Some("Code sent".to_string()),
            },
        );
        let view = FormView::of(&controller);
        assert_eq!(view.panel, Panel::Issued);
        assert_eq!(view.issued_message.as_deref(), Some("Code sent"));
        assert!(view.first_name.is_empty());
        assert!(!view.inputs_disabled);
    }

    #[test]
    fn error_view_carries_the_message() {
        let mut controller = FormController::without_expiry_timer(FormOptions::default());
        controller.begin_submit(0).expect_err("empty form");
        let view = FormView::of(&controller);
        assert_eq!(view.panel, Panel::Form);
        assert_eq!(view.error.as_deref(), Some("Please fill in all fields"));
    }
}
