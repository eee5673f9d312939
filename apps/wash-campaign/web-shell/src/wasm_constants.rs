use web_time::Duration;

use campaign_form::DEFAULT_REQUEST_TIMEOUT;

pub(crate) const RELAY_REQUEST_TIMEOUT: Duration = DEFAULT_REQUEST_TIMEOUT;
pub(crate) const ACTIVITY_EVENTS: [&str; 2] = ["mousemove", "keypress"];
pub(crate) const PAGEHIDE_EVENT: &str = "pagehide";
pub(crate) const FIELD_INPUT_EVENT: &str = "input";
pub(crate) const CONSENT_CHANGE_EVENT: &str = "change";
pub(crate) const FORM_SUBMIT_EVENT: &str = "submit";
