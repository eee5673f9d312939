use std::time::Duration;

use campaign_form::{Panel, RELAY_SUBMIT_PATH};

/// Which sections of the page are shown for a panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PanelVisibility {
    pub(crate) form: bool,
    pub(crate) issued: bool,
    pub(crate) welcome_back: bool,
}

impl PanelVisibility {
    pub(crate) fn for_panel(panel: Panel) -> Self {
        Self {
            form: panel == Panel::Form,
            issued: panel == Panel::Issued,
            welcome_back: panel == Panel::WelcomeBack,
        }
    }
}

/// Same-origin relay path from the page, or the built-in one. Absolute and
/// protocol-relative URLs are refused so submissions never leave the origin.
pub(crate) fn resolve_relay_path(attribute: Option<String>) -> String {
    attribute
        .map(|value| value.trim().to_string())
        .filter(|value| value.starts_with('/') && !value.starts_with("//"))
        .unwrap_or_else(|| RELAY_SUBMIT_PATH.to_string())
}

/// A page entering the back/forward cache keeps its shell so it still works
/// when restored; only a page that is really going away is torn down.
pub(crate) fn releases_on_pagehide(persisted: bool) -> bool {
    !persisted
}

/// `setTimeout` delay, clamped to what the browser accepts.
pub(crate) fn timeout_millis(delay: Duration) -> u32 {
    u32::try_from(delay.as_millis())
        .unwrap_or(u32::MAX)
        .min(i32::MAX as u32)
}
