use campaign_form::copy::{
    CONSENT_DISCLOSURE, DELIVERY_NOTE, FIRST_NAME_LABEL, HEADING, INTRO, ISSUED_BODY,
    ISSUED_FOOTNOTE, ISSUED_HEADING, ISSUED_LEAD, LAST_NAME_LABEL, PAGE_TITLE, PHONE_LABEL,
    SUBMIT_LABEL, WELCOME_BACK_BODY, WELCOME_BACK_FOOTNOTE, WELCOME_BACK_HEADING,
    WELCOME_BACK_LEAD,
};
use campaign_form::view::{
    ATTR_CONSENT_REQUIRED, ATTR_COOLDOWN_ENABLED, ATTR_RELAY_PATH, ATTR_SESSION_TIMEOUT_ENABLED,
    CONSENT_INPUT_ID, ERROR_SLOT_ID, FORM_ID, FORM_PANEL_ID, FORM_ROOT_ID, ISSUED_MESSAGE_ID,
    ISSUED_PANEL_ID, SUBMIT_BUTTON_ID, WELCOME_BACK_PANEL_ID, bool_attr, input_id,
};
use campaign_form::{
    FieldId, FormOptions, PHONE_DISPLAY_MAX_LEN, PHONE_DISPLAY_PLACEHOLDER, RELAY_SUBMIT_PATH,
};
use maud::{DOCTYPE, Markup, PreEscaped, html};

/// wasm-bindgen `--target web` glue for the browser shell.
pub const WEB_SHELL_MODULE_PATH: &str = "/assets/wash_campaign_web_shell.js";

pub fn render_form_page(options: &FormOptions) -> String {
    let boot = format!("import init from \"{WEB_SHELL_MODULE_PATH}\";\ninit();");
    let markup = html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (PAGE_TITLE) }
                style { (PreEscaped(styles())) }
                script type="module" { (PreEscaped(boot)) }
            }
            body {
                main id=(FORM_ROOT_ID)
                    class="wc-shell"
                    data-consent-required=(bool_attr(options.consent_required))
                    data-session-timeout-enabled=(bool_attr(options.session_timeout_enabled))
                    data-cooldown-enabled=(bool_attr(options.cooldown_enabled))
                    data-relay-path=(RELAY_SUBMIT_PATH) {
                    (form_panel(options))
                    (issued_panel())
                    (welcome_back_panel())
                }
            }
        }
    };

    markup.into_string()
}

fn form_panel(options: &FormOptions) -> Markup {
    html! {
        section id=(FORM_PANEL_ID) class="wc-card" {
            h1 { (HEADING) }
            p class="wc-intro" { (INTRO) }
            form id=(FORM_ID) class="wc-form" novalidate {
                div class="wc-row" {
                    (text_field(FieldId::FirstName, FIRST_NAME_LABEL, "given-name"))
                    (text_field(FieldId::LastName, LAST_NAME_LABEL, "family-name"))
                }
                div class="wc-field" {
                    label for=(input_id(FieldId::MobilePhone)) { (PHONE_LABEL) }
                    input id=(input_id(FieldId::MobilePhone))
                        name=(FieldId::MobilePhone.as_str())
                        type="tel"
                        inputmode="numeric"
                        autocomplete="tel-national"
                        maxlength=(PHONE_DISPLAY_MAX_LEN)
                        placeholder=(PHONE_DISPLAY_PLACEHOLDER)
                        required;
                }
                @if options.consent_required {
                    label class="wc-consent" for=(CONSENT_INPUT_ID) {
                        input id=(CONSENT_INPUT_ID) name="consent" type="checkbox";
                        span { (CONSENT_DISCLOSURE) }
                    }
                }
                p id=(ERROR_SLOT_ID) class="wc-error" role="alert" hidden {}
                button id=(SUBMIT_BUTTON_ID) type="submit" class="wc-btn" { (SUBMIT_LABEL) }
                p class="wc-note" { (DELIVERY_NOTE) }
            }
        }
    }
}

fn text_field(field: FieldId, label: &str, autocomplete: &str) -> Markup {
    html! {
        div class="wc-field" {
            label for=(input_id(field)) { (label) }
            input id=(input_id(field))
                name=(field.as_str())
                type="text"
                autocomplete=(autocomplete)
                required;
        }
    }
}

fn issued_panel() -> Markup {
    html! {
        section id=(ISSUED_PANEL_ID) class="wc-card wc-result" hidden {
            h2 { (ISSUED_HEADING) }
            p class="wc-lead" { (ISSUED_LEAD) }
            p id=(ISSUED_MESSAGE_ID) class="wc-code" hidden {}
            p { (ISSUED_BODY) }
            p class="wc-muted" { (ISSUED_FOOTNOTE) }
        }
    }
}

fn welcome_back_panel() -> Markup {
    html! {
        section id=(WELCOME_BACK_PANEL_ID) class="wc-card wc-result" hidden {
            h2 { (WELCOME_BACK_HEADING) }
            p class="wc-lead" { (WELCOME_BACK_LEAD) }
            p { (WELCOME_BACK_BODY) }
            p class="wc-muted" { (WELCOME_BACK_FOOTNOTE) }
        }
    }
}

fn styles() -> &'static str {
    r#"
:root {
  color-scheme: light;
  --bg: #eef4fb;
  --card: #ffffff;
  --text: #13233a;
  --muted: #5b6b82;
  --accent: #0b6bcb;
  --accent-strong: #0858a8;
  --danger: #c0283c;
}
* { box-sizing: border-box; }
html, body { margin: 0; min-height: 100%; background: var(--bg); color: var(--text); }
body { font-family: "Inter", -apple-system, BlinkMacSystemFont, "Segoe UI", sans-serif; }
.wc-shell { max-width: 34rem; margin: 0 auto; padding: 2rem 1rem; }
.wc-card {
  background: var(--card);
  border-radius: 14px;
  padding: 1.75rem;
  box-shadow: 0 12px 30px rgba(19, 35, 58, 0.12);
}
.wc-card h1, .wc-card h2 { margin-top: 0; text-align: center; }
.wc-intro, .wc-note, .wc-muted { color: var(--muted); }
.wc-note { font-size: 0.85rem; text-align: center; }
.wc-form { display: grid; gap: 1rem; }
.wc-row { display: grid; grid-template-columns: 1fr 1fr; gap: 0.75rem; }
.wc-field { display: grid; gap: 0.35rem; }
.wc-field input {
  font: inherit;
  padding: 0.65rem 0.75rem;
  border: 1px solid #c5d3e4;
  border-radius: 8px;
}
.wc-consent { display: flex; gap: 0.6rem; align-items: flex-start; font-size: 0.8rem; color: var(--muted); }
.wc-error { margin: 0; color: var(--danger); font-weight: 600; }
.wc-btn {
  font: inherit;
  font-weight: 700;
  padding: 0.8rem 1rem;
  border: 0;
  border-radius: 8px;
  background: var(--accent);
  color: #fff;
  cursor: pointer;
}
.wc-btn:hover { background: var(--accent-strong); }
.wc-btn:disabled { opacity: 0.6; cursor: progress; }
.wc-result { text-align: center; }
.wc-lead { font-size: 1.15rem; font-weight: 600; }
.wc-code { font-family: ui-monospace, monospace; font-size: 1.1rem; }
[hidden] { display: none !important; }
"#
}
