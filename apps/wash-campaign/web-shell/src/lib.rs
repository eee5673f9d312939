#![allow(clippy::needless_pass_by_value)]

#[cfg(any(target_arch = "wasm32", test))]
mod shell_state;
#[cfg(target_arch = "wasm32")]
mod wasm_constants;

#[cfg(target_arch = "wasm32")]
mod wasm {
    use std::cell::RefCell;
    use web_time::Duration;

    use async_trait::async_trait;
    use campaign_form::view::{
        ATTR_RELAY_PATH, CONSENT_INPUT_ID, ERROR_SLOT_ID, FORM_ID, FORM_PANEL_ID, FORM_ROOT_ID,
        ISSUED_MESSAGE_ID, ISSUED_PANEL_ID, SUBMIT_BUTTON_ID, WELCOME_BACK_PANEL_ID, input_id,
    };
    use campaign_form::{
        ExpiryTimer, FieldId, FormController, FormOptions, FormView, LeadSubmission,
        PendingSubmission, RemoteResult, SubmitTransport, classify_response, mask_phone_for_log,
    };
    use futures_util::{FutureExt, pin_mut, select};
    use gloo_net::http::Request;
    use gloo_timers::callback::Timeout;
    use gloo_timers::future::sleep;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::spawn_local;
    use web_sys::{HtmlButtonElement, HtmlElement, HtmlInputElement};

    use crate::shell_state::{
        PanelVisibility, releases_on_pagehide, resolve_relay_path, timeout_millis,
    };
    use crate::wasm_constants::*;

    mod dom;
    mod lifecycle;
    mod network;

    use dom::*;
    use lifecycle::*;
    use network::*;

    /// A listener the shell registered and must remove on teardown.
    pub(super) struct Listener {
        target: web_sys::EventTarget,
        event: &'static str,
        callback: Closure<dyn FnMut(web_sys::Event)>,
    }

    thread_local! {
        static CONTROLLER: RefCell<Option<FormController>> = const { RefCell::new(None) };
        static RELAY_TRANSPORT: RefCell<Option<RelayTransport>> = const { RefCell::new(None) };
        static LISTENERS: RefCell<Vec<Listener>> = const { RefCell::new(Vec::new()) };
        static EXPIRY_TIMEOUT: RefCell<Option<Timeout>> = const { RefCell::new(None) };
    }

    #[wasm_bindgen(start)]
    pub fn start() {
        console_error_panic_hook::set_once();
        if let Err(error) = boot() {
            web_sys::console::error_1(&JsValue::from_str(&format!(
                "wash campaign shell failed to start: {error}"
            )));
        }
    }

    /// Removes every listener and cancels the pending session expiry.
    #[wasm_bindgen]
    pub fn teardown() {
        release_shell();
    }

    #[wasm_bindgen]
    pub fn form_state_json() -> String {
        CONTROLLER.with(|slot| {
            let slot = slot.borrow();
            let Some(controller) = slot.as_ref() else {
                return "{\"state\":\"detached\"}".to_string();
            };
            let clock = controller.guard_clock();
            serde_json::json!({
                "state": controller.state().as_str(),
                "last_submission_at": clock.last_submission_at,
                "session_deadline": clock.session_deadline,
            })
            .to_string()
        })
    }
}
