use super::*;

pub(super) fn document() -> Result<web_sys::Document, String> {
    let window = web_sys::window().ok_or_else(|| "window is unavailable".to_string())?;
    window
        .document()
        .ok_or_else(|| "document is unavailable".to_string())
}

pub(super) fn element_by_id(id: &str) -> Result<web_sys::Element, String> {
    document()?
        .get_element_by_id(id)
        .ok_or_else(|| format!("#{id} is missing"))
}

fn html_element(id: &str) -> Result<HtmlElement, String> {
    element_by_id(id)?
        .dyn_into::<HtmlElement>()
        .map_err(|_| format!("#{id} is not HtmlElement"))
}

fn input_element(id: &str) -> Result<HtmlInputElement, String> {
    element_by_id(id)?
        .dyn_into::<HtmlInputElement>()
        .map_err(|_| format!("#{id} is not HtmlInputElement"))
}

/// The consent box only exists when the page asks for consent.
fn consent_input() -> Option<HtmlInputElement> {
    input_element(CONSENT_INPUT_ID).ok()
}

pub(super) fn bind_form_listeners() -> Result<(), String> {
    for field in FieldId::ALL {
        let input = input_element(input_id(field))?;
        add_listener(input.as_ref(), FIELD_INPUT_EVENT, move |event| {
            let Some(raw) = event
                .target()
                .and_then(|target| target.dyn_into::<HtmlInputElement>().ok())
                .map(|input| input.value())
            else {
                return;
            };
            CONTROLLER.with(|slot| {
                if let Some(controller) = slot.borrow_mut().as_mut() {
                    controller.set_field(field, &raw);
                }
            });
            render_current();
        })?;
    }

    if let Some(consent) = consent_input() {
        add_listener(consent.as_ref(), CONSENT_CHANGE_EVENT, |event| {
            let checked = event
                .target()
                .and_then(|target| target.dyn_into::<HtmlInputElement>().ok())
                .is_some_and(|input| input.checked());
            CONTROLLER.with(|slot| {
                if let Some(controller) = slot.borrow_mut().as_mut() {
                    controller.set_consent(checked);
                }
            });
            render_current();
        })?;
    }

    let form = element_by_id(FORM_ID)?;
    add_listener(form.as_ref(), FORM_SUBMIT_EVENT, |event| {
        event.prevent_default();
        submit_current_form();
    })?;
    Ok(())
}

/// Renders the controller's current view, if the shell is still attached.
pub(super) fn render_current() {
    let view = CONTROLLER.with(|slot| slot.borrow().as_ref().map(FormView::of));
    let Some(view) = view else {
        return;
    };
    if let Err(error) = render(&view) {
        web_sys::console::error_1(&JsValue::from_str(&format!(
            "failed to render lead form: {error}"
        )));
    }
}

fn render(view: &FormView) -> Result<(), String> {
    for (field, value) in [
        (FieldId::FirstName, &view.first_name),
        (FieldId::LastName, &view.last_name),
        (FieldId::MobilePhone, &view.phone_display),
    ] {
        let input = input_element(input_id(field))?;
        // Rewriting an unchanged value would move the caret to the end.
        if input.value() != *value {
            input.set_value(value);
        }
        input.set_disabled(view.inputs_disabled);
    }
    if let Some(consent) = consent_input() {
        consent.set_checked(view.consent);
        consent.set_disabled(view.inputs_disabled);
    }

    let error_slot = html_element(ERROR_SLOT_ID)?;
    match &view.error {
        Some(message) => {
            error_slot.set_text_content(Some(message));
            error_slot.set_hidden(false);
        }
        None => {
            error_slot.set_text_content(None);
            error_slot.set_hidden(true);
        }
    }

    let button = element_by_id(SUBMIT_BUTTON_ID)?
        .dyn_into::<HtmlButtonElement>()
        .map_err(|_| format!("#{SUBMIT_BUTTON_ID} is not HtmlButtonElement"))?;
    button.set_disabled(view.submit_disabled);
    button.set_text_content(Some(view.submit_label));

    let visibility = PanelVisibility::for_panel(view.panel);
    html_element(FORM_PANEL_ID)?.set_hidden(!visibility.form);
    html_element(ISSUED_PANEL_ID)?.set_hidden(!visibility.issued);
    html_element(WELCOME_BACK_PANEL_ID)?.set_hidden(!visibility.welcome_back);

    let issued_message = html_element(ISSUED_MESSAGE_ID)?;
    issued_message.set_text_content(view.issued_message.as_deref());
    issued_message.set_hidden(view.issued_message.is_none());
    Ok(())
}
