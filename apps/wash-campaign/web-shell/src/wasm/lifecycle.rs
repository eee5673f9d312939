use super::*;

/// Session expiry backed by a single `setTimeout`. Storing a new
/// [`Timeout`] drops, and so clears, the one it replaces.
pub(super) struct GlooExpiryTimer;

impl ExpiryTimer for GlooExpiryTimer {
    fn arm(&mut self, delay: Duration) {
        let timeout = Timeout::new(timeout_millis(delay), on_session_expiry);
        EXPIRY_TIMEOUT.with(|slot| {
            slot.borrow_mut().replace(timeout);
        });
    }

    fn cancel(&mut self) {
        let pending = EXPIRY_TIMEOUT.with(|slot| slot.borrow_mut().take());
        drop(pending);
    }
}

fn on_session_expiry() {
    EXPIRY_TIMEOUT.with(|slot| {
        let _ = slot.borrow_mut().take();
    });
    let expired = CONTROLLER.with(|slot| {
        slot.borrow_mut()
            .as_mut()
            .is_some_and(|controller| controller.handle_session_expiry(now_ms()))
    });
    if expired {
        render_current();
    }
}

pub(super) fn now_ms() -> u64 {
    let now = js_sys::Date::now();
    if now.is_finite() && now >= 0.0 {
        now.floor() as u64
    } else {
        0
    }
}

pub(super) fn boot() -> Result<(), String> {
    if CONTROLLER.with(|slot| slot.borrow().is_some()) {
        return Ok(());
    }

    let root = element_by_id(FORM_ROOT_ID)?;
    let options = FormOptions::from_attributes(|name| root.get_attribute(name));
    let relay_path = resolve_relay_path(root.get_attribute(ATTR_RELAY_PATH));

    RELAY_TRANSPORT.with(|slot| {
        slot.borrow_mut().replace(RelayTransport::new(relay_path));
    });
    CONTROLLER.with(|slot| {
        slot.borrow_mut()
            .replace(FormController::new(options, Box::new(GlooExpiryTimer)));
    });

    bind_form_listeners()?;
    bind_activity_listeners()?;
    render_current();
    Ok(())
}

fn bind_activity_listeners() -> Result<(), String> {
    let document = document()?;
    for event in ACTIVITY_EVENTS {
        add_listener(document.as_ref(), event, |_event| {
            CONTROLLER.with(|slot| {
                if let Some(controller) = slot.borrow_mut().as_mut() {
                    controller.record_activity(now_ms());
                }
            });
        })?;
    }

    let window = web_sys::window().ok_or_else(|| "window is unavailable".to_string())?;
    add_listener(window.as_ref(), PAGEHIDE_EVENT, |event| {
        let persisted = event
            .dyn_ref::<web_sys::PageTransitionEvent>()
            .is_some_and(web_sys::PageTransitionEvent::persisted);
        if releases_on_pagehide(persisted) {
            release_shell();
        }
    })?;
    Ok(())
}

pub(super) fn add_listener(
    target: &web_sys::EventTarget,
    event: &'static str,
    handler: impl FnMut(web_sys::Event) + 'static,
) -> Result<(), String> {
    let callback = Closure::<dyn FnMut(web_sys::Event)>::wrap(Box::new(handler));
    target
        .add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
        .map_err(|_| format!("failed to bind {event} listener"))?;
    LISTENERS.with(|slot| {
        slot.borrow_mut().push(Listener {
            target: target.clone(),
            event,
            callback,
        });
    });
    Ok(())
}

/// Detaches every listener and drops the controller, which cancels the
/// pending expiry. Safe to call more than once.
pub(super) fn release_shell() {
    let listeners = LISTENERS.with(|slot| std::mem::take(&mut *slot.borrow_mut()));
    for listener in listeners {
        let _ = listener.target.remove_event_listener_with_callback(
            listener.event,
            listener.callback.as_ref().unchecked_ref(),
        );
    }

    let controller = CONTROLLER.with(|slot| slot.borrow_mut().take());
    if let Some(controller) = controller {
        controller.teardown();
    }
    RELAY_TRANSPORT.with(|slot| {
        let _ = slot.borrow_mut().take();
    });
}
