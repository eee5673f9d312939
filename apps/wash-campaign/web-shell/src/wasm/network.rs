use super::*;

/// Posts leads to the same-origin relay. The credential never reaches the
/// browser; the relay adds it.
#[derive(Debug, Clone)]
pub(super) struct RelayTransport {
    path: String,
}

impl RelayTransport {
    pub(super) fn new(path: String) -> Self {
        Self { path }
    }
}

#[async_trait(?Send)]
impl SubmitTransport for RelayTransport {
    async fn submit(&self, lead: &LeadSubmission) -> RemoteResult {
        match post_lead(&self.path, lead).await {
            Ok((status, body)) => classify_response(status, &body),
            Err(error) => {
                web_sys::console::warn_1(&JsValue::from_str(&format!(
                    "lead submission for {} failed: {error}",
                    mask_phone_for_log(&lead.mobile_phone)
                )));
                RemoteResult::Failed { message: None }
            }
        }
    }
}

async fn post_lead(path: &str, lead: &LeadSubmission) -> Result<(u16, Vec<u8>), String> {
    let body = serde_json::to_string(lead)
        .map_err(|error| format!("failed to encode lead submission: {error}"))?;
    let request = Request::post(path)
        .header("content-type", "application/json")
        .header("accept", "application/json")
        .body(body)
        .map_err(|error| format!("failed to build relay request: {error}"))?;

    let exchange = async move {
        let response = request
            .send()
            .await
            .map_err(|error| format!("relay request failed: {error}"))?;
        let status = response.status();
        let body = response
            .binary()
            .await
            .map_err(|error| format!("failed to read relay response: {error}"))?;
        Ok::<_, String>((status, body))
    }
    .fuse();
    let timeout = sleep(RELAY_REQUEST_TIMEOUT).fuse();
    pin_mut!(exchange, timeout);

    select! {
        result = exchange => result,
        () = timeout => Err(format!(
            "relay request timed out after {}ms",
            RELAY_REQUEST_TIMEOUT.as_millis()
        )),
    }
}

/// Starts an attempt from the current fields and finishes it off the event
/// handler. Refusals (validation, cooldown, in flight) render immediately.
pub(super) fn submit_current_form() {
    let pending = CONTROLLER.with(|slot| {
        let mut slot = slot.borrow_mut();
        slot.as_mut()
            .map(|controller| controller.begin_submit(now_ms()).ok())
    });
    render_current();

    let Some(Some(PendingSubmission { ticket, lead })) = pending else {
        return;
    };
    let Some(transport) = RELAY_TRANSPORT.with(|slot| slot.borrow().clone()) else {
        return;
    };

    spawn_local(async move {
        let result = transport.submit(&lead).await;
        let applied = CONTROLLER.with(|slot| {
            slot.borrow_mut()
                .as_mut()
                .is_some_and(|controller| controller.complete_submit(ticket, result))
        });
        if applied {
            render_current();
        }
    });
}
