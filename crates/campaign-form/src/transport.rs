use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Header the workflow endpoint reads its static credential from.
pub const AUTH_HEADER: &str = "Auth";

/// Same-origin relay path that injects the credential server-side.
pub const RELAY_SUBMIT_PATH: &str = "/api/submit-form";

/// Upper bound on one submission request, whichever host sends it.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Outbound body. Field names are the workflow's wire names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadSubmission {
    pub first_name: String,
    pub last_name: String,
    pub mobile_phone: String,
}

/// Classified outcome of the single outbound call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteResult {
    /// `code` was truthy; a code is on its way by SMS.
    Issued { message: Option<String> },
    /// `code` was falsy; the workflow already issued one to this customer.
    AlreadyRedeemed,
    /// Non-2xx, network failure, timeout, or a body of unexpected shape.
    Failed { message: Option<String> },
}

impl RemoteResult {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Issued { .. } => "issued",
            Self::AlreadyRedeemed => "already_redeemed",
            Self::Failed { .. } => "failed",
        }
    }
}

#[async_trait(?Send)]
pub trait SubmitTransport {
    /// Sends exactly one request. Implementations never retry.
    async fn submit(&self, lead: &LeadSubmission) -> RemoteResult;
}

/// Maps a workflow (or relay) reply onto [`RemoteResult`].
#[must_use]
pub fn classify_response(status: u16, body: &[u8]) -> RemoteResult {
    if !(200..300).contains(&status) {
        return RemoteResult::Failed {
            message: error_message_from_body(body),
        };
    }

    let Ok(Value::Object(payload)) = serde_json::from_slice::<Value>(body) else {
        return RemoteResult::Failed { message: None };
    };

    match payload.get("code") {
        None => RemoteResult::Failed { message: None },
        Some(code) if is_truthy(code) => RemoteResult::Issued {
            message: payload
                .get("message")
                .and_then(Value::as_str)
                .map(ToString::to_string),
        },
        Some(_) => RemoteResult::AlreadyRedeemed,
    }
}

/// Non-empty `message` string from a JSON error body.
#[must_use]
pub fn error_message_from_body(body: &[u8]) -> Option<String> {
    let payload = serde_json::from_slice::<Value>(body).ok()?;
    payload
        .get("message")
        .and_then(Value::as_str)
        .map(|message| message.trim().to_string())
        .filter(|message| !message.is_empty())
}

/// Truthiness as the workflow's JavaScript clients judge it.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
