use axum::Json;
use axum::http::StatusCode;
use campaign_form::REMOTE_FALLBACK_MESSAGE;
use serde::{Deserialize, Serialize};

pub const METHOD_NOT_ALLOWED_MESSAGE: &str = "Method not allowed";
pub const INVALID_BODY_MESSAGE: &str = "Invalid request body";

pub type ApiMessageTuple = (StatusCode, Json<ApiMessage>);

/// The `{message}` body the form reads on every failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiMessage {
    pub message: String,
}

pub fn message_response(status: StatusCode, message: impl Into<String>) -> ApiMessageTuple {
    (
        status,
        Json(ApiMessage {
            message: message.into(),
        }),
    )
}

pub fn method_not_allowed() -> ApiMessageTuple {
    message_response(StatusCode::METHOD_NOT_ALLOWED, METHOD_NOT_ALLOWED_MESSAGE)
}

pub fn invalid_body() -> ApiMessageTuple {
    message_response(StatusCode::BAD_REQUEST, INVALID_BODY_MESSAGE)
}

/// 500 carrying the upstream message, or the generic fallback.
pub fn upstream_failure(message: Option<String>) -> ApiMessageTuple {
    let message = message
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| REMOTE_FALLBACK_MESSAGE.to_string());
    message_response(StatusCode::INTERNAL_SERVER_ERROR, message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_failure_falls_back_on_blank_message() {
        let (status, Json(body)) = upstream_failure(Some("  ".to_string()));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.message, REMOTE_FALLBACK_MESSAGE);

        let (_, Json(body)) = upstream_failure(Some("Workflow is paused".to_string()));
        assert_eq!(body.message, "Workflow is paused");
    }

    #[test]
    fn method_not_allowed_uses_405() {
        let (status, Json(body)) = method_not_allowed();
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body.message, METHOD_NOT_ALLOWED_MESSAGE);
    }
}
