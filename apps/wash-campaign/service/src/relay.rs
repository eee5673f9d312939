//! Server-side forwarder for lead submissions.
//!
//! The browser posts to the relay without any credential; the relay adds the
//! workflow's `Auth` header from configuration and passes the reply through.

use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use campaign_form::transport::error_message_from_body;
use campaign_form::{AUTH_HEADER, LeadSubmission, mask_phone_for_log};
use thiserror::Error;

use crate::config::Config;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("workflow request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("workflow rejected the submission with status {status}")]
    Upstream { status: u16, message: Option<String> },
}

impl RelayError {
    /// Message safe to hand back to the browser.
    #[must_use]
    pub fn client_message(&self) -> Option<String> {
        match self {
            Self::Transport(_) => None,
            Self::Upstream { message, .. } => message.clone(),
        }
    }
}

/// Successful workflow reply, relayed as received.
#[derive(Debug)]
pub struct UpstreamReply {
    pub status: StatusCode,
    pub content_type: Option<HeaderValue>,
    pub body: Bytes,
}

impl IntoResponse for UpstreamReply {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        let content_type = self
            .content_type
            .unwrap_or_else(|| HeaderValue::from_static("application/json"));
        response.headers_mut().insert(CONTENT_TYPE, content_type);
        response
    }
}

#[derive(Debug, Clone)]
pub struct WorkflowRelay {
    http: reqwest::Client,
    endpoint: String,
    auth_token: String,
    timeout: Duration,
}

impl WorkflowRelay {
    pub fn from_config(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: config.api_endpoint.clone(),
            auth_token: config.api_auth_token.clone(),
            timeout: config.upstream_timeout(),
        }
    }

    /// One POST to the workflow. Never retried.
    pub async fn forward(&self, lead: &LeadSubmission) -> Result<UpstreamReply, RelayError> {
        let response = self
            .http
            .post(self.endpoint.as_str())
            .header(AUTH_HEADER, self.auth_token.as_str())
            .timeout(self.timeout)
            .json(lead)
            .send()
            .await?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE.as_str())
            .and_then(|value| HeaderValue::from_bytes(value.as_bytes()).ok());
        let body = response.bytes().await?;

        let status = match StatusCode::from_u16(status) {
            Ok(status) if status.is_success() => status,
            _ => {
                return Err(RelayError::Upstream {
                    status,
                    message: error_message_from_body(&body),
                });
            }
        };

        tracing::info!(
            phone = %mask_phone_for_log(&lead.mobile_phone),
            status = status.as_u16(),
            "lead submission relayed"
        );
        Ok(UpstreamReply {
            status,
            content_type,
            body,
        })
    }
}
