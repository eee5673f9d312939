//! Native [`SubmitTransport`] backed by reqwest.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::warn;

use crate::format::mask_phone_for_log;
use crate::transport::{
    AUTH_HEADER, DEFAULT_REQUEST_TIMEOUT, LeadSubmission, RemoteResult, SubmitTransport,
    classify_response,
};

/// Where submissions go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// Same-origin style relay; the credential never leaves the server.
    Relay { url: String },
    /// Workflow endpoint called directly with the static `Auth` header.
    Direct { url: String, auth_token: String },
}

impl Endpoint {
    fn url(&self) -> &str {
        match self {
            Self::Relay { url } | Self::Direct { url, .. } => url,
        }
    }
}

#[derive(Debug, Error)]
pub enum TransportBuildError {
    #[error("submission endpoint url is empty")]
    EmptyUrl,
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: Endpoint,
}

impl HttpTransport {
    pub fn new(endpoint: Endpoint) -> Result<Self, TransportBuildError> {
        Self::with_timeout(endpoint, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(endpoint: Endpoint, timeout: Duration) -> Result<Self, TransportBuildError> {
        if endpoint.url().trim().is_empty() {
            return Err(TransportBuildError::EmptyUrl);
        }
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoint })
    }

    #[must_use]
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }
}

#[async_trait(?Send)]
impl SubmitTransport for HttpTransport {
    async fn submit(&self, lead: &LeadSubmission) -> RemoteResult {
        let mut request = self
            .client
            .post(self.endpoint.url())
            .header("accept", "application/json")
            .json(lead);
        if let Endpoint::Direct { auth_token, .. } = &self.endpoint {
            request = request.header(AUTH_HEADER, auth_token);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(error) => {
                warn!(
                    phone = %mask_phone_for_log(&lead.mobile_phone),
                    timeout = error.is_timeout(),
                    error = %error,
                    "lead submission request failed"
                );
                return RemoteResult::Failed { message: None };
            }
        };

        let status = response.status().as_u16();
        match response.bytes().await {
            Ok(body) => classify_response(status, &body),
            Err(error) => {
                warn!(status, error = %error, "failed to read lead submission response");
                RemoteResult::Failed { message: None }
            }
        }
    }
}
