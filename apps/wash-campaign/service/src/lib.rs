use std::sync::Arc;
use std::time::{Duration, SystemTime};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::{ALLOW, CACHE_CONTROL};
use axum::http::{HeaderValue, Method};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{any, get};
use axum::{Json, Router};
use campaign_form::{LeadSubmission, RELAY_SUBMIT_PATH};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub mod api_envelope;
pub mod config;
pub mod relay;
pub mod web_maud;

use crate::api_envelope::{invalid_body, method_not_allowed, upstream_failure};
use crate::config::Config;
use crate::relay::{RelayError, WorkflowRelay};
use crate::web_maud::render_form_page;

const SERVICE_NAME: &str = "wash-campaign-service";
const CACHE_NO_STORE: &str = "no-store";
/// Headroom over the upstream timeout before a request is abandoned.
const REQUEST_TIMEOUT_MARGIN: Duration = Duration::from_secs(5);

#[derive(Clone)]
struct AppState {
    config: Arc<Config>,
    relay: Arc<WorkflowRelay>,
    started_at: SystemTime,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    service: &'static str,
    version: &'static str,
    uptime_seconds: u64,
}

pub fn build_router(config: Config) -> Router {
    let relay = WorkflowRelay::from_config(&config);
    let assets = ServeDir::new(&config.static_dir);
    let request_timeout = config.upstream_timeout() + REQUEST_TIMEOUT_MARGIN;
    let state = AppState {
        config: Arc::new(config),
        relay: Arc::new(relay),
        started_at: SystemTime::now(),
    };

    Router::new()
        .route("/", get(form_page))
        .route("/healthz", get(health))
        .route(RELAY_SUBMIT_PATH, any(submit_form))
        .nest_service("/assets", assets)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(request_timeout)),
        )
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let uptime_seconds = match state.started_at.elapsed() {
        Ok(duration) => duration.as_secs(),
        Err(_) => 0,
    };

    Json(HealthResponse {
        status: "ok",
        service: SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds,
    })
}

async fn form_page(State(state): State<AppState>) -> Response {
    let page = render_form_page(&state.config.form_options);
    let mut response = Html(page).into_response();
    response
        .headers_mut()
        .insert(CACHE_CONTROL, HeaderValue::from_static(CACHE_NO_STORE));
    response
}

async fn submit_form(State(state): State<AppState>, method: Method, body: Bytes) -> Response {
    if method != Method::POST {
        let mut response = method_not_allowed().into_response();
        response
            .headers_mut()
            .insert(ALLOW, HeaderValue::from_static("POST"));
        return response;
    }

    let lead = match serde_json::from_slice::<LeadSubmission>(&body) {
        Ok(lead) => lead,
        Err(error) => {
            tracing::warn!(error = %error, "rejecting malformed lead submission body");
            return invalid_body().into_response();
        }
    };

    match state.relay.forward(&lead).await {
        Ok(reply) => reply.into_response(),
        Err(error) => {
            match &error {
                RelayError::Transport(source) => {
                    tracing::warn!(timeout = source.is_timeout(), error = %error, "workflow unreachable");
                }
                RelayError::Upstream { status, .. } => {
                    tracing::warn!(status, error = %error, "workflow rejected lead submission");
                }
            }
            upstream_failure(error.client_message()).into_response()
        }
    }
}
