use std::time::Duration;

use anyhow::{Context, Result, bail};
use campaign_form::{
    Endpoint, FieldId, FormController, FormOptions, HttpTransport, RELAY_SUBMIT_PATH,
    SubmissionState, unix_millis_now,
};
use clap::Parser;
use serde_json::{Value, json};

const DEFAULT_SERVICE_BASE: &str = "http://127.0.0.1:8787";

#[derive(Parser)]
#[command(name = "wash-campaign-submit")]
#[command(about = "Submit one free wash lead through the relay or straight to the workflow")]
struct Cli {
    #[arg(long)]
    first_name: String,
    #[arg(long)]
    last_name: String,
    /// Ten-digit mobile number, punctuation allowed.
    #[arg(long)]
    phone: String,
    /// Records that the customer agreed to marketing messages.
    #[arg(long, default_value_t = false)]
    consent: bool,
    #[arg(long, conflicts_with = "endpoint")]
    relay_url: Option<String>,
    /// Workflow URL to call directly; requires --auth-token.
    #[arg(long, requires = "auth_token")]
    endpoint: Option<String>,
    #[arg(long)]
    auth_token: Option<String>,
    #[arg(long, default_value_t = 10_000)]
    timeout_ms: u64,
}

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let endpoint = resolve_endpoint(&cli)?;
    let transport =
        HttpTransport::with_timeout(endpoint, Duration::from_millis(cli.timeout_ms.max(250)))
            .context("failed to build submission transport")?;

    let mut controller = FormController::without_expiry_timer(FormOptions {
        session_timeout_enabled: false,
        ..FormOptions::default()
    });
    controller.set_field(FieldId::FirstName, &cli.first_name);
    controller.set_field(FieldId::LastName, &cli.last_name);
    controller.set_field(FieldId::MobilePhone, &cli.phone);
    controller.set_consent(cli.consent);

    match controller.submit(unix_millis_now(), &transport).await {
        SubmissionState::Success { message } => print_json(&json!({
            "outcome": "issued",
            "message": message,
        })),
        SubmissionState::AlreadyRedeemed => print_json(&json!({
            "outcome": "already_redeemed",
            "message": Value::Null,
        })),
        SubmissionState::Error(error) => bail!("submission failed ({}): {error}", error.kind()),
        state => bail!("submission ended in unexpected state '{}'", state.as_str()),
    }
}

fn resolve_endpoint(cli: &Cli) -> Result<Endpoint> {
    if let Some(url) = cli.endpoint.as_deref().and_then(non_empty) {
        let auth_token = cli
            .auth_token
            .as_deref()
            .and_then(non_empty)
            .context("--auth-token is required with --endpoint")?;
        return Ok(Endpoint::Direct { url, auth_token });
    }

    let url = cli
        .relay_url
        .as_deref()
        .and_then(non_empty)
        .unwrap_or_else(|| format!("{DEFAULT_SERVICE_BASE}{RELAY_SUBMIT_PATH}"));
    Ok(Endpoint::Relay { url })
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn print_json(value: &Value) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("failed to render JSON output")?;
    println!("{rendered}");
    Ok(())
}
