use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use campaign_form::FormOptions;
use thiserror::Error;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8787";
const DEFAULT_LOG_FILTER: &str = "info";
const DEFAULT_STATIC_DIR: &str = "apps/wash-campaign/service/static";
const DEFAULT_API_ENDPOINT: &str = "http://127.0.0.1:7071/api/lead-workflow";
const DEFAULT_API_AUTH_TOKEN: &str = "local-dev-token";
const DEFAULT_UPSTREAM_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_CONSENT_REQUIRED: bool = true;
const DEFAULT_SESSION_TIMEOUT_ENABLED: bool = true;
const DEFAULT_COOLDOWN_ENABLED: bool = true;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub log_filter: String,
    pub log_format: LogFormat,
    pub static_dir: PathBuf,
    pub api_endpoint: String,
    pub api_auth_token: String,
    /// Set when either upstream setting came from the built-in fallback.
    pub upstream_fallback_in_use: bool,
    pub upstream_timeout_ms: u64,
    pub form_options: FormOptions,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid WC_BIND_ADDR value '{value}': {source}")]
    InvalidBindAddr {
        value: String,
        source: std::net::AddrParseError,
    },
    #[error("invalid PORT value '{value}'")]
    InvalidPort { value: String },
    #[error("invalid WC_LOG_FORMAT value '{value}' (expected text or json)")]
    InvalidLogFormat { value: String },
    #[error("invalid WC_UPSTREAM_TIMEOUT_MS value '{value}' (expected a positive integer)")]
    InvalidUpstreamTimeout { value: String },
    #[error("invalid {key} value '{value}' (expected true/false, yes/no or 1/0)")]
    InvalidFlag { key: &'static str, value: String },
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process
    /// environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let bind_addr: SocketAddr = match non_empty("WC_BIND_ADDR") {
            Some(bind_addr_raw) => {
                bind_addr_raw
                    .trim()
                    .parse()
                    .map_err(|source| ConfigError::InvalidBindAddr {
                        value: bind_addr_raw.clone(),
                        source,
                    })?
            }
            None => match non_empty("PORT") {
                Some(port_raw) => {
                    let port = port_raw
                        .trim()
                        .parse::<u16>()
                        .map_err(|_| ConfigError::InvalidPort {
                            value: port_raw.clone(),
                        })?;
                    SocketAddr::from(([0, 0, 0, 0], port))
                }
                None => DEFAULT_BIND_ADDR
                    .parse()
                    .map_err(|source| ConfigError::InvalidBindAddr {
                        value: DEFAULT_BIND_ADDR.to_string(),
                        source,
                    })?,
            },
        };

        let log_filter =
            non_empty("WC_LOG_FILTER").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        let log_format = match non_empty("WC_LOG_FORMAT") {
            None => LogFormat::Text,
            Some(value) => match value.trim().to_lowercase().as_str() {
                "text" => LogFormat::Text,
                "json" => LogFormat::Json,
                _ => return Err(ConfigError::InvalidLogFormat { value }),
            },
        };

        let static_dir = non_empty("WC_STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR));

        let api_endpoint = non_empty("API_ENDPOINT").map(|value| value.trim().to_string());
        let api_auth_token = non_empty("API_AUTH_TOKEN").map(|value| value.trim().to_string());
        let upstream_fallback_in_use = api_endpoint.is_none() || api_auth_token.is_none();
        let api_endpoint = api_endpoint.unwrap_or_else(|| DEFAULT_API_ENDPOINT.to_string());
        let api_auth_token = api_auth_token.unwrap_or_else(|| DEFAULT_API_AUTH_TOKEN.to_string());

        let upstream_timeout_ms = match non_empty("WC_UPSTREAM_TIMEOUT_MS") {
            None => DEFAULT_UPSTREAM_TIMEOUT_MS,
            Some(value) => value
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|timeout| *timeout > 0)
                .ok_or(ConfigError::InvalidUpstreamTimeout { value })?,
        };

        let flag = |key: &'static str, default: bool| match non_empty(key) {
            None => Ok(default),
            Some(value) => match value.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" => Ok(true),
                "0" | "false" | "no" => Ok(false),
                _ => Err(ConfigError::InvalidFlag { key, value }),
            },
        };
        let form_options = FormOptions {
            consent_required: flag("WC_CONSENT_REQUIRED", DEFAULT_CONSENT_REQUIRED)?,
            session_timeout_enabled: flag(
                "WC_SESSION_TIMEOUT_ENABLED",
                DEFAULT_SESSION_TIMEOUT_ENABLED,
            )?,
            cooldown_enabled: flag("WC_COOLDOWN_ENABLED", DEFAULT_COOLDOWN_ENABLED)?,
            ..FormOptions::default()
        };

        Ok(Self {
            bind_addr,
            log_filter,
            log_format,
            static_dir,
            api_endpoint,
            api_auth_token,
            upstream_fallback_in_use,
            upstream_timeout_ms,
            form_options,
        })
    }

    #[must_use]
    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_millis(self.upstream_timeout_ms)
    }
}

#[cfg(test)]
impl Config {
    #[must_use]
    pub fn for_tests(static_dir: PathBuf, api_endpoint: String) -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            log_filter: "debug".to_string(),
            log_format: LogFormat::Text,
            static_dir,
            api_endpoint,
            api_auth_token: "test-workflow-token".to_string(),
            upstream_fallback_in_use: false,
            upstream_timeout_ms: 2_000,
            form_options: FormOptions::default(),
        }
    }
}
