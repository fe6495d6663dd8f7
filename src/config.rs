//! Trigger configuration
//!
//! Everything is optional and read from the environment. Empty values
//! count as unset, so `WHITELIST_DOMAIN=""` disables the domain gate.

use crate::error::{TriggerError, Result};
use crate::hooks::HoneycombExporter;
use crate::notify::nats::NatsNotifierConfig;

pub const ENV_INVITE_CODE: &str = "SIGNUP_INVITE_CODE";
pub const ENV_WHITELIST_DOMAIN: &str = "WHITELIST_DOMAIN";
pub const ENV_SIGNUP_TOPIC: &str = "SIGNUP_TOPIC";
pub const ENV_HONEYCOMB_API_KEY: &str = "HONEYCOMB_API_KEY";
pub const ENV_HONEYCOMB_DATASET: &str = "HONEYCOMB_DATASET";
pub const ENV_HONEYCOMB_API_URL: &str = "HONEYCOMB_API_URL";
pub const ENV_FUNCTION_NAME: &str = "AWS_LAMBDA_FUNCTION_NAME";
pub const ENV_FUNCTION_VERSION: &str = "AWS_LAMBDA_FUNCTION_VERSION";
pub const ENV_NATS_URL: &str = "NATS_URL";
pub const ENV_NATS_TOKEN: &str = "NATS_TOKEN";
pub const ENV_NATS_CONNECT_TIMEOUT: &str = "NATS_CONNECT_TIMEOUT_SECS";
pub const ENV_NATS_REQUEST_TIMEOUT: &str = "NATS_REQUEST_TIMEOUT_SECS";
pub const ENV_NATS_CONNECT_RETRIES: &str = "NATS_CONNECT_RETRIES";

const DEFAULT_HONEYCOMB_API_URL: &str = "https://api.honeycomb.io";

/// Per-invocation trigger configuration
#[derive(Debug, Clone, Default)]
pub struct TriggerConfig {
    /// Invite code required at pre-signup (gate disabled when `None`)
    pub invite_code: Option<String>,

    /// Email domain required at pre-signup (gate disabled when `None`)
    pub whitelist_domain: Option<String>,

    /// Topic receiving post-confirmation notifications
    pub signup_topic: Option<String>,

    /// Telemetry export settings
    pub telemetry: TelemetryConfig,

    /// Notification transport, when one is configured
    pub nats: Option<NatsNotifierConfig>,
}

/// Telemetry export settings
#[derive(Debug, Clone, Default)]
pub struct TelemetryConfig {
    pub api_key: Option<String>,
    pub dataset: Option<String>,
    pub api_url: String,
    pub function_name: String,
    pub function_version: String,
}

impl TelemetryConfig {
    /// Build the Honeycomb exporter, or `None` when credentials are incomplete
    pub fn exporter(&self) -> Option<HoneycombExporter> {
        match (&self.api_key, &self.dataset) {
            (Some(key), Some(dataset)) => {
                tracing::info!(dataset = %dataset, "honeycomb init");
                Some(HoneycombExporter::new(&self.api_url, key, dataset))
            }
            _ => {
                tracing::info!("no honeycomb configuration found");
                None
            }
        }
    }
}

impl TriggerConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let telemetry = TelemetryConfig {
            api_key: get(ENV_HONEYCOMB_API_KEY),
            dataset: get(ENV_HONEYCOMB_DATASET),
            api_url: get(ENV_HONEYCOMB_API_URL)
                .unwrap_or_else(|| DEFAULT_HONEYCOMB_API_URL.to_string()),
            function_name: get(ENV_FUNCTION_NAME).unwrap_or_default(),
            function_version: get(ENV_FUNCTION_VERSION).unwrap_or_default(),
        };

        let nats = match get(ENV_NATS_URL) {
            Some(url) => {
                let mut config = NatsNotifierConfig {
                    url,
                    token: get(ENV_NATS_TOKEN),
                    ..Default::default()
                };
                if let Some(v) = get(ENV_NATS_CONNECT_TIMEOUT) {
                    config.connect_timeout_secs = parse_secs(ENV_NATS_CONNECT_TIMEOUT, &v)?;
                }
                if let Some(v) = get(ENV_NATS_REQUEST_TIMEOUT) {
                    config.request_timeout_secs = parse_secs(ENV_NATS_REQUEST_TIMEOUT, &v)?;
                }
                if let Some(v) = get(ENV_NATS_CONNECT_RETRIES) {
                    config.connect_retries = v.parse().map_err(|_| {
                        TriggerError::Config(format!(
                            "{} must be a whole number, got '{}'",
                            ENV_NATS_CONNECT_RETRIES, v
                        ))
                    })?;
                }
                Some(config)
            }
            None => None,
        };

        Ok(Self {
            invite_code: get(ENV_INVITE_CODE),
            whitelist_domain: get(ENV_WHITELIST_DOMAIN),
            signup_topic: get(ENV_SIGNUP_TOPIC),
            telemetry,
            nats,
        })
    }

    /// Enable the invite-code gate
    pub fn with_invite_code(mut self, code: impl Into<String>) -> Self {
        self.invite_code = Some(code.into());
        self
    }

    /// Enable the email-domain gate
    pub fn with_whitelist_domain(mut self, domain: impl Into<String>) -> Self {
        self.whitelist_domain = Some(domain.into());
        self
    }

    /// Set the signup notification topic
    pub fn with_signup_topic(mut self, topic: impl Into<String>) -> Self {
        self.signup_topic = Some(topic.into());
        self
    }
}

fn parse_secs(key: &str, value: &str) -> Result<u64> {
    value.parse().map_err(|_| {
        TriggerError::Config(format!("{} must be a whole number of seconds, got '{}'", key, value))
    })
}

/// Source of a fresh [`TriggerConfig`] for each invocation
pub trait ConfigSource: Send + Sync {
    fn load(&self) -> Result<TriggerConfig>;
}

/// Re-reads the process environment on every invocation
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvConfig;

impl ConfigSource for EnvConfig {
    fn load(&self) -> Result<TriggerConfig> {
        TriggerConfig::from_env()
    }
}

/// A fixed configuration, handed out as-is
impl ConfigSource for TriggerConfig {
    fn load(&self) -> Result<TriggerConfig> {
        Ok(self.clone())
    }
}
