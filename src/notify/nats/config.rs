//! NATS notifier configuration

use serde::{Deserialize, Serialize};

/// Configuration for the NATS notification transport
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NatsNotifierConfig {
    /// NATS server URL (e.g., "nats://127.0.0.1:4222")
    pub url: String,

    /// Authentication token (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Connection name reported to the server
    #[serde(default = "default_client_name")]
    pub client_name: String,

    /// Connect timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Request/flush timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Extra attempts after a failed initial connect (0 = fail fast)
    #[serde(default = "default_connect_retries")]
    pub connect_retries: u32,
}

fn default_client_name() -> String {
    "a3s-auth-triggers".to_string()
}

fn default_connect_timeout() -> u64 {
    5
}

fn default_request_timeout() -> u64 {
    10
}

fn default_connect_retries() -> u32 {
    3
}

impl Default for NatsNotifierConfig {
    fn default() -> Self {
        Self {
            url: "nats://127.0.0.1:4222".to_string(),
            token: None,
            client_name: default_client_name(),
            connect_timeout_secs: default_connect_timeout(),
            request_timeout_secs: default_request_timeout(),
            connect_retries: default_connect_retries(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = NatsNotifierConfig::default();
        assert_eq!(config.url, "nats://127.0.0.1:4222");
        assert!(config.token.is_none());
        assert_eq!(config.connect_timeout_secs, 5);
        assert_eq!(config.request_timeout_secs, 10);
        assert_eq!(config.connect_retries, 3);
    }

    #[test]
    fn test_deserialize_fills_defaults() {
        let config: NatsNotifierConfig =
            serde_json::from_str(r#"{"url": "nats://nats:4222"}"#).unwrap();
        assert_eq!(config.url, "nats://nats:4222");
        assert_eq!(config.client_name, "a3s-auth-triggers");
        assert_eq!(config.request_timeout_secs, 10);
    }

    #[test]
    fn test_token_not_serialized_when_absent() {
        let json = serde_json::to_string(&NatsNotifierConfig::default()).unwrap();
        assert!(!json.contains("token"));
    }
}
