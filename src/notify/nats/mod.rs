//! NATS notification transport
//!
//! Publishes signup notifications as NATS messages. The topic is used as the
//! NATS subject; the notification subject line travels in a header.

mod config;

pub use config::NatsNotifierConfig;

use crate::error::{TriggerError, Result};
use crate::notify::Notifier;
use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;

/// Header carrying the notification's subject line
pub const SUBJECT_HEADER: &str = "Notification-Subject";

/// Header carrying the generated message id
pub const MSG_ID_HEADER: &str = "Nats-Msg-Id";

/// NATS-backed [`Notifier`]
pub struct NatsNotifier {
    client: async_nats::Client,
    config: NatsNotifierConfig,
}

impl NatsNotifier {
    /// Connect to NATS
    ///
    /// A failed initial connect is retried `connect_retries` times, doubling
    /// the pause between attempts from one second up to thirty.
    pub async fn connect(config: NatsNotifierConfig) -> Result<Self> {
        let mut backoff_secs = 1u64;
        let mut attempt = 0u32;

        let client = loop {
            match build_connect_options(&config).connect(&config.url).await {
                Ok(client) => break client,
                Err(e) if attempt < config.connect_retries => {
                    attempt += 1;
                    tracing::warn!(
                        url = %config.url,
                        attempt,
                        retries = config.connect_retries,
                        error = %e,
                        "NATS connect failed, retrying in {}s",
                        backoff_secs
                    );
                    tokio::time::sleep(Duration::from_secs(backoff_secs)).await;
                    backoff_secs = (backoff_secs * 2).min(30);
                }
                Err(e) => {
                    return Err(TriggerError::Connection(format!(
                        "{} (after {} attempts): {}",
                        config.url,
                        attempt + 1,
                        e
                    )))
                }
            }
        };

        tracing::info!(url = %config.url, "Connected to NATS");

        Ok(Self { client, config })
    }

    /// Get the underlying NATS client for advanced usage
    pub fn client(&self) -> &async_nats::Client {
        &self.client
    }

    /// Get the configuration
    pub fn config(&self) -> &NatsNotifierConfig {
        &self.config
    }
}

#[async_trait]
impl Notifier for NatsNotifier {
    async fn publish(&self, topic: &str, subject: &str, message: Bytes) -> Result<String> {
        let msg_id = format!("msg-{}", uuid::Uuid::new_v4());

        let mut headers = async_nats::HeaderMap::new();
        headers.insert(MSG_ID_HEADER, msg_id.as_str());
        headers.insert(SUBJECT_HEADER, subject);

        self.client
            .publish_with_headers(topic.to_string(), headers, message)
            .await
            .map_err(|e| TriggerError::Publish {
                topic: topic.to_string(),
                reason: e.to_string(),
            })?;

        // Flush so a dead connection fails this publish instead of a later one
        let timeout = Duration::from_secs(self.config.request_timeout_secs);
        tokio::time::timeout(timeout, self.client.flush())
            .await
            .map_err(|_| TriggerError::Publish {
                topic: topic.to_string(),
                reason: format!("flush timed out after {}s", self.config.request_timeout_secs),
            })?
            .map_err(|e| TriggerError::Publish {
                topic: topic.to_string(),
                reason: format!("flush failed: {}", e),
            })?;

        tracing::debug!(msg_id = %msg_id, topic = %topic, "Notification flushed");

        Ok(msg_id)
    }

    fn name(&self) -> &str {
        "nats"
    }

    async fn health(&self) -> Result<bool> {
        Ok(matches!(
            self.client.connection_state(),
            async_nats::connection::State::Connected
        ))
    }
}

/// Build NATS connect options from config
fn build_connect_options(config: &NatsNotifierConfig) -> async_nats::ConnectOptions {
    let mut opts = async_nats::ConnectOptions::new()
        .name(config.client_name.clone())
        .connection_timeout(Duration::from_secs(config.connect_timeout_secs))
        .request_timeout(Some(Duration::from_secs(config.request_timeout_secs)));

    if let Some(ref token) = config.token {
        opts = opts.token(token.clone());
    }

    opts
}
