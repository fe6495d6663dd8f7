//! Notification side-channel
//!
//! `Notifier` is the transport abstraction (NATS, in-memory, disabled);
//! `NotificationPublisher` builds the message bodies on top of it.
//! Only the post-confirmation trigger publishes.

use crate::error::{Result, TriggerError};
use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

pub mod disabled;
pub mod memory;
pub mod nats;

/// Core trait for notification transports
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Publish a message to a topic, returning a transport-assigned message id
    ///
    /// One attempt, no retry. A failure is returned to the caller as-is.
    async fn publish(&self, topic: &str, subject: &str, message: Bytes) -> Result<String>;

    /// Transport name (e.g., "nats", "memory")
    fn name(&self) -> &str;

    /// Health check: returns true if the transport is usable
    async fn health(&self) -> Result<bool> {
        Ok(true)
    }
}

/// Structured event body for [`NotificationPublisher::send_event`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventPayload {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub aws_request_id: String,

    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub attributes: HashMap<String, String>,
}

/// High-level publisher backed by a pluggable [`Notifier`]
#[derive(Clone)]
pub struct NotificationPublisher {
    notifier: Arc<dyn Notifier>,
}

impl NotificationPublisher {
    /// Create a publisher from a notifier
    pub fn new(notifier: impl Notifier + 'static) -> Self {
        Self {
            notifier: Arc::new(notifier),
        }
    }

    /// Create a publisher sharing an existing notifier
    pub fn from_arc(notifier: Arc<dyn Notifier>) -> Self {
        Self { notifier }
    }

    /// Get the transport name
    pub fn notifier_name(&self) -> &str {
        self.notifier.name()
    }

    /// Publish a plain-text notification
    pub async fn send_notification(
        &self,
        topic: &str,
        subject: &str,
        message: &str,
    ) -> Result<String> {
        let id = self
            .notifier
            .publish(topic, subject, Bytes::copy_from_slice(message.as_bytes()))
            .await?;

        tracing::info!(id = %id, topic = %topic, "message sent");
        Ok(id)
    }

    /// Publish a JSON [`EventPayload`] carrying the request id and attributes
    pub async fn send_event(
        &self,
        topic: &str,
        subject: &str,
        request_id: &str,
        attributes: HashMap<String, String>,
    ) -> Result<String> {
        let payload = EventPayload {
            aws_request_id: request_id.to_string(),
            attributes,
        };
        let data = serde_json::to_vec(&payload)
            .map_err(|e| TriggerError::Encode(format!("event payload: {}", e)))?;

        let id = self.notifier.publish(topic, subject, Bytes::from(data)).await?;

        tracing::info!(id = %id, topic = %topic, "event sent");
        Ok(id)
    }
}
