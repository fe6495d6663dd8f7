//! In-memory notifier for tests
//!
//! Records every published message. Can be switched into a failing mode
//! to exercise publish-failure paths.

use crate::error::{TriggerError, Result};
use crate::notify::Notifier;
use async_trait::async_trait;
use bytes::Bytes;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A message captured by [`MemoryNotifier`]
#[derive(Debug, Clone)]
pub struct PublishedMessage {
    /// Generated message id (msg-<uuid>)
    pub id: String,

    /// Destination topic
    pub topic: String,

    /// Subject line
    pub subject: String,

    /// Raw message body
    pub message: Bytes,
}

impl PublishedMessage {
    /// Message body as text (lossy)
    pub fn body(&self) -> String {
        String::from_utf8_lossy(&self.message).into_owned()
    }
}

/// In-memory [`Notifier`]
///
/// Cloning shares the underlying message log.
#[derive(Clone, Default)]
pub struct MemoryNotifier {
    messages: Arc<RwLock<Vec<PublishedMessage>>>,
    failure: Arc<RwLock<Option<String>>>,
}

impl MemoryNotifier {
    /// Create a new empty notifier
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following publish fail with `reason`
    pub async fn fail_with(&self, reason: impl Into<String>) {
        *self.failure.write().await = Some(reason.into());
    }

    /// Clear a previously configured failure
    pub async fn recover(&self) {
        *self.failure.write().await = None;
    }

    /// All published messages, oldest first
    pub async fn messages(&self) -> Vec<PublishedMessage> {
        self.messages.read().await.clone()
    }

    /// Number of published messages
    pub async fn count(&self) -> usize {
        self.messages.read().await.len()
    }
}

#[async_trait]
impl Notifier for MemoryNotifier {
    async fn publish(&self, topic: &str, subject: &str, message: Bytes) -> Result<String> {
        if let Some(reason) = self.failure.read().await.clone() {
            return Err(TriggerError::Publish {
                topic: topic.to_string(),
                reason,
            });
        }

        let id = format!("msg-{}", uuid::Uuid::new_v4());
        self.messages.write().await.push(PublishedMessage {
            id: id.clone(),
            topic: topic.to_string(),
            subject: subject.to_string(),
            message,
        });

        tracing::debug!(id = %id, topic = %topic, "Notification recorded");
        Ok(id)
    }

    fn name(&self) -> &str {
        "memory"
    }
}
