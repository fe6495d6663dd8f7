//! Notifier used when no transport is configured
//!
//! Every publish fails with a configuration error, so a post-confirmation
//! event surfaces the missing transport instead of reporting success.

use crate::error::{Result, TriggerError};
use crate::notify::Notifier;
use async_trait::async_trait;
use bytes::Bytes;

/// [`Notifier`] that rejects every publish
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledNotifier;

#[async_trait]
impl Notifier for DisabledNotifier {
    async fn publish(&self, topic: &str, _subject: &str, _message: Bytes) -> Result<String> {
        Err(TriggerError::Config(format!(
            "no notification transport configured, cannot publish to '{}'",
            topic
        )))
    }

    fn name(&self) -> &str {
        "disabled"
    }

    async fn health(&self) -> Result<bool> {
        Ok(false)
    }
}
