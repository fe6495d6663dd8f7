//! Post-confirmation trigger: announce new signups

use super::{CognitoTriggers, SIGNUP_SUBJECT};
use crate::config::TriggerConfig;
use crate::error::{TriggerError, Result};
use crate::types::{Envelope, PostConfirmationRequest, PostConfirmationResponse};

impl CognitoTriggers {
    /// Publish a "new signup" notification for the confirmed user
    ///
    /// A missing email rejects the event before anything is published.
    /// A publish failure fails the trigger; there is no retry and no
    /// idempotency key, so a re-run invocation may notify twice.
    pub async fn post_confirmation_sign_up(
        &self,
        envelope: &Envelope,
        config: &TriggerConfig,
        request: &PostConfirmationRequest,
    ) -> Result<PostConfirmationResponse> {
        tracing::info!(
            user_pool_id = %envelope.user_pool_id,
            user_name = %envelope.user_name,
            "PostConfirmationSignUp"
        );

        let Some(email) = request.user_attributes.get("email") else {
            tracing::error!("user attributes missing email");
            return Err(TriggerError::MissingEmail);
        };

        let topic = config.signup_topic.as_deref().ok_or_else(|| {
            TriggerError::Config("signup notification topic is not configured".to_string())
        })?;

        let message = format!("signup of user {}", email);
        match self
            .publisher()
            .send_notification(topic, SIGNUP_SUBJECT, &message)
            .await
        {
            Ok(id) => {
                tracing::info!(message_id = %id, "PostConfirmationSignUp message published");
                Ok(PostConfirmationResponse::default())
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to publish PostConfirmationSignUp message");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::memory::MemoryNotifier;
    use crate::notify::NotificationPublisher;

    fn setup() -> (CognitoTriggers, MemoryNotifier) {
        let notifier = MemoryNotifier::new();
        let triggers = CognitoTriggers::new(NotificationPublisher::new(notifier.clone()));
        (triggers, notifier)
    }

    fn request(pairs: &[(&str, &str)]) -> PostConfirmationRequest {
        PostConfirmationRequest {
            user_attributes: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            ..Default::default()
        }
    }

    fn config() -> TriggerConfig {
        TriggerConfig::default().with_signup_topic("signups")
    }

    #[tokio::test]
    async fn test_missing_email_publishes_nothing() {
        let (triggers, notifier) = setup();
        let err = triggers
            .post_confirmation_sign_up(&Envelope::default(), &config(), &request(&[("name", "a")]))
            .await
            .unwrap_err();

        assert!(matches!(err, TriggerError::MissingEmail));
        assert_eq!(notifier.count().await, 0);
    }

    #[tokio::test]
    async fn test_publishes_exactly_once() {
        let (triggers, notifier) = setup();
        let res = triggers
            .post_confirmation_sign_up(
                &Envelope::default(),
                &config(),
                &request(&[("email", "a@example.com")]),
            )
            .await
            .unwrap();

        assert_eq!(res, PostConfirmationResponse::default());
        let messages = notifier.messages().await;
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].topic, "signups");
        assert_eq!(messages[0].subject, "new signup");
        assert!(messages[0].body().contains("a@example.com"));
    }

    #[tokio::test]
    async fn test_publish_failure_fails_trigger() {
        let (triggers, notifier) = setup();
        notifier.fail_with("broker unavailable").await;

        let err = triggers
            .post_confirmation_sign_up(
                &Envelope::default(),
                &config(),
                &request(&[("email", "a@example.com")]),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, TriggerError::Publish { .. }));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_missing_topic_fails_trigger() {
        let (triggers, notifier) = setup();
        let err = triggers
            .post_confirmation_sign_up(
                &Envelope::default(),
                &TriggerConfig::default(),
                &request(&[("email", "a@example.com")]),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, TriggerError::Config(_)));
        assert_eq!(notifier.count().await, 0);
    }
}
