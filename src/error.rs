//! Error types for a3s-auth-triggers

use thiserror::Error;

/// Errors that can occur while dispatching a lifecycle trigger
#[derive(Debug, Error)]
pub enum TriggerError {
    /// Envelope or trigger-specific request could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// Producing output bytes failed
    #[error("Encode error: {0}")]
    Encode(String),

    /// Supplied invite code missing or wrong
    #[error("invalid invite code, please check the value")]
    InvalidSignUpCode,

    /// Email domain missing, malformed or not whitelisted
    #[error("invalid email domain")]
    InvalidDomain,

    /// Email missing from user attributes
    #[error("missing email")]
    MissingEmail,

    /// Notification publish failure
    #[error("Failed to publish notification to topic '{topic}': {reason}")]
    Publish {
        topic: String,
        reason: String,
    },

    /// Notification transport connection failure
    #[error("Connection error: {0}")]
    Connection(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Telemetry export failure
    #[error("Telemetry error: {0}")]
    Telemetry(String),
}

/// Coarse classification of a [`TriggerError`]
///
/// The dispatcher surfaces every kind through the same failure channel; the
/// classification lets a transport tell a permanent rejection from a
/// downstream outage if it wants to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed envelope or request
    Decode,
    /// The lifecycle event was rejected by a validation gate
    Validation,
    /// A downstream system (notification, telemetry) failed
    SideEffect,
    /// Internal fault while producing output
    Encode,
}

impl TriggerError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            TriggerError::Decode(_) => ErrorKind::Decode,
            TriggerError::Encode(_) => ErrorKind::Encode,
            TriggerError::InvalidSignUpCode
            | TriggerError::InvalidDomain
            | TriggerError::MissingEmail => ErrorKind::Validation,
            TriggerError::Publish { .. }
            | TriggerError::Connection(_)
            | TriggerError::Config(_)
            | TriggerError::Telemetry(_) => ErrorKind::SideEffect,
        }
    }

    /// Whether re-running the whole invocation could succeed
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::SideEffect
    }

    /// Short, stable name used as the `errorType` reported to the caller
    pub fn error_type(&self) -> &'static str {
        match self {
            TriggerError::Decode(_) => "DecodeError",
            TriggerError::Encode(_) => "EncodeError",
            TriggerError::InvalidSignUpCode => "InvalidSignUpCode",
            TriggerError::InvalidDomain => "InvalidDomain",
            TriggerError::MissingEmail => "MissingEmail",
            TriggerError::Publish { .. } => "PublishError",
            TriggerError::Connection(_) => "ConnectionError",
            TriggerError::Config(_) => "ConfigError",
            TriggerError::Telemetry(_) => "TelemetryError",
        }
    }
}

/// Result type alias for trigger operations
pub type Result<T> = std::result::Result<T, TriggerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_messages() {
        assert_eq!(
            TriggerError::InvalidSignUpCode.to_string(),
            "invalid invite code, please check the value"
        );
        assert_eq!(TriggerError::InvalidDomain.to_string(), "invalid email domain");
        assert_eq!(TriggerError::MissingEmail.to_string(), "missing email");
    }

    #[test]
    fn test_kind_classification() {
        assert_eq!(TriggerError::Decode("x".into()).kind(), ErrorKind::Decode);
        assert_eq!(TriggerError::Encode("x".into()).kind(), ErrorKind::Encode);
        assert_eq!(TriggerError::MissingEmail.kind(), ErrorKind::Validation);

        let publish = TriggerError::Publish {
            topic: "signups".to_string(),
            reason: "timeout".to_string(),
        };
        assert_eq!(publish.kind(), ErrorKind::SideEffect);
        assert!(publish.is_retryable());
        assert!(!TriggerError::InvalidDomain.is_retryable());
    }

    #[test]
    fn test_publish_message_names_topic() {
        let err = TriggerError::Publish {
            topic: "signups".to_string(),
            reason: "no responders".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("signups"));
        assert!(msg.contains("no responders"));
        assert_eq!(err.error_type(), "PublishError");
    }
}
