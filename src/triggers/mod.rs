//! Lifecycle trigger handlers
//!
//! One handler per trigger kind. Each is a function of the typed request,
//! the per-invocation configuration and (for post-confirmation) the
//! notification side-channel. Handlers keep no state between calls.

mod authentication;
mod confirmation;
mod sign_up;

pub use sign_up::{check_email_domain, check_invite_code};

use crate::notify::NotificationPublisher;

// Trigger sources sent by the identity service
pub const PRE_SIGN_UP: &str = "PreSignUp_SignUp";
pub const PRE_SIGN_UP_ADMIN_CREATE_USER: &str = "PreSignUp_AdminCreateUser";
pub const POST_CONFIRMATION_CONFIRM_SIGN_UP: &str = "PostConfirmation_ConfirmSignUp";
pub const POST_CONFIRMATION_CONFIRM_FORGOT_PASSWORD: &str =
    "PostConfirmation_ConfirmForgotPassword";
pub const PRE_AUTHENTICATION: &str = "PreAuthentication_Authentication";
pub const POST_AUTHENTICATION: &str = "PostAuthentication_Authentication";
pub const PRE_TOKEN_HOSTED_AUTH: &str = "TokenGeneration_HostedAuth";
pub const PRE_TOKEN_AUTHENTICATION: &str = "TokenGeneration_Authentication";
pub const PRE_TOKEN_NEW_PASSWORD_CHALLENGE: &str = "TokenGeneration_NewPasswordChallenge";
pub const PRE_TOKEN_AUTHENTICATE_DEVICE: &str = "TokenGeneration_AuthenticateDevice";
pub const PRE_TOKEN_REFRESH_TOKENS: &str = "TokenGeneration_RefreshTokens";

/// Subject line of signup notifications
pub const SIGNUP_SUBJECT: &str = "new signup";

/// The handler a trigger source routes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriggerKind {
    PreSignUp,
    PreAuthentication,
    PreTokenGeneration,
    PostConfirmationSignUp,
}

impl TriggerKind {
    pub fn name(&self) -> &'static str {
        match self {
            TriggerKind::PreSignUp => "PreSignUp",
            TriggerKind::PreAuthentication => "PreAuthentication",
            TriggerKind::PreTokenGeneration => "PreToken",
            TriggerKind::PostConfirmationSignUp => "PostConfirmationSignUp",
        }
    }
}

impl std::fmt::Display for TriggerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// The set of trigger handlers supported by this service
#[derive(Clone)]
pub struct CognitoTriggers {
    publisher: NotificationPublisher,
}

impl CognitoTriggers {
    /// Create the handler set around a notification publisher
    pub fn new(publisher: NotificationPublisher) -> Self {
        Self { publisher }
    }

    /// The notification side-channel
    pub fn publisher(&self) -> &NotificationPublisher {
        &self.publisher
    }
}
