//! Pre-signup trigger: invite-code and email-domain gates

use super::CognitoTriggers;
use crate::config::TriggerConfig;
use crate::error::{TriggerError, Result};
use crate::types::{Envelope, PreSignUpRequest, PreSignUpResponse, UserAttributes};

impl CognitoTriggers {
    /// Run the pre-signup gates in order: invite code, then email domain
    ///
    /// A gate only runs when its configuration value is set. The first
    /// failing gate decides the error.
    pub fn pre_sign_up(
        &self,
        envelope: &Envelope,
        config: &TriggerConfig,
        request: &PreSignUpRequest,
    ) -> Result<PreSignUpResponse> {
        tracing::info!(
            user_pool_id = %envelope.user_pool_id,
            user_name = %envelope.user_name,
            "PreSignUp"
        );

        if let Some(ref expected) = config.invite_code {
            check_invite_code(&request.user_attributes, expected)?;
        }

        if let Some(ref domain) = config.whitelist_domain {
            check_email_domain(&request.user_attributes, domain)?;
        }

        Ok(PreSignUpResponse::default())
    }
}

/// The `invite_code` attribute must be present and match exactly
pub fn check_invite_code(attributes: &UserAttributes, expected: &str) -> Result<()> {
    let Some(supplied) = attributes.get("invite_code") else {
        tracing::error!("user attributes missing invite_code");
        return Err(TriggerError::InvalidSignUpCode);
    };

    if supplied != expected {
        tracing::error!(
            invite_code_supplied = %supplied,
            "invite_code didn't match configured value"
        );
        return Err(TriggerError::InvalidSignUpCode);
    }

    Ok(())
}

/// The `email` attribute must be `local@domain` with exactly one `@`
/// and a domain equal (case-sensitive) to `whitelist_domain`
pub fn check_email_domain(attributes: &UserAttributes, whitelist_domain: &str) -> Result<()> {
    let Some(email) = attributes.get("email") else {
        tracing::error!("user attributes missing email");
        return Err(TriggerError::InvalidDomain);
    };

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 {
        tracing::error!(email = %email, "missing email domain");
        return Err(TriggerError::InvalidDomain);
    }

    if parts[1] != whitelist_domain {
        tracing::error!(
            email = %email,
            whitelist_domain = %whitelist_domain,
            "email domain doesn't match whitelist domain"
        );
        return Err(TriggerError::InvalidDomain);
    }

    Ok(())
}
