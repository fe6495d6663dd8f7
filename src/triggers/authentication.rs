//! Pre-authentication and pre-token-generation triggers
//!
//! Both accept every request. They exist as extension points for
//! sign-in checks and claim/group overrides.

use super::CognitoTriggers;
use crate::error::Result;
use crate::types::{
    Envelope, PreAuthenticationRequest, PreAuthenticationResponse, PreTokenGenRequest,
    PreTokenGenResponse,
};

impl CognitoTriggers {
    pub fn pre_authentication(
        &self,
        envelope: &Envelope,
        _request: &PreAuthenticationRequest,
    ) -> Result<PreAuthenticationResponse> {
        tracing::info!(
            user_pool_id = %envelope.user_pool_id,
            user_name = %envelope.user_name,
            trigger_source = %envelope.trigger_source,
            "PreAuthentication"
        );
        Ok(PreAuthenticationResponse::default())
    }

    /// Pre-token hook used to override roles/groups/claims; currently a pass-through
    pub fn pre_token(
        &self,
        envelope: &Envelope,
        request: &PreTokenGenRequest,
    ) -> Result<PreTokenGenResponse> {
        tracing::info!(
            user_pool_id = %envelope.user_pool_id,
            user_name = %envelope.user_name,
            groups = ?request.group_configuration.groups_to_override,
            "PreToken"
        );
        Ok(PreTokenGenResponse::default())
    }
}
