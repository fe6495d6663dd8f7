//! Trigger dispatcher
//!
//! Decodes the envelope, routes it by trigger source, runs at most one
//! handler and re-encodes the envelope. Unknown trigger sources are not
//! an error: the envelope goes back unchanged.

use crate::codec;
use crate::config::{ConfigSource, TriggerConfig};
use crate::error::Result;
use crate::hooks::{DispatchContext, DispatchHooks, DispatchOutcome, InvocationContext};
use crate::triggers::{self, CognitoTriggers, TriggerKind};
use crate::types::{
    Envelope, PostConfirmationRequest, PreAuthenticationRequest, PreSignUpRequest,
    PreTokenGenRequest,
};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

/// The routing table used by [`Dispatcher::new`]
///
/// Every token-generation source shares the pre-authentication handler.
pub fn default_routes() -> HashMap<&'static str, TriggerKind> {
    HashMap::from([
        (triggers::PRE_SIGN_UP, TriggerKind::PreSignUp),
        (triggers::PRE_AUTHENTICATION, TriggerKind::PreAuthentication),
        (
            triggers::POST_CONFIRMATION_CONFIRM_SIGN_UP,
            TriggerKind::PostConfirmationSignUp,
        ),
        (triggers::PRE_TOKEN_HOSTED_AUTH, TriggerKind::PreAuthentication),
        (triggers::PRE_TOKEN_AUTHENTICATION, TriggerKind::PreAuthentication),
        (
            triggers::PRE_TOKEN_NEW_PASSWORD_CHALLENGE,
            TriggerKind::PreAuthentication,
        ),
        (
            triggers::PRE_TOKEN_AUTHENTICATE_DEVICE,
            TriggerKind::PreAuthentication,
        ),
        (triggers::PRE_TOKEN_REFRESH_TOKENS, TriggerKind::PreAuthentication),
    ])
}

/// Result of a successful dispatch
struct Dispatched {
    payload: Vec<u8>,
    outcome: DispatchOutcome,
}

/// Routes lifecycle envelopes to trigger handlers
pub struct Dispatcher {
    routes: HashMap<&'static str, TriggerKind>,
    triggers: CognitoTriggers,
    config: Arc<dyn ConfigSource>,
    hooks: Arc<dyn DispatchHooks>,
}

impl Dispatcher {
    /// Create a dispatcher with the default routing table
    pub fn new(
        triggers: CognitoTriggers,
        config: impl ConfigSource + 'static,
        hooks: impl DispatchHooks + 'static,
    ) -> Self {
        Self::with_routes(default_routes(), triggers, Arc::new(config), Arc::new(hooks))
    }

    /// Create a dispatcher with an explicit routing table
    pub fn with_routes(
        routes: HashMap<&'static str, TriggerKind>,
        triggers: CognitoTriggers,
        config: Arc<dyn ConfigSource>,
        hooks: Arc<dyn DispatchHooks>,
    ) -> Self {
        Self {
            routes,
            triggers,
            config,
            hooks,
        }
    }

    /// Look up the handler for a trigger source (exact match)
    pub fn route(&self, trigger_source: &str) -> Option<TriggerKind> {
        self.routes.get(trigger_source).copied()
    }

    /// Dispatch one raw envelope, returning the re-encoded envelope
    ///
    /// The exit hook runs on every path, including decode failures.
    pub async fn handle(&self, invocation: &InvocationContext, payload: &[u8]) -> Result<Vec<u8>> {
        let mut ctx = self.hooks.event_received(invocation);

        let result = self.dispatch(&mut ctx, payload).await;
        let outcome = match &result {
            Ok(dispatched) => dispatched.outcome,
            Err(e) => DispatchOutcome::failed(e),
        };

        self.hooks.event_sent(ctx, &outcome).await;

        result.map(|d| d.payload)
    }

    async fn dispatch(&self, ctx: &mut DispatchContext, payload: &[u8]) -> Result<Dispatched> {
        let mut envelope = codec::decode(payload)?;
        ctx.trigger_source = Some(envelope.trigger_source.clone());

        let outcome = match self.route(&envelope.trigger_source) {
            Some(kind) => {
                let config = self.config.load()?;
                self.run_trigger(kind, &mut envelope, &config).await?;
                DispatchOutcome::Handled(kind)
            }
            None => {
                tracing::debug!(
                    trigger_source = %envelope.trigger_source,
                    "No handler for trigger source, passing through"
                );
                DispatchOutcome::PassThrough
            }
        };

        Ok(Dispatched {
            payload: codec::encode(&envelope)?,
            outcome,
        })
    }

    async fn run_trigger(
        &self,
        kind: TriggerKind,
        envelope: &mut Envelope,
        config: &TriggerConfig,
    ) -> Result<()> {
        match kind {
            TriggerKind::PreSignUp => {
                let req: PreSignUpRequest = codec::decode_request(envelope)?;
                let res = self.triggers.pre_sign_up(envelope, config, &req)?;
                set_response(envelope, &res)
            }
            TriggerKind::PreAuthentication => {
                let req: PreAuthenticationRequest = codec::decode_request(envelope)?;
                let res = self.triggers.pre_authentication(envelope, &req)?;
                set_response(envelope, &res)
            }
            TriggerKind::PreTokenGeneration => {
                let req: PreTokenGenRequest = codec::decode_request(envelope)?;
                let res = self.triggers.pre_token(envelope, &req)?;
                set_response(envelope, &res)
            }
            TriggerKind::PostConfirmationSignUp => {
                let req: PostConfirmationRequest = codec::decode_request(envelope)?;
                let res = self
                    .triggers
                    .post_confirmation_sign_up(envelope, config, &req)
                    .await?;
                set_response(envelope, &res)
            }
        }
    }
}

fn set_response<T: Serialize>(envelope: &mut Envelope, response: &T) -> Result<()> {
    envelope.response = Some(codec::encode_sub_response(response)?);
    Ok(())
}
