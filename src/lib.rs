//! # a3s-auth-triggers
//!
//! Lifecycle trigger dispatcher for an identity provider's user pool.
//!
//! ## Overview
//!
//! The identity service invokes this crate with a JSON envelope for each
//! lifecycle event (sign-up, authentication, token generation,
//! post-confirmation). The envelope's trigger source selects a handler;
//! the handler validates the request and its typed response is written
//! back into the envelope.
//!
//! ## Quick Start
//!
//! ```rust
//! use a3s_auth_triggers::{
//!     CognitoTriggers, Dispatcher, InvocationContext, MemoryNotifier, NoopHooks,
//!     NotificationPublisher, TriggerConfig,
//! };
//!
//! # async fn example() -> a3s_auth_triggers::Result<()> {
//! let triggers = CognitoTriggers::new(NotificationPublisher::new(MemoryNotifier::new()));
//! let config = TriggerConfig::default().with_whitelist_domain("example.com");
//! let dispatcher = Dispatcher::new(triggers, config, NoopHooks);
//!
//! let event = br#"{
//!     "triggerSource": "PreSignUp_SignUp",
//!     "userName": "bob",
//!     "request": {"userAttributes": {"email": "bob@example.com"}}
//! }"#;
//!
//! let out = dispatcher.handle(&InvocationContext::generate(), event).await?;
//! println!("{}", String::from_utf8_lossy(&out));
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - **codec**: envelope decode/encode with raw request/response slots
//! - **triggers**: per-trigger validation and side effects
//! - **Dispatcher**: trigger-source routing table, hook bracketing
//! - **Notifier** trait: notification transport (NATS, in-memory)
//! - **DispatchHooks** trait: entry/exit instrumentation

pub mod codec;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod hooks;
pub mod notify;
pub mod triggers;
pub mod types;

// Re-export core types
pub use config::{ConfigSource, EnvConfig, TelemetryConfig, TriggerConfig};
pub use dispatcher::{default_routes, Dispatcher};
pub use error::{ErrorKind, Result, TriggerError};
pub use hooks::{
    DispatchContext, DispatchHooks, DispatchOutcome, DispatchRecord, HoneycombExporter,
    InvocationContext, NoopHooks, TelemetryExporter, TelemetryHooks,
};
pub use notify::{EventPayload, NotificationPublisher, Notifier};
pub use triggers::{CognitoTriggers, TriggerKind};
pub use types::{
    CallerContext, Envelope, PostConfirmationRequest, PostConfirmationResponse,
    PreAuthenticationRequest, PreAuthenticationResponse, PreSignUpRequest, PreSignUpResponse,
    PreTokenGenRequest, PreTokenGenResponse, UserAttributes,
};

// Re-export notifiers for convenience
pub use notify::disabled::DisabledNotifier;
pub use notify::memory::{MemoryNotifier, PublishedMessage};
pub use notify::nats::{NatsNotifier, NatsNotifierConfig};
