//! Dispatch instrumentation hooks
//!
//! The entry hook returns a per-call [`DispatchContext`] holding the start
//! time; the exit hook consumes it. Nothing about an invocation is kept in
//! process-wide state, so concurrent dispatches cannot interfere.

use crate::error::{ErrorKind, TriggerError, Result};
use crate::triggers::TriggerKind;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

/// Per-invocation identity supplied by the transport
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvocationContext {
    /// Transport-assigned request id
    pub request_id: String,
}

impl InvocationContext {
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
        }
    }

    /// Context with a generated request id (req-<uuid>)
    pub fn generate() -> Self {
        Self::new(format!("req-{}", uuid::Uuid::new_v4()))
    }
}

/// Per-call carrier threaded from the entry hook to the exit hook
#[derive(Debug, Clone)]
pub struct DispatchContext {
    pub request_id: String,

    /// Set once the envelope is decoded
    pub trigger_source: Option<String>,

    /// Monotonic start, for durations
    pub started_at: Instant,

    /// Wall-clock start, for records
    pub start_time: DateTime<Utc>,
}

impl DispatchContext {
    /// Capture the start of an invocation
    pub fn start(invocation: &InvocationContext) -> Self {
        Self {
            request_id: invocation.request_id.clone(),
            trigger_source: None,
            started_at: Instant::now(),
            start_time: Utc::now(),
        }
    }

    /// Milliseconds since the entry hook ran
    pub fn elapsed_ms(&self) -> u64 {
        self.started_at.elapsed().as_millis() as u64
    }
}

/// How a dispatch ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A handler ran and its response was encoded
    Handled(TriggerKind),
    /// No handler matched the trigger source
    PassThrough,
    /// The dispatch failed
    Failed(ErrorKind),
}

impl DispatchOutcome {
    /// Outcome of a failed dispatch
    pub fn failed(err: &TriggerError) -> Self {
        DispatchOutcome::Failed(err.kind())
    }

    /// Stable label used in telemetry records
    pub fn label(&self) -> &'static str {
        match self {
            DispatchOutcome::Handled(_) => "handled",
            DispatchOutcome::PassThrough => "pass_through",
            DispatchOutcome::Failed(ErrorKind::Decode) => "decode_error",
            DispatchOutcome::Failed(ErrorKind::Validation) => "rejected",
            DispatchOutcome::Failed(ErrorKind::SideEffect) => "side_effect_error",
            DispatchOutcome::Failed(ErrorKind::Encode) => "encode_error",
        }
    }
}

/// Entry/exit hooks bracketing every dispatch
#[async_trait]
pub trait DispatchHooks: Send + Sync {
    /// Called before the envelope is decoded
    fn event_received(&self, invocation: &InvocationContext) -> DispatchContext {
        DispatchContext::start(invocation)
    }

    /// Called on every exit path, success or failure
    async fn event_sent(&self, ctx: DispatchContext, outcome: &DispatchOutcome);
}

/// Hooks that do nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHooks;

#[async_trait]
impl DispatchHooks for NoopHooks {
    async fn event_sent(&self, _ctx: DispatchContext, _outcome: &DispatchOutcome) {}
}

/// Structured duration record emitted on exit
#[derive(Debug, Clone, Serialize)]
pub struct DispatchRecord {
    pub function_name: String,
    pub function_version: String,
    pub request_id: String,
    pub trigger_source: String,
    pub outcome: &'static str,
    pub start_time: DateTime<Utc>,
    pub duration_ms: u64,
}

/// Destination for [`DispatchRecord`]s
#[async_trait]
pub trait TelemetryExporter: Send + Sync {
    async fn export(&self, record: &DispatchRecord) -> Result<()>;
}

/// Default hooks: structured logs plus an optional telemetry export
pub struct TelemetryHooks {
    function_name: String,
    function_version: String,
    exporter: Option<Arc<dyn TelemetryExporter>>,
}

impl TelemetryHooks {
    /// Hooks for the given telemetry settings
    ///
    /// Export is silently disabled when credentials are incomplete.
    pub fn new(config: &crate::config::TelemetryConfig) -> Self {
        let exporter = config
            .exporter()
            .map(|e| Arc::new(e) as Arc<dyn TelemetryExporter>);

        Self {
            function_name: config.function_name.clone(),
            function_version: config.function_version.clone(),
            exporter,
        }
    }

    /// Replace the exporter
    pub fn with_exporter(mut self, exporter: Arc<dyn TelemetryExporter>) -> Self {
        self.exporter = Some(exporter);
        self
    }

    /// Whether records are exported anywhere
    pub fn exports(&self) -> bool {
        self.exporter.is_some()
    }

    fn record(&self, ctx: &DispatchContext, outcome: &DispatchOutcome) -> DispatchRecord {
        DispatchRecord {
            function_name: self.function_name.clone(),
            function_version: self.function_version.clone(),
            request_id: ctx.request_id.clone(),
            trigger_source: ctx.trigger_source.clone().unwrap_or_default(),
            outcome: outcome.label(),
            start_time: ctx.start_time,
            duration_ms: ctx.elapsed_ms(),
        }
    }
}

#[async_trait]
impl DispatchHooks for TelemetryHooks {
    fn event_received(&self, invocation: &InvocationContext) -> DispatchContext {
        tracing::info!(request_id = %invocation.request_id, "EventReceived");
        DispatchContext::start(invocation)
    }

    async fn event_sent(&self, ctx: DispatchContext, outcome: &DispatchOutcome) {
        let record = self.record(&ctx, outcome);

        tracing::info!(
            request_id = %record.request_id,
            trigger_source = %record.trigger_source,
            outcome = record.outcome,
            start_time = %record.start_time,
            duration_ms = record.duration_ms,
            "EventSent"
        );

        if let Some(ref exporter) = self.exporter {
            if let Err(e) = exporter.export(&record).await {
                tracing::warn!(error = %e, request_id = %record.request_id, "Telemetry export failed");
            }
        }
    }
}

/// Exports records to the Honeycomb events API
pub struct HoneycombExporter {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl HoneycombExporter {
    pub fn new(api_url: &str, api_key: &str, dataset: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: format!("{}/1/events/{}", api_url.trim_end_matches('/'), dataset),
            api_key: api_key.to_string(),
        }
    }

    /// Full events endpoint for the dataset
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl TelemetryExporter for HoneycombExporter {
    async fn export(&self, record: &DispatchRecord) -> Result<()> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("X-Honeycomb-Team", &self.api_key)
            .json(record)
            .send()
            .await
            .map_err(|e| TriggerError::Telemetry(format!("{}: {}", self.endpoint, e)))?;

        if !response.status().is_success() {
            return Err(TriggerError::Telemetry(format!(
                "{} returned {}",
                self.endpoint,
                response.status()
            )));
        }

        tracing::debug!(request_id = %record.request_id, "Telemetry record exported");
        Ok(())
    }
}
