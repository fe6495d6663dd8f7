//! a3s-auth-triggers local invocation loop
//!
//! Reads one JSON envelope per line from stdin and writes one line per
//! invocation to stdout: the re-encoded envelope, or an error object.

use a3s_auth_triggers::{
    CognitoTriggers, DisabledNotifier, Dispatcher, EnvConfig, InvocationContext, NatsNotifier,
    NotificationPublisher, Notifier, TelemetryHooks, TriggerConfig, TriggerError,
};
use anyhow::Context;
use serde::Serialize;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::EnvFilter;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorResponse<'a> {
    error_type: &'a str,
    error_message: String,
}

impl<'a> From<&'a TriggerError> for ErrorResponse<'a> {
    fn from(err: &'a TriggerError) -> Self {
        Self {
            error_type: err.error_type(),
            error_message: err.to_string(),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!(start = %chrono::Utc::now(), "triggers");

    let config = TriggerConfig::from_env().context("failed to load configuration")?;

    let notifier: Arc<dyn Notifier> = match config.nats.clone() {
        Some(nats) => Arc::new(
            NatsNotifier::connect(nats)
                .await
                .context("failed to connect notification transport")?,
        ),
        None => {
            tracing::warn!("NATS_URL not set, post-confirmation events will fail to notify");
            Arc::new(DisabledNotifier)
        }
    };
    let publisher = NotificationPublisher::from_arc(notifier);

    let hooks = TelemetryHooks::new(&config.telemetry);
    let dispatcher = Dispatcher::new(CognitoTriggers::new(publisher), EnvConfig, hooks);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        if line.trim().is_empty() {
            continue;
        }

        let invocation = InvocationContext::generate();
        let mut out = match dispatcher.handle(&invocation, line.as_bytes()).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::error!(
                    request_id = %invocation.request_id,
                    error = %e,
                    retryable = e.is_retryable(),
                    "Invocation failed"
                );
                serde_json::to_vec(&ErrorResponse::from(&e))
                    .context("failed to encode error response")?
            }
        };
        out.push(b'\n');

        stdout.write_all(&out).await.context("failed to write stdout")?;
        stdout.flush().await.context("failed to flush stdout")?;
    }

    Ok(())
}
