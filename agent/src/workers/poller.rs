//! Status polling worker

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::errors::AgentError;
use crate::evse::transport::DeviceTransport;
use crate::telemetry::sink::{publish, MetricSink};
use crate::telemetry::translate::translate;

/// Poller worker options
#[derive(Debug, Clone)]
pub struct Options {
    /// Polling interval
    pub interval: Duration,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10),
        }
    }
}

/// Fetch one status document and forward its metrics.
///
/// Returns the number of gauges delivered to the sink.
pub async fn poll_once(
    transport: &dyn DeviceTransport,
    sink: Option<&dyn MetricSink>,
) -> Result<usize, AgentError> {
    let status = transport.fetch_status().await?;

    let Some(sink) = sink else {
        return Ok(0);
    };
    let metrics = translate(&status);
    Ok(publish(sink, &metrics).await)
}

/// Run the poller worker until `shutdown_signal` resolves.
///
/// The first poll happens one interval after start. A failed poll is logged
/// and the next tick tries again. A poll in flight when the signal arrives
/// is dropped.
pub async fn run<S, F>(
    options: &Options,
    transport: &dyn DeviceTransport,
    sink: Option<&dyn MetricSink>,
    sleep_fn: S,
    mut shutdown_signal: Pin<Box<dyn Future<Output = ()> + Send>>,
) where
    S: Fn(Duration) -> F,
    F: Future<Output = ()>,
{
    info!("Poller worker starting...");

    loop {
        tokio::select! {
            _ = &mut shutdown_signal => {
                info!("Poller worker shutting down...");
                return;
            }
            _ = sleep_fn(options.interval) => {}
        }

        debug!("Polling openEVSE status...");

        tokio::select! {
            _ = &mut shutdown_signal => {
                info!("Poller worker shutting down mid-poll...");
                return;
            }
            result = poll_once(transport, sink) => match result {
                Ok(sent) => debug!("Reported {} status metrics", sent),
                Err(e) => error!("Unable to get status from openEVSE: {}", e),
            }
        }
    }
}

/// Running poller task
#[derive(Debug)]
pub struct PollerHandle {
    stop_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl PollerHandle {
    /// Signal the poller and wait for it to exit.
    ///
    /// Once this returns the poller makes no further device calls.
    pub async fn stop(self) -> Result<(), AgentError> {
        let _ = self.stop_tx.send(true);
        self.handle
            .await
            .map_err(|e| AgentError::Shutdown(e.to_string()))
    }
}

/// Spawn the poller on the current runtime
pub fn spawn(
    options: Options,
    transport: Arc<dyn DeviceTransport>,
    sink: Option<Arc<dyn MetricSink>>,
) -> PollerHandle {
    let (stop_tx, mut stop_rx) = watch::channel(false);

    let handle = tokio::spawn(async move {
        run(
            &options,
            transport.as_ref(),
            sink.as_deref(),
            tokio::time::sleep,
            Box::pin(async move {
                loop {
                    let stopped = *stop_rx.borrow_and_update();
                    if stopped || stop_rx.changed().await.is_err() {
                        return;
                    }
                }
            }),
        )
        .await;
    });

    PollerHandle { stop_tx, handle }
}
