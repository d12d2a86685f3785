//! Main application run loop

use std::future::Future;
use std::sync::Arc;

use tracing::{error, info};

use crate::app::options::{AppOptions, LifecycleOptions};
use crate::errors::AgentError;
use crate::evse::client::EvseClient;
use crate::telemetry::sink::MetricSink;
use crate::telemetry::statsd::StatsdSink;
use crate::workers::poller::{self, PollerHandle};

/// Run the EVSE agent against the configured device
pub async fn run(
    options: AppOptions,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<(), AgentError> {
    info!("Initializing EVSE agent...");

    let client = Arc::new(EvseClient::connect(&options.evse)?);
    let sink = init_metric_sink(options.stats_server.as_deref()).await;

    run_with(client, sink, &options, shutdown_signal).await
}

/// Run with an already built client and sink
pub async fn run_with(
    client: Arc<EvseClient>,
    sink: Option<Arc<dyn MetricSink>>,
    options: &AppOptions,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<(), AgentError> {
    let mut shutdown_manager = ShutdownManager::new(options.lifecycle.clone());

    if options.evse.enabled {
        init_poller_worker(options.poller.clone(), &client, sink, &mut shutdown_manager)?;
    } else {
        info!("Status polling disabled by configuration");
    }

    shutdown_signal.await;
    info!("Shutdown signal received, shutting down...");

    shutdown_manager.shutdown().await
}

// =============================== INITIALIZATION ================================== //

async fn init_metric_sink(stats_server: Option<&str>) -> Option<Arc<dyn MetricSink>> {
    let server = stats_server?;
    match StatsdSink::connect(server).await {
        Ok(sink) => Some(Arc::new(sink)),
        Err(e) => {
            error!("Error creating stats client, metrics disabled: {}", e);
            None
        }
    }
}

fn init_poller_worker(
    options: poller::Options,
    client: &EvseClient,
    sink: Option<Arc<dyn MetricSink>>,
    shutdown_manager: &mut ShutdownManager,
) -> Result<(), AgentError> {
    info!("Initializing poller worker every {:?}...", options.interval);

    let handle = poller::spawn(options, client.transport(), sink);
    shutdown_manager.with_poller_handle(handle)
}

// ================================= SHUTDOWN ===================================== //

struct ShutdownManager {
    lifecycle_options: LifecycleOptions,
    poller_handle: Option<PollerHandle>,
}

impl ShutdownManager {
    pub fn new(lifecycle_options: LifecycleOptions) -> Self {
        Self {
            lifecycle_options,
            poller_handle: None,
        }
    }

    pub fn with_poller_handle(&mut self, handle: PollerHandle) -> Result<(), AgentError> {
        if self.poller_handle.is_some() {
            return Err(AgentError::Shutdown("poller_handle already set".to_string()));
        }
        self.poller_handle = Some(handle);
        Ok(())
    }

    pub async fn shutdown(&mut self) -> Result<(), AgentError> {
        match tokio::time::timeout(
            self.lifecycle_options.max_shutdown_delay,
            self.shutdown_impl(),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => {
                error!(
                    "Shutdown timed out after {:?}",
                    self.lifecycle_options.max_shutdown_delay
                );
                Err(AgentError::Shutdown(format!(
                    "timed out after {:?}",
                    self.lifecycle_options.max_shutdown_delay
                )))
            }
        }
    }

    async fn shutdown_impl(&mut self) -> Result<(), AgentError> {
        info!("Shutting down EVSE agent...");

        if let Some(handle) = self.poller_handle.take() {
            handle.stop().await?;
        }

        info!("Shutdown complete");
        Ok(())
    }
}
