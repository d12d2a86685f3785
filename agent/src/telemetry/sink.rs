//! Metric sink capability

use std::sync::Mutex;

use async_trait::async_trait;
use tracing::error;

use crate::errors::AgentError;
use crate::telemetry::GaugeMetric;

/// Accepts gauge emissions. Delivery and batching belong to the implementation.
#[async_trait]
pub trait MetricSink: Send + Sync {
    async fn send_gauge(&self, metric: &GaugeMetric) -> Result<(), AgentError>;
}

/// Send every metric, logging failures without stopping. Returns the number sent.
pub async fn publish(sink: &dyn MetricSink, metrics: &[GaugeMetric]) -> usize {
    let mut sent = 0;
    for metric in metrics {
        match sink.send_gauge(metric).await {
            Ok(()) => sent += 1,
            Err(e) => error!("Failed to send metric {}: {}", metric.name, e),
        }
    }
    sent
}

/// Keeps every emission in memory
#[derive(Debug, Default)]
pub struct RecordingSink {
    metrics: Mutex<Vec<GaugeMetric>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything received so far
    pub fn metrics(&self) -> Vec<GaugeMetric> {
        self.metrics
            .lock()
            .map(|metrics| metrics.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl MetricSink for RecordingSink {
    async fn send_gauge(&self, metric: &GaugeMetric) -> Result<(), AgentError> {
        self.metrics
            .lock()
            .map_err(|e| AgentError::Metrics(e.to_string()))?
            .push(metric.clone());
        Ok(())
    }
}
