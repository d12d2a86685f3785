//! DogStatsD gauge sink over UDP

use async_trait::async_trait;
use tokio::net::{lookup_host, UdpSocket};
use tracing::{debug, info};

use crate::errors::AgentError;
use crate::telemetry::sink::MetricSink;
use crate::telemetry::GaugeMetric;

/// Sends one datagram per gauge to a StatsD server
#[derive(Debug)]
pub struct StatsdSink {
    socket: UdpSocket,
    server: String,
}

impl StatsdSink {
    /// Resolve `server` (`host:port`) and connect an ephemeral UDP socket to it
    pub async fn connect(server: &str) -> Result<Self, AgentError> {
        let addr = lookup_host(server)
            .await
            .map_err(|e| AgentError::Metrics(format!("unable to resolve {}: {}", server, e)))?
            .next()
            .ok_or_else(|| AgentError::Metrics(format!("no address found for {}", server)))?;

        let bind_addr = if addr.is_ipv4() { "0.0.0.0:0" } else { "[::]:0" };
        let socket = UdpSocket::bind(bind_addr).await?;
        socket.connect(addr).await?;

        info!("Got stats server {} stats are enabled", server);
        Ok(Self {
            socket,
            server: server.to_string(),
        })
    }

    pub fn server(&self) -> &str {
        &self.server
    }
}

/// `name:value|g` with `|#tag,...` when tags are present
pub fn format_gauge(metric: &GaugeMetric) -> String {
    let name = sanitize(&metric.name, &[':', '|', '@']);
    let mut line = format!("{}:{}|g", name, metric.value);
    if !metric.tags.is_empty() {
        let tags: Vec<String> = metric.tags.iter().map(|tag| sanitize(tag, &['|', ','])).collect();
        line.push_str("|#");
        line.push_str(&tags.join(","));
    }
    line
}

/// Replace datagram delimiters and control characters with `_`
fn sanitize(value: &str, delimiters: &[char]) -> String {
    value
        .chars()
        .map(|c| if c.is_control() || delimiters.contains(&c) { '_' } else { c })
        .collect()
}

#[async_trait]
impl MetricSink for StatsdSink {
    async fn send_gauge(&self, metric: &GaugeMetric) -> Result<(), AgentError> {
        let line = format_gauge(metric);
        debug!("statsd <- {}", line);
        self.socket
            .send(line.as_bytes())
            .await
            .map_err(|e| AgentError::Metrics(format!("send to {} failed: {}", self.server, e)))?;
        Ok(())
    }
}
