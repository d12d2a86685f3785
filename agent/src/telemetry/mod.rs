//! Metric emission for device status

pub mod sink;
pub mod statsd;
pub mod translate;

/// Prefix of every metric derived from the status document
pub const METRIC_PREFIX: &str = "openevse_";

/// A point-in-time gauge sample
#[derive(Debug, Clone, PartialEq)]
pub struct GaugeMetric {
    pub name: String,
    pub tags: Vec<String>,
    pub value: f64,
}

impl GaugeMetric {
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            tags: Vec::new(),
            value,
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }
}
