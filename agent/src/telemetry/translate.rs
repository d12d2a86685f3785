//! Status document to gauge translation

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use tracing::warn;

use crate::errors::AgentError;
use crate::models::status::{StatusDocument, StatusValue};
use crate::telemetry::{GaugeMetric, METRIC_PREFIX};

/// `YYYY-MM-DDTHH:MM:SSZ`
const UTC_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// `YYYY-MM-DDTHH:MM:SS+HHMM`
const LOCAL_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

/// Convert every usable field into at most one gauge.
///
/// Numbers and booleans become plain gauges, `time` and `local_time` become
/// Unix seconds, other strings become a tagged presence gauge of 1. Fields
/// that cannot be parsed or have no gauge shape are skipped.
pub fn translate(status: &StatusDocument) -> Vec<GaugeMetric> {
    let mut metrics = Vec::with_capacity(status.len());

    for (field, value) in status.iter() {
        match translate_field(field, value) {
            Ok(Some(metric)) => metrics.push(metric),
            Ok(None) => warn!(
                "Got unrecognized type for record {} got {}",
                field,
                value.kind()
            ),
            Err(e) => warn!("Skipping status field: {}", e),
        }
    }

    metrics
}

fn translate_field(field: &str, value: &StatusValue) -> Result<Option<GaugeMetric>, AgentError> {
    let name = format!("{}{}", METRIC_PREFIX, field);

    let metric = match value {
        StatusValue::Number(n) => GaugeMetric::new(name, *n),
        StatusValue::Bool(b) => GaugeMetric::new(name, if *b { 1.0 } else { 0.0 }),
        StatusValue::Text(text) => match field {
            "time" => GaugeMetric::new(name, parse_utc_time(field, text)? as f64),
            "local_time" => GaugeMetric::new(name, parse_local_time(field, text)? as f64),
            _ => GaugeMetric::new(name, 1.0).with_tag(format!("{}:{}", field, text)),
        },
        StatusValue::Other(_) => return Ok(None),
    };

    Ok(Some(metric))
}

/// Unix seconds of a `YYYY-MM-DDTHH:MM:SSZ` timestamp
pub fn parse_utc_time(field: &str, value: &str) -> Result<i64, AgentError> {
    let naive = NaiveDateTime::parse_from_str(value, UTC_TIME_FORMAT)
        .map_err(|e| field_error(field, value, e))?;
    Ok(Utc.from_utc_datetime(&naive).timestamp())
}

/// Unix seconds of a `YYYY-MM-DDTHH:MM:SS±HHMM` timestamp.
///
/// chrono's `%z` also takes `±HH:MM`, which the device never sends.
pub fn parse_local_time(field: &str, value: &str) -> Result<i64, AgentError> {
    if !has_compact_offset(value) {
        return Err(AgentError::FieldParse {
            field: field.to_string(),
            value: value.to_string(),
            reason: "expected a ±HHMM offset".to_string(),
        });
    }
    let time = DateTime::parse_from_str(value, LOCAL_TIME_FORMAT)
        .map_err(|e| field_error(field, value, e))?;
    Ok(time.timestamp())
}

/// Ends in a sign followed by exactly four digits
fn has_compact_offset(value: &str) -> bool {
    let bytes = value.as_bytes();
    if bytes.len() < 5 {
        return false;
    }
    let (sign, digits) = (bytes[bytes.len() - 5], &bytes[bytes.len() - 4..]);
    matches!(sign, b'+' | b'-') && digits.iter().all(u8::is_ascii_digit)
}

fn field_error(field: &str, value: &str, e: chrono::ParseError) -> AgentError {
    AgentError::FieldParse {
        field: field.to_string(),
        value: value.to_string(),
        reason: e.to_string(),
    }
}
