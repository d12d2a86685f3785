//! Device status document

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::AgentError;

/// Value of the `status` field while the station is charging or ready to charge
pub const ACTIVE_STATUS: &str = "active";

/// A single status field as decoded from the device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatusValue {
    Bool(bool),
    Number(f64),
    Text(String),
    /// null, arrays and objects; carried through so translation can skip them
    Other(serde_json::Value),
}

impl StatusValue {
    /// Short name of the JSON type, for log messages
    pub fn kind(&self) -> &'static str {
        match self {
            StatusValue::Bool(_) => "bool",
            StatusValue::Number(_) => "number",
            StatusValue::Text(_) => "string",
            StatusValue::Other(serde_json::Value::Null) => "null",
            StatusValue::Other(serde_json::Value::Array(_)) => "array",
            StatusValue::Other(serde_json::Value::Object(_)) => "object",
            StatusValue::Other(_) => "unknown",
        }
    }
}

/// Flat field map returned by `GET /status`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusDocument {
    fields: BTreeMap<String, StatusValue>,
}

impl StatusDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, name: impl Into<String>, value: StatusValue) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&StatusValue> {
        self.fields.get(name)
    }

    /// Fields in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &StatusValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Charging state derived from the `status` field.
    ///
    /// ON iff `status` is exactly `"active"`; any other value, including a
    /// non-string one, is OFF. A document without `status` is an error.
    pub fn power_state(&self) -> Result<PowerState, AgentError> {
        match self.get("status") {
            Some(StatusValue::Text(status)) if status == ACTIVE_STATUS => Ok(PowerState::On),
            Some(_) => Ok(PowerState::Off),
            None => Err(AgentError::Protocol(
                "status was not included in message".to_string(),
            )),
        }
    }
}

/// Charging state as seen by callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PowerState {
    On,
    Off,
}

impl PowerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PowerState::On => "ON",
            PowerState::Off => "OFF",
        }
    }
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PowerState {
    type Err = AgentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ON" => Ok(PowerState::On),
            "OFF" => Ok(PowerState::Off),
            _ => Err(AgentError::Config(format!("Invalid state: {}", s))),
        }
    }
}
