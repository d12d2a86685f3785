//! Settings file management

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::errors::AgentError;
use crate::filesys::file::File;
use crate::logs::LogLevel;

/// Lowest charge current the device class accepts, in amps
pub const MIN_CHARGE_CURRENT: u32 = 6;

/// Default location of the settings file
pub const DEFAULT_SETTINGS_PATH: &str = "./config.json";

/// Agent settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// StatsD server address (`host:port`); empty disables metrics
    #[serde(default)]
    pub stats_server: String,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Directory for rolling log files
    #[serde(default)]
    pub log_dir: Option<PathBuf>,

    /// Charging station configuration
    #[serde(rename = "evseConfiguration")]
    pub evse: EvseSettings,
}

impl Settings {
    /// Read and validate the settings file
    pub async fn load(file: &File) -> Result<Self, AgentError> {
        let settings: Settings = file.read_json().await.map_err(|e| {
            AgentError::Config(format!(
                "unable to read settings from {}: {}",
                file.path().display(),
                e
            ))
        })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check the invariants the rest of the agent relies on
    pub fn validate(&self) -> Result<(), AgentError> {
        self.evse.address()?;

        if self.evse.max_charge_current < MIN_CHARGE_CURRENT {
            return Err(AgentError::Config(format!(
                "maxChargeCurrent must be at least {}A, got {}A",
                MIN_CHARGE_CURRENT, self.evse.max_charge_current
            )));
        }
        if self.evse.poll_interval_secs == 0 {
            return Err(AgentError::Config("pollIntervalSecs must be positive".to_string()));
        }
        if self.evse.request_timeout_secs == 0 {
            return Err(AgentError::Config("requestTimeoutSecs must be positive".to_string()));
        }
        Ok(())
    }

    /// StatsD server, if metrics are enabled
    pub fn stats_server(&self) -> Option<&str> {
        let server = self.stats_server.trim();
        (!server.is_empty()).then_some(server)
    }
}

/// Charging station settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvseSettings {
    /// Poll the device for status and report metrics
    #[serde(default)]
    pub enabled: bool,

    /// Base URL of the device's HTTP API
    pub address: String,

    /// Let the override policy report the high priority state
    #[serde(default)]
    pub enable_control: bool,

    /// Upper bound for charge current limits, in amps
    pub max_charge_current: u32,

    /// Reserved. Parsed and kept but not used by any control logic.
    #[serde(default)]
    pub min_current_buffer: u32,

    /// Seconds between status polls
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    /// Per-request deadline in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_poll_interval() -> u64 {
    10
}

fn default_request_timeout() -> u64 {
    5
}

impl EvseSettings {
    /// Parsed device address
    pub fn address(&self) -> Result<Url, AgentError> {
        let url = Url::parse(&self.address)
            .map_err(|e| AgentError::Config(format!("invalid address {:?}: {}", self.address, e)))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(AgentError::Config(format!(
                "address must be http or https, got {}",
                other
            ))),
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for EvseSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            address: "http://openevse.local".to_string(),
            enable_control: false,
            max_charge_current: 32,
            min_current_buffer: 0,
            poll_interval_secs: default_poll_interval(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}
