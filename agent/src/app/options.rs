//! Application configuration options

use std::time::Duration;

use crate::storage::settings::{EvseSettings, Settings};
use crate::workers::poller;

/// Main application options
#[derive(Debug, Clone)]
pub struct AppOptions {
    /// Lifecycle configuration
    pub lifecycle: LifecycleOptions,

    /// Charging station configuration
    pub evse: EvseSettings,

    /// StatsD server, none disables metrics
    pub stats_server: Option<String>,

    /// Poller worker options
    pub poller: poller::Options,
}

impl AppOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            lifecycle: LifecycleOptions::default(),
            evse: settings.evse.clone(),
            stats_server: settings.stats_server().map(str::to_string),
            poller: poller::Options {
                interval: settings.evse.poll_interval(),
            },
        }
    }
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            lifecycle: LifecycleOptions::default(),
            evse: EvseSettings::default(),
            stats_server: None,
            poller: poller::Options::default(),
        }
    }
}

/// Lifecycle options for the agent
#[derive(Debug, Clone)]
pub struct LifecycleOptions {
    /// Maximum delay for graceful shutdown
    pub max_shutdown_delay: Duration,
}

impl Default for LifecycleOptions {
    fn default() -> Self {
        Self {
            max_shutdown_delay: Duration::from_secs(30),
        }
    }
}
