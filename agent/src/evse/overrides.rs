//! Charging override state machine

use std::fmt;

use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::errors::AgentError;
use crate::evse::transport::DeviceTransport;
use crate::models::status::PowerState;

/// What `set_state` did to reach the desired state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverrideAction {
    /// Forced charging off
    Created,
    /// Released a forced-off override
    Deleted,
    /// Already in the desired state
    Unchanged,
}

impl fmt::Display for OverrideAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverrideAction::Created => f.write_str("override created"),
            OverrideAction::Deleted => f.write_str("override deleted"),
            OverrideAction::Unchanged => f.write_str("unchanged"),
        }
    }
}

/// Derives ON/OFF from the device and only writes when it has to
pub struct OverrideController<T> {
    transport: T,
    enable_control: bool,
    /// Held from the state read until the override write completes
    decision: Mutex<()>,
}

impl<T: DeviceTransport> OverrideController<T> {
    pub fn new(transport: T, enable_control: bool) -> Self {
        Self {
            transport,
            enable_control,
            decision: Mutex::new(()),
        }
    }

    /// Current state, re-read from the device on every call
    pub async fn get_state(&self) -> Result<PowerState, AgentError> {
        let status = self.transport.fetch_status().await?;
        status.power_state()
    }

    /// Drive the device towards `desired`.
    ///
    /// Concurrent calls run one after another, so each one reads the state
    /// left by the previous write. A failed state read is returned to the
    /// caller and nothing is written.
    pub async fn set_state(&self, desired: PowerState) -> Result<OverrideAction, AgentError> {
        let _decision = self.decision.lock().await;
        let current = self.get_state().await?;

        let action = match (desired, current) {
            (PowerState::On, PowerState::Off) => {
                self.transport.delete_override().await?;
                OverrideAction::Deleted
            }
            (PowerState::Off, PowerState::On) => {
                self.transport.create_override().await?;
                OverrideAction::Created
            }
            _ => OverrideAction::Unchanged,
        };

        info!("Set charging state to {} from {}: {}", desired, current, action);
        Ok(action)
    }

    /// True while control is enabled and the station is ON.
    ///
    /// Read errors are logged and reported as false.
    pub async fn in_high_priority_state(&self) -> bool {
        if !self.enable_control {
            return false;
        }
        match self.get_state().await {
            Ok(state) => state == PowerState::On,
            Err(e) => {
                warn!("Unable to read charging state, assuming not charging: {}", e);
                false
            }
        }
    }
}
