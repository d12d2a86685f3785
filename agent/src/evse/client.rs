//! Charging station client

use std::sync::Arc;

use crate::errors::AgentError;
use crate::evse::charge_limit::ChargeLimitController;
use crate::evse::overrides::{OverrideAction, OverrideController};
use crate::evse::transport::{DeviceTransport, SerializedTransport};
use crate::http::client::HttpClient;
use crate::models::status::PowerState;
use crate::storage::settings::EvseSettings;

/// Shared handle to the device transport
pub type SharedTransport = Arc<dyn DeviceTransport>;

/// Entry point for callers controlling one charging station.
///
/// Both controllers and the status poller share a single transport, and
/// every caller shares the one override controller and its decision lock.
pub struct EvseClient {
    transport: SharedTransport,
    overrides: OverrideController<SharedTransport>,
    charge_limit: ChargeLimitController<SharedTransport>,
}

impl EvseClient {
    pub fn new(transport: SharedTransport, settings: &EvseSettings) -> Self {
        Self {
            overrides: OverrideController::new(transport.clone(), settings.enable_control),
            charge_limit: ChargeLimitController::new(transport.clone(), settings.max_charge_current),
            transport,
        }
    }

    /// Build a client talking HTTP to the configured address, one call at a time
    pub fn connect(settings: &EvseSettings) -> Result<Self, AgentError> {
        let address = settings.address()?;
        let http_client = HttpClient::new(address.as_str(), settings.request_timeout())?;
        let transport: SharedTransport = Arc::new(SerializedTransport::new(http_client));
        Ok(Self::new(transport, settings))
    }

    pub fn transport(&self) -> SharedTransport {
        self.transport.clone()
    }

    pub async fn get_state(&self) -> Result<PowerState, AgentError> {
        self.overrides.get_state().await
    }

    pub async fn set_state(&self, desired: PowerState) -> Result<OverrideAction, AgentError> {
        self.overrides.set_state(desired).await
    }

    pub async fn in_high_priority_state(&self) -> bool {
        self.overrides.in_high_priority_state().await
    }

    pub async fn get_limit(&self) -> Result<u32, AgentError> {
        self.charge_limit.get_limit().await
    }

    pub async fn set_limit(&self, requested: i64) -> Result<u32, AgentError> {
        self.charge_limit.set_limit(requested).await
    }
}
