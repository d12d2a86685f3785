//! Charge current limit commands

use tracing::{error, info, warn};

use crate::errors::AgentError;
use crate::evse::transport::DeviceTransport;
use crate::models::command::RapiCommand;
use crate::storage::settings::MIN_CHARGE_CURRENT;

/// Clamp any requested limit, negative ones included, into `[MIN_CHARGE_CURRENT, max]`
pub fn clamp_limit(requested: i64, max: u32) -> u32 {
    let max = max.max(MIN_CHARGE_CURRENT);
    let clamped = requested.clamp(i64::from(MIN_CHARGE_CURRENT), i64::from(max));
    u32::try_from(clamped).unwrap_or(max)
}

/// Reads and writes the station's current capacity setting
pub struct ChargeLimitController<T> {
    transport: T,
    max_charge_current: u32,
}

impl<T: DeviceTransport> ChargeLimitController<T> {
    pub fn new(transport: T, max_charge_current: u32) -> Self {
        Self {
            transport,
            max_charge_current,
        }
    }

    /// Current limit in amps
    pub async fn get_limit(&self) -> Result<u32, AgentError> {
        let command = RapiCommand::GetCurrentCapacity.to_string();
        let result = self.transport.run_command(&command).await?;
        result.current_limit()
    }

    /// Clamp and apply a limit, returning the amps actually sent.
    ///
    /// A reply other than `$OK` is logged and returned as a protocol error.
    pub async fn set_limit(&self, requested: i64) -> Result<u32, AgentError> {
        let limit = clamp_limit(requested, self.max_charge_current);
        if i64::from(limit) != requested {
            warn!(
                "Requested charge current {}A is outside {}..={}A, using {}A",
                requested, MIN_CHARGE_CURRENT, self.max_charge_current, limit
            );
        }

        info!("Setting new charge current limit to {}A", limit);
        let command = RapiCommand::SetCurrentCapacity(limit).to_string();
        let result = match self.transport.run_command(&command).await {
            Ok(result) => result,
            Err(e) => {
                error!("Error setting charge limit setting: {}", e);
                return Err(e);
            }
        };

        if !result.is_ok() {
            error!("Charge limit update to {}A rejected: {}", limit, result.ret);
            return Err(AgentError::Protocol(format!(
                "charge limit update rejected: {}",
                result.ret
            )));
        }

        info!("Updated charging limit with result {}", result.ret);
        Ok(limit)
    }
}
