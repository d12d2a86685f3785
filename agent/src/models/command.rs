//! RAPI command channel messages

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::AgentError;

/// First reply token of an accepted command
pub const REPLY_OK: &str = "$OK";

/// Commands sent through `GET /r?json=1&rapi=...`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RapiCommand {
    /// `$GE`: query the current capacity setting
    GetCurrentCapacity,
    /// `$SC <amps>`: set the current capacity
    SetCurrentCapacity(u32),
}

impl fmt::Display for RapiCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RapiCommand::GetCurrentCapacity => write!(f, "$GE"),
            RapiCommand::SetCurrentCapacity(amps) => write!(f, "$SC {}", amps),
        }
    }
}

/// Reply body of the command channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandResult {
    #[serde(rename = "RET")]
    pub ret: String,
}

impl CommandResult {
    pub fn new(ret: impl Into<String>) -> Self {
        Self { ret: ret.into() }
    }

    /// Space separated reply tokens, without a trailing `^XX` checksum
    pub fn tokens(&self) -> Vec<&str> {
        let body = match self.ret.split_once('^') {
            Some((body, _checksum)) => body,
            None => &self.ret,
        };
        body.split_whitespace().collect()
    }

    /// Whether the first token reports success
    pub fn is_ok(&self) -> bool {
        self.tokens().first() == Some(&REPLY_OK)
    }

    /// Current limit from a `$GE` reply: exactly three tokens, amps in the middle
    pub fn current_limit(&self) -> Result<u32, AgentError> {
        match self.tokens().as_slice() {
            [_, amps, _] => amps.parse().map_err(|e| {
                AgentError::Protocol(format!("invalid current limit {:?}: {}", amps, e))
            }),
            _ => Err(AgentError::Protocol(format!(
                "did not get expected result got {}",
                self.ret
            ))),
        }
    }
}
