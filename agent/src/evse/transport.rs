//! Device transport boundary

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::errors::AgentError;
use crate::models::command::CommandResult;
use crate::models::status::StatusDocument;

/// Request/response boundary to the charging station
#[async_trait]
pub trait DeviceTransport: Send + Sync {
    /// Read the full status document
    async fn fetch_status(&self) -> Result<StatusDocument, AgentError>;

    /// Send a command-channel request and return the parsed reply
    async fn run_command(&self, command: &str) -> Result<CommandResult, AgentError>;

    /// Force charging off
    async fn create_override(&self) -> Result<(), AgentError>;

    /// Release the forced-off override
    async fn delete_override(&self) -> Result<(), AgentError>;
}

#[async_trait]
impl<T: DeviceTransport + ?Sized> DeviceTransport for Arc<T> {
    async fn fetch_status(&self) -> Result<StatusDocument, AgentError> {
        (**self).fetch_status().await
    }

    async fn run_command(&self, command: &str) -> Result<CommandResult, AgentError> {
        (**self).run_command(command).await
    }

    async fn create_override(&self) -> Result<(), AgentError> {
        (**self).create_override().await
    }

    async fn delete_override(&self) -> Result<(), AgentError> {
        (**self).delete_override().await
    }
}

/// Runs one device call at a time.
///
/// Only single calls are serialized. Read-then-write sequences need their
/// own lock, see `OverrideController::set_state`.
pub struct SerializedTransport<T> {
    inner: T,
    lock: Mutex<()>,
}

impl<T: DeviceTransport> SerializedTransport<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            lock: Mutex::new(()),
        }
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }
}

#[async_trait]
impl<T: DeviceTransport> DeviceTransport for SerializedTransport<T> {
    async fn fetch_status(&self) -> Result<StatusDocument, AgentError> {
        let _guard = self.lock.lock().await;
        self.inner.fetch_status().await
    }

    async fn run_command(&self, command: &str) -> Result<CommandResult, AgentError> {
        let _guard = self.lock.lock().await;
        self.inner.run_command(command).await
    }

    async fn create_override(&self) -> Result<(), AgentError> {
        let _guard = self.lock.lock().await;
        self.inner.create_override().await
    }

    async fn delete_override(&self) -> Result<(), AgentError> {
        let _guard = self.lock.lock().await;
        self.inner.delete_override().await
    }
}
