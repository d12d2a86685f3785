//! Scriptable in-memory charging station

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;

use evse_agent::errors::AgentError;
use evse_agent::evse::transport::DeviceTransport;
use evse_agent::models::command::CommandResult;
use evse_agent::models::status::{StatusDocument, StatusValue};

/// Counts every call and behaves like a device whose override endpoint
/// flips the `status` field.
#[derive(Default)]
pub struct StubTransport {
    status: Mutex<Option<StatusDocument>>,
    replies: Mutex<VecDeque<String>>,
    commands: Mutex<Vec<String>>,
    latency: Duration,
    pub fetches: AtomicUsize,
    pub creates: AtomicUsize,
    pub deletes: AtomicUsize,
}

impl StubTransport {
    /// Device reporting `status` as a string
    pub fn with_status(status: &str) -> Self {
        let stub = Self::default();
        stub.set_status(Some(status_document(status)));
        stub
    }

    /// Like `with_status`, but every status read and override call takes `latency`
    pub fn slow(status: &str, latency: Duration) -> Self {
        let stub = Self {
            latency,
            ..Self::default()
        };
        stub.set_status(Some(status_document(status)));
        stub
    }

    async fn respond(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    /// Device whose status reads fail
    pub fn unreachable() -> Self {
        Self::default()
    }

    pub fn set_status(&self, status: Option<StatusDocument>) {
        *self.status.lock().unwrap() = status;
    }

    pub fn push_reply(&self, reply: &str) {
        self.replies.lock().unwrap().push_back(reply.to_string());
    }

    pub fn commands(&self) -> Vec<String> {
        self.commands.lock().unwrap().clone()
    }

    pub fn total_calls(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
            + self.creates.load(Ordering::SeqCst)
            + self.deletes.load(Ordering::SeqCst)
            + self.commands.lock().unwrap().len()
    }
}

pub fn status_document(status: &str) -> StatusDocument {
    StatusDocument::new()
        .with_field("status", StatusValue::Text(status.to_string()))
        .with_field("amp", StatusValue::Number(16000.0))
        .with_field("ota_update", StatusValue::Bool(false))
}

#[async_trait]
impl DeviceTransport for StubTransport {
    async fn fetch_status(&self) -> Result<StatusDocument, AgentError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.respond().await;
        self.status
            .lock()
            .unwrap()
            .clone()
            .ok_or(AgentError::UnexpectedStatusCode {
                expected: StatusCode::OK,
                actual: StatusCode::SERVICE_UNAVAILABLE,
            })
    }

    async fn run_command(&self, command: &str) -> Result<CommandResult, AgentError> {
        self.commands.lock().unwrap().push(command.to_string());
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| "$OK".to_string());
        Ok(CommandResult::new(reply))
    }

    async fn create_override(&self) -> Result<(), AgentError> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        self.respond().await;
        self.set_status(Some(status_document("disabled")));
        Ok(())
    }

    async fn delete_override(&self) -> Result<(), AgentError> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        self.respond().await;
        self.set_status(Some(status_document("active")));
        Ok(())
    }
}
