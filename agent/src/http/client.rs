//! HTTP client implementation

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, error};

use crate::errors::AgentError;
use crate::evse::transport::DeviceTransport;
use crate::models::command::CommandResult;
use crate::models::status::StatusDocument;

/// Request body that forces charging off
const DISABLE_OVERRIDE_BODY: &str = r#"{"state":"disabled"}"#;

/// HTTP client for the charging station's local API
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
}

impl HttpClient {
    /// Create a new HTTP client with a per-request deadline
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, AgentError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Fail unless the response carries the expected status code
    async fn expect_status(
        response: Response,
        expected: StatusCode,
    ) -> Result<Response, AgentError> {
        let actual = response.status();
        if actual != expected {
            let body = response.text().await.unwrap_or_default();
            error!(
                "Invalid response from openEVSE. Got {} expecting {}: {}",
                actual, expected, body
            );
            return Err(AgentError::UnexpectedStatusCode { expected, actual });
        }
        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, AgentError> {
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| {
            error!("Unable to decode message from openEVSE: {}", e);
            AgentError::Decode(e.to_string())
        })
    }
}

#[async_trait]
impl DeviceTransport for HttpClient {
    async fn fetch_status(&self) -> Result<StatusDocument, AgentError> {
        let url = self.url("/status");
        debug!("GET {}", url);

        let response = self.client.get(&url).send().await?;
        let response = Self::expect_status(response, StatusCode::OK).await?;
        let status: StatusDocument = Self::decode(response).await?;

        debug!("Got new status from openEVSE with {} fields", status.len());
        Ok(status)
    }

    async fn run_command(&self, command: &str) -> Result<CommandResult, AgentError> {
        let url = self.url("/r");
        debug!("GET {} rapi={}", url, command);

        let response = self
            .client
            .get(&url)
            .query(&[("json", "1"), ("rapi", command)])
            .send()
            .await?;
        let response = Self::expect_status(response, StatusCode::OK).await?;
        Self::decode(response).await
    }

    async fn create_override(&self) -> Result<(), AgentError> {
        let url = self.url("/override");
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(DISABLE_OVERRIDE_BODY)
            .send()
            .await?;
        Self::expect_status(response, StatusCode::CREATED).await?;
        Ok(())
    }

    async fn delete_override(&self) -> Result<(), AgentError> {
        let url = self.url("/override");
        debug!("DELETE {}", url);

        let response = self.client.delete(&url).send().await?;
        Self::expect_status(response, StatusCode::CREATED).await?;
        Ok(())
    }
}
