use async_trait::async_trait;
use reqwest::{
    Client,
    header::{self, HeaderMap, HeaderValue},
};

use super::message::MessagesRequest;
use crate::error::{Error, Result};

/// The Anthropic Messages API endpoint.
pub const ENDPOINT: &str = "https://api.anthropic.com/v1/messages";

/// Value of the `anthropic-version` header.
pub const API_VERSION: &str = "2023-06-01";

/// Status and body of one HTTP exchange, before interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

/// Sends a Messages request and returns the raw reply.
///
/// Implementations report only transport-level failures as
/// [`Error::Network`]; status handling is left to the caller.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post(&self, api_key: &str, request: &MessagesRequest) -> Result<RawResponse>;
}

/// `reqwest`-backed transport.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(Client::new(), endpoint)
    }

    pub fn with_client(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Builds the content-type, `x-api-key` and `anthropic-version` headers.
    pub fn headers(api_key: &str) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(
            "x-api-key",
            HeaderValue::from_str(api_key).map_err(|_| Error::InvalidApiKey)?,
        );
        headers.insert("anthropic-version", HeaderValue::from_static(API_VERSION));
        Ok(headers)
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new(ENDPOINT)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(&self, api_key: &str, request: &MessagesRequest) -> Result<RawResponse> {
        let headers = Self::headers(api_key)?;

        if let Ok(body) = serde_json::to_string(request) {
            tracing::trace!(endpoint = %self.endpoint, %body, "request");
        }

        let response = self
            .client
            .post(&self.endpoint)
            .headers(headers)
            .json(request)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        let status = response.status();
        let body = if status.is_success() {
            response
                .text()
                .await
                .map_err(|e| Error::Network(e.to_string()))?
        } else {
            // The error body is diagnostic only.
            response.text().await.unwrap_or_default()
        };

        tracing::trace!(status = status.as_u16(), %body, "response");

        Ok(RawResponse {
            status: status.as_u16(),
            body,
        })
    }
}
