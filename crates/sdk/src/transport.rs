//! Client Transport
//!
//! Each flushed batch is handed to a `Transport`. The HTTP
//! implementation posts JSON with reqwest; tests substitute their own.

use crate::error::{SdkError, TransportError};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;
use tether_protocol::{decode_response, encode_request, RequestEnvelope, ResponseEnvelope};
use tracing::debug;

/// How much of an unreadable error body is kept for diagnostics
const MAX_ERROR_BODY_CHARS: usize = 200;

#[async_trait]
pub trait Transport: Send + Sync + 'static {
    async fn send(&self, envelope: RequestEnvelope) -> Result<ResponseEnvelope, TransportError>;
}

/// POSTs envelopes to a single RPC endpoint
pub struct HttpTransport {
    client: reqwest::Client,
    url: String,
}

impl HttpTransport {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, SdkError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SdkError::Connection(format!("Failed to create client: {}", e)))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, envelope: RequestEnvelope) -> Result<ResponseEnvelope, TransportError> {
        let body = encode_request(&envelope).map_err(|e| TransportError::Request(e.to_string()))?;

        let response = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;

        debug!(status = status.as_u16(), bytes = bytes.len(), "Received RPC response");

        // Error statuses still carry a readable envelope for per-call failures
        match decode_response(&bytes) {
            Ok(envelope) => Ok(envelope),
            Err(err) if status.is_success() => Err(TransportError::Decode(err.reason().to_string())),
            Err(_) => Err(TransportError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes)
                    .chars()
                    .take(MAX_ERROR_BODY_CHARS)
                    .collect(),
            }),
        }
    }
}
