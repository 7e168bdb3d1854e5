//! SDK Error Types

use tether_protocol::{ErrorCode, RpcError};
use thiserror::Error;

/// SDK Result type
pub type Result<T> = std::result::Result<T, SdkError>;

/// Failure shared by every call in one batch
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransportError {
    #[error("Request failed: {0}")]
    Request(String),

    #[error("Server responded with HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Unreadable response: {0}")]
    Decode(String),

    #[error("Request rejected by server: {0}")]
    Rejected(RpcError),

    #[error("Response has {got} outcomes for {expected} calls")]
    LengthMismatch { expected: usize, got: usize },
}

/// SDK Error
#[derive(Debug, Error)]
pub enum SdkError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("RPC error ({code}): {message}")]
    Rpc { code: ErrorCode, message: String },

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl TransportError {
    /// Failures where the request may never have reached a handler
    pub fn is_retryable(&self) -> bool {
        match self {
            TransportError::Request(_) => true,
            TransportError::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

impl SdkError {
    /// Wire error code for per-call failures
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            SdkError::Rpc { code, .. } => Some(*code),
            SdkError::Transport(TransportError::Rejected(err)) => Some(err.code),
            _ => None,
        }
    }
}

impl From<RpcError> for SdkError {
    fn from(err: RpcError) -> Self {
        SdkError::Rpc {
            code: err.code,
            message: err.message,
        }
    }
}
