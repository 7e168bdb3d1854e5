//! Wire Error Types
//!
//! `RpcError` is the structured failure carried inside an error outcome.
//! `MalformedEnvelope` is the framing-level failure that rejects a whole
//! request before any call is dispatched.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error categories understood by both sides of the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Input rejected by the procedure's validator or by a domain rule
    BadInput,
    /// No procedure with that name, or a domain lookup failed
    NotFound,
    /// Declared call kind does not match the procedure, or wrong HTTP verb
    MethodNotSupported,
    Conflict,
    Internal,
    /// Transport framing could not be read (whole request)
    MalformedEnvelope,
    /// Batch exceeds the server's configured limit (whole request)
    BatchTooLarge,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::BadInput => "BAD_INPUT",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::MethodNotSupported => "METHOD_NOT_SUPPORTED",
            ErrorCode::Conflict => "CONFLICT",
            ErrorCode::Internal => "INTERNAL",
            ErrorCode::MalformedEnvelope => "MALFORMED_ENVELOPE",
            ErrorCode::BatchTooLarge => "BATCH_TOO_LARGE",
        }
    }

    /// HTTP status used when this code is the only outcome of a request
    pub fn http_status(&self) -> u16 {
        match self {
            ErrorCode::BadInput | ErrorCode::MalformedEnvelope => 400,
            ErrorCode::NotFound => 404,
            ErrorCode::MethodNotSupported => 405,
            ErrorCode::Conflict => 409,
            ErrorCode::BatchTooLarge => 413,
            ErrorCode::Internal => 500,
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured per-call failure
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{code}: {message}")]
pub struct RpcError {
    pub code: ErrorCode,
    pub message: String,
}

impl RpcError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn bad_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::BadInput, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    pub fn method_not_supported(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::MethodNotSupported, message)
    }

    /// Internal failures never carry the underlying detail over the wire
    pub fn internal() -> Self {
        Self::new(ErrorCode::Internal, "Internal server error")
    }
}

/// The request or response body could not be framed into calls/outcomes
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Malformed envelope: {0}")]
pub struct MalformedEnvelope(pub String);

impl MalformedEnvelope {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }

    pub fn reason(&self) -> &str {
        &self.0
    }
}

impl From<MalformedEnvelope> for RpcError {
    fn from(err: MalformedEnvelope) -> Self {
        RpcError::new(ErrorCode::MalformedEnvelope, err.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_serializes_screaming_snake() {
        let err = RpcError::method_not_supported("nope");
        let value = serde_json::to_value(&err).unwrap();
        assert_eq!(value["code"], "METHOD_NOT_SUPPORTED");
        assert_eq!(value["message"], "nope");
    }

    #[test]
    fn test_internal_error_is_generic() {
        let err = RpcError::internal();
        assert_eq!(err.code, ErrorCode::Internal);
        assert_eq!(err.message, "Internal server error");
        assert_eq!(err.code.http_status(), 500);
    }

    #[test]
    fn test_malformed_envelope_converts_to_rpc_error() {
        let err: RpcError = MalformedEnvelope::new("expected object or array").into();
        assert_eq!(err.code, ErrorCode::MalformedEnvelope);
        assert_eq!(err.code.http_status(), 400);
        assert!(err.message.contains("expected object or array"));
    }
}
