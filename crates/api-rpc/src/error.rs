//! RPC Error Types
//!
//! Maps application errors onto wire error codes.

use tether_core::error::AppError;
use tether_protocol::{ErrorCode, RpcError};
use thiserror::Error;
use tracing::error;

/// Router construction and lookup errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouterError {
    #[error("Procedure '{0}' is already defined")]
    DuplicateProcedure(String),

    #[error("No procedure named '{0}'")]
    NotFound(String),

    #[error("Procedure name must not be empty")]
    EmptyName,
}

impl From<RouterError> for RpcError {
    fn from(err: RouterError) -> Self {
        match err {
            RouterError::NotFound(_) => RpcError::not_found(err.to_string()),
            RouterError::DuplicateProcedure(_) | RouterError::EmptyName => {
                RpcError::bad_input(err.to_string())
            }
        }
    }
}

/// Convert AppError to a wire RpcError
///
/// Domain categories pass through with their message. Anything internal is
/// logged here and replaced with a generic message.
pub fn to_rpc_error(err: AppError) -> RpcError {
    match &err {
        AppError::Domain(e) => RpcError::bad_input(e.to_string()),
        AppError::Conflict(msg) => RpcError::new(ErrorCode::Conflict, msg.clone()),
        AppError::Store(_) => {
            error!(error = %err, "Procedure failed with internal error");
            RpcError::internal()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tether_core::domain::DomainError;

    #[test]
    fn test_domain_categories_pass_through() {
        let err = to_rpc_error(AppError::Domain(DomainError::EmptyName));
        assert_eq!(err.code, ErrorCode::BadInput);
        assert_eq!(err.message, DomainError::EmptyName.to_string());

        let err = to_rpc_error(AppError::Conflict("id taken".to_string()));
        assert_eq!(err.code, ErrorCode::Conflict);
    }

    #[test]
    fn test_internal_errors_do_not_leak_detail() {
        let err = to_rpc_error(AppError::Store("password=hunter2 at db01".to_string()));
        assert_eq!(err.code, ErrorCode::Internal);
        assert!(!err.message.contains("hunter2"));
    }

    #[test]
    fn test_router_not_found_maps_to_not_found() {
        let err: RpcError = RouterError::NotFound("userDelete".to_string()).into();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert!(err.message.contains("userDelete"));
    }
}
