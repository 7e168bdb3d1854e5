//! Tether Wire Protocol
//!
//! Shared between the RPC server and the SDK so both sides agree on the
//! envelope framing, error codes and the user procedure surface.

pub mod api;
pub mod codec;
pub mod envelope;
pub mod error;
pub mod kind;

pub use api::{CreateUserInput, User, UserProcedure};
pub use codec::{decode_request, decode_response, encode_request, encode_response};
pub use envelope::{Call, Outcome, RequestEnvelope, ResponseEnvelope};
pub use error::{ErrorCode, MalformedEnvelope, RpcError};
pub use kind::ProcedureKind;
