//! Procedure RPC Layer
//!
//! Procedure registry, router and the HTTP transport server for Tether.
//! Calls arrive as wire envelopes (see `tether-protocol`), are resolved by
//! name and dispatched to typed handlers; every call ends in an outcome.

pub mod error;
pub mod handler;
pub mod procedure;
pub mod router;
pub mod server;
pub mod types;

pub use error::{to_rpc_error, RouterError};
pub use handler::user_router;
pub use procedure::{
    Handler, Json, NoInput, Procedure, Refine, ValidationError, Validator, ValidatorExt,
};
pub use router::{Router, RouterBuilder};
pub use server::{RpcServer, RpcServerConfig, ServerHandle};
