//! Tether SDK - Rust Client Library
//!
//! Typed client for a Tether RPC server. Calls issued close together are
//! merged into one HTTP request according to a `BatchPolicy`, and each
//! caller gets back its own result.
//!
//! # Example
//!
//! ```no_run
//! use tether_sdk::TetherClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = TetherClient::connect("http://127.0.0.1:9527/rpc").await?;
//!
//!     // Both calls leave in the same batch
//!     let (alice, users) = tokio::join!(client.user_create("Alice"), client.user_list());
//!     println!("created {:?}, saw {:?}", alice?, users?);
//!
//!     Ok(())
//! }
//! ```

mod batch;
mod client;
mod error;
mod transport;

pub use batch::{BatchPolicy, FlushTrigger};
pub use client::{ClientConfig, TetherClient};
pub use error::{Result, SdkError, TransportError};
pub use transport::{HttpTransport, Transport};

pub use tether_protocol::{CreateUserInput, ErrorCode, ProcedureKind, User, UserProcedure};
