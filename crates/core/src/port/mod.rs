// Port Layer - Interfaces for external dependencies

pub mod id_provider; // For deterministic testing
pub mod user_store;

// Re-exports
pub use id_provider::{IdProvider, SequentialIdProvider};
pub use user_store::UserStore;
