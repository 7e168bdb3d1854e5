// Domain Layer - Pure business logic and entities

pub mod error;
pub mod user;

// Re-exports
pub use error::DomainError;
pub use user::{NewUser, User, UserId, MAX_NAME_LEN};
