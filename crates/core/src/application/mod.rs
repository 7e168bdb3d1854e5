// Application Layer - Use Cases and Business Logic

pub mod user;

// Re-exports
pub use user::{CreateUserRequest, UserService};
