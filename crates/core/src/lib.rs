// Tether Core - Domain Logic & Ports
// NO transport or storage dependencies (hexagonal layout)

pub mod application;
pub mod domain;
pub mod error;
pub mod port;

pub use error::{AppError, Result};
