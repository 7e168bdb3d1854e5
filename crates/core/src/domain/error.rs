// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DomainError {
    #[error("User name must not be empty")]
    EmptyName,

    #[error("User name too long: {0} characters (max {max})", max = crate::domain::MAX_NAME_LEN)]
    NameTooLong(usize),
}

pub type Result<T> = std::result::Result<T, DomainError>;
