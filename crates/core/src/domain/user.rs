// User Domain Model

use super::error::{DomainError, Result};
use serde::{Deserialize, Serialize};

/// User ID, assigned by the store ("1", "2", ...)
pub type UserId = String;

pub const MAX_NAME_LEN: usize = 128;

/// User Entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
}

/// Creation request handed to the store; the store picks the id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    name: String,
}

impl NewUser {
    /// Checks the name and keeps it exactly as given
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::EmptyName);
        }
        let len = name.chars().count();
        if len > MAX_NAME_LEN {
            return Err(DomainError::NameTooLong(len));
        }
        Ok(Self { name })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn into_user(self, id: UserId) -> User {
        User {
            id,
            name: self.name,
        }
    }
}
