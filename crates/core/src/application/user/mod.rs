// User Service - Core use cases behind the user procedures

pub mod create;

#[cfg(test)]
mod create_test;

pub use create::CreateUserRequest;

use crate::domain::User;
use crate::error::Result;
use crate::port::UserStore;
use std::sync::Arc;
use tracing::debug;

/// User Service
///
/// Thin use-case layer over the store. Reads pass straight through; creation
/// validates the request before the store assigns an id.
pub struct UserService {
    store: Arc<dyn UserStore>,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    /// All users in creation order
    pub async fn list(&self) -> Result<Vec<User>> {
        let users = self.store.list().await?;
        debug!(count = users.len(), "Listed users");
        Ok(users)
    }

    /// Absent is a valid outcome, not an error
    pub async fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        let user = self.store.find_by_id(id).await?;
        debug!(user_id = %id, found = user.is_some(), "Looked up user");
        Ok(user)
    }

    /// Create a new user
    pub async fn create(&self, req: CreateUserRequest) -> Result<User> {
        create::execute(self.store.as_ref(), req).await
    }
}
