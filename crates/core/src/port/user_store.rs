// User Store Port (Interface)

use crate::domain::{NewUser, User};
use crate::error::Result;
use async_trait::async_trait;

/// Repository interface for User persistence
///
/// Id assignment belongs to the implementation. Concurrent access is the
/// implementation's responsibility; callers share it as `Arc<dyn UserStore>`.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// All users in creation order
    async fn list(&self) -> Result<Vec<User>>;

    /// Find user by ID
    async fn find_by_id(&self, id: &str) -> Result<Option<User>>;

    /// Insert a new user and return it with its assigned id
    async fn create(&self, new_user: NewUser) -> Result<User>;
}
