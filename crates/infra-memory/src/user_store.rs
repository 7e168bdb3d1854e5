// In-Memory UserStore Implementation

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tether_core::domain::{NewUser, User};
use tether_core::error::{AppError, Result};
use tether_core::port::{IdProvider, SequentialIdProvider, UserStore};
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Default)]
struct Users {
    // Creation order
    rows: Vec<User>,
    // id -> position in `rows`
    index: HashMap<String, usize>,
}

/// Process-local user store
///
/// Ids are drawn while the write lock is held, so id order always matches
/// insertion order even when creates race.
pub struct InMemoryUserStore {
    users: RwLock<Users>,
    id_provider: Arc<dyn IdProvider>,
}

impl InMemoryUserStore {
    pub fn new(id_provider: Arc<dyn IdProvider>) -> Self {
        Self {
            users: RwLock::new(Users::default()),
            id_provider,
        }
    }

    /// Store with ids "1", "2", ...
    pub fn sequential() -> Self {
        Self::new(Arc::new(SequentialIdProvider::new()))
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for InMemoryUserStore {
    fn default() -> Self {
        Self::sequential()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn list(&self) -> Result<Vec<User>> {
        Ok(self.users.read().await.rows.clone())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.index.get(id).map(|&pos| users.rows[pos].clone()))
    }

    async fn create(&self, new_user: NewUser) -> Result<User> {
        let mut users = self.users.write().await;

        let id = self.id_provider.generate_id();
        if users.index.contains_key(&id) {
            return Err(AppError::Conflict(format!("User id {} already exists", id)));
        }

        let user = new_user.into_user(id);
        let pos = users.rows.len();
        users.index.insert(user.id.clone(), pos);
        users.rows.push(user.clone());

        debug!(user_id = %user.id, total = users.rows.len(), "Stored user");
        Ok(user)
    }
}
