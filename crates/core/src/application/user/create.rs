// Create User Use Case

use crate::domain::{NewUser, User};
use crate::error::Result;
use crate::port::UserStore;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Create request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
}

/// Validate request fields against domain rules
pub fn validate_request(req: &CreateUserRequest) -> Result<NewUser> {
    Ok(NewUser::new(&req.name)?)
}

/// Execute create use case
///
/// # Arguments
///
/// * `store` - User store (owns id assignment)
/// * `req` - Create request
pub async fn execute(store: &dyn UserStore, req: CreateUserRequest) -> Result<User> {
    let new_user = validate_request(&req)?;

    let user = store.create(new_user).await?;

    info!(user_id = %user.id, "User created");
    Ok(user)
}
