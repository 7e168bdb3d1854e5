//! Conversions between domain entities and wire DTOs

use tether_core::domain::User;

pub fn into_api_user(user: User) -> tether_protocol::User {
    tether_protocol::User {
        id: user.id,
        name: user.name,
    }
}
