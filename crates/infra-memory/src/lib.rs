// Tether In-Memory Infrastructure
// Adapter implementing the UserStore port without a storage engine

pub mod user_store;

pub use user_store::InMemoryUserStore;
