//! Shared setup: a real server on an ephemeral port backed by the memory store

#![allow(dead_code)]

use std::sync::Arc;
use tether_api_rpc::{user_router, RpcServer, RpcServerConfig, ServerHandle};
use tether_core::application::UserService;
use tether_infra_memory::InMemoryUserStore;
use tether_sdk::{BatchPolicy, ClientConfig, TetherClient};

pub async fn start_server() -> ServerHandle {
    start_server_with(RpcServerConfig::default()).await
}

pub async fn start_server_with(config: RpcServerConfig) -> ServerHandle {
    let store = Arc::new(InMemoryUserStore::sequential());
    let router = user_router(Arc::new(UserService::new(store))).unwrap();
    let config = RpcServerConfig { port: 0, ..config };
    RpcServer::new(config, router).start().await.unwrap()
}

pub fn client(handle: &ServerHandle, policy: BatchPolicy) -> TetherClient {
    TetherClient::with_config(ClientConfig::new(handle.url()).policy(policy)).unwrap()
}
