//! Tether Daemon - Main Entry Point

mod config;

use anyhow::{Context, Result};
use config::{DaemonConfig, LogFormat};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tether_api_rpc::{user_router, RpcServer};
use tether_core::application::UserService;
use tether_infra_memory::InMemoryUserStore;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load configuration
    let config = DaemonConfig::from_env()?;

    // 2. Initialize logging
    init_logging(config.log_format)?;
    info!("Tether daemon v{} starting...", VERSION);

    // 3. Setup dependencies (DI wiring)
    let store = Arc::new(InMemoryUserStore::sequential());
    let service = Arc::new(UserService::new(store));
    let router = user_router(service).context("Failed to build procedure router")?;

    for (name, kind) in router.procedures() {
        info!(procedure = %name, kind = %kind, "Registered procedure");
    }

    // 4. Start RPC server
    let handle = RpcServer::new(config.rpc, router)
        .start()
        .await
        .context("RPC server start failed")?;

    info!(url = %handle.url(), "System ready");
    info!("Press Ctrl+C to shutdown");

    // 5. Wait for shutdown signal
    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received. Exiting gracefully...");

    handle.stop().await.context("RPC server stop failed")?;
    info!("Shutdown complete.");

    Ok(())
}

fn init_logging(format: LogFormat) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("tether=info"))
        .context("Failed to create env filter")?;

    match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json())
            .try_init()?,
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().pretty())
            .try_init()?,
    }

    Ok(())
}
