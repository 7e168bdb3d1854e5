//! Daemon configuration from environment variables

use anyhow::{Context, Result};
use std::str::FromStr;
use tether_api_rpc::RpcServerConfig;

pub const ENV_RPC_HOST: &str = "TETHER_RPC_HOST";
pub const ENV_RPC_PORT: &str = "TETHER_RPC_PORT";
pub const ENV_RPC_PATH: &str = "TETHER_RPC_PATH";
pub const ENV_MAX_BATCH: &str = "TETHER_MAX_BATCH";
pub const ENV_LOG_FORMAT: &str = "TETHER_LOG_FORMAT";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Production: one JSON object per event
    Json,
    /// Development
    Pretty,
}

#[derive(Debug, Clone)]
pub struct DaemonConfig {
    pub rpc: RpcServerConfig,
    pub log_format: LogFormat,
}

impl DaemonConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Unset variables keep their defaults; set but unparsable ones are errors
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut rpc = RpcServerConfig::default();

        if let Some(host) = lookup(ENV_RPC_HOST) {
            rpc.host = host;
        }
        if let Some(port) = parse_var(&lookup, ENV_RPC_PORT)? {
            rpc.port = port;
        }
        if let Some(path) = lookup(ENV_RPC_PATH) {
            rpc.path = path;
        }
        if let Some(max_batch) = parse_var::<usize>(&lookup, ENV_MAX_BATCH)? {
            anyhow::ensure!(max_batch > 0, "{} must be at least 1", ENV_MAX_BATCH);
            rpc.max_batch_size = max_batch;
        }

        let log_format = match lookup(ENV_LOG_FORMAT).as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        Ok(Self { rpc, log_format })
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse()
                .with_context(|| format!("Invalid {}: {:?}", key, raw))
        })
        .transpose()
}
