//! HTTP Transport Server
//!
//! `POST {path}` takes a request envelope (object = single call, array =
//! batch). `GET {path}/{name}?input=<json>` runs a single query.
//! Envelope-level failures short-circuit with one top-level error and no
//! per-call outcomes.

use crate::router::Router;
use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::{DefaultBodyLimit, Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use serde::Deserialize;
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;
use tether_protocol::{
    decode_request, Call, ErrorCode, MalformedEnvelope, Outcome, ResponseEnvelope, RpcError,
};
use tokio::sync::oneshot;
use tokio::task::{JoinError, JoinHandle};
use tracing::{error, info, info_span, warn, Instrument};

const DEFAULT_RPC_HOST: &str = "127.0.0.1";
const DEFAULT_RPC_PORT: u16 = 9527;
const DEFAULT_RPC_PATH: &str = "/rpc";
const DEFAULT_MAX_BATCH_SIZE: usize = 100;
const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

/// RPC Server Configuration
#[derive(Debug, Clone)]
pub struct RpcServerConfig {
    pub host: String,
    /// 0 binds an ephemeral port; see `ServerHandle::local_addr`
    pub port: u16,
    pub path: String,
    pub max_batch_size: usize,
    pub max_body_bytes: usize,
}

impl Default for RpcServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_RPC_HOST.to_string(),
            port: DEFAULT_RPC_PORT,
            path: DEFAULT_RPC_PATH.to_string(),
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl RpcServerConfig {
    /// Route path with exactly one leading slash and no trailing slash
    fn route_path(&self) -> String {
        let trimmed = self.path.trim_matches('/');
        if trimmed.is_empty() {
            DEFAULT_RPC_PATH.to_string()
        } else {
            format!("/{}", trimmed)
        }
    }
}

#[derive(Clone)]
struct AppState {
    router: Arc<Router>,
    max_batch_size: usize,
}

/// RPC Server
pub struct RpcServer {
    config: RpcServerConfig,
    router: Arc<Router>,
}

impl RpcServer {
    pub fn new(config: RpcServerConfig, router: Router) -> Self {
        Self {
            config,
            router: Arc::new(router),
        }
    }

    /// The axum application, without binding a socket
    pub fn app(&self) -> axum::Router {
        let path = self.config.route_path();
        let state = AppState {
            router: Arc::clone(&self.router),
            max_batch_size: self.config.max_batch_size,
        };

        axum::Router::new()
            .route(&path, post(handle_post))
            .route(&format!("{}/:name", path), get(handle_get))
            .layer(DefaultBodyLimit::max(self.config.max_body_bytes))
            .with_state(state)
    }

    /// Bind and start serving in a background task
    pub async fn start(self) -> std::io::Result<ServerHandle> {
        let addr = format!("{}:{}", self.config.host, self.config.port);

        info!(
            host = %self.config.host,
            port = %self.config.port,
            "Starting RPC server"
        );

        let listener = tokio::net::TcpListener::bind(&addr).await?;
        let local_addr = listener.local_addr()?;
        let app = self.app();
        let path = self.config.route_path();

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            let result = axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                })
                .await;
            if let Err(e) = result {
                error!(error = %e, "RPC server terminated with error");
            }
        });

        let procedures: Vec<&str> = self.router.procedures().into_iter().map(|(n, _)| n).collect();
        info!(
            addr = %local_addr,
            path = %path,
            procedures = ?procedures,
            "RPC server started successfully"
        );

        Ok(ServerHandle {
            local_addr,
            path,
            shutdown: Some(shutdown_tx),
            task,
        })
    }
}

/// Running server; dropping it leaves the server running until the runtime stops
pub struct ServerHandle {
    local_addr: SocketAddr,
    path: String,
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl ServerHandle {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Full endpoint URL, e.g. `http://127.0.0.1:9527/rpc`
    pub fn url(&self) -> String {
        format!("http://{}{}", self.local_addr, self.path)
    }

    /// Stop accepting connections and wait for in-flight requests
    pub async fn stop(mut self) -> Result<(), JoinError> {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        self.task.await
    }
}

async fn handle_post(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let body = match body {
        Ok(body) => body,
        Err(rejection) => return reject_body(rejection),
    };

    let envelope = match decode_request(&body) {
        Ok(envelope) => envelope,
        Err(err) => {
            warn!(reason = %err.reason(), "Rejected malformed envelope");
            return reject(err.into());
        }
    };

    if envelope.len() > state.max_batch_size {
        warn!(calls = envelope.len(), limit = state.max_batch_size, "Rejected oversized batch");
        return reject(RpcError::new(
            ErrorCode::BatchTooLarge,
            format!(
                "batch of {} calls exceeds limit of {}",
                envelope.len(),
                state.max_batch_size
            ),
        ));
    }

    let span = info_span!("rpc_request", calls = envelope.len(), batch = envelope.is_batch());
    let response = state.router.handle(envelope).instrument(span).await;
    respond(response)
}

#[derive(Debug, Deserialize)]
struct GetParams {
    input: Option<String>,
}

async fn handle_get(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(params): Query<GetParams>,
) -> Response {
    let input = match params.input.as_deref() {
        None => Value::Null,
        Some(raw) => match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(e) => {
                let err = MalformedEnvelope::new(format!("input is not valid JSON: {}", e));
                warn!(reason = %err.reason(), "Rejected malformed query input");
                return reject(err.into());
            }
        },
    };

    // GET only carries queries; a mutation name fails the router's kind check
    let span = info_span!("rpc_request", calls = 1, batch = false);
    let outcome = state
        .router
        .dispatch(Call::query(name, input))
        .instrument(span)
        .await;
    respond(ResponseEnvelope::Single(outcome))
}

fn status_for(code: ErrorCode) -> StatusCode {
    StatusCode::from_u16(code.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

/// Top-level rejection: one error object, no per-call outcomes
fn reject(err: RpcError) -> Response {
    (status_for(err.code), axum::Json(Outcome::Error(err))).into_response()
}

/// Body could not be read, most often because it exceeds `max_body_bytes`
fn reject_body(rejection: BytesRejection) -> Response {
    let code = if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ErrorCode::BatchTooLarge
    } else {
        ErrorCode::MalformedEnvelope
    };
    warn!(code = %code, reason = %rejection.body_text(), "Rejected unreadable body");
    reject(RpcError::new(code, rejection.body_text()))
}

fn respond(envelope: ResponseEnvelope) -> Response {
    let status = match &envelope {
        ResponseEnvelope::Single(Outcome::Error(err)) => status_for(err.code),
        _ => StatusCode::OK,
    };
    (status, axum::Json(envelope)).into_response()
}
