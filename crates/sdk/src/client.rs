//! Tether Client Implementation

use crate::batch::{BatchPolicy, Batcher};
use crate::error::Result;
use crate::transport::{HttpTransport, Transport};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tether_protocol::{Call, CreateUserInput, ProcedureKind, User, UserProcedure};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client Configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Full endpoint URL, e.g. `http://127.0.0.1:9527/rpc`
    pub url: String,
    pub timeout: Duration,
    pub policy: BatchPolicy,
}

impl ClientConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: DEFAULT_TIMEOUT,
            policy: BatchPolicy::default(),
        }
    }

    pub fn policy(mut self, policy: BatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Tether Client
///
/// Cheap to clone; all clones share one pending queue, so calls from
/// different clones can share a batch. Calls must be awaited inside a Tokio
/// runtime.
///
/// # Example
///
/// ```no_run
/// use tether_sdk::TetherClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = TetherClient::connect("http://127.0.0.1:9527/rpc").await?;
/// let user = client.user_create("Alice").await?;
/// assert_eq!(client.user_by_id(&user.id).await?, Some(user));
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct TetherClient {
    batcher: Arc<Batcher>,
}

impl TetherClient {
    /// Connect with the default policy and timeout
    pub async fn connect(url: impl AsRef<str>) -> Result<Self> {
        Self::with_config(ClientConfig::new(url.as_ref()))
    }

    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let transport = HttpTransport::new(config.url, config.timeout)?;
        Ok(Self::with_transport(Arc::new(transport), config.policy))
    }

    /// Use any transport
    pub fn with_transport(transport: Arc<dyn Transport>, policy: BatchPolicy) -> Self {
        Self {
            batcher: Arc::new(Batcher::new(transport, policy)),
        }
    }

    /// userList
    pub async fn user_list(&self) -> Result<Vec<User>> {
        self.procedure(UserProcedure::List, &()).await
    }

    /// userById - `None` when no user has that id
    pub async fn user_by_id(&self, id: impl Into<String>) -> Result<Option<User>> {
        self.procedure(UserProcedure::ById, &id.into()).await
    }

    /// userCreate
    pub async fn user_create(&self, name: impl Into<String>) -> Result<User> {
        let input = CreateUserInput { name: name.into() };
        self.procedure(UserProcedure::Create, &input).await
    }

    /// Call any query by name
    pub async fn query<I, O>(&self, name: &str, input: &I) -> Result<O>
    where
        I: Serialize + ?Sized,
        O: DeserializeOwned,
    {
        self.call(name, ProcedureKind::Query, input).await
    }

    /// Call any mutation by name
    pub async fn mutation<I, O>(&self, name: &str, input: &I) -> Result<O>
    where
        I: Serialize + ?Sized,
        O: DeserializeOwned,
    {
        self.call(name, ProcedureKind::Mutation, input).await
    }

    async fn procedure<I, O>(&self, procedure: UserProcedure, input: &I) -> Result<O>
    where
        I: Serialize + ?Sized,
        O: DeserializeOwned,
    {
        self.call(procedure.name(), procedure.kind(), input).await
    }

    /// Queue one call and wait for its own outcome
    pub async fn call<I, O>(&self, name: &str, kind: ProcedureKind, input: &I) -> Result<O>
    where
        I: Serialize + ?Sized,
        O: DeserializeOwned,
    {
        let input = serde_json::to_value(input)?;
        let outcome = self.batcher.submit(Call::new(name, kind, input)).await?;

        let value = outcome.into_result()?;
        Ok(serde_json::from_value(value)?)
    }
}
