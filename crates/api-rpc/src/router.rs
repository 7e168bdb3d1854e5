//! Procedure Router
//!
//! Built once through `RouterBuilder`, then immutable and shared as
//! `Arc<Router>` across concurrently handled requests. `dispatch` turns
//! every call into exactly one `Outcome`; nothing escapes it, panics
//! included.

use crate::error::RouterError;
use crate::procedure::{DefinedProcedure, Handler, Procedure, Validator};
use futures::future::join_all;
use futures::FutureExt;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tether_protocol::{Call, Outcome, ProcedureKind, RequestEnvelope, ResponseEnvelope, RpcError};
use tracing::{debug, error};

/// Collects procedure definitions; names must be unique
#[derive(Default)]
pub struct RouterBuilder {
    procedures: HashMap<String, Arc<dyn Procedure>>,
}

impl RouterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a procedure under `name`
    ///
    /// Fails with `DuplicateProcedure` if the name is already taken.
    pub fn define<V, H>(
        &mut self,
        name: impl Into<String>,
        kind: ProcedureKind,
        validator: V,
        handler: H,
    ) -> Result<&mut Self, RouterError>
    where
        V: Validator,
        H: Handler<V::Output>,
    {
        let name = name.into();
        if name.is_empty() {
            return Err(RouterError::EmptyName);
        }
        if self.procedures.contains_key(&name) {
            return Err(RouterError::DuplicateProcedure(name));
        }

        let procedure = DefinedProcedure::new(name.clone(), kind, validator, handler);
        self.procedures.insert(name, Arc::new(procedure));
        Ok(self)
    }

    pub fn query<V, H>(
        &mut self,
        name: impl Into<String>,
        validator: V,
        handler: H,
    ) -> Result<&mut Self, RouterError>
    where
        V: Validator,
        H: Handler<V::Output>,
    {
        self.define(name, ProcedureKind::Query, validator, handler)
    }

    pub fn mutation<V, H>(
        &mut self,
        name: impl Into<String>,
        validator: V,
        handler: H,
    ) -> Result<&mut Self, RouterError>
    where
        V: Validator,
        H: Handler<V::Output>,
    {
        self.define(name, ProcedureKind::Mutation, validator, handler)
    }

    pub fn build(self) -> Router {
        Router {
            procedures: self.procedures,
        }
    }
}

/// Name -> procedure mapping
pub struct Router {
    procedures: HashMap<String, Arc<dyn Procedure>>,
}

impl Router {
    pub fn builder() -> RouterBuilder {
        RouterBuilder::new()
    }

    pub fn resolve(&self, name: &str) -> Result<Arc<dyn Procedure>, RouterError> {
        self.procedures
            .get(name)
            .cloned()
            .ok_or_else(|| RouterError::NotFound(name.to_string()))
    }

    /// Registered procedures sorted by name
    pub fn procedures(&self) -> Vec<(&str, ProcedureKind)> {
        let mut entries: Vec<_> = self
            .procedures
            .values()
            .map(|p| (p.name(), p.kind()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }

    pub fn len(&self) -> usize {
        self.procedures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.procedures.is_empty()
    }

    /// Resolve, kind-check, validate and run one call
    pub async fn dispatch(&self, call: Call) -> Outcome {
        let Call { name, kind, input } = call;

        let procedure = match self.resolve(&name) {
            Ok(procedure) => procedure,
            Err(err) => {
                debug!(procedure = %name, "Unknown procedure");
                return Outcome::Error(err.into());
            }
        };

        if procedure.kind() != kind {
            debug!(procedure = %name, declared = %kind, actual = %procedure.kind(), "Kind mismatch");
            return Outcome::Error(RpcError::method_not_supported(format!(
                "'{}' is a {}, not a {}",
                name,
                procedure.kind(),
                kind
            )));
        }

        let result = AssertUnwindSafe(procedure.invoke(input))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| {
                error!(
                    procedure = %name,
                    panic_msg = %panic_message(panic.as_ref()),
                    "Procedure handler panicked"
                );
                Err(RpcError::internal())
            });

        if let Err(err) = &result {
            debug!(procedure = %name, code = %err.code, "Call failed");
        }
        Outcome::from(result)
    }

    /// Dispatch every call concurrently; outcome `i` answers call `i`
    pub async fn dispatch_batch(&self, calls: Vec<Call>) -> Vec<Outcome> {
        join_all(calls.into_iter().map(|call| self.dispatch(call))).await
    }

    /// Answer an envelope in the same mode it arrived in
    pub async fn handle(&self, envelope: RequestEnvelope) -> ResponseEnvelope {
        match envelope {
            RequestEnvelope::Single(call) => ResponseEnvelope::Single(self.dispatch(call).await),
            RequestEnvelope::Batch(calls) => {
                ResponseEnvelope::Batch(self.dispatch_batch(calls).await)
            }
        }
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
