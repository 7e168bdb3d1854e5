//! Procedure Registry Building Blocks
//!
//! A procedure is a name, a kind, a `Validator` turning raw JSON into the
//! handler's typed input, and an async `Handler`. `DefinedProcedure` erases
//! the types behind the object-safe `Procedure` trait so the router can keep
//! every procedure in one map.

use crate::error::to_rpc_error;
use async_trait::async_trait;
use futures::future::BoxFuture;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::future::Future;
use std::marker::PhantomData;
use tether_core::error::AppError;
use tether_protocol::{ProcedureKind, RpcError};
use thiserror::Error;
use tracing::error;

/// Input rejected by a validator
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ValidationError(String);

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

/// Parses raw call input into a typed value
pub trait Validator: Send + Sync + 'static {
    type Output: Send + 'static;

    fn parse(&self, raw: &Value) -> Result<Self::Output, ValidationError>;
}

/// Deserializes the input with serde
pub struct Json<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> Json<T> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for Json<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Validator for Json<T>
where
    T: DeserializeOwned + Send + 'static,
{
    type Output = T;

    fn parse(&self, raw: &Value) -> Result<T, ValidationError> {
        T::deserialize(raw).map_err(|e| ValidationError::new(e.to_string()))
    }
}

/// Accepts only an absent (`null`) input
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInput;

impl Validator for NoInput {
    type Output = ();

    fn parse(&self, raw: &Value) -> Result<(), ValidationError> {
        if raw.is_null() {
            Ok(())
        } else {
            Err(ValidationError::new("procedure takes no input"))
        }
    }
}

/// Runs an extra check on the output of another validator
pub struct Refine<V, F> {
    inner: V,
    check: F,
}

impl<V, F> Validator for Refine<V, F>
where
    V: Validator,
    F: Fn(V::Output) -> Result<V::Output, String> + Send + Sync + 'static,
{
    type Output = V::Output;

    fn parse(&self, raw: &Value) -> Result<V::Output, ValidationError> {
        let value = self.inner.parse(raw)?;
        (self.check)(value).map_err(ValidationError::new)
    }
}

pub trait ValidatorExt: Validator + Sized {
    fn refine<F>(self, check: F) -> Refine<Self, F>
    where
        F: Fn(Self::Output) -> Result<Self::Output, String> + Send + Sync + 'static,
    {
        Refine { inner: self, check }
    }
}

impl<V: Validator> ValidatorExt for V {}

/// Async function from typed input to a serializable output
///
/// Implemented for any `Fn(I) -> impl Future<Output = Result<O, AppError>>`.
pub trait Handler<I>: Send + Sync + 'static {
    type Output: Serialize + Send + 'static;

    fn call(&self, input: I) -> BoxFuture<'static, Result<Self::Output, AppError>>;
}

impl<I, F, Fut, O> Handler<I> for F
where
    F: Fn(I) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<O, AppError>> + Send + 'static,
    O: Serialize + Send + 'static,
{
    type Output = O;

    fn call(&self, input: I) -> BoxFuture<'static, Result<O, AppError>> {
        Box::pin(self(input))
    }
}

/// Capability shared by every registered procedure
#[async_trait]
pub trait Procedure: Send + Sync {
    fn name(&self) -> &str;

    fn kind(&self) -> ProcedureKind;

    /// Validate `input`, run the handler and serialize its output.
    /// Every failure comes back as an `RpcError`.
    async fn invoke(&self, input: Value) -> Result<Value, RpcError>;
}

pub(crate) struct DefinedProcedure<V, H> {
    name: String,
    kind: ProcedureKind,
    validator: V,
    handler: H,
}

impl<V, H> DefinedProcedure<V, H> {
    pub(crate) fn new(name: String, kind: ProcedureKind, validator: V, handler: H) -> Self {
        Self {
            name,
            kind,
            validator,
            handler,
        }
    }
}

#[async_trait]
impl<V, H> Procedure for DefinedProcedure<V, H>
where
    V: Validator,
    H: Handler<V::Output>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ProcedureKind {
        self.kind
    }

    async fn invoke(&self, input: Value) -> Result<Value, RpcError> {
        let typed = self.validator.parse(&input).map_err(|e| {
            RpcError::bad_input(format!("Invalid input for '{}': {}", self.name, e))
        })?;

        let output = self.handler.call(typed).await.map_err(to_rpc_error)?;

        serde_json::to_value(output).map_err(|e| {
            error!(procedure = %self.name, error = %e, "Failed to serialize procedure output");
            RpcError::internal()
        })
    }
}

/// Reusable check for string fields that must carry content
pub fn non_blank(field: &'static str) -> impl Fn(&str) -> Result<(), String> {
    move |value: &str| {
        if value.trim().is_empty() {
            Err(format!("{} must not be blank", field))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;
    use tether_protocol::ErrorCode;

    #[derive(Debug, Deserialize)]
    struct Point {
        x: i32,
        y: i32,
    }

    #[test]
    fn test_json_validator_parses_typed_input() {
        let point = Json::<Point>::new().parse(&json!({"x": 1, "y": -2})).unwrap();
        assert_eq!((point.x, point.y), (1, -2));

        let err = Json::<Point>::new().parse(&json!({"x": 1})).unwrap_err();
        assert!(err.message().contains("missing field `y`"));
    }

    #[test]
    fn test_no_input_accepts_only_null() {
        assert!(NoInput.parse(&Value::Null).is_ok());
        assert!(NoInput.parse(&json!({})).is_err());
        assert!(NoInput.parse(&json!("1")).is_err());
    }

    #[test]
    fn test_refine_composes() {
        let blank = non_blank("id");
        let validator = Json::<String>::new().refine(move |id| blank(id.as_str()).map(|_| id));

        assert_eq!(validator.parse(&json!("42")).unwrap(), "42");
        assert_eq!(
            validator.parse(&json!("  ")).unwrap_err().message(),
            "id must not be blank"
        );
        // Inner validator failures short-circuit the refinement
        assert!(validator.parse(&json!(42)).is_err());
    }

    #[tokio::test]
    async fn test_invoke_validates_before_handler() {
        let procedure = DefinedProcedure::new(
            "sum".to_string(),
            ProcedureKind::Query,
            Json::<Point>::new(),
            |p: Point| async move { Ok::<_, AppError>(p.x + p.y) },
        );

        assert_eq!(procedure.invoke(json!({"x": 2, "y": 3})).await.unwrap(), json!(5));

        let err = procedure.invoke(json!("nope")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::BadInput);
        assert!(err.message.starts_with("Invalid input for 'sum'"));
    }

    #[tokio::test]
    async fn test_invoke_maps_handler_errors() {
        let procedure = DefinedProcedure::new(
            "fail".to_string(),
            ProcedureKind::Mutation,
            NoInput,
            |()| async { Err::<(), _>(AppError::Conflict("already exists".to_string())) },
        );

        let err = procedure.invoke(Value::Null).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Conflict);
        assert_eq!(err.message, "already exists");
    }
}
