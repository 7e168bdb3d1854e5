//! Envelope Types
//!
//! A request envelope is either one call (JSON object) or a batch of calls
//! (JSON array). Responses mirror the request shape; in batch mode the
//! outcome at index `i` belongs to the call at index `i`.

use crate::error::RpcError;
use crate::kind::ProcedureKind;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single procedure invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Call {
    pub name: String,
    pub kind: ProcedureKind,
    /// Absent on the wire is the same as `null`
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub input: Value,
}

impl Call {
    pub fn new(name: impl Into<String>, kind: ProcedureKind, input: Value) -> Self {
        Self {
            name: name.into(),
            kind,
            input,
        }
    }

    pub fn query(name: impl Into<String>, input: Value) -> Self {
        Self::new(name, ProcedureKind::Query, input)
    }

    pub fn mutation(name: impl Into<String>, input: Value) -> Self {
        Self::new(name, ProcedureKind::Mutation, input)
    }
}

/// Per-call result: `{"ok": value}` or `{"error": {"code", "message"}}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Ok(Value),
    Error(RpcError),
}

impl Outcome {
    pub fn is_ok(&self) -> bool {
        matches!(self, Outcome::Ok(_))
    }

    pub fn error(&self) -> Option<&RpcError> {
        match self {
            Outcome::Ok(_) => None,
            Outcome::Error(err) => Some(err),
        }
    }

    pub fn into_result(self) -> Result<Value, RpcError> {
        match self {
            Outcome::Ok(value) => Ok(value),
            Outcome::Error(err) => Err(err),
        }
    }
}

impl From<Result<Value, RpcError>> for Outcome {
    fn from(result: Result<Value, RpcError>) -> Self {
        match result {
            Ok(value) => Outcome::Ok(value),
            Err(err) => Outcome::Error(err),
        }
    }
}

/// Request framing; the JSON shape (object vs array) is the mode marker
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RequestEnvelope {
    Single(Call),
    Batch(Vec<Call>),
}

impl RequestEnvelope {
    pub fn single(call: Call) -> Self {
        RequestEnvelope::Single(call)
    }

    pub fn batch(calls: Vec<Call>) -> Self {
        RequestEnvelope::Batch(calls)
    }

    /// Sends one call in single mode and anything larger as a batch
    pub fn from_calls(mut calls: Vec<Call>) -> Self {
        if calls.len() == 1 {
            if let Some(call) = calls.pop() {
                return RequestEnvelope::Single(call);
            }
        }
        RequestEnvelope::Batch(calls)
    }

    pub fn is_batch(&self) -> bool {
        matches!(self, RequestEnvelope::Batch(_))
    }

    pub fn len(&self) -> usize {
        match self {
            RequestEnvelope::Single(_) => 1,
            RequestEnvelope::Batch(calls) => calls.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn calls(&self) -> &[Call] {
        match self {
            RequestEnvelope::Single(call) => std::slice::from_ref(call),
            RequestEnvelope::Batch(calls) => calls,
        }
    }

    pub fn into_calls(self) -> Vec<Call> {
        match self {
            RequestEnvelope::Single(call) => vec![call],
            RequestEnvelope::Batch(calls) => calls,
        }
    }
}

/// Response framing, shaped like the request it answers
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResponseEnvelope {
    Single(Outcome),
    Batch(Vec<Outcome>),
}

impl ResponseEnvelope {
    pub fn single(outcome: Outcome) -> Self {
        ResponseEnvelope::Single(outcome)
    }

    pub fn batch(outcomes: Vec<Outcome>) -> Self {
        ResponseEnvelope::Batch(outcomes)
    }

    pub fn is_batch(&self) -> bool {
        matches!(self, ResponseEnvelope::Batch(_))
    }

    pub fn len(&self) -> usize {
        match self {
            ResponseEnvelope::Single(_) => 1,
            ResponseEnvelope::Batch(outcomes) => outcomes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_outcomes(self) -> Vec<Outcome> {
        match self {
            ResponseEnvelope::Single(outcome) => vec![outcome],
            ResponseEnvelope::Batch(outcomes) => outcomes,
        }
    }
}
