//! Wire Codec
//!
//! Bodies are JSON. A top-level object is single-call mode and a top-level
//! array is batch mode. Anything that cannot be framed this way is a
//! `MalformedEnvelope`, which is distinct from a call whose input fails
//! validation.

use crate::envelope::{Call, Outcome, RequestEnvelope, ResponseEnvelope};
use crate::error::MalformedEnvelope;
use serde::de::DeserializeOwned;
use serde_json::Value;

pub fn encode_request(envelope: &RequestEnvelope) -> serde_json::Result<Vec<u8>> {
    serde_json::to_vec(envelope)
}

pub fn decode_request(body: &[u8]) -> Result<RequestEnvelope, MalformedEnvelope> {
    match parse_body(body)? {
        Value::Array(items) => {
            if items.is_empty() {
                return Err(MalformedEnvelope::new("batch must contain at least one call"));
            }
            decode_items::<Call>(items).map(RequestEnvelope::Batch)
        }
        value @ Value::Object(_) => decode_item::<Call>(value)
            .map(RequestEnvelope::Single)
            .map_err(|e| MalformedEnvelope::new(format!("invalid call: {}", e))),
        other => Err(unexpected_shape(&other)),
    }
}

pub fn encode_response(envelope: &ResponseEnvelope) -> serde_json::Result<Vec<u8>> {
    serde_json::to_vec(envelope)
}

pub fn decode_response(body: &[u8]) -> Result<ResponseEnvelope, MalformedEnvelope> {
    match parse_body(body)? {
        Value::Array(items) => decode_items::<Outcome>(items).map(ResponseEnvelope::Batch),
        value @ Value::Object(_) => decode_item::<Outcome>(value)
            .map(ResponseEnvelope::Single)
            .map_err(|e| MalformedEnvelope::new(format!("invalid outcome: {}", e))),
        other => Err(unexpected_shape(&other)),
    }
}

fn parse_body(body: &[u8]) -> Result<Value, MalformedEnvelope> {
    serde_json::from_slice(body)
        .map_err(|e| MalformedEnvelope::new(format!("body is not valid JSON: {}", e)))
}

fn decode_item<T: DeserializeOwned>(value: Value) -> serde_json::Result<T> {
    serde_json::from_value(value)
}

fn decode_items<T: DeserializeOwned>(items: Vec<Value>) -> Result<Vec<T>, MalformedEnvelope> {
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            decode_item(item)
                .map_err(|e| MalformedEnvelope::new(format!("entry {}: {}", index, e)))
        })
        .collect()
}

fn unexpected_shape(value: &Value) -> MalformedEnvelope {
    let shape = match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    };
    MalformedEnvelope::new(format!("expected object or array, got {}", shape))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorCode, RpcError};
    use crate::kind::ProcedureKind;
    use serde_json::json;

    #[test]
    fn test_decode_single_call() {
        let body = br#"{"name":"userById","kind":"query","input":"1"}"#;
        let envelope = decode_request(body).unwrap();

        assert!(!envelope.is_batch());
        let call = &envelope.calls()[0];
        assert_eq!(call.name, "userById");
        assert_eq!(call.kind, ProcedureKind::Query);
        assert_eq!(call.input, json!("1"));
    }

    #[test]
    fn test_decode_batch_preserves_order() {
        let body = json!([
            {"name": "userCreate", "kind": "mutation", "input": {"name": "Alice"}},
            {"name": "userList", "kind": "query"},
            {"name": "userById", "kind": "query", "input": "999"}
        ]);
        let envelope = decode_request(body.to_string().as_bytes()).unwrap();

        assert!(envelope.is_batch());
        let names: Vec<_> = envelope.calls().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["userCreate", "userList", "userById"]);
        assert_eq!(envelope.calls()[1].input, Value::Null);
    }

    #[test]
    fn test_decode_rejects_unparsable_body() {
        let err = decode_request(b"{not json").unwrap_err();
        assert!(err.reason().contains("not valid JSON"));
    }

    #[test]
    fn test_decode_rejects_wrong_top_level_type() {
        let err = decode_request(b"42").unwrap_err();
        assert!(err.reason().contains("got number"));
    }

    #[test]
    fn test_decode_rejects_empty_batch() {
        let err = decode_request(b"[]").unwrap_err();
        assert!(err.reason().contains("at least one call"));
    }

    #[test]
    fn test_decode_rejects_unknown_kind() {
        let body = br#"{"name":"userList","kind":"subscription"}"#;
        assert!(decode_request(body).is_err());
    }

    #[test]
    fn test_one_bad_entry_rejects_whole_batch() {
        let body = json!([
            {"name": "userList", "kind": "query"},
            {"kind": "query"}
        ]);
        let err = decode_request(body.to_string().as_bytes()).unwrap_err();
        assert!(err.reason().starts_with("entry 1"));
    }

    #[test]
    fn test_response_batch_encoding_is_aligned() {
        let envelope = ResponseEnvelope::batch(vec![
            Outcome::Ok(json!({"id": "1", "name": "Alice"})),
            Outcome::Error(RpcError::not_found("No procedure named 'nope'")),
            Outcome::Ok(Value::Null),
        ]);
        let bytes = encode_response(&envelope).unwrap();
        let raw: Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(raw[0], json!({"ok": {"id": "1", "name": "Alice"}}));
        assert_eq!(raw[1]["error"]["code"], "NOT_FOUND");
        assert_eq!(raw[2], json!({"ok": null}));

        let decoded = decode_response(&bytes).unwrap();
        assert_eq!(decoded, envelope);
    }

    #[test]
    fn test_decode_response_single_error() {
        let body = br#"{"error":{"code":"MALFORMED_ENVELOPE","message":"bad"}}"#;
        let envelope = decode_response(body).unwrap();
        let outcome = envelope.into_outcomes().remove(0);
        assert_eq!(outcome.error().map(|e| e.code), Some(ErrorCode::MalformedEnvelope));
    }
}
