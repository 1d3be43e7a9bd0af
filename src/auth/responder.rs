// Response envelope construction
// Every auth response is {"status": bool, "message": String, ...payload}

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::auth::error::AuthError;
use crate::config::MessageCatalog;

/// Build the base envelope
pub fn envelope(status: bool, message: &str) -> Map<String, Value> {
    let mut body = Map::new();
    body.insert("status".to_string(), Value::Bool(status));
    body.insert("message".to_string(), Value::String(message.to_string()));
    body
}

/// Merge a serializable payload into a success envelope
///
/// Payload fields are flattened into the top-level object. A payload that
/// does not serialize to an object contributes nothing.
pub fn success<T: Serialize>(status: StatusCode, message: &str, payload: &T) -> Response {
    let mut body = envelope(true, message);
    if let Ok(Value::Object(fields)) = serde_json::to_value(payload) {
        body.extend(fields);
    }
    (status, Json(Value::Object(body))).into_response()
}

/// Build the error envelope for an auth failure, logging its internal detail
pub fn failure(messages: &MessageCatalog, err: &AuthError) -> Response {
    err.log();
    let body = envelope(false, err.client_message(messages));
    (err.status_code(), Json(Value::Object(body))).into_response()
}
