//! Decoding, classification and validation of incoming request text.
//!
//! Nothing here invokes a method. The functions turn raw text into either a
//! validated [`IncomingMessage`] or the protocol error that must be sent
//! back instead. Protocol errors always carry a `null` id: an id is only
//! echoed once the whole request object has been validated.

use serde_json::Value;
use tracing::warn;

use crate::{
    error::JsonRpcError,
    notification::JsonRpcNotification,
    request::{JsonRpcRequest, RequestParams},
    response::{JsonRpcMessage, JsonRpcResponse},
    types::{JsonRpcVersion, RequestId},
};

/// A validated request object
#[derive(Debug, Clone, PartialEq)]
pub enum IncomingMessage {
    /// Carries an `id` key (possibly `null`) and expects a reply
    Request(JsonRpcRequest),
    /// No `id` key: invoked, never answered
    Notification(JsonRpcNotification),
}

impl IncomingMessage {
    pub fn method(&self) -> &str {
        match self {
            IncomingMessage::Request(req) => &req.method,
            IncomingMessage::Notification(notif) => &notif.method,
        }
    }

    pub fn is_request(&self) -> bool {
        matches!(self, IncomingMessage::Request(_))
    }

    pub fn is_notification(&self) -> bool {
        matches!(self, IncomingMessage::Notification(_))
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        match self {
            IncomingMessage::Request(req) => Some(&req.id),
            IncomingMessage::Notification(_) => None,
        }
    }
}

/// Per-request result of processing
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Response(JsonRpcResponse),
    Error(JsonRpcError),
    /// Notifications: nothing is sent back
    NoResponse,
}

impl Outcome {
    pub fn is_error(&self) -> bool {
        matches!(self, Outcome::Error(_))
    }

    pub fn needs_response(&self) -> bool {
        !matches!(self, Outcome::NoResponse)
    }

    /// The wire message for this outcome, if one is due
    pub fn into_message(self) -> Option<JsonRpcMessage> {
        match self {
            Outcome::Response(response) => Some(JsonRpcMessage::Response(response)),
            Outcome::Error(error) => Some(JsonRpcMessage::Error(error)),
            Outcome::NoResponse => None,
        }
    }

    /// Convert to JSON string if there's a response to send
    pub fn to_json_string(&self) -> Option<String> {
        match self {
            Outcome::Response(response) => serde_json::to_string(response).ok(),
            Outcome::Error(error) => serde_json::to_string(error).ok(),
            Outcome::NoResponse => None,
        }
    }
}

impl From<JsonRpcMessage> for Outcome {
    fn from(message: JsonRpcMessage) -> Self {
        match message {
            JsonRpcMessage::Response(response) => Outcome::Response(response),
            JsonRpcMessage::Error(error) => Outcome::Error(error),
        }
    }
}

impl From<JsonRpcError> for Outcome {
    fn from(error: JsonRpcError) -> Self {
        Outcome::Error(error)
    }
}

/// How a decoded input is to be processed
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    /// One request object, answered (if at all) by one bare reply object
    Single(Value),
    /// Independent request candidates, answered by an array
    Batch(Vec<Value>),
}

/// Decode raw text into a value tree.
pub fn decode_input(json_str: &str) -> Result<Value, JsonRpcError> {
    serde_json::from_str(json_str).map_err(|e| {
        warn!("Rejecting malformed JSON-RPC input: {}", e);
        JsonRpcError::parse_error()
    })
}

/// Decide whether a decoded value is a single request or a batch.
///
/// Scalars, `null` and empty containers are invalid requests. An object
/// with its own `jsonrpc` key is a single request candidate. Any other
/// container is a batch: an array's elements, or a keyed object's values,
/// each validated on its own.
pub fn classify_input(value: Value) -> Result<Input, JsonRpcError> {
    match value {
        Value::Object(map) if map.is_empty() => {
            warn!("Rejecting empty request object");
            Err(JsonRpcError::invalid_request())
        }
        Value::Object(map) if !map.contains_key("jsonrpc") => {
            Ok(Input::Batch(map.into_iter().map(|(_, value)| value).collect()))
        }
        Value::Object(map) => Ok(Input::Single(Value::Object(map))),
        Value::Array(items) if items.is_empty() => {
            warn!("Rejecting empty batch");
            Err(JsonRpcError::invalid_request())
        }
        Value::Array(items) => Ok(Input::Batch(items)),
        other => {
            warn!("Rejecting non-container input: {}", other);
            Err(JsonRpcError::invalid_request())
        }
    }
}

/// Validate one request candidate.
///
/// Checks run in a fixed order and the first failure wins: container shape,
/// `jsonrpc` version (exactly the string `"2.0"`), string `method`, `params`
/// shape, `id` shape. Every failure yields Invalid Request with a `null` id.
pub fn validate_request(candidate: Value) -> Result<IncomingMessage, JsonRpcError> {
    let Value::Object(mut obj) = candidate else {
        return Err(reject("request is not an object"));
    };

    match obj.get("jsonrpc") {
        Some(Value::String(version)) if version == crate::JSONRPC_VERSION => {}
        _ => return Err(reject("missing or unsupported jsonrpc version")),
    }

    let method = match obj.remove("method") {
        Some(Value::String(method)) => method,
        _ => return Err(reject("method is missing or not a string")),
    };

    let params = match obj.remove("params") {
        Some(value) => match RequestParams::from_value(value) {
            Some(params) => Some(params),
            None => return Err(reject("params is neither an array nor an object")),
        },
        None => None,
    };

    // Presence of the key, not its value, makes this a query
    match obj.get("id") {
        Some(value) => match RequestId::from_value(value) {
            Some(id) => Ok(IncomingMessage::Request(JsonRpcRequest {
                version: JsonRpcVersion::V2_0,
                id,
                method,
                params,
            })),
            None => Err(reject("id is not a string, number or null")),
        },
        None => Ok(IncomingMessage::Notification(JsonRpcNotification {
            version: JsonRpcVersion::V2_0,
            method,
            params,
        })),
    }
}

fn reject(reason: &str) -> JsonRpcError {
    warn!("Invalid JSON-RPC request: {}", reason);
    JsonRpcError::invalid_request()
}

/// Parse a JSON string holding exactly one request object
pub fn parse_json_rpc_message(json_str: &str) -> Result<IncomingMessage, JsonRpcError> {
    let value = decode_input(json_str)?;
    if !value.is_object() {
        return Err(reject("expected a single request object"));
    }
    validate_request(value)
}
