use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::JsonRpcError;
use crate::types::{JsonRpcVersion, RequestId};

/// A successful JSON-RPC response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    #[serde(rename = "jsonrpc")]
    pub version: JsonRpcVersion,
    pub id: RequestId,
    /// Value returned by the method, passed through unmodified
    pub result: Value,
}

impl JsonRpcResponse {
    pub fn new(id: RequestId, result: Value) -> Self {
        Self {
            version: JsonRpcVersion::V2_0,
            id,
            result,
        }
    }
}

impl<T> From<(RequestId, T)> for JsonRpcResponse
where
    T: Into<Value>,
{
    fn from((id, result): (RequestId, T)) -> Self {
        Self::new(id, result.into())
    }
}

/// Union type that represents either a successful response or an error response
/// This ensures JSON-RPC 2.0 compliance by keeping success and error responses separate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JsonRpcMessage {
    /// Successful response with result field
    Response(JsonRpcResponse),
    /// Error response with error field
    Error(JsonRpcError),
}

impl JsonRpcMessage {
    pub fn success(id: RequestId, result: Value) -> Self {
        Self::Response(JsonRpcResponse::new(id, result))
    }

    pub fn error(error: JsonRpcError) -> Self {
        Self::Error(error)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, JsonRpcMessage::Error(_))
    }

    /// Get the request ID from either response or error
    pub fn id(&self) -> &RequestId {
        match self {
            JsonRpcMessage::Response(resp) => &resp.id,
            JsonRpcMessage::Error(err) => &err.id,
        }
    }

    pub fn result(&self) -> Option<&Value> {
        match self {
            JsonRpcMessage::Response(resp) => Some(&resp.result),
            JsonRpcMessage::Error(_) => None,
        }
    }

    pub fn error_code(&self) -> Option<i64> {
        match self {
            JsonRpcMessage::Response(_) => None,
            JsonRpcMessage::Error(err) => Some(err.code()),
        }
    }
}

impl From<JsonRpcResponse> for JsonRpcMessage {
    fn from(response: JsonRpcResponse) -> Self {
        Self::Response(response)
    }
}

impl From<JsonRpcError> for JsonRpcMessage {
    fn from(error: JsonRpcError) -> Self {
        Self::Error(error)
    }
}

/// Everything a server sends back for one evaluated input.
///
/// A batch reply stays an array even when only one entry survived; only a
/// lone top-level request produces `Single`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JsonRpcReply {
    Single(JsonRpcMessage),
    Batch(Vec<JsonRpcMessage>),
}

impl JsonRpcReply {
    pub fn is_batch(&self) -> bool {
        matches!(self, JsonRpcReply::Batch(_))
    }

    pub fn messages(&self) -> &[JsonRpcMessage] {
        match self {
            JsonRpcReply::Single(message) => std::slice::from_ref(message),
            JsonRpcReply::Batch(messages) => messages,
        }
    }

    pub fn into_messages(self) -> Vec<JsonRpcMessage> {
        match self {
            JsonRpcReply::Single(message) => vec![message],
            JsonRpcReply::Batch(messages) => messages,
        }
    }

    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl From<JsonRpcMessage> for JsonRpcReply {
    fn from(message: JsonRpcMessage) -> Self {
        Self::Single(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{from_str, json, to_string};

    #[test]
    fn test_response_serialization() {
        let response = JsonRpcResponse::new(RequestId::from(1), json!({"result": "success"}));

        let json_str = to_string(&response).unwrap();
        let parsed: JsonRpcResponse = from_str(&json_str).unwrap();

        assert_eq!(parsed, response);
    }

    #[test]
    fn test_null_result_is_kept() {
        let response = JsonRpcResponse::new(RequestId::from("test"), Value::Null);
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value, json!({"jsonrpc": "2.0", "id": "test", "result": null}));
    }

    #[test]
    fn test_response_from_tuple() {
        let response: JsonRpcResponse = (RequestId::from(1), json!({"test": true})).into();
        assert_eq!(response.id, RequestId::from(1));
        assert_eq!(response.result, json!({"test": true}));
    }

    #[test]
    fn test_message_deserializes_by_shape() {
        let ok: JsonRpcMessage =
            serde_json::from_value(json!({"jsonrpc": "2.0", "result": 2, "id": "1"})).unwrap();
        assert!(!ok.is_error());
        assert_eq!(ok.result(), Some(&json!(2)));

        let err: JsonRpcMessage = serde_json::from_value(json!({
            "jsonrpc": "2.0",
            "error": {"code": -32601, "message": "Method not found"},
            "id": "5"
        }))
        .unwrap();
        assert_eq!(err.error_code(), Some(-32601));
        assert_eq!(err.id(), &RequestId::from("5"));
    }

    #[test]
    fn test_batch_reply_keeps_array_shape() {
        let reply = JsonRpcReply::Batch(vec![JsonRpcMessage::error(JsonRpcError::invalid_request())]);
        let value: Value = from_str(&reply.to_json_string().unwrap()).unwrap();

        assert!(value.is_array());
        assert_eq!(reply.messages().len(), 1);
    }
}
