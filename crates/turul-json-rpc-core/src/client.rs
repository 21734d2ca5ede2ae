//! Client-side helpers: encoding outbound messages and decoding replies.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    error::JsonRpcTransportError,
    notification::JsonRpcNotification,
    request::{JsonRpcRequest, RequestParams},
    response::JsonRpcReply,
    types::RequestId,
};

/// A message a client sends to a server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OutboundMessage {
    Query(JsonRpcRequest),
    Notification(JsonRpcNotification),
}

impl OutboundMessage {
    pub fn query(id: impl Into<RequestId>, method: impl Into<String>, params: RequestParams) -> Self {
        OutboundMessage::Query(JsonRpcRequest::new(id.into(), method.into(), Some(params)))
    }

    pub fn notification(method: impl Into<String>, params: RequestParams) -> Self {
        OutboundMessage::Notification(JsonRpcNotification::new(method.into(), Some(params)))
    }

    pub fn method(&self) -> &str {
        match self {
            OutboundMessage::Query(query) => &query.method,
            OutboundMessage::Notification(notification) => &notification.method,
        }
    }
}

impl From<JsonRpcRequest> for OutboundMessage {
    fn from(request: JsonRpcRequest) -> Self {
        OutboundMessage::Query(request)
    }
}

impl From<JsonRpcNotification> for OutboundMessage {
    fn from(notification: JsonRpcNotification) -> Self {
        OutboundMessage::Notification(notification)
    }
}

/// Encode messages for sending.
///
/// One message is sent as a bare object and several as a batch array.
/// Returns `None` when there is nothing to send. This unwrapping is only
/// done for outbound messages; a server's batch reply keeps its array.
pub fn encode_messages(messages: &[OutboundMessage]) -> Result<Option<String>, JsonRpcTransportError> {
    let encoded = match messages {
        [] => return Ok(None),
        [message] => serde_json::to_string(message)?,
        messages => serde_json::to_string(messages)?,
    };
    Ok(Some(encoded))
}

/// Decode a server reply: a single response/error object or an array of them.
pub fn decode_reply(json_str: &str) -> Result<JsonRpcReply, JsonRpcTransportError> {
    let value: Value = serde_json::from_str(json_str)?;
    serde_json::from_value(value).map_err(|e| {
        JsonRpcTransportError::ProtocolError(format!("unexpected reply shape: {}", e))
    })
}
