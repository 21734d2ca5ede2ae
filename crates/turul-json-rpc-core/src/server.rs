//! Synchronous request evaluation.
//!
//! [`JsonRpcServer::evaluate`] maps one input string to one reply string,
//! or to `None` when nothing must be sent back. It never panics past its
//! boundary: a panicking method becomes an Internal error for that request.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};

use serde_json::Value;
use tracing::{debug, error};

use crate::{
    dispatch::{IncomingMessage, Input, Outcome, classify_input, decode_input, validate_request},
    error::{JsonRpcError, MethodError},
    notification::JsonRpcNotification,
    registry::MethodRegistry,
    request::JsonRpcRequest,
    response::{JsonRpcMessage, JsonRpcReply},
    types::RequestId,
};

/// Sent when a reply cannot be serialized, so the peer is never left waiting.
pub const FALLBACK_INTERNAL_ERROR: &str =
    r#"{"jsonrpc":"2.0","id":null,"error":{"code":-32603,"message":"Internal error"}}"#;

/// JSON-RPC request evaluator bound to a method registry
#[derive(Debug, Clone)]
pub struct JsonRpcServer<R> {
    registry: R,
}

impl<R> JsonRpcServer<R>
where
    R: MethodRegistry,
{
    pub fn new(registry: R) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    pub fn into_registry(self) -> R {
        self.registry
    }

    /// Evaluate raw request text.
    ///
    /// Returns the reply as JSON text, or `None` when the input consisted
    /// only of notifications.
    pub fn evaluate(&self, json_str: &str) -> Option<String> {
        self.reply(json_str).map(|reply| encode_reply(&reply))
    }

    /// Evaluate raw request text without encoding the reply
    pub fn reply(&self, json_str: &str) -> Option<JsonRpcReply> {
        match decode_input(json_str) {
            Ok(value) => self.reply_value(value),
            Err(error) => Some(JsonRpcReply::Single(error.into())),
        }
    }

    /// Evaluate an already decoded input
    pub fn reply_value(&self, input: Value) -> Option<JsonRpcReply> {
        match classify_input(input) {
            Ok(Input::Single(candidate)) => self
                .process_candidate(candidate)
                .into_message()
                .map(JsonRpcReply::Single),
            Ok(Input::Batch(candidates)) => {
                debug!("Evaluating batch of {} requests", candidates.len());
                let replies = candidates
                    .into_iter()
                    .filter_map(|candidate| self.process_candidate(candidate).into_message())
                    .collect();
                batch_reply(replies)
            }
            Err(error) => Some(JsonRpcReply::Single(error.into())),
        }
    }

    /// Validate and dispatch one request candidate
    pub fn process_candidate(&self, candidate: Value) -> Outcome {
        match validate_request(candidate) {
            Ok(message) => self.handle_message(message),
            Err(error) => Outcome::Error(error),
        }
    }

    pub fn handle_message(&self, message: IncomingMessage) -> Outcome {
        match message {
            IncomingMessage::Request(request) => self.handle_request(request).into(),
            IncomingMessage::Notification(notification) => {
                self.handle_notification(notification);
                Outcome::NoResponse
            }
        }
    }

    /// Process a JSON-RPC query and return its reply
    pub fn handle_request(&self, request: JsonRpcRequest) -> JsonRpcMessage {
        let JsonRpcRequest {
            id, method, params, ..
        } = request;

        if !self.registry.has_method(&method) {
            debug!("Method not found: {} (id {})", method, id);
            return JsonRpcMessage::error(JsonRpcError::method_not_found(id));
        }

        debug!("Dispatching {} (id {})", method, id);
        let params = params.unwrap_or_default();
        let invoked = catch_unwind(AssertUnwindSafe(|| self.registry.invoke(&method, params)));
        invocation_message(id, &method, invoked)
    }

    /// Process a JSON-RPC notification. Whatever happens is swallowed.
    pub fn handle_notification(&self, notification: JsonRpcNotification) {
        let JsonRpcNotification { method, params, .. } = notification;

        if !self.registry.has_method(&method) {
            debug!("Ignoring notification for unknown method {}", method);
            return;
        }

        debug!("Dispatching notification {}", method);
        let params = params.unwrap_or_default();
        let invoked = catch_unwind(AssertUnwindSafe(|| self.registry.invoke(&method, params)));
        log_notification_result(&method, invoked);
    }
}

/// Map the result of an invocation onto the reply for query `id`.
pub(crate) fn invocation_message(
    id: RequestId,
    method: &str,
    invoked: std::thread::Result<Result<Value, MethodError>>,
) -> JsonRpcMessage {
    match invoked {
        Ok(Ok(result)) => JsonRpcMessage::success(id, result),
        Ok(Err(method_error)) => {
            debug!("Method {} failed: {}", method, method_error);
            JsonRpcMessage::error(JsonRpcError::new(id, method_error.to_error_object()))
        }
        Err(payload) => {
            error!("Method {} panicked: {}", method, panic_message(payload.as_ref()));
            JsonRpcMessage::error(JsonRpcError::internal_error(id, None))
        }
    }
}

pub(crate) fn log_notification_result(
    method: &str,
    invoked: std::thread::Result<Result<Value, MethodError>>,
) {
    match invoked {
        Ok(Ok(_)) => {}
        Ok(Err(method_error)) => {
            debug!("Notification {} failed: {}", method, method_error);
        }
        Err(payload) => {
            error!(
                "Notification {} panicked: {}",
                method,
                panic_message(payload.as_ref())
            );
        }
    }
}

/// An all-notification batch produces no reply at all, not `[]`.
pub(crate) fn batch_reply(replies: Vec<JsonRpcMessage>) -> Option<JsonRpcReply> {
    if replies.is_empty() {
        None
    } else {
        Some(JsonRpcReply::Batch(replies))
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Encode a reply as JSON text
pub fn encode_reply(reply: &JsonRpcReply) -> String {
    match reply.to_json_string() {
        Ok(json) => json,
        Err(e) => {
            error!("Failed to serialize JSON-RPC reply: {}", e);
            FALLBACK_INTERNAL_ERROR.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::MethodTable;
    use serde_json::json;

    fn server() -> JsonRpcServer<MethodTable> {
        JsonRpcServer::new(
            MethodTable::new()
                .register("ping", |_| Ok(json!("pong")))
                .register("nothing", |_| Ok(Value::Null))
                .register("reject", |_| Err(MethodError::InvalidParams))
                .register("busy", |_| {
                    Err(MethodError::server_with_data(-32001, "Busy", json!({"retry": 5})))
                })
                .register("explode", |_| panic!("boom")),
        )
    }

    fn evaluate(input: Value) -> Option<Value> {
        server()
            .evaluate(&input.to_string())
            .map(|reply| serde_json::from_str(&reply).unwrap())
    }

    #[test]
    fn test_query_success() {
        let reply = evaluate(json!({"jsonrpc": "2.0", "method": "ping", "id": 7})).unwrap();
        assert_eq!(reply, json!({"jsonrpc": "2.0", "id": 7, "result": "pong"}));
    }

    #[test]
    fn test_null_result_is_a_success() {
        let reply = evaluate(json!({"jsonrpc": "2.0", "method": "nothing", "id": 1})).unwrap();
        assert_eq!(reply, json!({"jsonrpc": "2.0", "id": 1, "result": null}));
    }

    #[test]
    fn test_rejected_arguments() {
        let reply = evaluate(json!({"jsonrpc": "2.0", "method": "reject", "id": 1})).unwrap();
        assert_eq!(reply["error"], json!({"code": -32602, "message": "Invalid params"}));
        assert_eq!(reply["id"], json!(1));
    }

    #[test]
    fn test_server_error_carries_data() {
        let reply = evaluate(json!({"jsonrpc": "2.0", "method": "busy", "id": "b"})).unwrap();
        assert_eq!(
            reply["error"],
            json!({"code": -32001, "message": "Busy", "data": {"retry": 5}})
        );
    }

    #[test]
    fn test_panic_becomes_internal_error() {
        let reply = evaluate(json!({"jsonrpc": "2.0", "method": "explode", "id": 3})).unwrap();
        assert_eq!(reply["error"]["code"], json!(-32603));
        assert_eq!(reply["id"], json!(3));

        assert_eq!(evaluate(json!({"jsonrpc": "2.0", "method": "explode"})), None);
    }

    #[test]
    fn test_panic_is_isolated_in_batch() {
        let reply = evaluate(json!([
            {"jsonrpc": "2.0", "method": "explode", "id": 1},
            {"jsonrpc": "2.0", "method": "ping", "id": 2}
        ]))
        .unwrap();
        assert_eq!(reply[0]["error"]["code"], json!(-32603));
        assert_eq!(reply[1]["result"], json!("pong"));
    }

    #[test]
    fn test_single_element_batch_stays_an_array() {
        let reply = evaluate(json!([{"jsonrpc": "2.0", "method": "ping", "id": 1}])).unwrap();
        assert_eq!(reply, json!([{"jsonrpc": "2.0", "id": 1, "result": "pong"}]));
    }

    #[test]
    fn test_notification_to_unknown_method_is_silent() {
        assert_eq!(evaluate(json!({"jsonrpc": "2.0", "method": "missing"})), None);
    }

    #[test]
    fn test_scalar_input_is_invalid_request() {
        let reply = evaluate(json!(42)).unwrap();
        assert_eq!(reply["error"]["code"], json!(-32600));
        assert_eq!(reply["id"], json!(null));
    }

    #[test]
    fn test_panic_message() {
        let payload: Box<dyn Any + Send> = Box::new("static");
        assert_eq!(panic_message(payload.as_ref()), "static");
        let payload: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(payload.as_ref()), "owned");
    }
}
