//! Asynchronous request evaluation.
//!
//! Same semantics as [`JsonRpcServer`](crate::server::JsonRpcServer), for
//! registries whose methods are async. Batch entries are driven concurrently
//! on the caller's task; replies keep the order of the input.

use std::panic::AssertUnwindSafe;

use async_trait::async_trait;
use futures::FutureExt;
use futures::future::join_all;
use serde_json::Value;
use tracing::debug;

use crate::{
    dispatch::{IncomingMessage, Input, Outcome, classify_input, decode_input, validate_request},
    error::{JsonRpcError, MethodError},
    notification::JsonRpcNotification,
    registry::{MethodRegistry, MethodTable},
    request::{JsonRpcRequest, RequestParams},
    response::{JsonRpcMessage, JsonRpcReply},
    server::{batch_reply, encode_reply, invocation_message, log_notification_result},
};

/// Trait for resolving and invoking async JSON-RPC methods
///
/// Batch entries call [`invoke`](Self::invoke) concurrently, so
/// implementations must tolerate overlapping calls.
#[async_trait]
pub trait AsyncMethodRegistry: Send + Sync {
    /// Whether `method` names something callable
    fn has_method(&self, method: &str) -> bool;

    /// Invoke a method. `Err(MethodError::InvalidParams)` rejects the arguments.
    async fn invoke(&self, method: &str, params: RequestParams) -> Result<Value, MethodError>;

    /// List supported methods (optional - used for diagnostics)
    fn supported_methods(&self) -> Vec<String> {
        vec![]
    }
}

#[async_trait]
impl AsyncMethodRegistry for MethodTable {
    fn has_method(&self, method: &str) -> bool {
        MethodRegistry::has_method(self, method)
    }

    async fn invoke(&self, method: &str, params: RequestParams) -> Result<Value, MethodError> {
        MethodRegistry::invoke(self, method, params)
    }

    fn supported_methods(&self) -> Vec<String> {
        self.registered_methods()
    }
}

/// Async JSON-RPC request evaluator bound to a method registry
#[derive(Debug, Clone)]
pub struct AsyncJsonRpcServer<R> {
    registry: R,
}

impl<R> AsyncJsonRpcServer<R>
where
    R: AsyncMethodRegistry,
{
    pub fn new(registry: R) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// Evaluate raw request text. `None` means no reply is due.
    pub async fn evaluate(&self, json_str: &str) -> Option<String> {
        self.reply(json_str).await.map(|reply| encode_reply(&reply))
    }

    pub async fn reply(&self, json_str: &str) -> Option<JsonRpcReply> {
        match decode_input(json_str) {
            Ok(value) => self.reply_value(value).await,
            Err(error) => Some(JsonRpcReply::Single(error.into())),
        }
    }

    pub async fn reply_value(&self, input: Value) -> Option<JsonRpcReply> {
        match classify_input(input) {
            Ok(Input::Single(candidate)) => self
                .process_candidate(candidate)
                .await
                .into_message()
                .map(JsonRpcReply::Single),
            Ok(Input::Batch(candidates)) => {
                debug!("Evaluating batch of {} requests concurrently", candidates.len());
                let outcomes = join_all(
                    candidates
                        .into_iter()
                        .map(|candidate| self.process_candidate(candidate)),
                )
                .await;
                batch_reply(outcomes.into_iter().filter_map(Outcome::into_message).collect())
            }
            Err(error) => Some(JsonRpcReply::Single(error.into())),
        }
    }

    pub async fn process_candidate(&self, candidate: Value) -> Outcome {
        match validate_request(candidate) {
            Ok(message) => self.handle_message(message).await,
            Err(error) => Outcome::Error(error),
        }
    }

    pub async fn handle_message(&self, message: IncomingMessage) -> Outcome {
        match message {
            IncomingMessage::Request(request) => self.handle_request(request).await.into(),
            IncomingMessage::Notification(notification) => {
                self.handle_notification(notification).await;
                Outcome::NoResponse
            }
        }
    }

    pub async fn handle_request(&self, request: JsonRpcRequest) -> JsonRpcMessage {
        let JsonRpcRequest {
            id, method, params, ..
        } = request;

        if !self.registry.has_method(&method) {
            debug!("Method not found: {} (id {})", method, id);
            return JsonRpcMessage::error(JsonRpcError::method_not_found(id));
        }

        debug!("Dispatching {} (id {})", method, id);
        let invoked = AssertUnwindSafe(self.registry.invoke(&method, params.unwrap_or_default()))
            .catch_unwind()
            .await;
        invocation_message(id, &method, invoked)
    }

    pub async fn handle_notification(&self, notification: JsonRpcNotification) {
        let JsonRpcNotification { method, params, .. } = notification;

        if !self.registry.has_method(&method) {
            debug!("Ignoring notification for unknown method {}", method);
            return;
        }

        debug!("Dispatching notification {}", method);
        let invoked = AssertUnwindSafe(self.registry.invoke(&method, params.unwrap_or_default()))
            .catch_unwind()
            .await;
        log_notification_result(&method, invoked);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingRegistry {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl AsyncMethodRegistry for CountingRegistry {
        fn has_method(&self, method: &str) -> bool {
            matches!(method, "count" | "fail")
        }

        async fn invoke(&self, method: &str, _params: RequestParams) -> Result<Value, MethodError> {
            match method {
                "count" => Ok(json!(self.calls.fetch_add(1, Ordering::SeqCst) + 1)),
                _ => Err(MethodError::InvalidParams),
            }
        }
    }

    #[tokio::test]
    async fn test_notifications_still_invoke() {
        let server = AsyncJsonRpcServer::new(CountingRegistry::default());

        let reply = server
            .evaluate(r#"[{"jsonrpc": "2.0", "method": "count"}, {"jsonrpc": "2.0", "method": "fail"}]"#)
            .await;

        assert_eq!(reply, None);
        assert_eq!(server.registry().calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_method_table_is_async_registry() {
        let server = AsyncJsonRpcServer::new(MethodTable::new().register("ping", |_| Ok(json!("pong"))));

        let reply = server
            .evaluate(r#"{"jsonrpc": "2.0", "method": "ping", "id": 1}"#)
            .await
            .unwrap();
        let reply: Value = serde_json::from_str(&reply).unwrap();

        assert_eq!(reply, json!({"jsonrpc": "2.0", "id": 1, "result": "pong"}));
    }

    #[tokio::test]
    async fn test_parse_error() {
        let server = AsyncJsonRpcServer::new(CountingRegistry::default());
        let reply = server.evaluate("{not json").await.unwrap();
        let reply: Value = serde_json::from_str(&reply).unwrap();

        assert_eq!(reply["error"]["code"], json!(-32700));
        assert_eq!(reply["id"], json!(null));
    }
}
