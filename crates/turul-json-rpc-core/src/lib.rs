//! # JSON-RPC 2.0 Request Evaluator
//!
//! A pure, transport-agnostic JSON-RPC 2.0 core. It turns one raw request
//! string into one reply string, or into no reply at all, following the
//! specification at <https://www.jsonrpc.org/specification>.
//!
//! ## Features
//! - Single and batch requests, notifications, `null` ids
//! - Strict request validation with the standard error codes
//! - Method lookup and invocation through a caller-supplied [`MethodRegistry`]
//! - Async evaluation with concurrent batches (`async` feature)
//! - Client-side encoding of outbound messages and decoding of replies
//!
//! ```rust
//! use serde_json::json;
//! use turul_json_rpc_core::{JsonRpcServer, MethodError, MethodTable};
//!
//! let server = JsonRpcServer::new(MethodTable::new().register("Math/subtract", |params| {
//!     let args = params
//!         .positional(&["minuend", "subtrahend"])
//!         .ok_or(MethodError::InvalidParams)?;
//!     match (args[0].as_i64(), args[1].as_i64()) {
//!         (Some(a), Some(b)) => Ok(json!(a - b)),
//!         _ => Err(MethodError::InvalidParams),
//!     }
//! }));
//!
//! let reply = server
//!     .evaluate(r#"{"jsonrpc": "2.0", "method": "Math/subtract", "params": [3, 2], "id": 1}"#)
//!     .unwrap();
//! assert_eq!(reply, r#"{"jsonrpc":"2.0","id":1,"result":1}"#);
//!
//! // Notifications are never answered
//! assert!(server.evaluate(r#"{"jsonrpc": "2.0", "method": "Math/subtract"}"#).is_none());
//! ```

pub mod client;
pub mod dispatch;
pub mod error;
pub mod notification;
pub mod prelude;
pub mod registry;
pub mod request;
pub mod response;
pub mod server;
pub mod types;

#[cfg(feature = "async")]
pub mod r#async;

// Re-export main types
pub use client::{OutboundMessage, decode_reply, encode_messages};
pub use dispatch::{IncomingMessage, Outcome, parse_json_rpc_message};
pub use error::{
    JsonRpcError, JsonRpcErrorCode, JsonRpcErrorObject, JsonRpcTransportError, MethodError,
};
pub use notification::JsonRpcNotification;
pub use registry::{MethodRegistry, MethodTable};
pub use request::{JsonRpcRequest, RequestParams};
pub use response::{JsonRpcMessage, JsonRpcReply, JsonRpcResponse};
pub use server::JsonRpcServer;
pub use types::{JsonRpcVersion, RequestId};

#[cfg(feature = "async")]
pub use r#async::{AsyncJsonRpcServer, AsyncMethodRegistry};

/// JSON-RPC 2.0 version constant
pub const JSONRPC_VERSION: &str = "2.0";

/// Standard JSON-RPC 2.0 error codes
pub mod error_codes {
    pub const PARSE_ERROR: i64 = -32700;
    pub const INVALID_REQUEST: i64 = -32600;
    pub const METHOD_NOT_FOUND: i64 = -32601;
    pub const INVALID_PARAMS: i64 = -32602;
    pub const INTERNAL_ERROR: i64 = -32603;

    // Server error range: -32099 to -32000
    pub const SERVER_ERROR_START: i64 = -32099;
    pub const SERVER_ERROR_END: i64 = -32000;
}
