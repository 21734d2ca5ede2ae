//! # JSON-RPC Core Prelude
//!
//! This module provides convenient re-exports of the most commonly used types
//! from the JSON-RPC core library.
//!
//! ```rust
//! use turul_json_rpc_core::prelude::*;
//! ```

// Core JSON-RPC types
pub use crate::client::{OutboundMessage, decode_reply, encode_messages};
pub use crate::dispatch::{IncomingMessage, Outcome};
pub use crate::error::{JsonRpcError, JsonRpcErrorCode, JsonRpcErrorObject, MethodError};
pub use crate::notification::JsonRpcNotification;
pub use crate::registry::{MethodRegistry, MethodTable};
pub use crate::request::{JsonRpcRequest, RequestParams};
pub use crate::response::{JsonRpcMessage, JsonRpcReply, JsonRpcResponse};
pub use crate::server::JsonRpcServer;
pub use crate::types::{JsonRpcVersion, RequestId};

#[cfg(feature = "async")]
pub use crate::r#async::{AsyncJsonRpcServer, AsyncMethodRegistry};

// Standard error codes
pub use crate::error_codes::*;
