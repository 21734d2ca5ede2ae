//! Calculator JSON-RPC Example
//!
//! Evaluates a handful of request strings against a small registry, first
//! synchronously and then through the async evaluator, and prints each
//! reply. Set `RUST_LOG=debug` to watch dispatch decisions.

use serde_json::{Value, json};
use tracing_subscriber::EnvFilter;
use turul_json_rpc_core::{AsyncJsonRpcServer, JsonRpcServer, MethodError, MethodTable, RequestParams};

fn subtract(params: RequestParams) -> Result<Value, MethodError> {
    let args = params
        .positional(&["minuend", "subtrahend"])
        .ok_or(MethodError::InvalidParams)?;

    match (args[0].as_i64(), args[1].as_i64()) {
        (Some(a), Some(b)) => a
            .checked_sub(b)
            .map(|difference| json!(difference))
            .ok_or_else(|| MethodError::server(-32000, "Integer overflow")),
        _ => match (args[0].as_f64(), args[1].as_f64()) {
            (Some(a), Some(b)) => Ok(json!(a - b)),
            _ => Err(MethodError::InvalidParams),
        },
    }
}

fn calculator() -> MethodTable {
    MethodTable::new()
        .register("Math/subtract", subtract)
        .register("Math/sum", |params| {
            let values = match params {
                RequestParams::Array(values) => values,
                RequestParams::Object(_) => return Err(MethodError::InvalidParams),
            };
            values
                .iter()
                .map(Value::as_f64)
                .sum::<Option<f64>>()
                .map(|total| json!(total))
                .ok_or(MethodError::InvalidParams)
        })
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("Calculator JSON-RPC Example");
    println!("===========================");

    let inputs = [
        r#"{"jsonrpc": "2.0", "method": "Math/subtract", "params": [3, 2], "id": 1}"#,
        r#"{"jsonrpc": "2.0", "method": "Math/subtract", "params": {"subtrahend": 2, "minuend": 3}, "id": 2}"#,
        r#"{"jsonrpc": "2.0", "method": "Math/subtract", "params": [], "id": 3}"#,
        r#"{"jsonrpc": "2.0", "method": "Math/multiply", "params": [2, 3], "id": 4}"#,
        r#"{"jsonrpc": "2.0", "method": "Math/sum", "params": [1, 2, 4]}"#,
        r#"[
            {"jsonrpc": "2.0", "method": "Math/sum", "params": [1, 2, 4], "id": "1"},
            {"jsonrpc": "2.0", "method": "Math/subtract", "params": [42, 23]},
            {"foo": "boo"},
            {"jsonrpc": "2.0", "method": "undefined", "id": "5"}
        ]"#,
        r#"{"jsonrpc": "2.0", "method": "foobar, "params": "bar", "baz]"#,
    ];

    let server = JsonRpcServer::new(calculator());
    for (i, input) in inputs.iter().enumerate() {
        println!("\n--- Request {} ---", i + 1);
        match server.evaluate(input) {
            Some(reply) => println!("Reply: {}", reply),
            None => println!("No reply (notification)"),
        }
    }

    println!("\n--- Async batch ---");
    let async_server = AsyncJsonRpcServer::new(calculator());
    match async_server.evaluate(inputs[5]).await {
        Some(reply) => println!("Reply: {}", reply),
        None => println!("No reply"),
    }
}
