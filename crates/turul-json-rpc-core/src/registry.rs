//! The method registry collaborator.
//!
//! The evaluator never looks inside arguments. A registry decides whether a
//! name is callable and whether the arguments it is handed are acceptable.

use std::collections::HashMap;
use std::fmt;

use serde_json::Value;

use crate::{error::MethodError, request::RequestParams};

/// Trait for resolving and invoking JSON-RPC methods
pub trait MethodRegistry {
    /// Whether `method` names something callable
    fn has_method(&self, method: &str) -> bool;

    /// Invoke a method previously reported by [`has_method`](Self::has_method).
    ///
    /// Return `Err(MethodError::InvalidParams)` to reject the arguments.
    /// `Ok(Value::Null)` is a legitimate result.
    fn invoke(&self, method: &str, params: RequestParams) -> Result<Value, MethodError>;

    /// List supported methods (optional - used for diagnostics)
    fn supported_methods(&self) -> Vec<String> {
        vec![]
    }
}

impl<R: MethodRegistry + ?Sized> MethodRegistry for &R {
    fn has_method(&self, method: &str) -> bool {
        (**self).has_method(method)
    }

    fn invoke(&self, method: &str, params: RequestParams) -> Result<Value, MethodError> {
        (**self).invoke(method, params)
    }

    fn supported_methods(&self) -> Vec<String> {
        (**self).supported_methods()
    }
}

type MethodFn = Box<dyn Fn(RequestParams) -> Result<Value, MethodError> + Send + Sync>;

/// A registry backed by a table of closures
///
/// ```rust
/// use serde_json::json;
/// use turul_json_rpc_core::{MethodError, MethodTable};
///
/// let methods = MethodTable::new().register("Math/subtract", |params| {
///     let args = params
///         .positional(&["minuend", "subtrahend"])
///         .ok_or(MethodError::InvalidParams)?;
///     match (args[0].as_i64(), args[1].as_i64()) {
///         (Some(a), Some(b)) => Ok(json!(a - b)),
///         _ => Err(MethodError::InvalidParams),
///     }
/// });
/// assert_eq!(methods.len(), 1);
/// ```
#[derive(Default)]
pub struct MethodTable {
    methods: HashMap<String, MethodFn>,
}

impl MethodTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a method, replacing any earlier one of the same name
    pub fn register<F>(mut self, method: impl Into<String>, handler: F) -> Self
    where
        F: Fn(RequestParams) -> Result<Value, MethodError> + Send + Sync + 'static,
    {
        self.insert(method, handler);
        self
    }

    pub fn insert<F>(&mut self, method: impl Into<String>, handler: F)
    where
        F: Fn(RequestParams) -> Result<Value, MethodError> + Send + Sync + 'static,
    {
        self.methods.insert(method.into(), Box::new(handler));
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    /// Get all registered methods, sorted by name
    pub fn registered_methods(&self) -> Vec<String> {
        let mut names: Vec<String> = self.methods.keys().cloned().collect();
        names.sort();
        names
    }
}

impl MethodRegistry for MethodTable {
    fn has_method(&self, method: &str) -> bool {
        self.methods.contains_key(method)
    }

    fn invoke(&self, method: &str, params: RequestParams) -> Result<Value, MethodError> {
        // Callers check has_method first; an unknown name accepts no arguments
        match self.methods.get(method) {
            Some(handler) => handler(params),
            None => Err(MethodError::InvalidParams),
        }
    }

    fn supported_methods(&self) -> Vec<String> {
        self.registered_methods()
    }
}

impl fmt::Debug for MethodTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodTable")
            .field("methods", &self.registered_methods())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn table() -> MethodTable {
        MethodTable::new()
            .register("echo", |params| Ok(params.to_value()))
            .register("nothing", |_| Ok(Value::Null))
            .register("strict", |params| {
                if params.is_empty() {
                    Err(MethodError::InvalidParams)
                } else {
                    Ok(json!(params.len()))
                }
            })
    }

    #[test]
    fn test_has_method() {
        let table = table();
        assert!(table.has_method("echo"));
        assert!(!table.has_method("Echo"));
        assert_eq!(table.registered_methods(), vec!["echo", "nothing", "strict"]);
    }

    #[test]
    fn test_invoke() {
        let table = table();
        assert_eq!(
            table.invoke("echo", RequestParams::from(vec![json!(1)])),
            Ok(json!([1]))
        );
        assert_eq!(table.invoke("nothing", RequestParams::default()), Ok(Value::Null));
        assert_eq!(
            table.invoke("strict", RequestParams::default()),
            Err(MethodError::InvalidParams)
        );
        assert_eq!(
            table.invoke("unregistered", RequestParams::default()),
            Err(MethodError::InvalidParams)
        );
    }

    #[test]
    fn test_registry_by_reference() {
        let table = table();
        let by_ref = &table;
        assert!(by_ref.has_method("strict"));
        assert_eq!(by_ref.supported_methods().len(), 3);
    }
}
