use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::{JsonRpcVersion, RequestId};

/// Parameters for a JSON-RPC request
///
/// The shape is decided once, when the request is validated. A registry
/// receives exactly one of the two variants.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RequestParams {
    /// Positional parameters as an array
    Array(Vec<Value>),
    /// Named parameters as an object
    Object(Map<String, Value>),
}

impl Default for RequestParams {
    fn default() -> Self {
        RequestParams::Array(Vec::new())
    }
}

impl RequestParams {
    /// Accept a `params` value only if it is an array or an object.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Array(vec) => Some(RequestParams::Array(vec)),
            Value::Object(map) => Some(RequestParams::Object(map)),
            _ => None,
        }
    }

    /// Get a parameter by name (for object params only)
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            RequestParams::Object(map) => map.get(key),
            RequestParams::Array(_) => None,
        }
    }

    /// Get a parameter by index (for array params only)
    pub fn get_index(&self, index: usize) -> Option<&Value> {
        match self {
            RequestParams::Array(vec) => vec.get(index),
            RequestParams::Object(_) => None,
        }
    }

    /// Resolve either shape to an ordered argument list.
    ///
    /// Positional params must supply exactly `names.len()` values. Named
    /// params must supply every name and nothing else; the result follows
    /// the order of `names`, so `{"b": 2, "a": 1}` and `[1, 2]` resolve to
    /// the same call for `names = ["a", "b"]`.
    pub fn positional(&self, names: &[&str]) -> Option<Vec<Value>> {
        match self {
            RequestParams::Array(vec) => (vec.len() == names.len()).then(|| vec.clone()),
            RequestParams::Object(map) => {
                if map.len() != names.len() {
                    return None;
                }
                names.iter().map(|name| map.get(*name).cloned()).collect()
            }
        }
    }

    pub fn len(&self) -> usize {
        match self {
            RequestParams::Object(map) => map.len(),
            RequestParams::Array(vec) => vec.len(),
        }
    }

    /// Check if parameters are empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Convert to a serde_json::Value for serialization
    pub fn to_value(&self) -> Value {
        match self {
            RequestParams::Object(map) => Value::Object(map.clone()),
            RequestParams::Array(arr) => Value::Array(arr.clone()),
        }
    }
}

impl From<Map<String, Value>> for RequestParams {
    fn from(map: Map<String, Value>) -> Self {
        RequestParams::Object(map)
    }
}

impl From<Vec<Value>> for RequestParams {
    fn from(vec: Vec<Value>) -> Self {
        RequestParams::Array(vec)
    }
}

/// A JSON-RPC query: a request that carries an `id` and expects a reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    #[serde(rename = "jsonrpc")]
    pub version: JsonRpcVersion,
    pub id: RequestId,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<RequestParams>,
}

impl JsonRpcRequest {
    pub fn new(id: RequestId, method: String, params: Option<RequestParams>) -> Self {
        Self {
            version: JsonRpcVersion::V2_0,
            id,
            method,
            params,
        }
    }

    /// Create a new request with no parameters
    pub fn new_no_params(id: RequestId, method: String) -> Self {
        Self::new(id, method, None)
    }

    /// Create a new request with object parameters
    pub fn new_with_object_params(
        id: RequestId,
        method: String,
        params: Map<String, Value>,
    ) -> Self {
        Self::new(id, method, Some(RequestParams::Object(params)))
    }

    /// Create a new request with array parameters
    pub fn new_with_array_params(id: RequestId, method: String, params: Vec<Value>) -> Self {
        Self::new(id, method, Some(RequestParams::Array(params)))
    }

    /// Get a parameter by name (if params are an object)
    pub fn get_param(&self, name: &str) -> Option<&Value> {
        self.params.as_ref()?.get(name)
    }

    /// Get a parameter by index (if params are an array)
    pub fn get_param_index(&self, index: usize) -> Option<&Value> {
        self.params.as_ref()?.get_index(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{from_str, json, to_string};

    fn named(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn test_request_serialization() {
        let request =
            JsonRpcRequest::new_no_params(RequestId::from(1), "test_method".to_string());

        let json = to_string(&request).unwrap();
        assert!(!json.contains("params"));
        let parsed: JsonRpcRequest = from_str(&json).unwrap();

        assert_eq!(parsed.id, RequestId::from(1));
        assert_eq!(parsed.method, "test_method");
        assert!(parsed.params.is_none());
    }

    #[test]
    fn test_request_with_object_params() {
        let request = JsonRpcRequest::new_with_object_params(
            RequestId::from("req1"),
            "set_value".to_string(),
            named(json!({"name": "test", "value": 42})),
        );

        assert_eq!(request.get_param("name"), Some(&json!("test")));
        assert_eq!(request.get_param("value"), Some(&json!(42)));
        assert_eq!(request.get_param("missing"), None);
        assert_eq!(request.get_param_index(0), None);
    }

    #[test]
    fn test_request_with_array_params() {
        let request = JsonRpcRequest::new_with_array_params(
            RequestId::from(2),
            "process".to_string(),
            vec![json!("test"), json!(42), json!(true)],
        );

        assert_eq!(request.get_param_index(0), Some(&json!("test")));
        assert_eq!(request.get_param_index(2), Some(&json!(true)));
        assert_eq!(request.get_param_index(3), None);
    }

    #[test]
    fn test_params_shape_is_checked() {
        assert!(RequestParams::from_value(json!([1, 2])).is_some());
        assert!(RequestParams::from_value(json!({"a": 1})).is_some());
        assert!(RequestParams::from_value(json!("bar")).is_none());
        assert!(RequestParams::from_value(json!(null)).is_none());
        assert!(RequestParams::from_value(json!(false)).is_none());
    }

    #[test]
    fn test_positional_resolution() {
        let names = ["minuend", "subtrahend"];
        let by_position = RequestParams::from(vec![json!(3), json!(2)]);
        let by_name = RequestParams::from(named(json!({"subtrahend": 2, "minuend": 3})));

        assert_eq!(by_position.positional(&names), by_name.positional(&names));
        assert_eq!(by_name.positional(&names), Some(vec![json!(3), json!(2)]));

        assert!(RequestParams::default().positional(&names).is_none());
        assert!(
            RequestParams::from(named(json!({"minuend": 3, "other": 2})))
                .positional(&names)
                .is_none()
        );
    }
}
