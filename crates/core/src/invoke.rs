//! ActionInvoker trait — the abstraction over remote serverless actions.
//!
//! Every helper in the workspace performs its work by invoking another
//! action by name and reading back `{statusCode, result | error}`. The
//! transport (OpenWhisk REST API, scripted test replies) sits behind this
//! trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ActionError;

/// A request to invoke a named action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvokeRequest {
    /// Fully qualified action name (`<package>/<action>`)
    pub name: String,

    /// Wait for the activation to finish
    pub blocking: bool,

    /// Return only the action result instead of the activation record
    pub result: bool,

    /// Action parameters
    pub params: Value,
}

impl InvokeRequest {
    /// A blocking, result-only invocation.
    pub fn blocking(name: impl Into<String>, params: Value) -> Self {
        Self {
            name: name.into(),
            blocking: true,
            result: true,
            params,
        }
    }

    /// A fire-and-forget invocation.
    pub fn non_blocking(name: impl Into<String>, params: Value) -> Self {
        Self {
            name: name.into(),
            blocking: false,
            result: false,
            params,
        }
    }
}

/// The normalized answer of an action: a status code plus whatever body keys
/// the action returned (`result`, `error`, `payload`, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvokeResponse {
    #[serde(rename = "statusCode", default)]
    pub status_code: u16,

    #[serde(flatten)]
    pub body: Map<String, Value>,
}

impl InvokeResponse {
    pub fn new(status_code: u16, body: Map<String, Value>) -> Self {
        Self { status_code, body }
    }

    /// A 200 response carrying `result`.
    pub fn ok(result: Value) -> Self {
        Self::with_field(200, "result", result)
    }

    /// A response with a single body field.
    pub fn with_field(status_code: u16, key: &str, value: Value) -> Self {
        let mut body = Map::new();
        body.insert(key.to_string(), value);
        Self { status_code, body }
    }

    /// Any 2xx status is a success; everything else is a remote failure.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.body.get(key)
    }

    pub fn result(&self) -> Option<&Value> {
        self.body.get("result")
    }

    /// Take the `result` field, or `null` if the action returned none.
    pub fn into_result(mut self) -> Value {
        self.body.remove("result").unwrap_or(Value::Null)
    }

    /// `error.message`, if the action reported one.
    pub fn error_message(&self) -> Option<&str> {
        self.body.get("error")?.get("message")?.as_str()
    }

    /// `error.cause`, if the action reported one.
    pub fn error_cause(&self) -> Option<&Value> {
        self.body.get("error")?.get("cause")
    }

    /// The whole response as JSON, for error reporting.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// The core ActionInvoker trait.
///
/// Implementations deliver the request to the action runtime and return its
/// answer. A non-success `status_code` is not an `Err`: callers decide how
/// each action's failure is reported. `Err` is reserved for failures to reach
/// the action at all.
#[async_trait]
pub trait ActionInvoker: Send + Sync {
    /// Human-readable transport name (e.g., "openwhisk", "scripted").
    fn name(&self) -> &str;

    /// Invoke an action and return its normalized response.
    async fn invoke(&self, request: InvokeRequest) -> std::result::Result<InvokeResponse, ActionError>;
}
