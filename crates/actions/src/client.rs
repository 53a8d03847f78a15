//! Package-qualified action calls shared by every helper.

use chatwhisk_config::OpenWhiskConfig;
use chatwhisk_core::{ActionError, ActionInvoker, InvokeRequest, InvokeResponse};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// An invoker bound to the package the helper actions live in.
#[derive(Clone)]
pub struct ActionClient {
    invoker: Arc<dyn ActionInvoker>,
    openwhisk: OpenWhiskConfig,
}

impl ActionClient {
    pub fn new(invoker: Arc<dyn ActionInvoker>, openwhisk: OpenWhiskConfig) -> Self {
        Self { invoker, openwhisk }
    }

    /// `<package>/<action>`
    pub fn action_name(&self, action: &str) -> String {
        self.openwhisk.action_name(action)
    }

    /// Blocking call; returns the response whatever its status.
    pub async fn call(&self, action: &str, params: Value) -> Result<InvokeResponse, ActionError> {
        self.invoke(InvokeRequest::blocking(self.action_name(action), params))
            .await
    }

    /// Fire-and-forget call.
    pub async fn cast(&self, action: &str, params: Value) -> Result<InvokeResponse, ActionError> {
        self.invoke(InvokeRequest::non_blocking(self.action_name(action), params))
            .await
    }

    /// Blocking call that must succeed; returns its `result`.
    ///
    /// A non-success status becomes [`ActionError::InvalidResult`].
    pub async fn call_for_result(&self, action: &str, params: Value) -> Result<Value, ActionError> {
        let response = self.call(action, params).await?;
        if response.is_success() {
            Ok(response.into_result())
        } else {
            Err(self.invalid_result(action, &response))
        }
    }

    async fn invoke(&self, request: InvokeRequest) -> Result<InvokeResponse, ActionError> {
        debug!(
            action = %request.name,
            blocking = request.blocking,
            transport = self.invoker.name(),
            "Invoking action"
        );
        let response = self.invoker.invoke(request.clone()).await.inspect_err(|e| {
            warn!(action = %request.name, error = %e, "Action invocation failed");
        })?;
        if !response.is_success() {
            warn!(
                action = %request.name,
                status = response.status_code,
                "Action answered with a non-success status"
            );
        }
        Ok(response)
    }

    pub(crate) fn invalid_result(&self, action: &str, response: &InvokeResponse) -> ActionError {
        ActionError::InvalidResult {
            action: self.action_name(action),
            status_code: response.status_code,
            result: response.to_value(),
        }
    }

    /// Pass the action's own `error.message` / `error.cause` through.
    pub(crate) fn remote_failure(&self, action: &str, response: &InvokeResponse) -> ActionError {
        let action = self.action_name(action);
        ActionError::Remote {
            message: response
                .error_message()
                .map(str::to_string)
                .unwrap_or_else(|| ActionError::invalid_result_message(&action)),
            cause: response.error_cause().cloned(),
            status_code: response.status_code,
            action,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scripted::ScriptedInvoker;
    use serde_json::json;

    fn client(invoker: Arc<ScriptedInvoker>) -> ActionClient {
        let openwhisk = OpenWhiskConfig {
            package: Some("testpackage".into()),
            ..OpenWhiskConfig::default()
        };
        ActionClient::new(invoker, openwhisk)
    }

    #[tokio::test]
    async fn call_qualifies_name_and_blocks() {
        let invoker = Arc::new(ScriptedInvoker::new(vec![InvokeResponse::ok(json!(1))]));
        let result = client(invoker.clone())
            .call_for_result("datastore", json!({ "a": 1 }))
            .await
            .unwrap();

        assert_eq!(result, json!(1));
        let request = invoker.request(0).unwrap();
        assert_eq!(request.name, "testpackage/datastore");
        assert!(request.blocking);
        assert_eq!(request.params["a"], 1);
    }

    #[tokio::test]
    async fn cast_does_not_block() {
        let invoker = Arc::new(ScriptedInvoker::always(InvokeResponse::new(202, Default::default())));
        client(invoker.clone()).cast("logger", json!({})).await.unwrap();
        assert!(!invoker.request(0).unwrap().blocking);
    }

    #[tokio::test]
    async fn non_success_is_invalid_result() {
        let invoker = Arc::new(ScriptedInvoker::new(vec![InvokeResponse::with_field(
            500,
            "error",
            json!({ "message": "down" }),
        )]));
        let err = client(invoker).call_for_result("core-output", json!({})).await.unwrap_err();
        match err {
            ActionError::InvalidResult {
                action,
                status_code,
                result,
            } => {
                assert_eq!(action, "testpackage/core-output");
                assert_eq!(status_code, 500);
                assert_eq!(result["error"]["message"], "down");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn remote_failure_defaults_message() {
        let invoker = Arc::new(ScriptedInvoker::new(vec![]));
        let err = client(invoker).remote_failure("datastore", &InvokeResponse::new(500, Default::default()));
        assert!(err.to_string().contains("testpackage/datastore"));
    }
}
