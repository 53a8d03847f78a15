//! OpenWhisk REST transport.
//!
//! Posts to `{api_host}/api/v1/namespaces/{namespace}/actions/{name}` with
//! basic auth and normalizes whatever comes back into an [`InvokeResponse`].

use async_trait::async_trait;
use chatwhisk_config::OpenWhiskConfig;
use chatwhisk_core::{ActionError, ActionInvoker, InvokeRequest, InvokeResponse};
use serde_json::{Value, json};
use tracing::trace;

pub struct OpenWhiskInvoker {
    api_host: String,
    namespace: String,
    credentials: Option<(String, String)>,
    client: reqwest::Client,
}

impl OpenWhiskInvoker {
    pub fn new(config: &OpenWhiskConfig) -> Result<Self, ActionError> {
        let api_host = config
            .api_host
            .as_deref()
            .ok_or_else(|| ActionError::Transport("openwhisk.api_host is not configured".into()))?;

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ActionError::Transport(e.to_string()))?;

        Ok(Self {
            api_host: api_host.trim_end_matches('/').to_string(),
            namespace: config.namespace.clone(),
            credentials: config
                .credentials()
                .map(|(user, key)| (user.to_string(), key.to_string())),
            client,
        })
    }

    fn action_url(&self, request: &InvokeRequest) -> String {
        format!(
            "{}/api/v1/namespaces/{}/actions/{}?blocking={}&result={}",
            self.api_host, self.namespace, request.name, request.blocking, request.result
        )
    }
}

/// Actions that answer `{statusCode, ...}` are taken at their word. Any other
/// body is wrapped as `result` or `error` according to the HTTP status.
fn normalize(status: u16, body: Value) -> InvokeResponse {
    if body.get("statusCode").is_some_and(Value::is_u64)
        && let Ok(response) = serde_json::from_value::<InvokeResponse>(body.clone())
    {
        return response;
    }

    if (200..300).contains(&status) {
        return InvokeResponse::with_field(status, "result", body);
    }

    let message = match &body {
        Value::String(text) => text.clone(),
        other => other
            .get("error")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("HTTP {status}")),
    };
    InvokeResponse::with_field(status, "error", json!({ "message": message, "cause": body }))
}

#[async_trait]
impl ActionInvoker for OpenWhiskInvoker {
    fn name(&self) -> &str {
        "openwhisk"
    }

    async fn invoke(&self, request: InvokeRequest) -> Result<InvokeResponse, ActionError> {
        let mut builder = self.client.post(self.action_url(&request)).json(&request.params);
        if let Some((user, key)) = &self.credentials {
            builder = builder.basic_auth(user, Some(key));
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ActionError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| ActionError::Transport(e.to_string()))?;
        trace!(action = %request.name, status, body = %text, "OpenWhisk response");

        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };
        Ok(normalize(status, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Json;
    use axum::Router;
    use axum::extract::{Path, Query};
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use std::collections::HashMap;

    async fn spawn_server() -> String {
        async fn handle(
            Path((namespace, name)): Path<(String, String)>,
            Query(query): Query<HashMap<String, String>>,
            headers: HeaderMap,
            Json(params): Json<Value>,
        ) -> (StatusCode, Json<Value>) {
            match name.as_str() {
                "pkg/echo" => (
                    StatusCode::OK,
                    Json(json!({
                        "statusCode": 200,
                        "result": {
                            "namespace": namespace,
                            "params": params,
                            "blocking": query.get("blocking"),
                            "authorized": headers.contains_key("authorization"),
                        }
                    })),
                ),
                "pkg/plain" => (StatusCode::OK, Json(json!({ "answer": 42 }))),
                "pkg/async" => (StatusCode::ACCEPTED, Json(json!({ "activationId": "abc" }))),
                _ => (
                    StatusCode::NOT_FOUND,
                    Json(json!({ "error": "The requested resource does not exist." })),
                ),
            }
        }

        let app = Router::new().route("/api/v1/namespaces/{namespace}/actions/{*name}", post(handle));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn invoker(api_host: String) -> OpenWhiskInvoker {
        OpenWhiskInvoker::new(&OpenWhiskConfig {
            api_host: Some(api_host),
            auth: Some("user:secret".into()),
            ..OpenWhiskConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn requires_api_host() {
        let err = OpenWhiskInvoker::new(&OpenWhiskConfig::default()).err().unwrap();
        assert!(matches!(err, ActionError::Transport(_)));
    }

    #[test]
    fn action_url_carries_flags() {
        let invoker = invoker("https://ow.example.com/".into());
        let url = invoker.action_url(&InvokeRequest::non_blocking("pkg/logger", json!({})));
        assert_eq!(
            url,
            "https://ow.example.com/api/v1/namespaces/_/actions/pkg/logger?blocking=false&result=false"
        );
    }

    #[tokio::test]
    async fn status_coded_result_passes_through() {
        let invoker = invoker(spawn_server().await);
        let response = invoker
            .invoke(InvokeRequest::blocking("pkg/echo", json!({ "a": 1 })))
            .await
            .unwrap();

        assert_eq!(response.status_code, 200);
        let result = response.result().unwrap();
        assert_eq!(result["namespace"], "_");
        assert_eq!(result["params"]["a"], 1);
        assert_eq!(result["blocking"], "true");
        assert_eq!(result["authorized"], true);
    }

    #[tokio::test]
    async fn plain_body_becomes_result() {
        let invoker = invoker(spawn_server().await);
        let response = invoker
            .invoke(InvokeRequest::blocking("pkg/plain", json!({})))
            .await
            .unwrap();
        assert!(response.is_success());
        assert_eq!(response.result().unwrap()["answer"], 42);
    }

    #[tokio::test]
    async fn accepted_activation_is_success() {
        let invoker = invoker(spawn_server().await);
        let response = invoker
            .invoke(InvokeRequest::non_blocking("pkg/async", json!({})))
            .await
            .unwrap();
        assert_eq!(response.status_code, 202);
        assert!(response.is_success());
    }

    #[tokio::test]
    async fn http_error_becomes_error_body() {
        let invoker = invoker(spawn_server().await);
        let response = invoker
            .invoke(InvokeRequest::blocking("pkg/missing", json!({})))
            .await
            .unwrap();
        assert_eq!(response.status_code, 404);
        assert_eq!(
            response.error_message(),
            Some("The requested resource does not exist.")
        );
    }

    #[tokio::test]
    async fn unreachable_host_is_transport_error() {
        let invoker = invoker("http://127.0.0.1:1".into());
        let err = invoker
            .invoke(InvokeRequest::blocking("pkg/echo", json!({})))
            .await
            .unwrap_err();
        assert!(matches!(err, ActionError::Transport(_)));
    }
}
