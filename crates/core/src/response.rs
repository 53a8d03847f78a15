//! Normalizing errors into action responses.
//!
//! An action that fails still answers with `{statusCode, error}` so the
//! calling action (or the web front door) can report it. `default_error_handler`
//! maps every error in the workspace onto that shape.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ActionError, Error, ValidationError};

/// `{ statusCode, error: { message, cause? } }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub error: ErrorBody,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cause: Option<Value>,
}

impl ErrorResponse {
    pub fn new(status_code: u16, message: impl Into<String>, cause: Option<Value>) -> Self {
        Self {
            status_code,
            error: ErrorBody {
                message: message.into(),
                cause,
            },
        }
    }

    fn internal(cause: impl std::fmt::Display) -> Self {
        Self::new(500, "Internal Server Error", Some(Value::String(cause.to_string())))
    }
}

/// Map an error onto the response an action should answer with.
pub fn default_error_handler(error: &Error) -> ErrorResponse {
    match error {
        Error::Validation(err) => validation_response(err),
        Error::Action(err) => action_response(err),
        Error::Config { .. } | Error::Serialization(_) | Error::Internal(_) => {
            ErrorResponse::internal(error)
        }
    }
}

fn validation_response(err: &ValidationError) -> ErrorResponse {
    match err {
        ValidationError::InvalidStage { .. } => ErrorResponse::new(400, err.to_string(), None),
        ValidationError::Failed {
            message,
            violations,
        } => ErrorResponse::new(400, message.clone(), serde_json::to_value(violations).ok()),
    }
}

fn action_response(err: &ActionError) -> ErrorResponse {
    match err {
        ActionError::InvalidResult { action, result, .. } => ErrorResponse::new(
            503,
            ActionError::invalid_result_message(action),
            Some(serde_json::json!({ "result": result })),
        ),
        ActionError::Remote {
            status_code,
            message,
            cause,
            ..
        } => {
            let status = if *status_code >= 400 { *status_code } else { 500 };
            ErrorResponse::new(status, message.clone(), cause.clone())
        }
        ActionError::ConfigNotFound { .. } => ErrorResponse::new(404, err.to_string(), None),
        ActionError::UnknownWorkspace { .. } | ActionError::Transport(_) => {
            ErrorResponse::internal(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::violation::{Rule, Violation};
    use serde_json::json;

    #[test]
    fn validation_failure_is_a_client_error_with_violations() {
        let err = Error::Validation(ValidationError::failed(
            None,
            vec![Violation::new("input.channel", Rule::Required)],
        ));
        let response = default_error_handler(&err);
        assert_eq!(response.status_code, 400);
        assert_eq!(response.error.message, "Action parameters are invalid");
        assert_eq!(
            response.error.cause,
            Some(json!([{
                "path": "input.channel",
                "rule": "required",
                "message": "input.channel is required"
            }]))
        );
    }

    #[test]
    fn invalid_result_is_service_unavailable() {
        let err = Error::Action(ActionError::InvalidResult {
            action: "core-persistcontext".into(),
            status_code: 500,
            result: json!({ "statusCode": 500 }),
        });
        let response = default_error_handler(&err);
        assert_eq!(response.status_code, 503);
        assert_eq!(
            response.error.message,
            "The core-persistcontext action did not respond with a valid result."
        );
    }

    #[test]
    fn remote_error_keeps_its_status_and_cause() {
        let err = Error::Action(ActionError::Remote {
            action: "datastore".into(),
            status_code: 409,
            message: "conflict".into(),
            cause: Some(json!({ "rev": "1-abc" })),
        });
        let response = default_error_handler(&err);
        assert_eq!(response.status_code, 409);
        assert_eq!(response.error.cause.unwrap()["rev"], "1-abc");
    }

    #[test]
    fn unstructured_errors_become_internal_server_errors() {
        let response = default_error_handler(&Error::Internal("boom".into()));
        assert_eq!(response.status_code, 500);
        assert_eq!(response.error.message, "Internal Server Error");
        assert_eq!(response.error.cause, Some(json!("Internal error: boom")));
    }

    #[test]
    fn error_response_serializes_status_code_camel_case() {
        let json = serde_json::to_value(ErrorResponse::new(400, "bad", None)).unwrap();
        assert_eq!(json, json!({ "statusCode": 400, "error": { "message": "bad" } }));
    }
}
