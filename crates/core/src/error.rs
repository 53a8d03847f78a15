//! Error types for the chatwhisk domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use thiserror::Error;

use crate::violation::Violation;

/// The top-level error type for all chatwhisk operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Payload validation ---
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    // --- Remote action calls ---
    #[error("Action error: {0}")]
    Action(#[from] ActionError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Default message attached to a failed validation when the caller gives none.
pub const DEFAULT_VALIDATION_MESSAGE: &str = "Action parameters are invalid";

// --- Bounded context errors ---

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Invalid stage '{stage}', valid stages are 'INPUT', 'MIDDLEWARE', 'OUTPUT', 'STORE'")]
    InvalidStage { stage: String },

    #[error("{message}: {}", format_violations(.violations))]
    Failed {
        message: String,
        violations: Vec<Violation>,
    },
}

impl ValidationError {
    /// Build a `VALIDATION_FAILED` error, falling back to the default message.
    pub fn failed(message: Option<&str>, violations: Vec<Violation>) -> Self {
        Self::Failed {
            message: message.unwrap_or(DEFAULT_VALIDATION_MESSAGE).to_string(),
            violations,
        }
    }

    /// Stable error-kind name, independent of the message text.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidStage { .. } => "INVALID_STAGE",
            Self::Failed { .. } => "VALIDATION_FAILED",
        }
    }

    /// The field-level violations; empty for `INVALID_STAGE`.
    pub fn violations(&self) -> &[Violation] {
        match self {
            Self::InvalidStage { .. } => &[],
            Self::Failed { violations, .. } => violations,
        }
    }
}

fn format_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Error)]
pub enum ActionError {
    #[error("The {action} action did not respond with a valid result (status: {status_code})")]
    InvalidResult {
        action: String,
        status_code: u16,
        result: serde_json::Value,
    },

    #[error("Action {action} failed: {message} (status: {status_code})")]
    Remote {
        action: String,
        status_code: u16,
        message: String,
        cause: Option<serde_json::Value>,
    },

    #[error("No configuration value found for key '{key}' and no default given")]
    ConfigNotFound { key: String },

    #[error("No conversation workspace configured for service '{service}'")]
    UnknownWorkspace { service: String },

    #[error("Transport error: {0}")]
    Transport(String),
}

impl ActionError {
    /// Message used when a blocking action answers with a non-success status.
    pub fn invalid_result_message(action: &str) -> String {
        format!("The {action} action did not respond with a valid result.")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::violation::Rule;

    #[test]
    fn validation_error_kinds_are_stable() {
        let invalid = ValidationError::InvalidStage { stage: "FOO".into() };
        assert_eq!(invalid.kind(), "INVALID_STAGE");
        assert!(invalid.violations().is_empty());

        let failed = ValidationError::failed(None, vec![Violation::new("id", Rule::Required)]);
        assert_eq!(failed.kind(), "VALIDATION_FAILED");
        assert_eq!(failed.violations().len(), 1);
    }

    #[test]
    fn failed_error_lists_every_violation() {
        let err = ValidationError::failed(
            Some("Payload rejected"),
            vec![
                Violation::new("id", Rule::Required),
                Violation::new("input.channel", Rule::String),
            ],
        );
        let text = err.to_string();
        assert!(text.starts_with("Payload rejected"));
        assert!(text.contains("id is required"));
        assert!(text.contains("input.channel must be a string"));
    }

    #[test]
    fn invalid_result_names_the_action() {
        let err = Error::Action(ActionError::InvalidResult {
            action: "pkg/core-output".into(),
            status_code: 500,
            result: serde_json::json!({}),
        });
        assert!(err.to_string().contains("pkg/core-output"));
        assert!(err.to_string().contains("500"));
    }
}
