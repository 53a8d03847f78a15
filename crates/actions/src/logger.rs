//! Remote logging through the `logger` action.
//!
//! Messages below the configured level are dropped locally: no action is
//! invoked and a lazily built message is never computed.

use chatwhisk_config::LogLevel;
use chatwhisk_core::{ActionError, InvokeResponse};
use serde_json::{Value, json};

use crate::SharedPayload;
use crate::client::ActionClient;

const LOGGER_ACTION: &str = "logger";

/// A log message: plain text, text computed only if it will be sent, or a
/// JSON value sent pretty-printed.
pub enum LogMessage {
    Text(String),
    Lazy(Box<dyn FnOnce() -> String + Send>),
    Structured(Value),
}

impl LogMessage {
    pub fn lazy(f: impl FnOnce() -> String + Send + 'static) -> Self {
        LogMessage::Lazy(Box::new(f))
    }

    fn render(self) -> String {
        match self {
            LogMessage::Text(text) => text,
            LogMessage::Lazy(f) => f(),
            LogMessage::Structured(value) => {
                serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())
            }
        }
    }
}

impl std::fmt::Debug for LogMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogMessage::Text(text) => f.debug_tuple("Text").field(text).finish(),
            LogMessage::Lazy(_) => f.write_str("Lazy(..)"),
            LogMessage::Structured(value) => f.debug_tuple("Structured").field(value).finish(),
        }
    }
}

impl From<&str> for LogMessage {
    fn from(text: &str) -> Self {
        LogMessage::Text(text.to_string())
    }
}

impl From<String> for LogMessage {
    fn from(text: String) -> Self {
        LogMessage::Text(text)
    }
}

impl From<Value> for LogMessage {
    fn from(value: Value) -> Self {
        LogMessage::Structured(value)
    }
}

/// What happened to a log call.
#[derive(Debug, Clone, PartialEq)]
pub enum LogOutcome {
    /// The logger action was invoked
    Sent(InvokeResponse),
    /// The message level is below the configured threshold
    Suppressed { level: LogLevel, threshold: LogLevel },
}

impl LogOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, LogOutcome::Sent(_))
    }

    pub fn describe(&self) -> String {
        match self {
            LogOutcome::Sent(response) => format!("Sent (status: {})", response.status_code),
            LogOutcome::Suppressed { level, threshold } => format!(
                "Message log level '{level}' below configured log level '{threshold}'."
            ),
        }
    }
}

/// Leveled logger forwarding to the remote logger action, tagged with the
/// current turn payload.
#[derive(Clone)]
pub struct RemoteLogger {
    client: ActionClient,
    threshold: LogLevel,
    turn: SharedPayload,
}

impl RemoteLogger {
    pub fn new(client: ActionClient, threshold: LogLevel, turn: SharedPayload) -> Self {
        Self {
            client,
            threshold,
            turn,
        }
    }

    pub fn threshold(&self) -> LogLevel {
        self.threshold
    }

    pub async fn log(
        &self,
        level: LogLevel,
        message: impl Into<LogMessage>,
    ) -> Result<LogOutcome, ActionError> {
        if level < self.threshold {
            return Ok(LogOutcome::Suppressed {
                level,
                threshold: self.threshold,
            });
        }

        let payload = self.turn.read().await.clone();
        let params = json!({
            "level": level,
            "message": message.into().render(),
            "payload": payload,
            "timestamp": chrono::Utc::now().to_rfc3339(),
        });
        let response = self.client.cast(LOGGER_ACTION, params).await?;
        Ok(LogOutcome::Sent(response))
    }

    pub async fn debug(&self, message: impl Into<LogMessage>) -> Result<LogOutcome, ActionError> {
        self.log(LogLevel::Debug, message).await
    }

    pub async fn info(&self, message: impl Into<LogMessage>) -> Result<LogOutcome, ActionError> {
        self.log(LogLevel::Info, message).await
    }

    pub async fn warn(&self, message: impl Into<LogMessage>) -> Result<LogOutcome, ActionError> {
        self.log(LogLevel::Warn, message).await
    }

    pub async fn error(&self, message: impl Into<LogMessage>) -> Result<LogOutcome, ActionError> {
        self.log(LogLevel::Error, message).await
    }
}
