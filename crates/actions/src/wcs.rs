//! Bridge to third-party conversation services via `middleware-wcs`.
//!
//! Each named service keeps its state under `wcs__<service>` in the turn's
//! `conversationcontext` (persisted) and `context` (per turn, including the
//! service's reply message).

use chatwhisk_config::HelperConfig;
use chatwhisk_core::ActionError;
use serde_json::{Value, json};
use std::sync::Arc;

use crate::SharedPayload;
use crate::client::ActionClient;

const BRIDGE_ACTION: &str = "middleware-wcs";

fn context_key(service: &str) -> String {
    format!("wcs__{service}")
}

#[derive(Clone)]
pub struct ConversationBridge {
    client: ActionClient,
    config: Arc<HelperConfig>,
    turn: SharedPayload,
}

impl ConversationBridge {
    pub fn new(client: ActionClient, config: Arc<HelperConfig>, turn: SharedPayload) -> Self {
        Self {
            client,
            config,
            turn,
        }
    }

    /// Run the turn through the conversation service configured under
    /// `conversation.workspaces.<service>` and return its trimmed reply.
    pub async fn call_by_name(&self, service: &str) -> Result<String, ActionError> {
        let workspace = self
            .config
            .workspace(service)
            .ok_or_else(|| ActionError::UnknownWorkspace {
                service: service.to_string(),
            })?;

        let key = context_key(service);
        let params = json!({
            "config": self.config.as_ref(),
            "payload": self.turn.read().await.clone(),
            "workspace": workspace,
            "contextpath": key,
            "messagepath": format!("context.{key}.message"),
        });

        let response = self.client.call(BRIDGE_ACTION, params).await?;
        if !response.is_success() {
            return Err(self.client.remote_failure(BRIDGE_ACTION, &response));
        }

        let returned = response.get("payload").cloned().unwrap_or(Value::Null);
        let conversation_path = format!("conversationcontext.{key}");
        let context_path = format!("context.{key}");
        let message_path = format!("context.{key}.message");

        let mut turn = self.turn.write().await;
        for path in [&conversation_path, &context_path] {
            if let Some(value) = chatwhisk_core::payload::get_path(&returned, path) {
                turn.set(path, value.clone());
            }
        }
        let message = turn.get_str(&message_path).unwrap_or_default().trim().to_string();
        turn.set(&message_path, Value::String(message.clone()));

        tracing::debug!(service, workspace, "Conversation service replied");
        Ok(message)
    }
}
