//! Conversation-context persistence through the core context actions.

use chatwhisk_core::{ActionError, Payload};
use serde_json::json;

use crate::client::ActionClient;

const PERSIST_ACTION: &str = "core-persistcontext";
const LOAD_ACTION: &str = "core-loadcontext";

#[derive(Clone)]
pub struct ContextStore {
    client: ActionClient,
}

impl ContextStore {
    pub fn new(client: ActionClient) -> Self {
        Self { client }
    }

    /// Store the turn's conversation context; returns the action's result.
    pub async fn persist(&self, payload: &Payload) -> Result<serde_json::Value, ActionError> {
        self.client
            .call_for_result(PERSIST_ACTION, json!({ "payload": payload }))
            .await
    }

    /// Fetch the stored conversation context for the turn's user.
    ///
    /// Returns the payload as enriched by the load action.
    pub async fn load(&self, payload: &Payload) -> Result<Payload, ActionError> {
        let result = self
            .client
            .call_for_result(LOAD_ACTION, json!({ "payload": payload }))
            .await?;
        Ok(Payload::new(result))
    }
}
