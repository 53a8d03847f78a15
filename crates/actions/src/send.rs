//! Outbound messages through the `core-output` action.

use chatwhisk_core::{ActionError, Payload};
use serde_json::{Map, Value};

use crate::SharedPayload;
use crate::client::ActionClient;

const OUTPUT_ACTION: &str = "core-output";

/// Turns an intent and its context into a channel message for the current
/// turn. The output action answers with the updated payload, which replaces
/// the turn's payload.
#[derive(Clone)]
pub struct Sender {
    client: ActionClient,
    turn: SharedPayload,
}

impl Sender {
    pub fn new(client: ActionClient, turn: SharedPayload) -> Self {
        Self { client, turn }
    }

    pub async fn send(&self, intent: &str, context: Value) -> Result<Value, ActionError> {
        self.send_with(intent, context, Map::new()).await
    }

    /// Like [`Sender::send`], with extra parameters for the output action.
    /// `payload`, `intent` and `context` always win over same-named extras.
    pub async fn send_with(
        &self,
        intent: &str,
        context: Value,
        output_params: Map<String, Value>,
    ) -> Result<Value, ActionError> {
        let mut params = output_params;
        let payload = self.turn.read().await.clone();
        params.insert("payload".into(), payload.into());
        params.insert("intent".into(), Value::String(intent.to_string()));
        params.insert("context".into(), context);

        let result = self
            .client
            .call_for_result(OUTPUT_ACTION, Value::Object(params))
            .await?;

        *self.turn.write().await = Payload::new(result.clone());
        tracing::debug!(intent, "Output sent");
        Ok(result)
    }
}
