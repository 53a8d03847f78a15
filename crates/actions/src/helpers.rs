//! One entry point bundling every helper over a single turn.

use chatwhisk_config::{ConfigError, HelperConfig};
use chatwhisk_core::{ActionError, ActionInvoker, Payload, ValidationError};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::SharedPayload;
use crate::client::ActionClient;
use crate::config_store::ConfigStore;
use crate::context::ContextStore;
use crate::datastore::Datastore;
use crate::logger::RemoteLogger;
use crate::params::ActionParams;
use crate::send::Sender;
use crate::wcs::ConversationBridge;

/// Helpers for one action invocation.
///
/// Every helper shares the same invoker and the same turn payload, so a
/// payload replaced by [`Helpers::send`] is what the logger and the
/// conversation bridge see next.
#[derive(Clone)]
pub struct Helpers {
    config: Arc<HelperConfig>,
    client: ActionClient,
    turn: SharedPayload,
}

impl Helpers {
    pub fn new(params: ActionParams, invoker: Arc<dyn ActionInvoker>) -> Self {
        let client = ActionClient::new(invoker, params.config.openwhisk.clone());
        Self {
            config: Arc::new(params.config),
            client,
            turn: Arc::new(RwLock::new(params.payload)),
        }
    }

    /// Build helpers straight from raw action parameters.
    pub fn from_params(params: &Value, invoker: Arc<dyn ActionInvoker>) -> Result<Self, ConfigError> {
        Ok(Self::new(ActionParams::from_value(params)?, invoker))
    }

    /// The static configuration this invocation was started with.
    pub fn settings(&self) -> &HelperConfig {
        &self.config
    }

    pub fn config(&self) -> ConfigStore {
        ConfigStore::new(self.config.clone(), self.db())
    }

    pub fn context(&self) -> ContextStore {
        ContextStore::new(self.client.clone())
    }

    pub fn db(&self) -> Datastore {
        Datastore::new(self.client.clone())
    }

    pub fn log(&self) -> RemoteLogger {
        RemoteLogger::new(self.client.clone(), self.config.logger.level, self.turn.clone())
    }

    pub fn sender(&self) -> Sender {
        Sender::new(self.client.clone(), self.turn.clone())
    }

    /// Send `intent` with `context`; the output action's answer becomes the
    /// turn payload.
    pub async fn send(&self, intent: &str, context: Value) -> Result<Value, ActionError> {
        self.sender().send(intent, context).await
    }

    pub fn wcs(&self) -> ConversationBridge {
        ConversationBridge::new(self.client.clone(), self.config.clone(), self.turn.clone())
    }

    /// Handle to the shared turn payload.
    pub fn payload(&self) -> SharedPayload {
        self.turn.clone()
    }

    pub async fn snapshot(&self) -> Payload {
        self.turn.read().await.clone()
    }

    /// Replace the turn payload with the stored conversation context for
    /// its user.
    pub async fn load_context(&self) -> Result<(), ActionError> {
        let current = self.snapshot().await;
        let loaded = self.context().load(&current).await?;
        *self.turn.write().await = loaded;
        Ok(())
    }

    pub async fn persist_context(&self) -> Result<Value, ActionError> {
        let current = self.snapshot().await;
        self.context().persist(&current).await
    }

    /// Check the current payload against `stage` and return a copy of it.
    pub async fn validate_payload(&self, stage: &str) -> Result<Payload, ValidationError> {
        let turn = self.turn.read().await;
        chatwhisk_validate::validate_payload(&turn, stage).cloned()
    }
}
