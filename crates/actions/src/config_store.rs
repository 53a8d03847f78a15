//! Configuration values backed by the environment and the datastore.
//!
//! A key is answered from the action's own configuration first. Otherwise it
//! is looked up as a `configuration` document tagged `config/<key>`.

use chatwhisk_config::HelperConfig;
use chatwhisk_core::ActionError;
use serde_json::{Value, json};
use std::sync::Arc;

use crate::datastore::Datastore;

const DOC_TYPE: &str = "configuration";

fn selector(key: &str) -> Value {
    json!({ "type": DOC_TYPE, "tag": format!("config/{key}") })
}

fn first_document(read: Value) -> Option<Value> {
    match read {
        Value::Array(docs) => docs.into_iter().next(),
        Value::Object(_) => Some(read),
        _ => None,
    }
}

#[derive(Clone)]
pub struct ConfigStore {
    config: Arc<HelperConfig>,
    datastore: Datastore,
}

impl ConfigStore {
    pub fn new(config: Arc<HelperConfig>, datastore: Datastore) -> Self {
        Self { config, datastore }
    }

    /// Resolve `key`: configuration, then datastore, then `default`.
    ///
    /// Fails with [`ActionError::ConfigNotFound`] when nothing is found and no
    /// default is given.
    pub async fn get(&self, key: &str, default: Option<Value>) -> Result<Value, ActionError> {
        if let Some(value) = self.config.lookup(key) {
            return Ok(value);
        }

        let stored = first_document(self.datastore.read(selector(key)).await?)
            .and_then(|mut doc| doc.get_mut("value").map(Value::take));

        match stored.or(default) {
            Some(value) => Ok(value),
            None => {
                tracing::debug!(key, "Configuration value not found");
                Err(ActionError::ConfigNotFound {
                    key: key.to_string(),
                })
            }
        }
    }

    /// Store `value` under `key`, updating the existing document if there is
    /// one. Returns the stored document.
    pub async fn set(&self, key: &str, value: Value) -> Result<Value, ActionError> {
        let existing = first_document(self.datastore.read(selector(key)).await?);

        match existing {
            Some(mut doc) if doc.is_object() => {
                doc["value"] = value;
                self.datastore.update(doc).await
            }
            _ => {
                let mut doc = selector(key);
                doc["value"] = value;
                self.datastore.create(doc).await
            }
        }
    }
}
