//! Document store access through the `datastore` action.
//!
//! The datastore action takes `{operation, doc | id | selector, rev}` and
//! answers with the affected document(s) as `result`. Failures are passed
//! through with the action's own `error.message` and `error.cause`.

use chatwhisk_core::ActionError;
use serde_json::{Map, Value, json};

use crate::client::ActionClient;

const DATASTORE_ACTION: &str = "datastore";

/// What to read: one document by id, or every document matching a selector.
#[derive(Debug, Clone, PartialEq)]
pub enum ReadTarget {
    Id(String),
    Selector(Value),
}

impl From<&str> for ReadTarget {
    fn from(id: &str) -> Self {
        ReadTarget::Id(id.to_string())
    }
}

impl From<String> for ReadTarget {
    fn from(id: String) -> Self {
        ReadTarget::Id(id)
    }
}

impl From<Value> for ReadTarget {
    fn from(selector: Value) -> Self {
        ReadTarget::Selector(selector)
    }
}

/// What to delete: a document id and, optionally, the revision to delete.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteTarget {
    pub id: String,
    pub rev: Option<String>,
}

impl From<&str> for DeleteTarget {
    fn from(id: &str) -> Self {
        Self {
            id: id.to_string(),
            rev: None,
        }
    }
}

impl From<(&str, &str)> for DeleteTarget {
    fn from((id, rev): (&str, &str)) -> Self {
        Self {
            id: id.to_string(),
            rev: Some(rev.to_string()),
        }
    }
}

impl DeleteTarget {
    /// Target a stored document by its `_id` and `_rev` fields.
    pub fn from_doc(doc: &Value) -> Option<Self> {
        Some(Self {
            id: doc.get("_id")?.as_str()?.to_string(),
            rev: doc.get("_rev").and_then(Value::as_str).map(str::to_string),
        })
    }
}

/// Create/read/update/delete on the remote document store.
#[derive(Clone)]
pub struct Datastore {
    client: ActionClient,
}

impl Datastore {
    pub fn new(client: ActionClient) -> Self {
        Self { client }
    }

    /// Store a new document; returns it with its assigned `_id`.
    pub async fn create(&self, doc: Value) -> Result<Value, ActionError> {
        self.run(json!({ "operation": "create", "doc": doc })).await
    }

    /// Read one document by id (`"1234"`) or all documents matching a
    /// selector (`json!({"type": "configuration"})`).
    pub async fn read(&self, target: impl Into<ReadTarget>) -> Result<Value, ActionError> {
        let params = match target.into() {
            ReadTarget::Id(id) => json!({ "operation": "read", "id": id }),
            ReadTarget::Selector(selector) => json!({ "operation": "read", "selector": selector }),
        };
        self.run(params).await
    }

    /// Replace a stored document (identified by its `_id`).
    pub async fn update(&self, doc: Value) -> Result<Value, ActionError> {
        self.run(json!({ "operation": "update", "doc": doc })).await
    }

    /// Delete a document; `rev` is only sent when given.
    pub async fn delete(&self, target: impl Into<DeleteTarget>) -> Result<Value, ActionError> {
        let target = target.into();
        let mut params = Map::new();
        params.insert("operation".into(), json!("delete"));
        params.insert("id".into(), json!(target.id));
        if let Some(rev) = target.rev {
            params.insert("rev".into(), json!(rev));
        }
        self.run(Value::Object(params)).await
    }

    async fn run(&self, params: Value) -> Result<Value, ActionError> {
        let response = self.client.call(DATASTORE_ACTION, params).await?;
        if response.is_success() {
            Ok(response.into_result())
        } else {
            Err(self.client.remote_failure(DATASTORE_ACTION, &response))
        }
    }
}
