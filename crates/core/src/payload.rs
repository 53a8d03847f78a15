//! The per-turn payload threaded through the bot pipeline.
//!
//! A payload is constructed once per conversation turn, mutated in place as
//! the turn advances through its stages, and dropped after the response is
//! sent. Its shape is only known at runtime, so it is kept as JSON and
//! checked by the stage validator rather than by the type system.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// A conversation-turn payload.
///
/// Well-known top-level fields:
/// - `id`: turn identifier
/// - `input`: `channel`, `user`, `message`
/// - `conversationcontext`: per-user state (`user._id`, `user.<channel>_id`, `user.locale`)
/// - `messagecontext`: free-form scratch data
/// - `output`: `channel`, `user`, `intent`, `locale`, `context`, `message`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payload(Value);

impl Payload {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// An empty object payload.
    pub fn empty() -> Self {
        Self(Value::Object(Map::new()))
    }

    /// Start a new turn from an inbound channel message, with a fresh id.
    pub fn for_input(
        channel: impl Into<String>,
        user: impl Into<String>,
        message: impl Into<Value>,
    ) -> Self {
        Self(serde_json::json!({
            "id": Uuid::new_v4().to_string(),
            "input": {
                "channel": channel.into(),
                "user": user.into(),
                "message": message.into(),
            }
        }))
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    /// The turn id, if present and a string.
    pub fn id(&self) -> Option<&str> {
        self.get_str("id")
    }

    pub fn input_channel(&self) -> Option<&str> {
        self.get_str("input.channel")
    }

    pub fn output_channel(&self) -> Option<&str> {
        self.get_str("output.channel")
    }

    /// Look up a value by dotted path (`conversationcontext.user._id`).
    pub fn get(&self, path: &str) -> Option<&Value> {
        get_path(&self.0, path)
    }

    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(Value::as_str)
    }

    /// Set a value by dotted path, creating (or replacing non-object)
    /// intermediate levels as objects.
    pub fn set(&mut self, path: &str, value: Value) {
        set_path(&mut self.0, path, value);
    }
}

impl Default for Payload {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl From<Payload> for Value {
    fn from(payload: Payload) -> Self {
        payload.0
    }
}

/// Name of the channel-specific identity field in `conversationcontext.user`.
///
/// `"facebook"` links through `facebook_id`, `"sms"` through `sms_id`.
pub fn linkage_field_for(channel: &str) -> String {
    format!("{channel}_id")
}

/// Dotted-path lookup into a JSON value. An empty path is the value itself.
pub fn get_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(value);
    }
    path.split('.')
        .try_fold(value, |current, key| current.as_object()?.get(key))
}

/// Dotted-path assignment into a JSON value.
pub fn set_path(value: &mut Value, path: &str, new_value: Value) {
    if path.is_empty() {
        *value = new_value;
        return;
    }

    let mut current = value;
    let mut segments = path.split('.').peekable();
    while let Some(key) = segments.next() {
        if !current.is_object() {
            *current = Value::Object(Map::new());
        }
        let Some(map) = current.as_object_mut() else {
            return;
        };
        if segments.peek().is_none() {
            map.insert(key.to_string(), new_value);
            return;
        }
        current = map
            .entry(key.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
    }
}
