//! Field-level validation violations.

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

/// The rule a field failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rule {
    /// The field must be present and not null
    Required,
    /// The field must be a string
    String,
    /// The field must be an object
    Object,
}

impl Rule {
    /// Human-readable description, phrased to follow the field path.
    pub fn description(&self) -> &'static str {
        match self {
            Rule::Required => "is required",
            Rule::String => "must be a string",
            Rule::Object => "must be an object",
        }
    }
}

/// One failed rule at one field path.
///
/// `path` is dotted (`conversationcontext.user._id`); the payload root has an
/// empty path. Serializes as `{path, rule, message}`, `message` being the
/// display text.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Violation {
    pub path: String,
    pub rule: Rule,
}

impl Violation {
    pub fn new(path: impl Into<String>, rule: Rule) -> Self {
        Self {
            path: path.into(),
            rule,
        }
    }

    /// The rule description, without the path.
    pub fn description(&self) -> &'static str {
        self.rule.description()
    }
}

impl Serialize for Violation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Violation", 3)?;
        state.serialize_field("path", &self.path)?;
        state.serialize_field("rule", &self.rule)?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let path = if self.path.is_empty() {
            "payload"
        } else {
            self.path.as_str()
        };
        write!(f, "{} {}", path, self.rule.description())
    }
}
