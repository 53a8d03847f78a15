//! Declarative shape rules over JSON values.
//!
//! Rules are declared inside closures that mirror the nesting of the checked
//! object. Violations are collected in declaration order, depth first; the
//! rules of a nested object only run when that object is present.

use chatwhisk_core::{Rule, Violation};
use serde_json::{Map, Value};

/// Anything that can produce a list of violations.
pub trait Validator {
    fn run(&self) -> Vec<Violation>;
}

impl<F> Validator for F
where
    F: Fn() -> Vec<Violation>,
{
    fn run(&self) -> Vec<Violation> {
        self()
    }
}

/// Validates that a value is an object and applies field rules to it.
pub struct ObjectShape<'v, R> {
    value: &'v Value,
    rules: R,
}

impl<'v, R> ObjectShape<'v, R>
where
    R: Fn(&mut Fields<'_>),
{
    pub fn new(value: &'v Value, rules: R) -> Self {
        Self { value, rules }
    }
}

impl<R> Validator for ObjectShape<'_, R>
where
    R: Fn(&mut Fields<'_>),
{
    fn run(&self) -> Vec<Violation> {
        let mut violations = Vec::new();
        match self.value.as_object() {
            Some(map) => {
                let mut fields = Fields {
                    map,
                    path: String::new(),
                    violations: &mut violations,
                };
                (self.rules)(&mut fields);
            }
            None => violations.push(Violation::new("", Rule::Object)),
        }
        violations
    }
}

/// The fields of one object under validation.
///
/// A field holding `null` counts as absent.
pub struct Fields<'a> {
    map: &'a Map<String, Value>,
    path: String,
    violations: &'a mut Vec<Violation>,
}

impl<'a> Fields<'a> {
    /// Dotted path of this object (empty at the root).
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The field must be present, with any type.
    pub fn required(&mut self, key: &str) {
        if self.present(key).is_none() {
            self.reject(key, Rule::Required);
        }
    }

    /// The field must be present and a string.
    pub fn required_string(&mut self, key: &str) {
        let failed = match self.present(key) {
            None => Some(Rule::Required),
            Some(value) if !value.is_string() => Some(Rule::String),
            Some(_) => None,
        };
        if let Some(rule) = failed {
            self.reject(key, rule);
        }
    }

    /// If present, the field must be a string.
    pub fn optional_string(&mut self, key: &str) {
        if self.present(key).is_some_and(|value| !value.is_string()) {
            self.reject(key, Rule::String);
        }
    }

    /// The field must be an object; `rules` then apply to its fields.
    pub fn required_object(&mut self, key: &str, rules: impl FnOnce(&mut Fields<'_>)) {
        match self.present(key) {
            None => self.reject(key, Rule::Required),
            Some(value) => self.nested(key, value, rules),
        }
    }

    /// If present, the field must be an object; `rules` then apply to its fields.
    pub fn optional_object(&mut self, key: &str, rules: impl FnOnce(&mut Fields<'_>)) {
        if let Some(value) = self.present(key) {
            self.nested(key, value, rules);
        }
    }

    fn nested(&mut self, key: &str, value: &'a Value, rules: impl FnOnce(&mut Fields<'_>)) {
        match value.as_object() {
            Some(map) => {
                let mut fields = Fields {
                    map,
                    path: self.child_path(key),
                    violations: &mut *self.violations,
                };
                rules(&mut fields);
            }
            None => self.reject(key, Rule::Object),
        }
    }

    fn present(&self, key: &str) -> Option<&'a Value> {
        self.map.get(key).filter(|value| !value.is_null())
    }

    fn reject(&mut self, key: &str, rule: Rule) {
        let path = self.child_path(key);
        self.violations.push(Violation::new(path, rule));
    }

    fn child_path(&self, key: &str) -> String {
        if self.path.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", self.path, key)
        }
    }
}
