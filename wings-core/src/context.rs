//! Evaluation context.
//!
//! Providers consume a [`FlattenedContext`]: a flat map of attribute name to
//! JSON value. [`EvaluationContext`] is a convenience builder that produces one.

use serde_json::Value;
use std::collections::HashMap;

/// Attribute name under which the targeting key is flattened.
pub const TARGETING_KEY: &str = "targetingKey";

/// Flattened evaluation context sent to the flag service.
pub type FlattenedContext = HashMap<String, Value>;

/// Evaluation context (targeting key plus request attributes)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvaluationContext {
    targeting_key: Option<String>,
    attributes: HashMap<String, Value>,
}

impl EvaluationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_targeting_key(mut self, key: impl Into<String>) -> Self {
        self.targeting_key = Some(key.into());
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn targeting_key(&self) -> Option<&str> {
        self.targeting_key.as_deref()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// Flatten into the attribute map consumed by providers.
    ///
    /// The targeting key, when set, wins over an attribute of the same name.
    pub fn flatten(&self) -> FlattenedContext {
        let mut flattened = self.attributes.clone();
        if let Some(key) = &self.targeting_key {
            flattened.insert(TARGETING_KEY.to_string(), Value::String(key.clone()));
        }
        flattened
    }
}

impl From<EvaluationContext> for FlattenedContext {
    fn from(context: EvaluationContext) -> Self {
        context.flatten()
    }
}
