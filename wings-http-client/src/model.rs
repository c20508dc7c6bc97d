//! Wire model for the evaluation endpoints.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use wings_core::FlattenedContext;

/// Value type of a flag, selecting the evaluation endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Bool,
    Int,
    Float,
    String,
    Object,
}

impl ValueType {
    /// Endpoint path evaluating flags of this type.
    pub fn path(&self) -> &'static str {
        match self {
            Self::Bool => "/bool:evaluate",
            Self::Int => "/int:evaluate",
            Self::Float => "/float:evaluate",
            Self::String => "/string:evaluate",
            Self::Object => "/object:evaluate",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::String => "string",
            Self::Object => "object",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Evaluation request body: `{"id": ..., "meta": {...}}`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct EvaluationRequest<'a> {
    id: &'a str,
    meta: &'a FlattenedContext,
}

impl<'a> EvaluationRequest<'a> {
    pub fn new(id: &'a str, meta: &'a FlattenedContext) -> Self {
        Self { id, meta }
    }

    /// Flag key.
    pub fn id(&self) -> &'a str {
        self.id
    }

    /// Flattened evaluation context.
    pub fn meta(&self) -> &'a FlattenedContext {
        self.meta
    }
}

/// Typed value wrapper: `{"value": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypedValue<T> {
    pub value: T,
}

/// Evaluation response body.
///
/// Exactly one typed field is expected, matching the endpoint called.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResponse {
    pub variant: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bool: Option<TypedValue<bool>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub int: Option<TypedValue<i64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub float: Option<TypedValue<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub string: Option<TypedValue<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<TypedValue<Map<String, Value>>>,
}

impl EvaluationResponse {
    pub fn bool_value(&self) -> Option<bool> {
        self.bool.as_ref().map(|v| v.value)
    }

    pub fn int_value(&self) -> Option<i64> {
        self.int.as_ref().map(|v| v.value)
    }

    pub fn float_value(&self) -> Option<f64> {
        self.float.as_ref().map(|v| v.value)
    }

    pub fn into_string_value(self) -> Option<String> {
        self.string.map(|v| v.value)
    }

    /// Object value as JSON. Always a `Value::Object` when present.
    pub fn into_object_value(self) -> Option<Value> {
        self.object.map(|v| Value::Object(v.value))
    }
}
