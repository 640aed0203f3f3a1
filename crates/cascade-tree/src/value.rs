//! Scalar values carried by tree nodes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A dynamically typed scalar value attached to a node.
///
/// The tree itself never interprets values. Combiners compare them for
/// equality when deciding whether two attributes agree, and downstream
/// accessor code converts them to whatever type it expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeValue {
    /// String value
    Str(String),

    /// Integer value
    Int(i64),

    /// Floating point value
    Float(f64),

    /// Boolean value
    Bool(bool),

    /// Explicit null (distinct from "no value at all")
    Null,
}

impl NodeValue {
    /// Get the string content if this is a `Str` value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            NodeValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Get the integer content if this is an `Int` value.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            NodeValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Get the float content if this is a `Float` value.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            NodeValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Get the boolean content if this is a `Bool` value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            NodeValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Check whether this is the explicit `Null` value.
    pub fn is_null(&self) -> bool {
        matches!(self, NodeValue::Null)
    }
}

impl fmt::Display for NodeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeValue::Str(s) => write!(f, "{}", s),
            NodeValue::Int(i) => write!(f, "{}", i),
            NodeValue::Float(x) => write!(f, "{}", x),
            NodeValue::Bool(b) => write!(f, "{}", b),
            NodeValue::Null => write!(f, "null"),
        }
    }
}

impl From<&str> for NodeValue {
    fn from(s: &str) -> Self {
        NodeValue::Str(s.to_string())
    }
}

impl From<String> for NodeValue {
    fn from(s: String) -> Self {
        NodeValue::Str(s)
    }
}

impl From<i64> for NodeValue {
    fn from(i: i64) -> Self {
        NodeValue::Int(i)
    }
}

impl From<f64> for NodeValue {
    fn from(f: f64) -> Self {
        NodeValue::Float(f)
    }
}

impl From<bool> for NodeValue {
    fn from(b: bool) -> Self {
        NodeValue::Bool(b)
    }
}
