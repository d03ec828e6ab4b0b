//! Activation conditions attached to schema fields.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Comparison operator of a condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionOp {
    Eq,
    Neq,
    In,
    NotIn,
    Gt,
    Lt,
    Gte,
    Lte,
    Exists,
    NotExists,
}

/// A boolean predicate over the full data tree.
///
/// `field` is a dot/bracket path resolved against the *root* record, never
/// a local subtree, so conditions can depend on anything collected so far.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub field: String,
    pub op: ConditionOp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl Condition {
    /// Creates a condition comparing a field against a value.
    pub fn new(field: impl Into<String>, op: ConditionOp, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            op,
            value: Some(value.into()),
        }
    }

    /// Creates a presence-only condition (`exists` / `not_exists`).
    pub fn presence(field: impl Into<String>, op: ConditionOp) -> Self {
        Self {
            field: field.into(),
            op,
            value: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn condition_op_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&ConditionOp::NotIn).unwrap(), "\"not_in\"");
        assert_eq!(serde_json::to_string(&ConditionOp::Gte).unwrap(), "\"gte\"");
    }

    #[test]
    fn condition_deserializes_wire_shape() {
        let cond: Condition = serde_json::from_value(json!({
            "field": "personal.marital_status",
            "op": "eq",
            "value": "married"
        }))
        .unwrap();
        assert_eq!(cond.field, "personal.marital_status");
        assert_eq!(cond.op, ConditionOp::Eq);
        assert_eq!(cond.value, Some(json!("married")));
    }
}
