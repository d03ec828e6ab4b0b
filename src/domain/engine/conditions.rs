//! Condition evaluation against the full data tree.

use serde_json::Value;
use std::cmp::Ordering;

use super::path::resolve_path;
use super::EngineError;
use crate::domain::schema::{Condition, ConditionOp};

/// Evaluates one condition against the root data tree.
///
/// `exists` is true iff the path resolves to a non-null value. For every
/// comparison operator, an unresolved path is `false` unconditionally:
/// absence never satisfies a comparison.
pub fn evaluate_condition(condition: &Condition, data: &Value) -> Result<bool, EngineError> {
    let resolved = resolve_path(data, &condition.field)?;
    let present = matches!(resolved, Some(v) if !v.is_null());

    if condition.op == ConditionOp::Exists {
        return Ok(present);
    }
    if condition.op == ConditionOp::NotExists {
        return Ok(!present);
    }

    let Some(value) = resolved else {
        return Ok(false);
    };
    let expected = condition.value.as_ref().unwrap_or(&Value::Null);

    let satisfied = match condition.op {
        ConditionOp::Eq => values_equal(value, expected),
        ConditionOp::Neq => !values_equal(value, expected),
        ConditionOp::In => is_member(value, expected),
        ConditionOp::NotIn => !is_member(value, expected),
        ConditionOp::Gt => matches!(compare_values(value, expected), Some(Ordering::Greater)),
        ConditionOp::Lt => matches!(compare_values(value, expected), Some(Ordering::Less)),
        ConditionOp::Gte => matches!(
            compare_values(value, expected),
            Some(Ordering::Greater | Ordering::Equal)
        ),
        ConditionOp::Lte => matches!(
            compare_values(value, expected),
            Some(Ordering::Less | Ordering::Equal)
        ),
        ConditionOp::Exists | ConditionOp::NotExists => present,
    };
    Ok(satisfied)
}

/// Conjunction over a condition list; an empty list is vacuously true.
pub fn evaluate_conditions(conditions: &[Condition], data: &Value) -> Result<bool, EngineError> {
    for condition in conditions {
        if !evaluate_condition(condition, data)? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Value equality with numeric widening: integer `5` equals float `5.0`.
pub(crate) fn values_equal(left: &Value, right: &Value) -> bool {
    match (left.as_f64(), right.as_f64()) {
        (Some(l), Some(r)) => l == r,
        _ => left == right,
    }
}

/// Membership in an expected list; a non-list expected value has no members.
fn is_member(value: &Value, expected: &Value) -> bool {
    expected
        .as_array()
        .map(|list| list.iter().any(|candidate| values_equal(value, candidate)))
        .unwrap_or(false)
}

/// Ordering for numbers (widened to f64) and strings; `None` otherwise.
fn compare_values(left: &Value, right: &Value) -> Option<Ordering> {
    if let (Some(l), Some(r)) = (left.as_f64(), right.as_f64()) {
        return l.partial_cmp(&r);
    }
    if let (Some(l), Some(r)) = (left.as_str(), right.as_str()) {
        return Some(l.cmp(r));
    }
    None
}
