//! Validation rules attached to schema fields.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// The kind of check a validation rule performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleType {
    /// Value must be present and non-empty.
    Required,
    /// Numeric lower bound (inclusive).
    Min,
    /// Numeric upper bound (inclusive).
    Max,
    /// Minimum string length.
    MinLength,
    /// Maximum string length.
    MaxLength,
    /// Regex search against string values.
    Pattern,
    /// Value must be a member of an explicit list.
    OneOf,
}

impl fmt::Display for RuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RuleType::Required => "required",
            RuleType::Min => "min",
            RuleType::Max => "max",
            RuleType::MinLength => "min_length",
            RuleType::MaxLength => "max_length",
            RuleType::Pattern => "pattern",
            RuleType::OneOf => "one_of",
        };
        write!(f, "{}", s)
    }
}

/// One validation rule on a field.
///
/// `param` is rule-dependent: a number for `min`/`max`, an integer for the
/// length rules, a regex string for `pattern`, a list for `one_of`, and
/// unused for `required`. `message` overrides the default error text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationRule {
    #[serde(rename = "type")]
    pub rule_type: RuleType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub param: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ValidationRule {
    /// Creates a rule with no parameter.
    pub fn new(rule_type: RuleType) -> Self {
        Self {
            rule_type,
            param: None,
            message: None,
        }
    }

    /// Creates a `required` rule.
    pub fn required() -> Self {
        Self::new(RuleType::Required)
    }

    /// Creates a rule with a parameter.
    pub fn with_param(rule_type: RuleType, param: impl Into<Value>) -> Self {
        Self {
            rule_type,
            param: Some(param.into()),
            message: None,
        }
    }

    /// Sets a custom error message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}
