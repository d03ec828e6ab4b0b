//! Interview engine - the pure core of the crate.
//!
//! Path addressing, condition evaluation, schema flattening, active-field
//! resolution, validation, and completeness analysis. Every function here
//! is a pure computation over a schema and a JSON data tree; all I/O and
//! orchestration live above this layer.
//!
//! Errors from this module are schema-authoring defects (malformed paths,
//! broken rule parameters, invalid regexes), never user-input problems:
//! user-facing validation failures are ordinary return values, not errors.

mod active;
mod analyzer;
mod conditions;
mod flatten;
mod path;
mod validator;

pub use active::get_active_fields;
pub use analyzer::{get_invalid_fields, get_missing_fields, is_complete};
pub use conditions::{evaluate_condition, evaluate_conditions};
pub use flatten::flatten_schema;
pub use path::{
    deep_merge, expand_bindings, parse_path, resolve_path, set_path, PathError, PathSegment,
};
pub use validator::{validate_data, validate_field, value_matches_type};

use crate::domain::schema::RuleType;
use thiserror::Error;

/// A defect in the schema definition surfaced while evaluating it.
///
/// These fail loudly: they indicate a broken schema, not bad user input.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Path(#[from] PathError),

    #[error("invalid regex in pattern rule: {pattern}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("rule '{rule}' has a missing or malformed parameter")]
    InvalidRuleParam { rule: RuleType },
}

/// Extends a dot-path prefix with a child name.
pub(crate) fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}
