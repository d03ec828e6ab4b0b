//! Schema model - the typed field tree an interview collects against.
//!
//! An [`InterviewSchema`] is a tree of [`FieldSchema`] nodes. Leaf nodes
//! carry validation rules and activation conditions; `object` nodes own
//! named children; `array` nodes own an item schema describing the element
//! shape. Schemas are constructed once when a session starts and are
//! immutable for the lifetime of that session.

mod condition;
mod field;
mod rule;

pub use condition::{Condition, ConditionOp};
pub use field::{FieldSchema, FieldType, InterviewSchema, SelectOption};
pub use rule::{RuleType, ValidationRule};
