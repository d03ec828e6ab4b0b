//! Completeness analysis: missing fields, invalid fields, completion.

use indexmap::IndexMap;
use serde_json::Value;

use super::conditions::evaluate_conditions;
use super::path::resolve_path;
use super::validator::{is_empty_value, validate_field};
use super::{join_path, EngineError};
use crate::domain::schema::{FieldSchema, FieldType, InterviewSchema};

/// Collects the paths of required, condition-satisfying fields whose value
/// is absent (not found, null, empty string, or empty list).
///
/// The walk descends the *declared* schema tree, so results come back in
/// schema declaration order, not alphabetical order. Arrays-of-objects are
/// expanded per existing data index.
pub fn get_missing_fields(
    schema: &InterviewSchema,
    data: &Value,
) -> Result<Vec<String>, EngineError> {
    let mut missing = Vec::new();
    find_missing(&schema.fields, data, "", &mut missing)?;
    Ok(missing)
}

fn find_missing(
    fields: &IndexMap<String, FieldSchema>,
    root_data: &Value,
    prefix: &str,
    missing: &mut Vec<String>,
) -> Result<(), EngineError> {
    for (name, field) in fields {
        let path = join_path(prefix, name);

        if !evaluate_conditions(&field.conditions, root_data)? {
            continue;
        }

        if field.field_type == FieldType::Object && !field.fields.is_empty() {
            find_missing(&field.fields, root_data, &path, missing)?;
            continue;
        }

        if field.is_required() {
            let absent = match resolve_path(root_data, &path)? {
                Some(value) => is_empty_value(value),
                None => true,
            };
            if absent {
                missing.push(path.clone());
            }
        }

        if field.field_type == FieldType::Array {
            if let Some(item) = field.item_schema.as_deref() {
                if item.field_type == FieldType::Object {
                    if let Some(array) = resolve_path(root_data, &path)?.and_then(Value::as_array) {
                        for index in 0..array.len() {
                            let item_prefix = format!("{path}[{index}]");
                            find_missing(&item.fields, root_data, &item_prefix, missing)?;
                        }
                    }
                }
            }
        }
    }
    Ok(())
}

/// Collects validation errors for fields whose condition passes and whose
/// value is actually present.
///
/// Absent values are the missing-fields concern and are not re-flagged
/// here; only collected, non-null, non-empty-string values are validated.
pub fn get_invalid_fields(
    schema: &InterviewSchema,
    data: &Value,
) -> Result<IndexMap<String, Vec<String>>, EngineError> {
    let mut errors = IndexMap::new();
    find_invalid(&schema.fields, data, "", &mut errors)?;
    Ok(errors)
}

fn find_invalid(
    fields: &IndexMap<String, FieldSchema>,
    root_data: &Value,
    prefix: &str,
    errors: &mut IndexMap<String, Vec<String>>,
) -> Result<(), EngineError> {
    for (name, field) in fields {
        let path = join_path(prefix, name);

        if !evaluate_conditions(&field.conditions, root_data)? {
            continue;
        }

        if field.field_type == FieldType::Object && !field.fields.is_empty() {
            find_invalid(&field.fields, root_data, &path, errors)?;
            continue;
        }

        let resolved = resolve_path(root_data, &path)?;
        if let Some(value) = resolved {
            if !value.is_null() && value.as_str() != Some("") {
                let field_errors = validate_field(value, field)?;
                if !field_errors.is_empty() {
                    errors.insert(path.clone(), field_errors);
                }
            }
        }

        if field.field_type == FieldType::Array {
            if let Some(item) = field.item_schema.as_deref() {
                if item.field_type == FieldType::Object {
                    if let Some(array) = resolved.and_then(Value::as_array) {
                        for index in 0..array.len() {
                            let item_prefix = format!("{path}[{index}]");
                            find_invalid(&item.fields, root_data, &item_prefix, errors)?;
                        }
                    }
                }
            }
        }
    }
    Ok(())
}

/// A schema is complete for the given data iff nothing is missing and
/// nothing is invalid: a derived identity, recomputed on every call,
/// never cached.
pub fn is_complete(schema: &InterviewSchema, data: &Value) -> Result<bool, EngineError> {
    Ok(get_missing_fields(schema, data)?.is_empty() && get_invalid_fields(schema, data)?.is_empty())
}
