//! Active-field resolution: which fields are currently in play.

use indexmap::IndexMap;
use serde_json::Value;

use super::conditions::evaluate_conditions;
use super::path::resolve_path;
use super::{join_path, EngineError};
use crate::domain::schema::{FieldSchema, FieldType, InterviewSchema};

/// Resolves the set of fields currently active for the given data.
///
/// Mirrors the flattener's descent with two differences: a field whose
/// conditions fail against the full data tree is pruned together with its
/// entire subtree, and arrays-of-objects are expanded per *existing* data
/// index (`path[i]`), the one place cardinality-dependent expansion
/// happens.
pub fn get_active_fields(
    schema: &InterviewSchema,
    data: &Value,
) -> Result<IndexMap<String, FieldSchema>, EngineError> {
    let mut out = IndexMap::new();
    collect_active_fields(&schema.fields, data, "", &mut out)?;
    Ok(out)
}

fn collect_active_fields(
    fields: &IndexMap<String, FieldSchema>,
    data: &Value,
    prefix: &str,
    out: &mut IndexMap<String, FieldSchema>,
) -> Result<(), EngineError> {
    for (name, field) in fields {
        let path = join_path(prefix, name);

        if !evaluate_conditions(&field.conditions, data)? {
            continue;
        }

        if field.field_type == FieldType::Object && !field.fields.is_empty() {
            collect_active_fields(&field.fields, data, &path, out)?;
            continue;
        }

        out.insert(path.clone(), field.clone());

        if field.field_type == FieldType::Array {
            if let Some(item) = field.item_schema.as_deref() {
                if item.field_type == FieldType::Object {
                    if let Some(array) = resolve_path(data, &path)?.and_then(Value::as_array) {
                        for index in 0..array.len() {
                            let item_prefix = format!("{path}[{index}]");
                            collect_active_fields(&item.fields, data, &item_prefix, out)?;
                        }
                    }
                }
            }
        }
    }
    Ok(())
}
