//! Schema flattening: field tree to `path -> leaf definition` map.

use indexmap::IndexMap;

use super::join_path;
use crate::domain::schema::{FieldSchema, FieldType, InterviewSchema};

/// Flattens a schema into a map of dot-path to leaf field definition.
///
/// Object nodes are expanded away and contribute no entry of their own.
/// Array fields appear as a single entry at their path: item shapes are
/// *not* expanded here, because instance count is a property of the data,
/// not the schema; per-index expansion belongs to the active-field
/// resolver, which sees actual data.
pub fn flatten_schema(schema: &InterviewSchema) -> IndexMap<String, FieldSchema> {
    let mut out = IndexMap::new();
    flatten_fields(&schema.fields, "", &mut out);
    out
}

fn flatten_fields(
    fields: &IndexMap<String, FieldSchema>,
    prefix: &str,
    out: &mut IndexMap<String, FieldSchema>,
) {
    for (name, field) in fields {
        let path = join_path(prefix, name);
        if field.field_type == FieldType::Object && !field.fields.is_empty() {
            flatten_fields(&field.fields, &path, out);
        } else {
            out.insert(path, field.clone());
        }
    }
}
