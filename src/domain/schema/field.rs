//! Field tree definitions.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::{Condition, RuleType, ValidationRule};

/// Closed set of field types.
///
/// Drives branching in the flattener, the validators, and the UI-block
/// builders; matching is exhaustive everywhere so a new variant cannot
/// silently fall through a consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Text,
    Integer,
    Float,
    Boolean,
    Date,
    Enum,
    Object,
    Array,
}

/// One option of an `enum` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// A node in the interview field tree.
///
/// # Invariants
///
/// - `fields` is only meaningful when `field_type` is [`FieldType::Object`]
/// - `item_schema` is only meaningful when `field_type` is [`FieldType::Array`]
///
/// Children live in an insertion-ordered map: descent order over the tree
/// is schema declaration order, which is what missing-field reporting and
/// generated form layouts follow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSchema {
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub validation: Vec<ValidationRule>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectOption>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub fields: IndexMap<String, FieldSchema>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_schema: Option<Box<FieldSchema>>,
}

impl FieldSchema {
    /// Creates a bare field of the given type.
    pub fn new(field_type: FieldType) -> Self {
        Self {
            field_type,
            label: None,
            description: None,
            validation: Vec::new(),
            conditions: Vec::new(),
            options: Vec::new(),
            fields: IndexMap::new(),
            item_schema: None,
        }
    }

    /// Sets the display label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Appends a validation rule.
    pub fn with_rule(mut self, rule: ValidationRule) -> Self {
        self.validation.push(rule);
        self
    }

    /// Appends an activation condition.
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Appends a select option (enum fields).
    pub fn with_option(mut self, option: SelectOption) -> Self {
        self.options.push(option);
        self
    }

    /// Adds a named child (object fields).
    pub fn with_field(mut self, name: impl Into<String>, child: FieldSchema) -> Self {
        self.fields.insert(name.into(), child);
        self
    }

    /// Sets the element shape (array fields).
    pub fn with_item_schema(mut self, item: FieldSchema) -> Self {
        self.item_schema = Some(Box::new(item));
        self
    }

    /// True when the field carries a `required` rule.
    pub fn is_required(&self) -> bool {
        self.validation
            .iter()
            .any(|r| r.rule_type == RuleType::Required)
    }
}

/// Top-level mapping of field name to field definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InterviewSchema {
    pub fields: IndexMap<String, FieldSchema>,
}

impl InterviewSchema {
    /// Creates an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a top-level field.
    pub fn with_field(mut self, name: impl Into<String>, field: FieldSchema) -> Self {
        self.fields.insert(name.into(), field);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn field_type_uses_lowercase_wire_names() {
        assert_eq!(serde_json::to_string(&FieldType::Integer).unwrap(), "\"integer\"");
        let parsed: FieldType = serde_json::from_str("\"enum\"").unwrap();
        assert_eq!(parsed, FieldType::Enum);
    }

    #[test]
    fn schema_deserializes_nested_wire_shape() {
        let schema: InterviewSchema = serde_json::from_value(json!({
            "fields": {
                "personal": {
                    "type": "object",
                    "fields": {
                        "name": {
                            "type": "string",
                            "validation": [{"type": "required"}]
                        },
                        "age": {"type": "integer"}
                    }
                },
                "children": {
                    "type": "array",
                    "item_schema": {
                        "type": "object",
                        "fields": {"name": {"type": "string"}}
                    }
                }
            }
        }))
        .unwrap();

        let personal = &schema.fields["personal"];
        assert_eq!(personal.field_type, FieldType::Object);
        assert!(personal.fields["name"].is_required());
        assert!(!personal.fields["age"].is_required());

        let children = &schema.fields["children"];
        assert_eq!(children.field_type, FieldType::Array);
        let item = children.item_schema.as_ref().unwrap();
        assert_eq!(item.field_type, FieldType::Object);
    }

    #[test]
    fn field_order_follows_declaration_order() {
        let schema: InterviewSchema = serde_json::from_value(json!({
            "fields": {
                "zulu": {"type": "string"},
                "alpha": {"type": "string"},
                "mike": {"type": "string"}
            }
        }))
        .unwrap();
        let names: Vec<&String> = schema.fields.keys().collect();
        assert_eq!(names, ["zulu", "alpha", "mike"]);
    }

    #[test]
    fn builder_round_trips_through_serde() {
        let field = FieldSchema::new(FieldType::Enum)
            .with_label("Marital status")
            .with_rule(ValidationRule::required())
            .with_option(SelectOption::new("single", "Single"))
            .with_option(SelectOption::new("married", "Married"));

        let json = serde_json::to_value(&field).unwrap();
        let back: FieldSchema = serde_json::from_value(json).unwrap();
        assert_eq!(field, back);
    }
}
