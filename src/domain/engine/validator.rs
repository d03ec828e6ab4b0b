//! Field and submission validation.

use indexmap::IndexMap;
use regex::Regex;
use serde_json::{Map, Value};

use super::active::get_active_fields;
use super::conditions::values_equal;
use super::path::resolve_path;
use super::EngineError;
use crate::domain::schema::{FieldSchema, FieldType, InterviewSchema, RuleType, ValidationRule};

/// Runs every validation rule of a field against one value.
///
/// Rules are applied independently, in order, without short-circuiting;
/// every triggered message is collected. An empty result means the value
/// is valid.
pub fn validate_field(value: &Value, field: &FieldSchema) -> Result<Vec<String>, EngineError> {
    let mut errors = Vec::new();
    for rule in &field.validation {
        if let Some(message) = check_rule(value, rule)? {
            errors.push(message);
        }
    }
    Ok(errors)
}

/// Whether a raw value structurally conforms to a field's declared type.
///
/// Validation rules alone cannot reject a string offered for an integer
/// field, because numeric rules no-op on non-numbers. Callers screening
/// untrusted values (extraction) check shape with this before running the
/// rules.
pub fn value_matches_type(value: &Value, field_type: FieldType) -> bool {
    match field_type {
        FieldType::String | FieldType::Text | FieldType::Date | FieldType::Enum => {
            value.is_string()
        }
        FieldType::Integer => value.is_i64() || value.is_u64(),
        FieldType::Float => value.is_number(),
        FieldType::Boolean => value.is_boolean(),
        FieldType::Object => value.is_object(),
        FieldType::Array => value.is_array(),
    }
}

/// True for the values the engine treats as "nothing collected":
/// null, the empty string, and the empty list.
pub(crate) fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        _ => false,
    }
}

fn check_rule(value: &Value, rule: &ValidationRule) -> Result<Option<String>, EngineError> {
    if rule.rule_type == RuleType::Required {
        if is_empty_value(value) {
            return Ok(Some(resolve_message(rule, || {
                "This field is required.".to_string()
            })));
        }
        return Ok(None);
    }

    // Non-required rules never fire on absent data.
    if value.is_null() || value.as_str() == Some("") {
        return Ok(None);
    }

    let failed = match rule.rule_type {
        RuleType::Required => false,
        RuleType::Min => match value.as_f64() {
            Some(number) => number < numeric_param(rule)?,
            None => false,
        },
        RuleType::Max => match value.as_f64() {
            Some(number) => number > numeric_param(rule)?,
            None => false,
        },
        RuleType::MinLength => match value.as_str() {
            Some(s) => s.chars().count() < length_param(rule)?,
            None => false,
        },
        RuleType::MaxLength => match value.as_str() {
            Some(s) => s.chars().count() > length_param(rule)?,
            None => false,
        },
        RuleType::Pattern => match value.as_str() {
            Some(s) => !compile_pattern(rule)?.is_match(s),
            None => false,
        },
        RuleType::OneOf => !one_of_allows(value, rule)?,
    };

    if !failed {
        return Ok(None);
    }
    Ok(Some(resolve_message(rule, || default_message(rule))))
}

fn resolve_message(rule: &ValidationRule, default: impl FnOnce() -> String) -> String {
    rule.message.clone().unwrap_or_else(default)
}

fn default_message(rule: &ValidationRule) -> String {
    let param = rule.param.as_ref().map(display_value).unwrap_or_default();
    match rule.rule_type {
        RuleType::Required => "This field is required.".to_string(),
        RuleType::Min => format!("Must be at least {param}."),
        RuleType::Max => format!("Must be at most {param}."),
        RuleType::MinLength => format!("Must be at least {param} characters."),
        RuleType::MaxLength => format!("Must be at most {param} characters."),
        RuleType::Pattern => format!("Must match pattern {param}."),
        RuleType::OneOf => {
            let allowed = rule
                .param
                .as_ref()
                .and_then(Value::as_array)
                .map(|list| {
                    list.iter()
                        .map(display_value)
                        .collect::<Vec<_>>()
                        .join(", ")
                })
                .unwrap_or_default();
            format!("Must be one of: {allowed}.")
        }
    }
}

/// Renders a JSON value the way it reads in an error message:
/// strings unquoted, everything else in JSON notation.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn numeric_param(rule: &ValidationRule) -> Result<f64, EngineError> {
    rule.param
        .as_ref()
        .and_then(Value::as_f64)
        .ok_or(EngineError::InvalidRuleParam {
            rule: rule.rule_type,
        })
}

fn length_param(rule: &ValidationRule) -> Result<usize, EngineError> {
    rule.param
        .as_ref()
        .and_then(Value::as_u64)
        .map(|n| n as usize)
        .ok_or(EngineError::InvalidRuleParam {
            rule: rule.rule_type,
        })
}

fn compile_pattern(rule: &ValidationRule) -> Result<Regex, EngineError> {
    let pattern = rule
        .param
        .as_ref()
        .and_then(Value::as_str)
        .ok_or(EngineError::InvalidRuleParam {
            rule: rule.rule_type,
        })?;
    Regex::new(pattern).map_err(|source| EngineError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}

/// `one_of` membership. An absent or null param allows nothing, so the
/// rule always fails; a param of any other non-list shape is a schema
/// defect.
fn one_of_allows(value: &Value, rule: &ValidationRule) -> Result<bool, EngineError> {
    match rule.param.as_ref() {
        None | Some(Value::Null) => Ok(false),
        Some(Value::Array(allowed)) => {
            Ok(allowed.iter().any(|candidate| values_equal(value, candidate)))
        }
        Some(_) => Err(EngineError::InvalidRuleParam {
            rule: rule.rule_type,
        }),
    }
}

/// Validates a submitted flat data set against the currently active fields.
///
/// The active set is computed from `context_data` (typically a merged
/// preview of the session), deliberately distinct from the submission
/// being validated. Each active path is resolved nested-first against the
/// submitted tree, then looked up as a literal flat key, so both nested
/// and flat-binding callers work. Paths with no errors are omitted.
pub fn validate_data(
    submitted: &Map<String, Value>,
    schema: &InterviewSchema,
    context_data: &Value,
) -> Result<IndexMap<String, Vec<String>>, EngineError> {
    let active = get_active_fields(schema, context_data)?;
    let submitted_tree = Value::Object(submitted.clone());
    let mut errors = IndexMap::new();

    for (path, field) in &active {
        let value = match resolve_path(&submitted_tree, path)? {
            Some(found) => found.clone(),
            None => submitted.get(path.as_str()).cloned().unwrap_or(Value::Null),
        };
        let field_errors = validate_field(&value, field)?;
        if !field_errors.is_empty() {
            errors.insert(path.clone(), field_errors);
        }
    }
    Ok(errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::schema::{Condition, ConditionOp, FieldType, SelectOption};
    use serde_json::json;

    fn field_with(rule: ValidationRule) -> FieldSchema {
        FieldSchema::new(FieldType::String).with_rule(rule)
    }

    #[test]
    fn required_fails_on_null_empty_string_and_empty_list() {
        let field = field_with(ValidationRule::required());
        for value in [json!(null), json!(""), json!([])] {
            let errors = validate_field(&value, &field).unwrap();
            assert_eq!(errors, ["This field is required."], "value: {value}");
        }
    }

    #[test]
    fn required_passes_on_present_values() {
        let field = field_with(ValidationRule::required());
        for value in [json!("x"), json!(0), json!(false), json!(["a"])] {
            assert!(validate_field(&value, &field).unwrap().is_empty(), "value: {value}");
        }
    }

    #[test]
    fn non_required_rules_skip_absent_values() {
        let field = FieldSchema::new(FieldType::Integer)
            .with_rule(ValidationRule::with_param(RuleType::Min, 18));
        assert!(validate_field(&json!(null), &field).unwrap().is_empty());
        assert!(validate_field(&json!(""), &field).unwrap().is_empty());
    }

    #[test]
    fn min_and_max_compare_numerically() {
        let field = FieldSchema::new(FieldType::Integer)
            .with_rule(ValidationRule::with_param(RuleType::Min, 18))
            .with_rule(ValidationRule::with_param(RuleType::Max, 99));
        assert_eq!(
            validate_field(&json!(5), &field).unwrap(),
            ["Must be at least 18."]
        );
        assert_eq!(
            validate_field(&json!(120), &field).unwrap(),
            ["Must be at most 99."]
        );
        assert!(validate_field(&json!(42), &field).unwrap().is_empty());
    }

    #[test]
    fn min_ignores_non_numeric_values() {
        let field = field_with(ValidationRule::with_param(RuleType::Min, 18));
        assert!(validate_field(&json!("young"), &field).unwrap().is_empty());
    }

    #[test]
    fn length_rules_compare_character_counts() {
        let field = field_with(ValidationRule::with_param(RuleType::MinLength, 3))
            .with_rule(ValidationRule::with_param(RuleType::MaxLength, 5));
        assert_eq!(
            validate_field(&json!("ab"), &field).unwrap(),
            ["Must be at least 3 characters."]
        );
        assert_eq!(
            validate_field(&json!("abcdef"), &field).unwrap(),
            ["Must be at most 5 characters."]
        );
        assert!(validate_field(&json!("abcd"), &field).unwrap().is_empty());
    }

    #[test]
    fn length_rules_ignore_non_strings() {
        let field = field_with(ValidationRule::with_param(RuleType::MinLength, 3));
        assert!(validate_field(&json!(12), &field).unwrap().is_empty());
    }

    #[test]
    fn pattern_uses_search_not_full_match() {
        let field = field_with(ValidationRule::with_param(RuleType::Pattern, "[0-9]{3}"));
        assert!(validate_field(&json!("abc123def"), &field).unwrap().is_empty());
        assert_eq!(
            validate_field(&json!("abcdef"), &field).unwrap(),
            ["Must match pattern [0-9]{3}."]
        );
    }

    #[test]
    fn invalid_pattern_is_a_schema_defect() {
        let field = field_with(ValidationRule::with_param(RuleType::Pattern, "[unclosed"));
        assert!(matches!(
            validate_field(&json!("abc"), &field),
            Err(EngineError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn one_of_checks_membership() {
        let field = field_with(ValidationRule::with_param(
            RuleType::OneOf,
            json!(["single", "married"]),
        ));
        assert!(validate_field(&json!("married"), &field).unwrap().is_empty());
        assert_eq!(
            validate_field(&json!("divorced"), &field).unwrap(),
            ["Must be one of: single, married."]
        );
    }

    #[test]
    fn one_of_without_param_always_fails() {
        let field = field_with(ValidationRule::new(RuleType::OneOf));
        assert_eq!(
            validate_field(&json!("anything"), &field).unwrap(),
            ["Must be one of: ."]
        );
    }

    #[test]
    fn missing_numeric_param_is_a_schema_defect() {
        let field = FieldSchema::new(FieldType::Integer)
            .with_rule(ValidationRule::new(RuleType::Min));
        assert!(matches!(
            validate_field(&json!(5), &field),
            Err(EngineError::InvalidRuleParam { rule: RuleType::Min })
        ));
    }

    #[test]
    fn custom_message_overrides_default() {
        let field = FieldSchema::new(FieldType::Integer)
            .with_rule(ValidationRule::with_param(RuleType::Min, 18).with_message("Adults only."));
        assert_eq!(validate_field(&json!(5), &field).unwrap(), ["Adults only."]);
    }

    #[test]
    fn rules_are_collected_without_short_circuit() {
        let field = field_with(ValidationRule::with_param(RuleType::MinLength, 10))
            .with_rule(ValidationRule::with_param(RuleType::Pattern, "^[0-9]+$"));
        let errors = validate_field(&json!("abc"), &field).unwrap();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn type_conformance_by_field_type() {
        assert!(value_matches_type(&json!("hi"), FieldType::String));
        assert!(value_matches_type(&json!("2024-05-01"), FieldType::Date));
        assert!(value_matches_type(&json!(30), FieldType::Integer));
        assert!(!value_matches_type(&json!(30.5), FieldType::Integer));
        assert!(value_matches_type(&json!(30), FieldType::Float));
        assert!(value_matches_type(&json!(true), FieldType::Boolean));
        assert!(value_matches_type(&json!(["a"]), FieldType::Array));
        assert!(!value_matches_type(&json!("not-a-number"), FieldType::Integer));
        assert!(!value_matches_type(&json!(null), FieldType::String));
    }

    fn person_schema() -> InterviewSchema {
        InterviewSchema::new()
            .with_field(
                "name",
                FieldSchema::new(FieldType::String).with_rule(ValidationRule::required()),
            )
            .with_field(
                "age",
                FieldSchema::new(FieldType::Integer)
                    .with_rule(ValidationRule::required())
                    .with_rule(ValidationRule::with_param(RuleType::Min, 18)),
            )
    }

    #[test]
    fn validate_data_accepts_valid_submission() {
        let submitted = json!({"name": "John", "age": 25});
        let errors = validate_data(
            submitted.as_object().unwrap(),
            &person_schema(),
            &submitted,
        )
        .unwrap();
        assert!(errors.is_empty());
    }

    #[test]
    fn validate_data_reports_missing_required_fields() {
        let submitted = json!({});
        let errors = validate_data(
            submitted.as_object().unwrap(),
            &person_schema(),
            &json!({}),
        )
        .unwrap();
        assert!(errors.contains_key("name"));
        assert!(errors.contains_key("age"));
    }

    #[test]
    fn validate_data_reports_rule_violations_only_for_offending_fields() {
        let submitted = json!({"name": "John", "age": 5});
        let errors = validate_data(
            submitted.as_object().unwrap(),
            &person_schema(),
            &submitted,
        )
        .unwrap();
        assert!(!errors.contains_key("name"));
        assert_eq!(errors["age"], ["Must be at least 18."]);
    }

    fn employment_schema() -> InterviewSchema {
        InterviewSchema::new()
            .with_field(
                "status",
                FieldSchema::new(FieldType::Enum)
                    .with_rule(ValidationRule::required())
                    .with_option(SelectOption::new("employed", "Employed"))
                    .with_option(SelectOption::new("unemployed", "Unemployed")),
            )
            .with_field(
                "company",
                FieldSchema::new(FieldType::String)
                    .with_rule(ValidationRule::required())
                    .with_condition(Condition::new("status", ConditionOp::Eq, "employed")),
            )
    }

    #[test]
    fn validate_data_skips_inactive_conditional_fields() {
        let submitted = json!({"status": "unemployed"});
        let errors = validate_data(
            submitted.as_object().unwrap(),
            &employment_schema(),
            &submitted,
        )
        .unwrap();
        assert!(!errors.contains_key("company"));
    }

    #[test]
    fn validate_data_validates_active_conditional_fields() {
        let submitted = json!({"status": "employed"});
        let errors = validate_data(
            submitted.as_object().unwrap(),
            &employment_schema(),
            &submitted,
        )
        .unwrap();
        assert!(errors.contains_key("company"));
    }

    #[test]
    fn validate_data_resolves_flat_binding_keys() {
        let schema = InterviewSchema::new().with_field(
            "personal",
            FieldSchema::new(FieldType::Object).with_field(
                "name",
                FieldSchema::new(FieldType::String).with_rule(ValidationRule::required()),
            ),
        );
        let submitted = json!({"personal.name": "John"});
        let context = json!({"personal": {"name": "John"}});
        let errors = validate_data(submitted.as_object().unwrap(), &schema, &context).unwrap();
        assert!(errors.is_empty());
    }

    #[test]
    fn validate_data_resolves_nested_submissions() {
        let schema = InterviewSchema::new().with_field(
            "personal",
            FieldSchema::new(FieldType::Object).with_field(
                "name",
                FieldSchema::new(FieldType::String).with_rule(ValidationRule::required()),
            ),
        );
        let submitted = json!({"personal": {"name": "John"}});
        let errors = validate_data(submitted.as_object().unwrap(), &schema, &submitted).unwrap();
        assert!(errors.is_empty());
    }
}
