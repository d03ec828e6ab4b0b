//! UI blocks: conversational text interleaved with form elements.
//!
//! Blocks are advisory content produced by the step generator; the engine
//! never trusts them for correctness, it only records and forwards them.
//! Every form element carries a `binding`: a dot/bracket path into the
//! schema that the client echoes back as the key of a flat submission.

use serde::{Deserialize, Serialize};

use crate::domain::schema::SelectOption;

/// One block of generated interview content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum UiBlock {
    /// Conversational text.
    Text { value: String },
    /// A group of form elements collected together.
    Form { elements: Vec<FormElement> },
}

impl UiBlock {
    /// Creates a text block.
    pub fn text(value: impl Into<String>) -> Self {
        UiBlock::Text {
            value: value.into(),
        }
    }

    /// Creates a form block.
    pub fn form(elements: Vec<FormElement>) -> Self {
        UiBlock::Form { elements }
    }
}

/// Input widget type for `input` elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputType {
    Text,
    Integer,
    Float,
    Email,
    Date,
    Phone,
}

impl Default for InputType {
    fn default() -> Self {
        InputType::Text
    }
}

/// One interactive element inside a form block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FormElement {
    Input {
        #[serde(rename = "type", default)]
        input_type: InputType,
        label: String,
        binding: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        placeholder: Option<String>,
    },
    Select {
        label: String,
        binding: String,
        options: Vec<SelectOption>,
    },
    Radio {
        label: String,
        binding: String,
        options: Vec<SelectOption>,
    },
    Checkbox {
        label: String,
        binding: String,
    },
    Textarea {
        label: String,
        binding: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        placeholder: Option<String>,
    },
    /// Repeating group; `item_elements` describe one instance and the
    /// client re-binds them per index (`children[0].name`, …).
    Array {
        label: String,
        binding: String,
        item_elements: Vec<FormElement>,
        #[serde(default = "default_add_label")]
        add_label: String,
    },
}

fn default_add_label() -> String {
    "Add another".to_string()
}

impl FormElement {
    /// The schema path this element binds to.
    pub fn binding(&self) -> &str {
        match self {
            FormElement::Input { binding, .. }
            | FormElement::Select { binding, .. }
            | FormElement::Radio { binding, .. }
            | FormElement::Checkbox { binding, .. }
            | FormElement::Textarea { binding, .. }
            | FormElement::Array { binding, .. } => binding,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_block_serializes_with_kind_tag() {
        let block = UiBlock::text("Welcome!");
        assert_eq!(
            serde_json::to_value(&block).unwrap(),
            json!({"kind": "text", "value": "Welcome!"})
        );
    }

    #[test]
    fn form_block_round_trips() {
        let block = UiBlock::form(vec![
            FormElement::Input {
                input_type: InputType::Integer,
                label: "Age".to_string(),
                binding: "age".to_string(),
                placeholder: None,
            },
            FormElement::Select {
                label: "Status".to_string(),
                binding: "status".to_string(),
                options: vec![SelectOption::new("single", "Single")],
            },
        ]);
        let json = serde_json::to_value(&block).unwrap();
        assert_eq!(json["kind"], "form");
        assert_eq!(json["elements"][0]["kind"], "input");
        assert_eq!(json["elements"][0]["type"], "integer");
        assert_eq!(json["elements"][1]["kind"], "select");

        let back: UiBlock = serde_json::from_value(json).unwrap();
        assert_eq!(block, back);
    }

    #[test]
    fn input_type_defaults_to_text() {
        let element: FormElement = serde_json::from_value(json!({
            "kind": "input",
            "label": "Name",
            "binding": "name"
        }))
        .unwrap();
        match element {
            FormElement::Input { input_type, .. } => assert_eq!(input_type, InputType::Text),
            other => panic!("expected input, got {other:?}"),
        }
    }

    #[test]
    fn array_element_defaults_add_label() {
        let element: FormElement = serde_json::from_value(json!({
            "kind": "array",
            "label": "Children",
            "binding": "children",
            "item_elements": [
                {"kind": "input", "label": "Name", "binding": "name"}
            ]
        }))
        .unwrap();
        match element {
            FormElement::Array { add_label, .. } => assert_eq!(add_label, "Add another"),
            other => panic!("expected array, got {other:?}"),
        }
    }

    #[test]
    fn binding_accessor_covers_every_variant() {
        let checkbox = FormElement::Checkbox {
            label: "Subscribed".to_string(),
            binding: "prefs.subscribed".to_string(),
        };
        assert_eq!(checkbox.binding(), "prefs.subscribed");
    }
}
