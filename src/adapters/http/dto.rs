//! HTTP DTOs for the interview endpoints.
//!
//! These types decouple the wire API from domain types, allowing
//! independent evolution.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::application::{StartOutcome, StatusOutcome, SubmitOutcome};
use crate::domain::interview::UiBlock;
use crate::domain::schema::InterviewSchema;

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Request to start an interview.
#[derive(Debug, Clone, Deserialize)]
pub struct StartRequest {
    #[serde(default)]
    pub schema: InterviewSchema,
    #[serde(default = "empty_object")]
    pub initial_data: Value,
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

/// Whether a submission carries form data or free text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmitKind {
    Form,
    Message,
}

/// Request to submit a turn: a flat form-data map or a text message.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitRequest {
    #[serde(rename = "type")]
    pub kind: SubmitKind,
    #[serde(default)]
    pub data: Option<Map<String, Value>>,
    #[serde(default)]
    pub text: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Response to a start request.
#[derive(Debug, Clone, Serialize)]
pub struct StartResponse {
    pub session_id: String,
    pub blocks: Vec<UiBlock>,
    pub is_complete: bool,
    pub current_data: Value,
}

impl From<StartOutcome> for StartResponse {
    fn from(outcome: StartOutcome) -> Self {
        Self {
            session_id: outcome.session_id.to_string(),
            blocks: outcome.blocks,
            is_complete: outcome.is_complete,
            current_data: outcome.current_data,
        }
    }
}

/// Response to a submission.
#[derive(Debug, Clone, Serialize)]
pub struct SubmitResponse {
    pub blocks: Vec<UiBlock>,
    pub is_complete: bool,
    pub current_data: Value,
    pub errors: IndexMap<String, Vec<String>>,
}

impl From<SubmitOutcome> for SubmitResponse {
    fn from(outcome: SubmitOutcome) -> Self {
        Self {
            blocks: outcome.blocks,
            is_complete: outcome.is_complete,
            current_data: outcome.current_data,
            errors: outcome.errors,
        }
    }
}

/// Response to a status read.
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub current_data: Value,
    pub is_complete: bool,
    pub missing_fields: Vec<String>,
}

impl From<StatusOutcome> for StatusResponse {
    fn from(outcome: StatusOutcome) -> Self {
        Self {
            current_data: outcome.current_data,
            is_complete: outcome.is_complete,
            missing_fields: outcome.missing_fields,
        }
    }
}

/// Generic error body.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub detail: String,
}

impl ErrorResponse {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn start_request_defaults_to_empty_schema_and_data() {
        let request: StartRequest = serde_json::from_value(json!({})).unwrap();
        assert!(request.schema.fields.is_empty());
        assert_eq!(request.initial_data, json!({}));
    }

    #[test]
    fn start_request_accepts_schema_and_initial_data() {
        let request: StartRequest = serde_json::from_value(json!({
            "schema": {"fields": {"name": {"type": "string"}}},
            "initial_data": {"name": "John"}
        }))
        .unwrap();
        assert!(request.schema.fields.contains_key("name"));
        assert_eq!(request.initial_data, json!({"name": "John"}));
    }

    #[test]
    fn submit_request_parses_form_variant() {
        let request: SubmitRequest = serde_json::from_value(json!({
            "type": "form",
            "data": {"personal.name": "John"}
        }))
        .unwrap();
        assert_eq!(request.kind, SubmitKind::Form);
        assert_eq!(request.data.unwrap()["personal.name"], json!("John"));
        assert!(request.text.is_none());
    }

    #[test]
    fn submit_request_parses_message_variant() {
        let request: SubmitRequest = serde_json::from_value(json!({
            "type": "message",
            "text": "My name is John"
        }))
        .unwrap();
        assert_eq!(request.kind, SubmitKind::Message);
        assert_eq!(request.text.as_deref(), Some("My name is John"));
    }

    #[test]
    fn submit_response_serializes_empty_errors_as_object() {
        let response = SubmitResponse {
            blocks: vec![UiBlock::text("done")],
            is_complete: true,
            current_data: json!({"name": "John"}),
            errors: IndexMap::new(),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["errors"], json!({}));
        assert_eq!(json["blocks"][0]["kind"], "text");
    }
}
