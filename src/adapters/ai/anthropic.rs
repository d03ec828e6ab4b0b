//! Anthropic-backed collaborator - step generation and text extraction
//! via the Messages API.
//!
//! One adapter implements both generation ports: each call sends the
//! interview context (flattened schema, current data, missing fields)
//! plus a task-specific system prompt, and expects a single JSON object
//! back. Model output is untrusted: anything that does not parse into the
//! expected shape is a [`CollaboratorError::MalformedResponse`], which
//! aborts the turn upstream without touching session data.
//!
//! # Configuration
//!
//! ```ignore
//! let config = AnthropicConfig::new(api_key)
//!     .with_model("claude-sonnet-4-20250514")
//!     .with_base_url("https://api.anthropic.com");
//!
//! let collaborator = AnthropicCollaborator::new(config);
//! ```

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;

use crate::domain::interview::UiBlock;
use crate::ports::{
    CollaboratorError, Extraction, ExtractionRequest, InterviewStepGenerator, StepRequest,
    TextExtractor,
};

/// Anthropic API version header value.
const ANTHROPIC_API_VERSION: &str = "2023-06-01";

const STEP_SYSTEM_PROMPT: &str = "\
You generate the next step in a conversational data-collection interview. \
You are a friendly interviewer collecting information from a user. Given a \
JSON schema of all fields, the data already collected, and the list of \
fields still missing, produce UI blocks that combine natural conversational \
text with embedded form elements.

Rules for generating UI blocks:
- Always start with a text block containing a conversational message.
- Group related missing fields together in a single form block.
- Do NOT ask for fields already collected unless they have errors.
- Ask for 3-5 fields at a time maximum to avoid overwhelming the user.
- Pick the element kind from the field schema type:
  * string/text -> \"input\" (type \"text\") or \"textarea\" for long text
  * integer -> \"input\" (type \"integer\")
  * float -> \"input\" (type \"float\")
  * date -> \"input\" (type \"date\")
  * boolean -> \"checkbox\"
  * enum -> \"select\" or \"radio\" (radio for 4 options or fewer)
  * array -> \"array\" with item_elements
- The \"binding\" of every element must match the dot-notation path of the
  schema field.
- For enum fields, include the options from the schema.
- Use natural, warm language: this is a conversation, not a form dump.

Respond with ONLY a JSON object of the shape
{\"ui_blocks\": [{\"kind\": \"text\", \"value\": \"...\"}, {\"kind\": \"form\", \
\"elements\": [{\"kind\": \"input\", \"type\": \"text\", \"label\": \"...\", \
\"binding\": \"...\"}]}]} and no other prose.";

const EXTRACTOR_SYSTEM_PROMPT: &str = "\
You extract structured data from a user's free-text message in a \
data-collection interview. Given the schema context and the missing \
fields, parse the user's natural language message and extract any field \
values that can be mapped to schema fields.

Rules:
- Map extracted values to their dot-notation field paths.
- Convert values to the correct types (e.g. \"25\" -> 25 for integers).
- For enum fields, match to the closest option value.
- If part of the message cannot be mapped, put it in \"unresolved\".
- Only extract values you are confident about. Do not guess.

Respond with ONLY a JSON object of the shape
{\"extracted\": {\"path\": value, ...}, \"unresolved\": \"...\"} and no \
other prose. Omit \"unresolved\" when everything mapped.";

/// Configuration for the Anthropic collaborator.
#[derive(Debug, Clone)]
pub struct AnthropicConfig {
    /// API key for authentication.
    api_key: Secret<String>,
    /// Model to use.
    pub model: String,
    /// Base URL for the API (default: https://api.anthropic.com).
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Completion token budget per call.
    pub max_tokens: u32,
}

impl AnthropicConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "claude-sonnet-4-20250514".to_string(),
            base_url: "https://api.anthropic.com".to_string(),
            timeout: Duration::from_secs(60),
            max_tokens: 4096,
        }
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the completion token budget.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Anthropic Messages API collaborator.
pub struct AnthropicCollaborator {
    config: AnthropicConfig,
    client: Client,
}

impl AnthropicCollaborator {
    /// Creates a new collaborator with the given configuration.
    ///
    /// # Errors
    ///
    /// Fails if the HTTP client cannot be constructed.
    pub fn new(config: AnthropicConfig) -> Result<Self, CollaboratorError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| CollaboratorError::InvalidRequest(e.to_string()))?;
        Ok(Self { config, client })
    }

    fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.config.base_url)
    }

    /// Sends one system + user exchange and returns the text completion.
    async fn complete(&self, system: &str, user: String) -> Result<String, CollaboratorError> {
        let request = MessagesRequest {
            model: &self.config.model,
            max_tokens: self.config.max_tokens,
            system,
            messages: vec![MessageParam {
                role: "user",
                content: user,
            }],
        };

        let response = self
            .client
            .post(self.messages_url())
            .header("x-api-key", self.config.api_key())
            .header("anthropic-version", ANTHROPIC_API_VERSION)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CollaboratorError::network(format!(
                        "request timed out after {}s",
                        self.config.timeout.as_secs()
                    ))
                } else if e.is_connect() {
                    CollaboratorError::network(format!("connection failed: {e}"))
                } else {
                    CollaboratorError::network(e.to_string())
                }
            })?;

        let response = self.handle_response_status(response).await?;
        let body: MessagesResponse = response
            .json()
            .await
            .map_err(|e| CollaboratorError::malformed(format!("unparseable response body: {e}")))?;

        body.content
            .into_iter()
            .find(|block| block.kind == "text")
            .map(|block| block.text)
            .ok_or_else(|| CollaboratorError::malformed("response contained no text block"))
    }

    /// Maps non-success statuses onto the collaborator error taxonomy.
    async fn handle_response_status(
        &self,
        response: Response,
    ) -> Result<Response, CollaboratorError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u32>().ok());
        let error_body = response.text().await.unwrap_or_default();
        warn!(status = %status, "anthropic request failed");

        match status.as_u16() {
            401 => Err(CollaboratorError::AuthenticationFailed),
            429 => Err(CollaboratorError::RateLimited {
                retry_after_secs: retry_after.unwrap_or(60),
            }),
            400 => Err(CollaboratorError::InvalidRequest(error_body)),
            500..=599 => Err(CollaboratorError::unavailable(format!(
                "server error {status}: {error_body}"
            ))),
            _ => Err(CollaboratorError::network(format!(
                "unexpected status {status}: {error_body}"
            ))),
        }
    }
}

#[async_trait]
impl InterviewStepGenerator for AnthropicCollaborator {
    async fn generate(&self, request: StepRequest) -> Result<Vec<UiBlock>, CollaboratorError> {
        let user = format!(
            "## Field schema\n{}\n\n## Current data\n{}\n\n## Missing fields\n{}\n\n## Conversation history\n{}",
            to_pretty_json(&request.flattened_schema)?,
            to_pretty_json(&request.current_data)?,
            to_pretty_json(&request.missing_fields)?,
            to_pretty_json(&request.conversation_history)?,
        );
        let completion = self.complete(STEP_SYSTEM_PROMPT, user).await?;
        parse_step_payload(&completion)
    }
}

#[async_trait]
impl TextExtractor for AnthropicCollaborator {
    async fn extract(&self, request: ExtractionRequest) -> Result<Extraction, CollaboratorError> {
        let user = format!(
            "## Field schema\n{}\n\n## Current data\n{}\n\n## Missing fields\n{}\n\n## User message\n{}",
            to_pretty_json(&request.flattened_schema)?,
            to_pretty_json(&request.current_data)?,
            to_pretty_json(&request.missing_fields)?,
            request.user_message,
        );
        let completion = self.complete(EXTRACTOR_SYSTEM_PROMPT, user).await?;
        parse_extraction_payload(&completion)
    }
}

fn to_pretty_json<T: Serialize>(value: &T) -> Result<String, CollaboratorError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| CollaboratorError::InvalidRequest(format!("request encoding failed: {e}")))
}

/// Strips an optional Markdown code fence from a completion.
fn strip_code_fence(completion: &str) -> &str {
    let trimmed = completion.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") on the opening fence line.
    let rest = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

#[derive(Debug, Deserialize)]
struct StepPayload {
    ui_blocks: Vec<UiBlock>,
}

fn parse_step_payload(completion: &str) -> Result<Vec<UiBlock>, CollaboratorError> {
    let payload = strip_code_fence(completion);
    let parsed: StepPayload = serde_json::from_str(payload)
        .map_err(|e| CollaboratorError::malformed(format!("invalid step payload: {e}")))?;
    Ok(parsed.ui_blocks)
}

fn parse_extraction_payload(completion: &str) -> Result<Extraction, CollaboratorError> {
    let payload = strip_code_fence(completion);
    serde_json::from_str(payload)
        .map_err(|e| CollaboratorError::malformed(format!("invalid extraction payload: {e}")))
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<MessageParam>,
}

#[derive(Debug, Serialize)]
struct MessageParam {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strip_code_fence_passes_plain_json_through() {
        assert_eq!(strip_code_fence("{\"a\": 1}"), "{\"a\": 1}");
    }

    #[test]
    fn strip_code_fence_removes_fenced_wrapper() {
        let fenced = "```json\n{\"a\": 1}\n```";
        assert_eq!(strip_code_fence(fenced), "{\"a\": 1}");
    }

    #[test]
    fn strip_code_fence_handles_bare_fence() {
        let fenced = "```\n{\"a\": 1}\n```";
        assert_eq!(strip_code_fence(fenced), "{\"a\": 1}");
    }

    #[test]
    fn parse_step_payload_reads_ui_blocks() {
        let completion = json!({
            "ui_blocks": [
                {"kind": "text", "value": "Hi there!"},
                {"kind": "form", "elements": [
                    {"kind": "input", "type": "integer", "label": "Age", "binding": "age"}
                ]}
            ]
        })
        .to_string();

        let blocks = parse_step_payload(&completion).unwrap();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0], UiBlock::text("Hi there!"));
    }

    #[test]
    fn parse_step_payload_rejects_wrong_shape() {
        let result = parse_step_payload("{\"blocks\": []}");
        assert!(matches!(
            result,
            Err(CollaboratorError::MalformedResponse(_))
        ));
    }

    #[test]
    fn parse_extraction_payload_reads_flat_bindings() {
        let completion = json!({
            "extracted": {"personal.age": 30, "personal.name": "John"},
            "unresolved": "something about a dog"
        })
        .to_string();

        let extraction = parse_extraction_payload(&completion).unwrap();
        assert_eq!(extraction.extracted["personal.age"], json!(30));
        assert_eq!(
            extraction.unresolved.as_deref(),
            Some("something about a dog")
        );
    }

    #[test]
    fn parse_extraction_payload_rejects_prose() {
        let result = parse_extraction_payload("Sure! Here is the data you asked for.");
        assert!(matches!(
            result,
            Err(CollaboratorError::MalformedResponse(_))
        ));
    }

    #[test]
    fn config_builder_applies_overrides() {
        let config = AnthropicConfig::new("sk-ant-test")
            .with_model("claude-3-haiku-20240307")
            .with_base_url("http://localhost:9999")
            .with_max_tokens(512);
        assert_eq!(config.model, "claude-3-haiku-20240307");
        assert_eq!(config.base_url, "http://localhost:9999");
        assert_eq!(config.max_tokens, 512);
    }
}
