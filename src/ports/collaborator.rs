//! Shared request/response types and errors for the generation ports.
//!
//! Both external collaborators (step generation and text extraction) see
//! the same picture of the interview: the flattened schema, the data so
//! far, and what is still missing. Their outputs are untrusted; the
//! orchestrator validates anything it merges.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::domain::schema::FieldSchema;
use crate::domain::session::ConversationTurn;

/// Context handed to the interview step generator.
#[derive(Debug, Clone)]
pub struct StepRequest {
    /// Flattened schema: dot-path to leaf field definition.
    pub flattened_schema: IndexMap<String, FieldSchema>,
    /// Data collected so far.
    pub current_data: Value,
    /// Paths still required, in schema order.
    pub missing_fields: Vec<String>,
    /// Conversation so far, oldest first.
    pub conversation_history: Vec<ConversationTurn>,
}

/// Context handed to the text extractor.
#[derive(Debug, Clone)]
pub struct ExtractionRequest {
    /// Flattened schema: dot-path to leaf field definition.
    pub flattened_schema: IndexMap<String, FieldSchema>,
    /// Data collected so far.
    pub current_data: Value,
    /// Paths still required, in schema order.
    pub missing_fields: Vec<String>,
    /// The user's free-text message.
    pub user_message: String,
}

/// Structured values pulled out of a free-text message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Extraction {
    /// Extracted values keyed by flat dot-path.
    #[serde(default)]
    pub extracted: Map<String, Value>,
    /// The part of the message that could not be mapped, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unresolved: Option<String>,
}

impl Extraction {
    /// An extraction that found nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// True when no values were extracted.
    pub fn is_empty(&self) -> bool {
        self.extracted.is_empty()
    }
}

/// Failures at the collaborator boundary.
///
/// A failed or malformed collaborator response aborts the turn without
/// mutating session data; none of these are attributable to user input.
#[derive(Debug, Error)]
pub enum CollaboratorError {
    /// The collaborator answered with a shape the engine cannot parse.
    #[error("malformed collaborator response: {0}")]
    MalformedResponse(String),

    /// The collaborator rejected our credentials.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Rate limited by the collaborator.
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u32 },

    /// The collaborator is temporarily unavailable.
    #[error("collaborator unavailable: {0}")]
    Unavailable(String),

    /// Transport-level failure.
    #[error("network error: {0}")]
    Network(String),

    /// The request itself was rejected as invalid.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl CollaboratorError {
    /// Creates a malformed-response error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse(message.into())
    }

    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// True if retrying the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CollaboratorError::RateLimited { .. }
                | CollaboratorError::Unavailable(_)
                | CollaboratorError::Network(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extraction_deserializes_with_defaults() {
        let extraction: Extraction = serde_json::from_value(json!({})).unwrap();
        assert!(extraction.is_empty());
        assert!(extraction.unresolved.is_none());
    }

    #[test]
    fn extraction_carries_flat_paths() {
        let extraction: Extraction = serde_json::from_value(json!({
            "extracted": {"personal.age": 30},
            "unresolved": "the part about the dog"
        }))
        .unwrap();
        assert_eq!(extraction.extracted["personal.age"], json!(30));
        assert_eq!(extraction.unresolved.as_deref(), Some("the part about the dog"));
    }

    #[test]
    fn retryable_classification() {
        assert!(CollaboratorError::RateLimited { retry_after_secs: 30 }.is_retryable());
        assert!(CollaboratorError::network("reset").is_retryable());
        assert!(!CollaboratorError::malformed("bad json").is_retryable());
        assert!(!CollaboratorError::AuthenticationFailed.is_retryable());
    }
}
