//! Mock collaborators for testing.
//!
//! Configurable stand-ins for the step generator and text extractor
//! ports, so the orchestrator and the HTTP layer can be exercised without
//! calling a real model.
//!
//! # Features
//!
//! - Pre-queued responses, consumed in order
//! - Error injection for abort-path testing
//! - Call tracking for verification

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::interview::{FormElement, InputType, UiBlock};
use crate::ports::{
    CollaboratorError, Extraction, ExtractionRequest, InterviewStepGenerator, StepRequest,
    TextExtractor,
};

/// Mock interview step generator.
///
/// Returns queued responses in order; once the queue is empty it falls
/// back to a canned text + form step built from the missing fields.
#[derive(Debug, Default)]
pub struct MockStepGenerator {
    responses: Mutex<VecDeque<Result<Vec<UiBlock>, CollaboratorError>>>,
    calls: Mutex<Vec<StepRequest>>,
}

impl MockStepGenerator {
    /// Creates a mock with no queued responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a block list to return on the next call.
    pub fn push_blocks(&self, blocks: Vec<UiBlock>) {
        self.responses
            .lock()
            .expect("mock lock poisoned")
            .push_back(Ok(blocks));
    }

    /// Queues an error to return on the next call.
    pub fn push_error(&self, error: CollaboratorError) {
        self.responses
            .lock()
            .expect("mock lock poisoned")
            .push_back(Err(error));
    }

    /// Number of calls received so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().expect("mock lock poisoned").len()
    }

    /// The requests received so far.
    pub fn calls(&self) -> Vec<StepRequest> {
        self.calls.lock().expect("mock lock poisoned").clone()
    }

    fn default_blocks(request: &StepRequest) -> Vec<UiBlock> {
        let elements = request
            .missing_fields
            .iter()
            .map(|path| FormElement::Input {
                input_type: InputType::Text,
                label: path.clone(),
                binding: path.clone(),
                placeholder: None,
            })
            .collect::<Vec<_>>();

        let mut blocks = vec![UiBlock::text("Let's keep going - a few more things:")];
        if !elements.is_empty() {
            blocks.push(UiBlock::form(elements));
        }
        blocks
    }
}

#[async_trait]
impl InterviewStepGenerator for MockStepGenerator {
    async fn generate(&self, request: StepRequest) -> Result<Vec<UiBlock>, CollaboratorError> {
        let queued = self
            .responses
            .lock()
            .expect("mock lock poisoned")
            .pop_front();
        let result = match queued {
            Some(result) => result,
            None => Ok(Self::default_blocks(&request)),
        };
        self.calls.lock().expect("mock lock poisoned").push(request);
        result
    }
}

/// Mock text extractor.
///
/// Returns queued extractions in order; once the queue is empty it
/// extracts nothing.
#[derive(Debug, Default)]
pub struct MockTextExtractor {
    responses: Mutex<VecDeque<Result<Extraction, CollaboratorError>>>,
    calls: Mutex<Vec<ExtractionRequest>>,
}

impl MockTextExtractor {
    /// Creates a mock with no queued responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues an extraction to return on the next call.
    pub fn push_extraction(&self, extraction: Extraction) {
        self.responses
            .lock()
            .expect("mock lock poisoned")
            .push_back(Ok(extraction));
    }

    /// Queues an error to return on the next call.
    pub fn push_error(&self, error: CollaboratorError) {
        self.responses
            .lock()
            .expect("mock lock poisoned")
            .push_back(Err(error));
    }

    /// Number of calls received so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().expect("mock lock poisoned").len()
    }

    /// The requests received so far.
    pub fn calls(&self) -> Vec<ExtractionRequest> {
        self.calls.lock().expect("mock lock poisoned").clone()
    }
}

#[async_trait]
impl TextExtractor for MockTextExtractor {
    async fn extract(&self, request: ExtractionRequest) -> Result<Extraction, CollaboratorError> {
        let queued = self
            .responses
            .lock()
            .expect("mock lock poisoned")
            .pop_front();
        let result = match queued {
            Some(result) => result,
            None => Ok(Extraction::empty()),
        };
        self.calls.lock().expect("mock lock poisoned").push(request);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use serde_json::json;

    fn step_request(missing: &[&str]) -> StepRequest {
        StepRequest {
            flattened_schema: IndexMap::new(),
            current_data: json!({}),
            missing_fields: missing.iter().map(|s| s.to_string()).collect(),
            conversation_history: Vec::new(),
        }
    }

    #[tokio::test]
    async fn generator_returns_queued_blocks_in_order() {
        let mock = MockStepGenerator::new();
        mock.push_blocks(vec![UiBlock::text("first")]);
        mock.push_blocks(vec![UiBlock::text("second")]);

        let first = mock.generate(step_request(&[])).await.unwrap();
        let second = mock.generate(step_request(&[])).await.unwrap();
        assert_eq!(first, vec![UiBlock::text("first")]);
        assert_eq!(second, vec![UiBlock::text("second")]);
        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test]
    async fn generator_default_builds_form_from_missing_fields() {
        let mock = MockStepGenerator::new();
        let blocks = mock
            .generate(step_request(&["name", "age"]))
            .await
            .unwrap();

        assert_eq!(blocks.len(), 2);
        match &blocks[1] {
            UiBlock::Form { elements } => {
                let bindings: Vec<&str> = elements.iter().map(|e| e.binding()).collect();
                assert_eq!(bindings, ["name", "age"]);
            }
            other => panic!("expected form block, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn generator_returns_queued_error() {
        let mock = MockStepGenerator::new();
        mock.push_error(CollaboratorError::unavailable("down"));
        assert!(mock.generate(step_request(&[])).await.is_err());
    }

    #[tokio::test]
    async fn extractor_defaults_to_empty_extraction() {
        let mock = MockTextExtractor::new();
        let extraction = mock
            .extract(ExtractionRequest {
                flattened_schema: IndexMap::new(),
                current_data: json!({}),
                missing_fields: Vec::new(),
                user_message: "hello".to_string(),
            })
            .await
            .unwrap();
        assert!(extraction.is_empty());
        assert_eq!(mock.call_count(), 1);
    }
}
