//! InterviewOrchestrator - session lifecycle and turn transitions.
//!
//! A session moves from Active to Complete and never back. Each turn
//! (Start, SubmitForm, SubmitMessage) produces at most one state
//! transition and one persisted session update; GetStatus is a pure read.
//!
//! Data merges are gated on validation: a submission with errors leaves
//! `current_data` untouched, and collaborator failures abort the turn
//! before anything is written back to the store.

use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::domain::engine::{
    deep_merge, expand_bindings, flatten_schema, get_missing_fields, is_complete, validate_data,
    validate_field, value_matches_type, EngineError,
};
use crate::domain::foundation::SessionId;
use crate::domain::interview::UiBlock;
use crate::domain::schema::InterviewSchema;
use crate::domain::session::{ConversationTurn, Session};
use crate::ports::{
    CollaboratorError, ExtractionRequest, InterviewStepGenerator, SessionStore, StepRequest,
    StoreError, TextExtractor,
};

/// Reserved error key for problems not attributable to any field.
pub const SESSION_ERROR_KEY: &str = "_session";

const SESSION_NOT_FOUND_TEXT: &str = "Session not found.";
const ALREADY_COMPLETE_TEXT: &str = "All information has already been provided. Thank you!";
const FIX_ERRORS_TEXT: &str = "Please fix the errors below and try again.";
const FORM_COMPLETE_TEXT: &str =
    "Thank you! I have all the information I need. Here's a summary of what we collected.";
const MESSAGE_COMPLETE_TEXT: &str = "Thank you! I have all the information I need.";

/// Result of starting an interview.
#[derive(Debug, Clone)]
pub struct StartOutcome {
    pub session_id: SessionId,
    pub blocks: Vec<UiBlock>,
    pub is_complete: bool,
    pub current_data: Value,
}

/// Result of a form or message submission.
#[derive(Debug, Clone)]
pub struct SubmitOutcome {
    pub blocks: Vec<UiBlock>,
    pub is_complete: bool,
    pub current_data: Value,
    pub errors: IndexMap<String, Vec<String>>,
}

impl SubmitOutcome {
    /// The in-band result for a submission against an unknown session.
    ///
    /// Callers display it as a normal conversational message, so it is a
    /// response carrying an error under the reserved key rather than a
    /// hard failure.
    fn session_not_found() -> Self {
        let mut errors = IndexMap::new();
        errors.insert(
            SESSION_ERROR_KEY.to_string(),
            vec![SESSION_NOT_FOUND_TEXT.to_string()],
        );
        Self {
            blocks: vec![UiBlock::text(SESSION_NOT_FOUND_TEXT)],
            is_complete: false,
            current_data: Value::Object(Map::new()),
            errors,
        }
    }
}

/// Result of a status read.
#[derive(Debug, Clone)]
pub struct StatusOutcome {
    pub current_data: Value,
    pub is_complete: bool,
    pub missing_fields: Vec<String>,
}

/// Failures that escape a turn as hard errors.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("session '{id}' not found")]
    SessionNotFound { id: SessionId },

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Collaborator(#[from] CollaboratorError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("failed to encode turn content: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Owns session lifecycle and turn transitions.
///
/// Collaborators are injected capabilities; the orchestrator never
/// reaches for ambient state.
pub struct InterviewOrchestrator {
    store: Arc<dyn SessionStore>,
    step_generator: Arc<dyn InterviewStepGenerator>,
    text_extractor: Arc<dyn TextExtractor>,
}

impl InterviewOrchestrator {
    pub fn new(
        store: Arc<dyn SessionStore>,
        step_generator: Arc<dyn InterviewStepGenerator>,
        text_extractor: Arc<dyn TextExtractor>,
    ) -> Self {
        Self {
            store,
            step_generator,
            text_extractor,
        }
    }

    /// Starts a new interview session.
    ///
    /// If the initial data already satisfies the schema, the session goes
    /// straight to Complete and no content generation happens.
    pub async fn start(
        &self,
        schema: InterviewSchema,
        initial_data: Value,
    ) -> Result<StartOutcome, OrchestratorError> {
        let mut session = self.store.create(schema, initial_data).await?;

        if is_complete(session.schema(), session.current_data())? {
            session.mark_complete();
            self.store.update(&session).await?;
            return Ok(StartOutcome {
                session_id: *session.id(),
                blocks: vec![UiBlock::text(ALREADY_COMPLETE_TEXT)],
                is_complete: true,
                current_data: session.current_data().clone(),
            });
        }

        let blocks = self.generate_next_step(&session).await?;
        session.push_turn(ConversationTurn::assistant(serde_json::to_string(&blocks)?));
        self.store.update(&session).await?;

        Ok(StartOutcome {
            session_id: *session.id(),
            blocks,
            is_complete: false,
            current_data: session.current_data().clone(),
        })
    }

    /// Handles a structured form submission.
    ///
    /// The flat bindings are expanded, merged against a *preview* of the
    /// session data (so conditions see the full picture), and validated.
    /// Any error blocks the merge entirely; otherwise the preview is
    /// committed and the turn continues or completes.
    pub async fn submit_form(
        &self,
        session_id: &SessionId,
        submitted: Map<String, Value>,
    ) -> Result<SubmitOutcome, OrchestratorError> {
        let Some(mut session) = self.store.get(session_id).await? else {
            return Ok(SubmitOutcome::session_not_found());
        };

        let expanded = expand_bindings(&submitted).map_err(EngineError::from)?;
        let preview = deep_merge(session.current_data(), &expanded);
        let errors = validate_data(&submitted, session.schema(), &preview)?;

        if !errors.is_empty() {
            return Ok(SubmitOutcome {
                blocks: vec![UiBlock::text(FIX_ERRORS_TEXT)],
                is_complete: false,
                current_data: session.current_data().clone(),
                errors,
            });
        }

        session.replace_data(preview);
        session.push_turn(ConversationTurn::user(serde_json::to_string(
            &Value::Object(submitted),
        )?));

        self.finish_turn(session, FORM_COMPLETE_TEXT).await
    }

    /// Handles a free-text message.
    ///
    /// The extractor proposes flat `path -> value` pairs; only pairs that
    /// match their field's declared type and validate with zero errors
    /// are merged; the rest are dropped and re-asked structurally.
    /// Unlike the form path there is no whole-submission re-validation:
    /// each accepted value already passed its own field's rules.
    pub async fn submit_message(
        &self,
        session_id: &SessionId,
        text: &str,
    ) -> Result<SubmitOutcome, OrchestratorError> {
        let Some(mut session) = self.store.get(session_id).await? else {
            return Ok(SubmitOutcome::session_not_found());
        };

        let missing = get_missing_fields(session.schema(), session.current_data())?;
        let flattened = flatten_schema(session.schema());

        let extraction = self
            .text_extractor
            .extract(ExtractionRequest {
                flattened_schema: flattened.clone(),
                current_data: session.current_data().clone(),
                missing_fields: missing,
                user_message: text.to_string(),
            })
            .await?;

        if !extraction.extracted.is_empty() {
            let mut accepted = Map::new();
            for (path, value) in &extraction.extracted {
                let Some(field) = flattened.get(path) else {
                    continue;
                };
                // Shape first, rules second: numeric rules no-op on a
                // string, so type conformance is its own gate.
                if value_matches_type(value, field.field_type)
                    && validate_field(value, field)?.is_empty()
                {
                    accepted.insert(path.clone(), value.clone());
                }
            }

            if !accepted.is_empty() {
                let expanded = expand_bindings(&accepted).map_err(EngineError::from)?;
                let merged = deep_merge(session.current_data(), &expanded);
                session.replace_data(merged);
            }
        }

        session.push_turn(ConversationTurn::user(text));
        if !extraction.extracted.is_empty() {
            session.push_turn(ConversationTurn::system(format!(
                "Extracted from message: {}",
                serde_json::to_string(&Value::Object(extraction.extracted.clone()))?
            )));
        }

        self.finish_turn(session, MESSAGE_COMPLETE_TEXT).await
    }

    /// Pure status read: no state transition, no side effects.
    ///
    /// Completeness and missing fields are recomputed from the latest
    /// data, never read from the stored flag.
    pub async fn status(&self, session_id: &SessionId) -> Result<StatusOutcome, OrchestratorError> {
        let session = self
            .store
            .get(session_id)
            .await?
            .ok_or(OrchestratorError::SessionNotFound { id: *session_id })?;

        Ok(StatusOutcome {
            current_data: session.current_data().clone(),
            is_complete: is_complete(session.schema(), session.current_data())?,
            missing_fields: get_missing_fields(session.schema(), session.current_data())?,
        })
    }

    /// Shared tail of both submission paths: complete the session or
    /// generate the next step, then persist.
    async fn finish_turn(
        &self,
        mut session: Session,
        terminal_text: &str,
    ) -> Result<SubmitOutcome, OrchestratorError> {
        if is_complete(session.schema(), session.current_data())? {
            session.mark_complete();
            self.store.update(&session).await?;
            return Ok(SubmitOutcome {
                blocks: vec![UiBlock::text(terminal_text)],
                is_complete: true,
                current_data: session.current_data().clone(),
                errors: IndexMap::new(),
            });
        }

        let blocks = self.generate_next_step(&session).await?;
        session.push_turn(ConversationTurn::assistant(serde_json::to_string(&blocks)?));
        self.store.update(&session).await?;

        Ok(SubmitOutcome {
            blocks,
            is_complete: false,
            current_data: session.current_data().clone(),
            errors: IndexMap::new(),
        })
    }

    async fn generate_next_step(
        &self,
        session: &Session,
    ) -> Result<Vec<UiBlock>, OrchestratorError> {
        let request = StepRequest {
            flattened_schema: flatten_schema(session.schema()),
            current_data: session.current_data().clone(),
            missing_fields: get_missing_fields(session.schema(), session.current_data())?,
            conversation_history: session.conversation_history().to_vec(),
        };
        Ok(self.step_generator.generate(request).await?)
    }
}
