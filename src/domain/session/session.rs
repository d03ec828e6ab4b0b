//! Session entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{ConversationTurn, TurnRole};
use crate::domain::foundation::SessionId;
use crate::domain::schema::InterviewSchema;

/// The state of one running interview.
///
/// # Invariants
///
/// - `schema` is immutable for the lifetime of the session
/// - `conversation_history` is append-only
/// - `is_complete` is monotonic: once set, it is never cleared
///
/// # Ownership
///
/// Sessions are exclusively owned by the session store. The orchestrator
/// works on a copy for the duration of one turn and writes it back through
/// the store at the end; it never holds a session across turns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Unique identifier for this session.
    id: SessionId,

    /// The field schema this interview collects against.
    schema: InterviewSchema,

    /// Collected values; the single source of truth for the interview.
    current_data: Value,

    /// Everything said so far, in order.
    conversation_history: Vec<ConversationTurn>,

    /// Whether the interview has reached its terminal state.
    is_complete: bool,

    /// When the session was created.
    created_at: DateTime<Utc>,
}

impl Session {
    /// Creates a new active session with the given initial data.
    pub fn new(id: SessionId, schema: InterviewSchema, initial_data: Value) -> Self {
        Self {
            id,
            schema,
            current_data: initial_data,
            conversation_history: Vec::new(),
            is_complete: false,
            created_at: Utc::now(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────

    /// Returns the session ID.
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Returns the interview schema.
    pub fn schema(&self) -> &InterviewSchema {
        &self.schema
    }

    /// Returns the collected data tree.
    pub fn current_data(&self) -> &Value {
        &self.current_data
    }

    /// Returns the conversation history, oldest first.
    pub fn conversation_history(&self) -> &[ConversationTurn] {
        &self.conversation_history
    }

    /// Returns whether the interview has completed.
    pub fn is_complete(&self) -> bool {
        self.is_complete
    }

    /// Returns the creation timestamp.
    pub fn created_at(&self) -> &DateTime<Utc> {
        &self.created_at
    }

    // ─────────────────────────────────────────────────────────────────────
    // Mutators
    // ─────────────────────────────────────────────────────────────────────

    /// Replaces the collected data tree with an already-merged successor.
    pub fn replace_data(&mut self, data: Value) {
        self.current_data = data;
    }

    /// Appends a turn to the conversation history.
    pub fn push_turn(&mut self, turn: ConversationTurn) {
        self.conversation_history.push(turn);
    }

    /// Marks the interview complete. Monotonic: there is no way back.
    pub fn mark_complete(&mut self) {
        self.is_complete = true;
    }

    /// Count of turns recorded for a given role.
    pub fn turns_with_role(&self, role: TurnRole) -> usize {
        self.conversation_history
            .iter()
            .filter(|t| t.role == role)
            .count()
    }
}
