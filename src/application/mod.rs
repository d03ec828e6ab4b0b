//! Application layer - the interview turn state machine.

mod orchestrator;

pub use orchestrator::{
    InterviewOrchestrator, OrchestratorError, StartOutcome, StatusOutcome, SubmitOutcome,
    SESSION_ERROR_KEY,
};
