//! HTTP handlers for the interview endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;

use crate::application::{InterviewOrchestrator, OrchestratorError};
use crate::domain::foundation::SessionId;
use crate::ports::SessionStore;

use super::dto::{
    ErrorResponse, StartRequest, StartResponse, StatusResponse, SubmitKind, SubmitRequest,
    SubmitResponse,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct InterviewHandlers {
    orchestrator: Arc<InterviewOrchestrator>,
    store: Arc<dyn SessionStore>,
}

impl InterviewHandlers {
    pub fn new(orchestrator: Arc<InterviewOrchestrator>, store: Arc<dyn SessionStore>) -> Self {
        Self {
            orchestrator,
            store,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/interview/start - Start an interview session
pub async fn start_interview(
    State(handlers): State<InterviewHandlers>,
    Json(request): Json<StartRequest>,
) -> Response {
    match handlers
        .orchestrator
        .start(request.schema, request.initial_data)
        .await
    {
        Ok(outcome) => {
            let response: StartResponse = outcome.into();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_orchestrator_error(e),
    }
}

/// POST /api/interview/:id/submit - Submit form data or a text message
pub async fn submit(
    State(handlers): State<InterviewHandlers>,
    Path(session_id): Path<String>,
    Json(request): Json<SubmitRequest>,
) -> Response {
    let Some(session_id) = parse_session_id(&session_id) else {
        return session_not_found();
    };

    // Existence pre-check so the transport can answer 404; the
    // orchestrator's own in-band handling covers non-HTTP callers.
    match handlers.store.get(&session_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return session_not_found(),
        Err(e) => return handle_orchestrator_error(e.into()),
    }

    let result = match request.kind {
        SubmitKind::Form => {
            handlers
                .orchestrator
                .submit_form(&session_id, request.data.unwrap_or_default())
                .await
        }
        SubmitKind::Message => {
            handlers
                .orchestrator
                .submit_message(&session_id, request.text.as_deref().unwrap_or_default())
                .await
        }
    };

    match result {
        Ok(outcome) => {
            let response: SubmitResponse = outcome.into();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_orchestrator_error(e),
    }
}

/// GET /api/interview/:id/status - Read current progress
pub async fn get_status(
    State(handlers): State<InterviewHandlers>,
    Path(session_id): Path<String>,
) -> Response {
    let Some(session_id) = parse_session_id(&session_id) else {
        return session_not_found();
    };

    match handlers.orchestrator.status(&session_id).await {
        Ok(outcome) => {
            let response: StatusResponse = outcome.into();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_orchestrator_error(e),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Error mapping
// ════════════════════════════════════════════════════════════════════════════

/// An unparseable id can never name a session, so it reads as absent
/// rather than as a client syntax error.
fn parse_session_id(raw: &str) -> Option<SessionId> {
    raw.parse::<SessionId>().ok()
}

fn session_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new("Session not found")),
    )
        .into_response()
}

fn handle_orchestrator_error(error: OrchestratorError) -> Response {
    match error {
        OrchestratorError::SessionNotFound { .. } => session_not_found(),
        OrchestratorError::Collaborator(e) => {
            error!(error = %e, "collaborator failure");
            (
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse::new(format!("Interview generation failed: {e}"))),
            )
                .into_response()
        }
        other => {
            error!(error = %other, "internal error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(format!("Internal server error: {other}"))),
            )
                .into_response()
        }
    }
}
