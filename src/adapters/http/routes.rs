//! HTTP routes for the interview endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{get_status, start_interview, submit, InterviewHandlers};

/// Creates the interview router with all endpoints.
///
/// Mount it under `/api/interview`.
pub fn interview_routes(handlers: InterviewHandlers) -> Router {
    Router::new()
        .route("/start", post(start_interview))
        .route("/:id/submit", post(submit))
        .route("/:id/status", get(get_status))
        .with_state(handlers)
}
