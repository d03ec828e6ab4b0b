//! HTTP transport - axum routes, handlers, and wire DTOs.

pub mod dto;
mod handlers;
mod routes;

pub use handlers::InterviewHandlers;
pub use routes::interview_routes;
