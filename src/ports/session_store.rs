//! Session store port.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::domain::foundation::SessionId;
use crate::domain::schema::InterviewSchema;
use crate::domain::session::Session;

/// Keyed store owning all sessions.
///
/// The store's id-generation strategy and persistence medium are opaque to
/// the engine. The read-merge-write sequence of a turn is not atomic
/// across this boundary, so deployments that allow concurrent turns on
/// one session must serialize access per id.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Creates and persists a new session.
    async fn create(
        &self,
        schema: InterviewSchema,
        initial_data: Value,
    ) -> Result<Session, StoreError>;

    /// Fetches a session by id. `None` when absent.
    async fn get(&self, id: &SessionId) -> Result<Option<Session>, StoreError>;

    /// Writes a session back at the end of a turn.
    async fn update(&self, session: &Session) -> Result<(), StoreError>;
}

/// Failures of the backing store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("session store unavailable: {0}")]
    Unavailable(String),

    #[error("stored session could not be decoded: {0}")]
    Corrupt(String),
}
