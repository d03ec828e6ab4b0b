//! In-memory session store.
//!
//! The default keyed store: sessions live in a process-local map and do
//! not survive restarts. Reads hand out clones, so a turn works on its own
//! copy and nothing is visible to other callers until `update` writes the
//! session back.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::foundation::SessionId;
use crate::domain::schema::InterviewSchema;
use crate::domain::session::Session;
use crate::ports::{SessionStore, StoreError};

/// Process-local session store keyed by session id.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<SessionId, Session>>,
}

impl InMemorySessionStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sessions currently held.
    pub fn len(&self) -> usize {
        self.sessions.read().expect("session store lock poisoned").len()
    }

    /// True when no sessions are held.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create(
        &self,
        schema: InterviewSchema,
        initial_data: Value,
    ) -> Result<Session, StoreError> {
        let session = Session::new(SessionId::new(), schema, initial_data);
        self.sessions
            .write()
            .expect("session store lock poisoned")
            .insert(*session.id(), session.clone());
        Ok(session)
    }

    async fn get(&self, id: &SessionId) -> Result<Option<Session>, StoreError> {
        Ok(self
            .sessions
            .read()
            .expect("session store lock poisoned")
            .get(id)
            .cloned())
    }

    async fn update(&self, session: &Session) -> Result<(), StoreError> {
        self.sessions
            .write()
            .expect("session store lock poisoned")
            .insert(*session.id(), session.clone());
        Ok(())
    }
}
