//! Session registry: binds each conversation to one backend session.
//!
//! Sessions are created lazily on the first send and reused afterwards.
//! The persona instruction only matters at creation time; asking again with
//! a different persona returns the cached session unchanged. Sessions are
//! never expired automatically; `evict` and `clear` are explicit.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use chat_types::{ChatError, Result};
use crate::ports::{ChatBackend, ChatSession};

pub struct SessionRegistry {
    backend: RefCell<Rc<dyn ChatBackend>>,
    sessions: RefCell<HashMap<String, Rc<dyn ChatSession>>>,
}

impl SessionRegistry {
    pub fn new(backend: Rc<dyn ChatBackend>) -> Self {
        Self {
            backend: RefCell::new(backend),
            sessions: RefCell::new(HashMap::new()),
        }
    }

    /// Get the cached session for `conversation_id`, or create one
    /// configured with `persona`.
    pub async fn get_session(
        &self,
        conversation_id: &str,
        persona: &str,
    ) -> Result<Rc<dyn ChatSession>> {
        let cached = self.sessions.borrow().get(conversation_id).cloned();
        if let Some(session) = cached {
            return Ok(session);
        }

        let backend = self.backend();
        let session = backend
            .create_session(persona)
            .await
            .map_err(|e| match e {
                ChatError::Session(_) => e,
                other => ChatError::Session(format!("{}: {}", conversation_id, other)),
            })?;
        log::info!("Created backend session for {}", conversation_id);

        // Another caller may have won the race while we were awaiting.
        let session = self
            .sessions
            .borrow_mut()
            .entry(conversation_id.to_string())
            .or_insert(session)
            .clone();
        Ok(session)
    }

    /// Backend used for new sessions and one-shot requests
    pub fn backend(&self) -> Rc<dyn ChatBackend> {
        self.backend.borrow().clone()
    }

    /// Swap the backend. Already cached sessions are kept as they are.
    pub fn set_backend(&self, backend: Rc<dyn ChatBackend>) {
        *self.backend.borrow_mut() = backend;
    }

    pub fn contains(&self, conversation_id: &str) -> bool {
        self.sessions.borrow().contains_key(conversation_id)
    }

    pub fn len(&self) -> usize {
        self.sessions.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.borrow().is_empty()
    }

    /// Drop the session bound to a conversation. The next send creates a
    /// fresh one, picking up the current persona.
    pub fn evict(&self, conversation_id: &str) -> bool {
        self.sessions.borrow_mut().remove(conversation_id).is_some()
    }

    pub fn clear(&self) {
        self.sessions.borrow_mut().clear();
    }
}
