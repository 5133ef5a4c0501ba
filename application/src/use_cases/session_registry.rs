//! Per-conversation session registry.
//!
//! Enforces that at most one send is in Sending or Streaming per
//! conversation. A [`SessionClaim`] is the proof of ownership; dropping it
//! frees the conversation for the next send.

use codeassist_domain::ConversationId;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// Conversations that currently have an active session.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    active: Mutex<HashSet<ConversationId>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `conversation` if no other session holds it.
    ///
    /// Check and insert happen under one lock, so two racing sends cannot
    /// both succeed.
    pub fn try_claim(self: &Arc<Self>, conversation: &ConversationId) -> Option<SessionClaim> {
        if !self.lock().insert(conversation.clone()) {
            return None;
        }
        debug!("Session claimed for conversation {}", conversation);
        Some(SessionClaim {
            registry: Arc::clone(self),
            conversation_id: conversation.clone(),
        })
    }

    pub fn is_active(&self, conversation: &ConversationId) -> bool {
        self.lock().contains(conversation)
    }

    fn release(&self, conversation: &ConversationId) {
        self.lock().remove(conversation);
        debug!("Session released for conversation {}", conversation);
    }

    fn lock(&self) -> MutexGuard<'_, HashSet<ConversationId>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Exclusive hold on one conversation's session slot.
#[derive(Debug)]
pub struct SessionClaim {
    registry: Arc<SessionRegistry>,
    conversation_id: ConversationId,
}

impl SessionClaim {
    pub fn conversation_id(&self) -> &ConversationId {
        &self.conversation_id
    }
}

impl Drop for SessionClaim {
    fn drop(&mut self) {
        self.registry.release(&self.conversation_id);
    }
}
