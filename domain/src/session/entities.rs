//! Stream session entities

use crate::core::error::StreamError;
use crate::core::ids::ConversationId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lifecycle status of a [`StreamSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Accepted; waiting for the response to arrive.
    Sending,
    /// Response body is being decoded and applied.
    Streaming,
    Completed,
    Errored,
}

impl SessionStatus {
    /// Sending or Streaming.
    pub fn is_active(self) -> bool {
        matches!(self, SessionStatus::Sending | SessionStatus::Streaming)
    }

    pub fn is_terminal(self) -> bool {
        !self.is_active()
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SessionStatus::Sending => "sending",
            SessionStatus::Streaming => "streaming",
            SessionStatus::Completed => "completed",
            SessionStatus::Errored => "errored",
        };
        f.write_str(s)
    }
}

/// Attempted a transition the session state machine does not allow.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid session transition: {from} -> {to}")]
pub struct SessionTransitionError {
    pub from: SessionStatus,
    pub to: SessionStatus,
}

/// One send-message exchange for one conversation (Entity)
///
/// Created in [`Sending`](SessionStatus::Sending), discarded once terminal.
/// The buffer only grows, and only while [`Streaming`](SessionStatus::Streaming).
#[derive(Debug, Clone)]
pub struct StreamSession {
    conversation_id: ConversationId,
    status: SessionStatus,
    buffer: String,
    token_count: usize,
    last_error: Option<StreamError>,
}

impl StreamSession {
    pub fn new(conversation_id: ConversationId) -> Self {
        Self {
            conversation_id,
            status: SessionStatus::Sending,
            buffer: String::new(),
            token_count: 0,
            last_error: None,
        }
    }

    pub fn conversation_id(&self) -> &ConversationId {
        &self.conversation_id
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// Concatenation of every token applied so far.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn token_count(&self) -> usize {
        self.token_count
    }

    pub fn last_error(&self) -> Option<&StreamError> {
        self.last_error.as_ref()
    }

    /// Sending → Streaming.
    pub fn begin_streaming(&mut self) -> Result<(), SessionTransitionError> {
        self.transition(SessionStatus::Sending, SessionStatus::Streaming)
    }

    /// Append a token and return the full accumulated content.
    pub fn push_token(&mut self, token: &str) -> Result<&str, SessionTransitionError> {
        if self.status != SessionStatus::Streaming {
            return Err(SessionTransitionError {
                from: self.status,
                to: SessionStatus::Streaming,
            });
        }
        self.buffer.push_str(token);
        self.token_count += 1;
        Ok(&self.buffer)
    }

    /// Streaming → Completed.
    pub fn complete(&mut self) -> Result<(), SessionTransitionError> {
        self.transition(SessionStatus::Streaming, SessionStatus::Completed)?;
        self.last_error = None;
        Ok(())
    }

    /// Sending | Streaming → Errored. The buffer is left as is.
    pub fn fail(&mut self, error: StreamError) -> Result<(), SessionTransitionError> {
        if !self.status.is_active() {
            return Err(SessionTransitionError {
                from: self.status,
                to: SessionStatus::Errored,
            });
        }
        self.status = SessionStatus::Errored;
        self.last_error = Some(error);
        Ok(())
    }

    fn transition(
        &mut self,
        expected: SessionStatus,
        to: SessionStatus,
    ) -> Result<(), SessionTransitionError> {
        if self.status != expected {
            return Err(SessionTransitionError {
                from: self.status,
                to,
            });
        }
        self.status = to;
        Ok(())
    }
}
