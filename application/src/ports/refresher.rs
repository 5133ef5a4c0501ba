//! Transcript refresh port
//!
//! After a session completes, the server's stored copy of the conversation is
//! authoritative: it may differ from the locally accumulated tokens
//! (normalization, token accounting). A refresher re-fetches it.

use async_trait::async_trait;
use codeassist_domain::ConversationId;
use thiserror::Error;

/// Errors that can occur while refreshing a transcript
#[derive(Error, Debug)]
pub enum RefreshError {
    #[error("Refresh request failed: {0}")]
    RequestFailed(String),

    #[error("Conversation not found: {0}")]
    NotFound(ConversationId),

    #[error("Invalid conversation payload: {0}")]
    InvalidPayload(String),
}

/// Invalidation hook invoked when a session reaches Completed.
#[async_trait]
pub trait TranscriptRefresher: Send + Sync {
    async fn refresh(&self, conversation: &ConversationId) -> Result<(), RefreshError>;
}

/// Keeps the locally accumulated transcript as is.
pub struct NoRefresh;

#[async_trait]
impl TranscriptRefresher for NoRefresh {
    async fn refresh(&self, _conversation: &ConversationId) -> Result<(), RefreshError> {
        Ok(())
    }
}
