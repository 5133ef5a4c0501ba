//! Transcript store port
//!
//! The store holds the live transcript and per-conversation streaming state
//! that the UI observes. While a session is active, the session controller is
//! the only writer of its assistant placeholder and streaming indicator.

use codeassist_domain::{ConversationId, Message, MessageId, StreamError};

/// Shared, observable transcript state.
///
/// Methods are synchronous: every update is a plain state mutation and must
/// not suspend the session between two tokens.
pub trait TranscriptStore: Send + Sync {
    /// Append a message at the end of the conversation's transcript.
    fn append_message(&self, conversation: &ConversationId, message: Message);

    /// Replace the full content of one message.
    fn set_message_content(&self, conversation: &ConversationId, id: &MessageId, content: &str);

    /// Set the "is streaming" indicator for a conversation.
    fn set_streaming(&self, conversation: &ConversationId, streaming: bool);

    /// Record or clear the last session error for a conversation.
    fn set_session_error(&self, conversation: &ConversationId, error: Option<StreamError>);

    /// Current value of the "is streaming" indicator.
    fn is_streaming(&self, conversation: &ConversationId) -> bool;

    /// Replace the transcript with authoritative data (used by refreshers).
    fn replace_messages(&self, conversation: &ConversationId, messages: Vec<Message>);
}
