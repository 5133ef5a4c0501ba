//! Process-local transcript store.

use codeassist_application::TranscriptStore;
use codeassist_domain::{ConversationId, Message, MessageId, StreamError, Transcript};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::warn;

#[derive(Debug)]
struct ConversationState {
    transcript: Transcript,
    streaming: bool,
    last_error: Option<StreamError>,
}

impl ConversationState {
    fn new(conversation_id: ConversationId) -> Self {
        Self {
            transcript: Transcript::new(conversation_id),
            streaming: false,
            last_error: None,
        }
    }
}

/// [`TranscriptStore`] backed by a `RwLock<HashMap>`.
///
/// Readers get snapshots; conversations are created on first write.
#[derive(Debug, Default)]
pub struct InMemoryTranscriptStore {
    conversations: RwLock<HashMap<ConversationId, ConversationState>>,
}

impl InMemoryTranscriptStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of a conversation's transcript (empty if unknown).
    pub fn transcript(&self, conversation: &ConversationId) -> Transcript {
        self.read()
            .get(conversation)
            .map(|state| state.transcript.clone())
            .unwrap_or_else(|| Transcript::new(conversation.clone()))
    }

    pub fn last_error(&self, conversation: &ConversationId) -> Option<StreamError> {
        self.read()
            .get(conversation)
            .and_then(|state| state.last_error.clone())
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<ConversationId, ConversationState>> {
        self.conversations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<ConversationId, ConversationState>> {
        self.conversations
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn with_state<R>(
        &self,
        conversation: &ConversationId,
        f: impl FnOnce(&mut ConversationState) -> R,
    ) -> R {
        let mut conversations = self.write();
        let state = conversations
            .entry(conversation.clone())
            .or_insert_with(|| ConversationState::new(conversation.clone()));
        f(state)
    }
}

impl TranscriptStore for InMemoryTranscriptStore {
    fn append_message(&self, conversation: &ConversationId, message: Message) {
        self.with_state(conversation, |state| state.transcript.push(message));
    }

    fn set_message_content(&self, conversation: &ConversationId, id: &MessageId, content: &str) {
        let found = self.with_state(conversation, |state| {
            state.transcript.set_content(id, content)
        });
        if !found {
            warn!("Message {} not found in conversation {}", id, conversation);
        }
    }

    fn set_streaming(&self, conversation: &ConversationId, streaming: bool) {
        self.with_state(conversation, |state| state.streaming = streaming);
    }

    fn set_session_error(&self, conversation: &ConversationId, error: Option<StreamError>) {
        self.with_state(conversation, |state| state.last_error = error);
    }

    fn is_streaming(&self, conversation: &ConversationId) -> bool {
        self.read()
            .get(conversation)
            .is_some_and(|state| state.streaming)
    }

    fn replace_messages(&self, conversation: &ConversationId, messages: Vec<Message>) {
        self.with_state(conversation, |state| {
            state.transcript.replace_messages(messages)
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_conversation_is_empty_and_idle() {
        let store = InMemoryTranscriptStore::new();
        let conv = ConversationId::new("nope");
        assert!(store.transcript(&conv).is_empty());
        assert!(!store.is_streaming(&conv));
        assert_eq!(store.last_error(&conv), None);
    }

    #[test]
    fn updates_placeholder_in_place() {
        let store = InMemoryTranscriptStore::new();
        let conv = ConversationId::new("c1");
        let placeholder = Message::assistant_placeholder();
        let id = placeholder.id.clone();

        store.append_message(&conv, Message::user("hi"));
        store.append_message(&conv, placeholder);
        store.set_message_content(&conv, &id, "Hel");
        store.set_message_content(&conv, &id, "Hello");

        let transcript = store.transcript(&conv);
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript.get(&id).unwrap().content, "Hello");
    }

    #[test]
    fn conversations_are_isolated() {
        let store = InMemoryTranscriptStore::new();
        let a = ConversationId::new("a");
        let b = ConversationId::new("b");

        store.append_message(&a, Message::user("to a"));
        store.set_streaming(&a, true);
        store.set_session_error(&b, Some(StreamError::Cancelled));

        assert!(store.is_streaming(&a));
        assert!(!store.is_streaming(&b));
        assert_eq!(store.transcript(&b).len(), 0);
        assert_eq!(store.last_error(&a), None);
        assert_eq!(store.last_error(&b), Some(StreamError::Cancelled));
    }

    #[test]
    fn replace_keeps_streaming_state() {
        let store = InMemoryTranscriptStore::new();
        let conv = ConversationId::new("c1");
        store.append_message(&conv, Message::user("local"));
        store.set_streaming(&conv, true);

        store.replace_messages(&conv, vec![Message::user("server"), Message::assistant("ok")]);

        let transcript = store.transcript(&conv);
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript.messages()[0].content, "server");
        assert!(store.is_streaming(&conv));
    }
}
