//! Conversation domain entities

use crate::core::ids::{ConversationId, MessageId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role of a message in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A message in a conversation (Entity)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub role: Role,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: MessageId::generate(),
            role,
            content: content.into(),
            created_at: Utc::now(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Empty assistant message that streamed tokens are written into.
    pub fn assistant_placeholder() -> Self {
        Self::assistant(String::new())
    }
}

/// Ordered messages of one conversation (Entity)
///
/// Insertion order is significant and preserved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    conversation_id: ConversationId,
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new(conversation_id: ConversationId) -> Self {
        Self {
            conversation_id,
            messages: Vec::new(),
        }
    }

    pub fn conversation_id(&self) -> &ConversationId {
        &self.conversation_id
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn get(&self, id: &MessageId) -> Option<&Message> {
        self.messages.iter().find(|m| &m.id == id)
    }

    /// Overwrite the content of a message. Returns `false` if no message has that id.
    pub fn set_content(&mut self, id: &MessageId, content: &str) -> bool {
        match self.messages.iter_mut().find(|m| &m.id == id) {
            Some(message) => {
                message.content.clear();
                message.content.push_str(content);
                true
            }
            None => false,
        }
    }

    /// Replace every message, e.g. with the authoritative server copy.
    pub fn replace_messages(&mut self, messages: Vec<Message>) {
        self.messages = messages;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Assistant).unwrap(), "\"assistant\"");
        let role: Role = serde_json::from_str("\"user\"").unwrap();
        assert_eq!(role, Role::User);
    }

    #[test]
    fn placeholder_is_empty_assistant_message() {
        let message = Message::assistant_placeholder();
        assert_eq!(message.role, Role::Assistant);
        assert_eq!(message.content, "");
    }

    #[test]
    fn transcript_preserves_insertion_order() {
        let mut transcript = Transcript::new(ConversationId::new("c1"));
        transcript.push(Message::user("first"));
        transcript.push(Message::assistant("second"));
        transcript.push(Message::user("third"));

        let contents: Vec<_> = transcript.messages().iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["first", "second", "third"]);
    }

    #[test]
    fn set_content_targets_single_message() {
        let mut transcript = Transcript::new(ConversationId::new("c1"));
        let user = Message::user("hi");
        let placeholder = Message::assistant_placeholder();
        let placeholder_id = placeholder.id.clone();
        transcript.push(user);
        transcript.push(placeholder);

        assert!(transcript.set_content(&placeholder_id, "Hello"));
        assert_eq!(transcript.get(&placeholder_id).unwrap().content, "Hello");
        assert_eq!(transcript.messages()[0].content, "hi");
        assert!(!transcript.set_content(&MessageId::new("missing"), "x"));
    }
}
