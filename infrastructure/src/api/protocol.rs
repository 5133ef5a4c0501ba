//! Wire types for the conversation API

use chrono::{DateTime, NaiveDateTime, Utc};
use codeassist_application::ChatRequest;
use codeassist_domain::{Message, MessageId, Role};
use serde::{Deserialize, Serialize};

/// Body of `POST /conversations/{id}/messages`.
#[derive(Debug, Serialize)]
pub struct SendMessageBody<'a> {
    pub message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_name: Option<&'a str>,
    pub stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl<'a> From<&'a ChatRequest> for SendMessageBody<'a> {
    fn from(request: &'a ChatRequest) -> Self {
        Self {
            message: &request.message,
            model_name: request.options.model_name.as_deref(),
            stream: true,
            temperature: request.options.temperature,
            max_tokens: request.options.max_tokens,
        }
    }
}

/// Response of `GET /conversations/{id}`.
#[derive(Debug, Deserialize)]
pub struct ConversationDetail {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub messages: Vec<MessageDto>,
    #[serde(default)]
    pub model_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MessageDto {
    pub id: String,
    pub role: String,
    pub content: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub tokens: Option<u32>,
}

impl MessageDto {
    /// Convert to a domain message. Unknown roles yield `None`.
    pub fn into_message(self) -> Option<Message> {
        let role = match self.role.as_str() {
            "user" => Role::User,
            "assistant" => Role::Assistant,
            "system" => Role::System,
            _ => return None,
        };
        let created_at = self
            .timestamp
            .as_deref()
            .and_then(parse_timestamp)
            .unwrap_or_else(Utc::now);

        Some(Message {
            id: MessageId::new(self.id),
            role,
            content: self.content,
            created_at,
        })
    }
}

/// Accepts RFC 3339 as well as naive ISO-8601 (taken as UTC).
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}
