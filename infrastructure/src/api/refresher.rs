//! Post-completion transcript refresh over HTTP

use super::client::ApiClient;
use super::error::parse_error_message;
use super::protocol::{ConversationDetail, MessageDto};
use async_trait::async_trait;
use codeassist_application::{RefreshError, TranscriptRefresher, TranscriptStore};
use codeassist_domain::{ConversationId, Message};
use reqwest::StatusCode;
use std::sync::Arc;
use tracing::debug;

/// Fetches the server's copy of a conversation and replaces the local
/// transcript with it.
pub struct HttpTranscriptRefresher {
    client: ApiClient,
    store: Arc<dyn TranscriptStore>,
}

impl HttpTranscriptRefresher {
    pub fn new(client: ApiClient, store: Arc<dyn TranscriptStore>) -> Self {
        Self { client, store }
    }

    async fn fetch(&self, conversation: &ConversationId) -> Result<Vec<Message>, RefreshError> {
        let url = self
            .client
            .endpoint()
            .conversation_url(conversation)
            .map_err(|e| RefreshError::RequestFailed(e.to_string()))?;
        let response = self
            .client
            .http()
            .get(url)
            .send()
            .await
            .map_err(|e| RefreshError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(RefreshError::NotFound(conversation.clone()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RefreshError::RequestFailed(parse_error_message(status, &body)));
        }

        let detail: ConversationDetail = response
            .json()
            .await
            .map_err(|e| RefreshError::InvalidPayload(e.to_string()))?;
        if detail.id != conversation.as_str() {
            return Err(RefreshError::InvalidPayload(format!(
                "expected conversation {}, got {}",
                conversation, detail.id
            )));
        }

        Ok(detail
            .messages
            .into_iter()
            .filter_map(MessageDto::into_message)
            .collect())
    }
}

#[async_trait]
impl TranscriptRefresher for HttpTranscriptRefresher {
    async fn refresh(&self, conversation: &ConversationId) -> Result<(), RefreshError> {
        let messages = self.fetch(conversation).await?;
        debug!(
            "Refreshed conversation {} ({} messages)",
            conversation,
            messages.len()
        );
        self.store.replace_messages(conversation, messages);
        Ok(())
    }
}
