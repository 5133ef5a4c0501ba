//! Transport reader for the streaming send-message endpoint

use super::client::ApiClient;
use super::error::parse_error_message;
use super::protocol::SendMessageBody;
use async_trait::async_trait;
use bytes::Bytes;
use codeassist_application::{ByteStream, ChatGateway, ChatRequest};
use codeassist_domain::{ConversationId, StreamError};
use futures::stream::{BoxStream, Stream, StreamExt};
use reqwest::StatusCode;
use std::pin::Pin;
use std::task::{Context, Poll};
use tracing::{debug, warn};

/// [`ChatGateway`] over HTTP.
///
/// Classifies the response before handing out a single byte:
/// non-success statuses become [`StreamError::Transport`] carrying the
/// server's message, a success without a body becomes
/// [`StreamError::Protocol`].
#[derive(Debug, Clone)]
pub struct HttpChatGateway {
    client: ApiClient,
}

impl HttpChatGateway {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ChatGateway for HttpChatGateway {
    async fn open_stream(&self, request: &ChatRequest) -> Result<ByteStream, StreamError> {
        let url = self
            .client
            .endpoint()
            .messages_url(&request.conversation_id)
            .map_err(|e| StreamError::transport(e.to_string()))?;
        debug!("POST {}", url);

        let response = self
            .client
            .http()
            .post(url.clone())
            .header(reqwest::header::ACCEPT, "text/event-stream")
            .json(&SendMessageBody::from(request))
            .send()
            .await
            .map_err(|e| {
                warn!("Request to {} failed: {}", url, e);
                StreamError::transport(format!("Connection failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = parse_error_message(status, &body);
            debug!("Response rejected with HTTP {}: {}", status.as_u16(), message);
            return Err(StreamError::http_status(status.as_u16(), message));
        }

        if status == StatusCode::NO_CONTENT || response.content_length() == Some(0) {
            debug!("Response HTTP {} carries no body", status.as_u16());
            return Err(StreamError::Protocol(format!(
                "HTTP {} response has no body to stream",
                status.as_u16()
            )));
        }

        debug!(
            "Streaming response body for conversation {} (HTTP {})",
            request.conversation_id,
            status.as_u16()
        );
        Ok(ResponseBody::new(request.conversation_id.clone(), response.bytes_stream().boxed()).boxed())
    }
}

/// Exclusive owner of one response body.
///
/// Chunk read failures surface as [`StreamError::Transport`]. Dropping the
/// body releases the connection.
pub struct ResponseBody {
    conversation_id: ConversationId,
    inner: BoxStream<'static, reqwest::Result<Bytes>>,
    bytes_read: usize,
}

impl ResponseBody {
    fn new(
        conversation_id: ConversationId,
        inner: BoxStream<'static, reqwest::Result<Bytes>>,
    ) -> Self {
        Self {
            conversation_id,
            inner,
            bytes_read: 0,
        }
    }
}

impl Stream for ResponseBody {
    type Item = Result<Bytes, StreamError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        match self.inner.as_mut().poll_next(cx) {
            Poll::Ready(Some(Ok(chunk))) => {
                self.bytes_read += chunk.len();
                Poll::Ready(Some(Ok(chunk)))
            }
            Poll::Ready(Some(Err(e))) => Poll::Ready(Some(Err(StreamError::transport(format!(
                "Stream interrupted: {}",
                e
            ))))),
            Poll::Ready(None) => Poll::Ready(None),
            Poll::Pending => Poll::Pending,
        }
    }
}

impl Drop for ResponseBody {
    fn drop(&mut self) {
        debug!(
            "Released response body for conversation {} after {} bytes",
            self.conversation_id, self.bytes_read
        );
    }
}
