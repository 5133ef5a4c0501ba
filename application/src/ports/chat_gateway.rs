//! Chat gateway port
//!
//! Defines how the session controller opens a streaming response from the
//! inference service. The adapter is the transport reader: it classifies the
//! response before handing out a single byte.

use async_trait::async_trait;
use bytes::Bytes;
use codeassist_domain::{ConversationId, SendOptions, StreamError};
use futures::stream::BoxStream;

/// Raw response body chunks of arbitrary size.
///
/// The stream owns the underlying connection; dropping it releases the
/// connection whether or not the body was read to the end.
pub type ByteStream = BoxStream<'static, Result<Bytes, StreamError>>;

/// One send-message request.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub conversation_id: ConversationId,
    pub message: String,
    pub options: SendOptions,
}

impl ChatRequest {
    pub fn new(
        conversation_id: ConversationId,
        message: impl Into<String>,
        options: SendOptions,
    ) -> Self {
        Self {
            conversation_id,
            message: message.into(),
            options,
        }
    }
}

/// Gateway for streaming chat responses
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait ChatGateway: Send + Sync {
    /// Send `request` and return the response body as a byte stream.
    ///
    /// Fails with [`StreamError::Transport`] on connection failure or a
    /// non-success status, and with [`StreamError::Protocol`] when a success
    /// response carries no body.
    async fn open_stream(&self, request: &ChatRequest) -> Result<ByteStream, StreamError>;
}
