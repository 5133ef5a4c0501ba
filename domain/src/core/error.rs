//! Domain error types

use thiserror::Error;

/// Failure of a streaming exchange.
///
/// Decode-level problems never show up here: malformed bytes and unexpected
/// frames are absorbed by the [`FrameDecoder`](crate::stream::FrameDecoder).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StreamError {
    /// Connection failure or non-success HTTP status.
    ///
    /// `status` is `None` when no response was received at all.
    #[error("{message}")]
    Transport {
        status: Option<u16>,
        message: String,
    },

    /// Success status but no body available to stream.
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// The consumer abandoned the session before completion.
    #[error("Stream cancelled")]
    Cancelled,
}

impl StreamError {
    pub fn transport(message: impl Into<String>) -> Self {
        StreamError::Transport {
            status: None,
            message: message.into(),
        }
    }

    pub fn http_status(status: u16, message: impl Into<String>) -> Self {
        StreamError::Transport {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Check if this error represents a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, StreamError::Cancelled)
    }

    /// HTTP status code, if the failure came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            StreamError::Transport { status, .. } => *status,
            _ => None,
        }
    }
}
