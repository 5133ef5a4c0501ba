//! Progress notification port
//!
//! Defines the interface for observing a streaming session as it runs.

use codeassist_domain::{ConversationId, StreamError};

/// Callback for progress updates during a send
///
/// Implementations live in the presentation layer (e.g. printing tokens to
/// the terminal as they arrive). All methods default to no-ops.
pub trait StreamProgressNotifier: Send + Sync {
    /// Called once the response body starts streaming.
    fn on_stream_start(&self, _conversation: &ConversationId) {}

    /// Called for each token, after it has been applied to the transcript.
    fn on_token(&self, _conversation: &ConversationId, _token: &str) {}

    /// Called when the session reaches Completed.
    fn on_completed(&self, _conversation: &ConversationId, _content: &str) {}

    /// Called when the session reaches Errored.
    fn on_error(&self, _conversation: &ConversationId, _error: &StreamError) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl StreamProgressNotifier for NoProgress {}
