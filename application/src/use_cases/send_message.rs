//! Send Message use case.
//!
//! Drives one send-message exchange for one conversation:
//!
//! ```text
//! Idle ──accept──▶ Sending ──body──▶ Streaming ──end──▶ Completed
//!                     │                  │ ▲
//!                     │                  └─┘ token
//!                     └──────error───────┴──────────▶ Errored
//! ```
//!
//! 1. Validate input and claim the conversation (no I/O yet)
//! 2. Append the user message and an empty assistant placeholder
//! 3. Open the response stream via [`ChatGateway`]
//! 4. Apply every token to the placeholder, in arrival order
//! 5. On end-of-stream, clear streaming state and refresh the transcript
//!
//! The placeholder is never removed; on failure it keeps whatever content
//! arrived before the error.

use crate::ports::chat_gateway::{ChatGateway, ChatRequest};
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::progress::StreamProgressNotifier;
use crate::ports::refresher::{NoRefresh, TranscriptRefresher};
use crate::ports::transcript_store::TranscriptStore;
use crate::stream::TokenStream;
use crate::use_cases::session_registry::{SessionClaim, SessionRegistry};
use codeassist_domain::util::preview;
use codeassist_domain::{
    ConversationId, MAX_MESSAGE_CHARS, Message, MessageId, SendOptions, SessionTransitionError,
    StreamError, StreamSession,
};
use futures::StreamExt;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

/// Why a send was refused before anything was appended.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    #[error("message is empty")]
    EmptyMessage,

    #[error("message exceeds {max} characters")]
    MessageTooLong { max: usize },

    #[error("no conversation selected")]
    MissingConversation,

    #[error("conversation {0} already has a response in progress")]
    AlreadyStreaming(ConversationId),

    #[error("invalid options: {0}")]
    InvalidOptions(String),
}

/// Errors returned by [`SendMessageUseCase::execute`].
#[derive(Error, Debug)]
pub enum SendMessageError {
    /// Precondition failed; the transcript was not touched.
    #[error("Send rejected: {0}")]
    Rejected(#[from] RejectReason),

    /// The session reached Errored.
    ///
    /// `original_input` is the submitted text, for the caller to offer
    /// re-submission.
    #[error("{error}")]
    Stream {
        error: StreamError,
        original_input: String,
    },
}

impl SendMessageError {
    pub fn stream_error(&self) -> Option<&StreamError> {
        match self {
            SendMessageError::Stream { error, .. } => Some(error),
            SendMessageError::Rejected(_) => None,
        }
    }

    pub fn original_input(&self) -> Option<&str> {
        match self {
            SendMessageError::Stream { original_input, .. } => Some(original_input),
            SendMessageError::Rejected(_) => None,
        }
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, SendMessageError::Rejected(_))
    }
}

/// Input for the [`SendMessageUseCase`].
#[derive(Debug, Clone)]
pub struct SendMessageInput {
    pub conversation_id: ConversationId,
    pub message: String,
    pub options: SendOptions,
    /// Cancelling this token abandons the session with [`StreamError::Cancelled`].
    pub cancellation: Option<CancellationToken>,
}

impl SendMessageInput {
    pub fn new(conversation_id: impl Into<ConversationId>, message: impl Into<String>) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            message: message.into(),
            options: SendOptions::default(),
            cancellation: None,
        }
    }

    pub fn with_options(mut self, options: SendOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }
}

/// Result of a Completed session.
#[derive(Debug, Clone, PartialEq)]
pub struct SendMessageOutput {
    pub conversation_id: ConversationId,
    pub user_message_id: MessageId,
    pub assistant_message_id: MessageId,
    /// Locally accumulated content. After a successful refresh the store
    /// holds the server's copy, which takes precedence.
    pub content: String,
    pub token_count: usize,
    /// Whether the refresh hook succeeded.
    pub refreshed: bool,
}

/// Use case for sending a message and streaming the reply into the transcript.
///
/// Sends to different conversations run independently; clones share the
/// same [`SessionRegistry`].
pub struct SendMessageUseCase {
    gateway: Arc<dyn ChatGateway>,
    store: Arc<dyn TranscriptStore>,
    refresher: Arc<dyn TranscriptRefresher>,
    registry: Arc<SessionRegistry>,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl Clone for SendMessageUseCase {
    fn clone(&self) -> Self {
        Self {
            gateway: self.gateway.clone(),
            store: self.store.clone(),
            refresher: self.refresher.clone(),
            registry: self.registry.clone(),
            conversation_logger: self.conversation_logger.clone(),
        }
    }
}

impl SendMessageUseCase {
    pub fn new(gateway: Arc<dyn ChatGateway>, store: Arc<dyn TranscriptStore>) -> Self {
        Self {
            gateway,
            store,
            refresher: Arc::new(NoRefresh),
            registry: Arc::new(SessionRegistry::new()),
            conversation_logger: Arc::new(NoConversationLogger),
        }
    }

    /// Create with a refresher invoked on completion.
    pub fn with_refresher(mut self, refresher: Arc<dyn TranscriptRefresher>) -> Self {
        self.refresher = refresher;
        self
    }

    /// Create with a conversation logger.
    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    /// Share a registry with other controllers writing the same store.
    pub fn with_registry(mut self, registry: Arc<SessionRegistry>) -> Self {
        self.registry = registry;
        self
    }

    pub fn registry(&self) -> &Arc<SessionRegistry> {
        &self.registry
    }

    /// Run one exchange to a terminal state.
    ///
    /// Dropping the returned future before it resolves abandons the session:
    /// the byte source is released, the streaming indicator cleared and a
    /// [`StreamError::Cancelled`] recorded in the store.
    pub async fn execute(
        &self,
        input: SendMessageInput,
        progress: &dyn StreamProgressNotifier,
    ) -> Result<SendMessageOutput, SendMessageError> {
        let claim = self.accept(&input)?;
        let SendMessageInput {
            conversation_id,
            message,
            options,
            cancellation,
        } = input;

        let mut session = StreamSession::new(conversation_id.clone());
        let user = Message::user(message.clone());
        let user_message_id = user.id.clone();
        let placeholder = Message::assistant_placeholder();
        let assistant_message_id = placeholder.id.clone();

        self.store.append_message(&conversation_id, user);
        self.store.append_message(&conversation_id, placeholder);
        let mut guard = StreamingGuard::new(Arc::clone(&self.store), claim);

        info!(
            "Send accepted for conversation {}: {}",
            conversation_id,
            preview(&message, 80)
        );
        self.conversation_logger.log(ConversationEvent::new(
            "send_accepted",
            serde_json::json!({
                "conversation_id": conversation_id.as_str(),
                "user_message_id": user_message_id.as_str(),
                "assistant_message_id": assistant_message_id.as_str(),
                "message": message,
                "model": options.model_name.as_deref(),
            }),
        ));

        let request = ChatRequest::new(conversation_id.clone(), message.clone(), options);
        let cancel = cancellation.unwrap_or_default();

        let outcome = self
            .stream_into_transcript(
                &request,
                &mut session,
                &assistant_message_id,
                &guard,
                &cancel,
                progress,
            )
            .await;

        match outcome {
            Ok(()) => {
                if let Err(e) = session.complete() {
                    warn!("Session for {} could not complete: {}", conversation_id, e);
                }
                guard.settle(None);
                info!(
                    "Session completed for conversation {} ({} tokens, {} bytes)",
                    conversation_id,
                    session.token_count(),
                    session.buffer().len()
                );
                progress.on_completed(&conversation_id, session.buffer());
                self.conversation_logger.log(ConversationEvent::new(
                    "stream_completed",
                    serde_json::json!({
                        "conversation_id": conversation_id.as_str(),
                        "assistant_message_id": assistant_message_id.as_str(),
                        "token_count": session.token_count(),
                        "content": session.buffer(),
                    }),
                ));

                // The claim is held through the refresh so a new send cannot
                // append messages that the refreshed transcript would drop.
                let refreshed = match self.refresher.refresh(&conversation_id).await {
                    Ok(()) => true,
                    Err(e) => {
                        warn!("Transcript refresh failed for {}: {}", conversation_id, e);
                        false
                    }
                };
                drop(guard);

                Ok(SendMessageOutput {
                    conversation_id,
                    user_message_id,
                    assistant_message_id,
                    content: session.buffer().to_string(),
                    token_count: session.token_count(),
                    refreshed,
                })
            }
            Err(error) => {
                warn!(
                    "Session errored for conversation {} after {} tokens: {}",
                    conversation_id,
                    session.token_count(),
                    error
                );
                if let Err(e) = session.fail(error.clone()) {
                    warn!("Session for {} could not fail: {}", conversation_id, e);
                }
                guard.settle(Some(error.clone()));
                progress.on_error(&conversation_id, &error);
                self.conversation_logger.log(ConversationEvent::new(
                    "stream_errored",
                    serde_json::json!({
                        "conversation_id": conversation_id.as_str(),
                        "assistant_message_id": assistant_message_id.as_str(),
                        "token_count": session.token_count(),
                        "partial_content": session.buffer(),
                        "error": error.to_string(),
                        "status": error.status(),
                    }),
                ));

                Err(SendMessageError::Stream {
                    error,
                    original_input: message,
                })
            }
        }
    }

    /// Idle → Sending preconditions. Runs without suspending.
    fn accept(&self, input: &SendMessageInput) -> Result<SessionClaim, RejectReason> {
        if input.message.trim().is_empty() {
            return Err(RejectReason::EmptyMessage);
        }
        if input.message.chars().count() > MAX_MESSAGE_CHARS {
            return Err(RejectReason::MessageTooLong {
                max: MAX_MESSAGE_CHARS,
            });
        }
        if input.conversation_id.is_blank() {
            return Err(RejectReason::MissingConversation);
        }
        input
            .options
            .validate()
            .map_err(RejectReason::InvalidOptions)?;

        if self.store.is_streaming(&input.conversation_id) {
            debug!(
                "Rejecting send: store reports {} streaming",
                input.conversation_id
            );
            return Err(RejectReason::AlreadyStreaming(input.conversation_id.clone()));
        }
        self.registry
            .try_claim(&input.conversation_id)
            .ok_or_else(|| RejectReason::AlreadyStreaming(input.conversation_id.clone()))
    }

    /// Sending → Streaming → (end of stream | error).
    async fn stream_into_transcript(
        &self,
        request: &ChatRequest,
        session: &mut StreamSession,
        assistant_message_id: &MessageId,
        guard: &StreamingGuard,
        cancel: &CancellationToken,
        progress: &dyn StreamProgressNotifier,
    ) -> Result<(), StreamError> {
        let conversation_id = &request.conversation_id;

        let body = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(StreamError::Cancelled),
            opened = self.gateway.open_stream(request) => opened?,
        };

        let mut tokens = TokenStream::new(body);
        session.begin_streaming().map_err(invariant_violation)?;
        guard.mark_streaming();
        debug!("Streaming response for conversation {}", conversation_id);
        progress.on_stream_start(conversation_id);

        loop {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(StreamError::Cancelled),
                next = tokens.next() => next,
            };

            match next {
                Some(Ok(token)) => {
                    let content = session.push_token(&token).map_err(invariant_violation)?;
                    self.store
                        .set_message_content(conversation_id, assistant_message_id, content);
                    trace!(
                        "Applied token #{} ({} bytes) to {}",
                        session.token_count(),
                        token.len(),
                        conversation_id
                    );
                    progress.on_token(conversation_id, &token);
                }
                Some(Err(error)) => return Err(error),
                None => return Ok(()),
            }
        }
    }
}

fn invariant_violation(error: SessionTransitionError) -> StreamError {
    StreamError::Protocol(error.to_string())
}

/// Owns the streaming indicator and the registry claim for one session.
///
/// [`settle`](Self::settle) clears the indicator and records the outcome at
/// most once; if the session is dropped unsettled, `Drop` settles it as
/// cancelled.
struct StreamingGuard {
    store: Arc<dyn TranscriptStore>,
    claim: SessionClaim,
    settled: bool,
}

impl StreamingGuard {
    fn new(store: Arc<dyn TranscriptStore>, claim: SessionClaim) -> Self {
        Self {
            store,
            claim,
            settled: false,
        }
    }

    fn mark_streaming(&self) {
        self.store.set_streaming(self.claim.conversation_id(), true);
    }

    fn settle(&mut self, error: Option<StreamError>) {
        if self.settled {
            return;
        }
        self.settled = true;
        let conversation_id = self.claim.conversation_id();
        self.store.set_streaming(conversation_id, false);
        self.store.set_session_error(conversation_id, error);
    }
}

impl Drop for StreamingGuard {
    fn drop(&mut self) {
        if !self.settled {
            warn!(
                "Session for conversation {} abandoned before completion",
                self.claim.conversation_id()
            );
            self.settle(Some(StreamError::Cancelled));
        }
    }
}
