//! Application layer for codeassist-chat
//!
//! This crate contains the stream session controller, the token stream that
//! turns raw response bytes into tokens, and the port definitions adapters
//! implement. It depends only on the domain layer.

pub mod ports;
pub mod stream;
pub mod use_cases;

// Re-export commonly used types
pub use ports::{
    chat_gateway::{ByteStream, ChatGateway, ChatRequest},
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    progress::{NoProgress, StreamProgressNotifier},
    refresher::{NoRefresh, RefreshError, TranscriptRefresher},
    transcript_store::TranscriptStore,
};
pub use stream::TokenStream;
pub use use_cases::send_message::{
    RejectReason, SendMessageError, SendMessageInput, SendMessageOutput, SendMessageUseCase,
};
pub use use_cases::session_registry::{SessionClaim, SessionRegistry};
