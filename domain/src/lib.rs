//! Domain layer for codeassist-chat
//!
//! This crate contains the transcript entities, the stream session state
//! machine and the wire frame decoder. It has no I/O and no dependencies on
//! infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! - **Transcript**: the ordered [`Message`]s of one conversation
//! - **Stream session**: one send-message exchange, moving through
//!   Sending → Streaming → Completed | Errored exactly once
//! - **Frame**: one `\n`-terminated `data:` line of the response body; the
//!   payload `[DONE]` ends the stream

pub mod conversation;
pub mod core;
pub mod session;
pub mod stream;
pub mod util;

// Re-export commonly used types
pub use conversation::{
    entities::{Message, Role, Transcript},
    options::{MAX_MESSAGE_CHARS, MAX_TOKENS_LIMIT, SendOptions},
};
pub use core::{
    error::StreamError,
    ids::{ConversationId, MessageId},
};
pub use session::entities::{SessionStatus, SessionTransitionError, StreamSession};
pub use stream::{FrameDecoder, FrameEvent, Utf8Carry};
