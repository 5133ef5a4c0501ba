//! Structured conversation logging.
//!
//! [`JsonlConversationLogger`] appends session events to a JSONL file and
//! implements the [`ConversationLogger`](codeassist_application::ConversationLogger) port.

mod jsonl_logger;

pub use jsonl_logger::JsonlConversationLogger;
