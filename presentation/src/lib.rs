//! Presentation layer for codeassist-chat
//!
//! This crate contains the CLI definition, the live token printer and the
//! interactive chat loop.

pub mod chat;
pub mod cli;
pub mod progress;

// Re-export commonly used types
pub use chat::{ChatRepl, ReplCommand};
pub use cli::commands::Cli;
pub use progress::stream_printer::StreamPrinter;
