//! Conversation domain.
//!
//! - [`entities::Message`]: a single message within a transcript
//! - [`entities::Transcript`]: the ordered messages of one conversation
//! - [`options::SendOptions`]: per-send model parameters

pub mod entities;
pub mod options;
