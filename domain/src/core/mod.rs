//! Core domain concepts shared across all subdomains.
//!
//! - [`ids::ConversationId`] / [`ids::MessageId`] : typed identifiers
//! - [`error::StreamError`] : the streaming failure taxonomy

pub mod error;
pub mod ids;
