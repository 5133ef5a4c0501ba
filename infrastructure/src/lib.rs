//! Infrastructure layer for codeassist-chat
//!
//! This crate contains adapters that implement the ports defined in the
//! application layer: the HTTP transport and refresher, the in-memory
//! transcript store, the JSONL conversation logger, and configuration file
//! loading.

pub mod api;
pub mod config;
pub mod logging;
pub mod store;

// Re-export commonly used types
pub use api::{
    ApiClient, ApiClientError, ApiEndpoint, HttpChatGateway, HttpTranscriptRefresher,
    ResponseBody,
};
pub use config::{ConfigError, ConfigIssue, ConfigLoader, FileConfig};
pub use logging::JsonlConversationLogger;
pub use store::InMemoryTranscriptStore;
