//! HTTP adapters for the inference service
//!
//! - [`HttpChatGateway`]: transport reader for the streaming send-message
//!   endpoint ([`ChatGateway`](codeassist_application::ChatGateway))
//! - [`HttpTranscriptRefresher`]: re-fetches a conversation after a session
//!   completes ([`TranscriptRefresher`](codeassist_application::TranscriptRefresher))
//!
//! Both share one [`ApiClient`] (connection pool + endpoint layout).

pub mod client;
pub mod error;
pub mod gateway;
pub mod protocol;
pub mod refresher;

#[cfg(test)]
pub(crate) mod test_server;

pub use client::{ApiClient, ApiClientError, ApiEndpoint};
pub use gateway::{HttpChatGateway, ResponseBody};
pub use refresher::HttpTranscriptRefresher;
