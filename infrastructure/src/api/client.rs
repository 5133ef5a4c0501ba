//! Shared HTTP client and endpoint layout

use codeassist_domain::ConversationId;
use reqwest::Url;
use std::time::Duration;
use thiserror::Error;

/// Default base URL of the inference service.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Default path prefix of the versioned API.
pub const DEFAULT_API_PREFIX: &str = "/api/v1";

/// Errors raised while building the HTTP client
#[derive(Error, Debug)]
pub enum ApiClientError {
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("invalid conversation id: {0:?}")]
    InvalidConversationId(String),

    #[error("failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}

/// Where the API lives and how to connect to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiEndpoint {
    pub base_url: String,
    pub api_prefix: String,
    pub connect_timeout: Duration,
    pub user_agent: String,
}

impl Default for ApiEndpoint {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            connect_timeout: Duration::from_secs(10),
            user_agent: default_user_agent(),
        }
    }
}

impl ApiEndpoint {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// `{base}{prefix}/conversations/{id}`
    ///
    /// The id is percent-encoded as a single path segment.
    pub fn conversation_url(&self, id: &ConversationId) -> Result<Url, ApiClientError> {
        let segment = id.as_str();
        if matches!(segment, "" | "." | "..") {
            return Err(ApiClientError::InvalidConversationId(segment.to_string()));
        }
        let mut url = self.api_root()?;
        url.path_segments_mut()
            .map_err(|_| self.invalid_base())?
            .push("conversations")
            .push(segment);
        Ok(url)
    }

    /// `{base}{prefix}/conversations/{id}/messages`
    pub fn messages_url(&self, id: &ConversationId) -> Result<Url, ApiClientError> {
        let mut url = self.conversation_url(id)?;
        url.path_segments_mut()
            .map_err(|_| self.invalid_base())?
            .push("messages");
        Ok(url)
    }

    fn api_root(&self) -> Result<Url, ApiClientError> {
        let base = self.base_url.trim();
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(self.invalid_base());
        }
        let mut url = Url::parse(base).map_err(|_| self.invalid_base())?;
        {
            let mut segments = url.path_segments_mut().map_err(|_| self.invalid_base())?;
            segments.pop_if_empty();
            segments.extend(
                self.api_prefix
                    .split('/')
                    .map(str::trim)
                    .filter(|s| !s.is_empty()),
            );
        }
        Ok(url)
    }

    fn invalid_base(&self) -> ApiClientError {
        ApiClientError::InvalidBaseUrl(self.base_url.clone())
    }
}

pub fn default_user_agent() -> String {
    format!("codeassist-chat/{}", env!("CARGO_PKG_VERSION"))
}

/// A pooled `reqwest::Client` bound to one [`ApiEndpoint`]. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    endpoint: ApiEndpoint,
}

impl ApiClient {
    pub fn new(endpoint: ApiEndpoint) -> Result<Self, ApiClientError> {
        endpoint.api_root()?;

        // No overall timeout: a streamed reply may legitimately run for minutes.
        let http = reqwest::Client::builder()
            .connect_timeout(endpoint.connect_timeout)
            .user_agent(endpoint.user_agent.clone())
            .build()?;

        Ok(Self { http, endpoint })
    }

    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub fn endpoint(&self) -> &ApiEndpoint {
        &self.endpoint
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_conversation_urls() {
        let endpoint = ApiEndpoint::new("http://localhost:8080/");
        let id = ConversationId::new("abc");
        assert_eq!(
            endpoint.conversation_url(&id).unwrap().as_str(),
            "http://localhost:8080/api/v1/conversations/abc"
        );
        assert_eq!(
            endpoint.messages_url(&id).unwrap().as_str(),
            "http://localhost:8080/api/v1/conversations/abc/messages"
        );
    }

    #[test]
    fn empty_prefix_is_allowed() {
        let endpoint = ApiEndpoint {
            api_prefix: "/".to_string(),
            ..ApiEndpoint::new("https://chat.example.com")
        };
        assert_eq!(
            endpoint
                .conversation_url(&ConversationId::new("x"))
                .unwrap()
                .as_str(),
            "https://chat.example.com/conversations/x"
        );
    }

    #[test]
    fn conversation_id_with_query_characters_stays_in_path() {
        let endpoint = ApiEndpoint::new("http://localhost:8080");
        let url = endpoint
            .messages_url(&ConversationId::new("abc?x=1#frag"))
            .unwrap();
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);
        assert_eq!(url.path(), "/api/v1/conversations/abc%3Fx=1%23frag/messages");
    }

    #[test]
    fn conversation_id_with_slashes_is_one_segment() {
        let endpoint = ApiEndpoint::new("http://localhost:8080");
        let url = endpoint
            .messages_url(&ConversationId::new("../models"))
            .unwrap();
        let segments: Vec<_> = url.path_segments().unwrap().collect();
        assert_eq!(
            segments,
            ["api", "v1", "conversations", "..%2Fmodels", "messages"]
        );
    }

    #[test]
    fn rejects_dot_segment_conversation_ids() {
        let endpoint = ApiEndpoint::default();
        for id in ["", ".", ".."] {
            let err = endpoint.conversation_url(&ConversationId::new(id)).unwrap_err();
            assert!(matches!(err, ApiClientError::InvalidConversationId(_)), "{id:?}");
        }
    }

    #[test]
    fn rejects_base_url_without_scheme() {
        let err = ApiClient::new(ApiEndpoint::new("localhost:8080")).unwrap_err();
        assert!(matches!(err, ApiClientError::InvalidBaseUrl(_)));
    }
}
