//! API connection configuration from TOML (`[api]` section)

use crate::api::client::{ApiEndpoint, DEFAULT_API_PREFIX, DEFAULT_BASE_URL, default_user_agent};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw API configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileApiConfig {
    /// Base URL of the inference service
    pub base_url: String,
    /// Path prefix of the versioned API
    pub api_prefix: String,
    /// TCP connect timeout in seconds
    pub connect_timeout_secs: u64,
    /// User-Agent header override
    pub user_agent: Option<String>,
}

impl Default for FileApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            connect_timeout_secs: 10,
            user_agent: None,
        }
    }
}

impl FileApiConfig {
    pub fn to_endpoint(&self) -> ApiEndpoint {
        ApiEndpoint {
            base_url: self.base_url.clone(),
            api_prefix: self.api_prefix.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            user_agent: self.user_agent.clone().unwrap_or_else(default_user_agent),
        }
    }
}
