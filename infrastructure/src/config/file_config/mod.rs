//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted to domain/adapter types on
//! demand.

mod api;
mod chat;
mod logging;

pub use api::FileApiConfig;
pub use chat::FileChatConfig;
pub use logging::FileLoggingConfig;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Inference service connection
    pub api: FileApiConfig,
    /// Request defaults
    pub chat: FileChatConfig,
    /// Conversation event log
    pub logging: FileLoggingConfig,
}

/// One problem found by [`FileConfig::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        let base = self.api.base_url.trim();
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            issues.push(ConfigIssue {
                field: "api.base_url",
                message: format!("'{}' must start with http:// or https://", self.api.base_url),
            });
        }
        if self.api.connect_timeout_secs == 0 {
            issues.push(ConfigIssue {
                field: "api.connect_timeout_secs",
                message: "cannot be 0".to_string(),
            });
        }
        if let Err(message) = self.chat.to_send_options().validate() {
            issues.push(ConfigIssue {
                field: "chat",
                message,
            });
        }

        issues
    }
}
