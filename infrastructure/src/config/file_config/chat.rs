//! Request defaults from TOML (`[chat]` section)

use codeassist_domain::SendOptions;
use serde::{Deserialize, Serialize};

/// Raw chat configuration from TOML
///
/// Unset values are omitted from the request and the server's defaults apply.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileChatConfig {
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl FileChatConfig {
    pub fn to_send_options(&self) -> SendOptions {
        SendOptions {
            model_name: self.model.clone(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}
