//! Configuration file loading for codeassist-chat
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. Environment: `CODEASSIST_<SECTION>__<KEY>` (e.g. `CODEASSIST_API__BASE_URL`)
//! 2. `--config <path>` specified file
//! 3. Project root: `./codeassist.toml` or `./.codeassist.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/codeassist-chat/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{ConfigIssue, FileApiConfig, FileChatConfig, FileConfig, FileLoggingConfig};
pub use loader::{ConfigError, ConfigLoader};
