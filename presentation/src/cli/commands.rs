//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for codeassist-chat
#[derive(Parser, Debug)]
#[command(name = "codeassist-chat")]
#[command(author, version, about = "Stream chat replies from a local code assistant")]
#[command(long_about = r#"
codeassist-chat sends a message to a conversation on a code assistant
server and prints the reply as it streams in.

Without MESSAGE, an interactive session starts: each line you type is sent
to the conversation. Press Ctrl-C to stop a reply mid-stream.

Configuration files are loaded from (in priority order):
1. CODEASSIST_* environment variables (e.g. CODEASSIST_API__BASE_URL)
2. --config <path>          Explicit config file
3. ./codeassist.toml        Project-level config
4. ~/.config/codeassist-chat/config.toml   Global config

Example:
  codeassist-chat 3f2a9c "Explain this borrow checker error"
  codeassist-chat 3f2a9c --model phi-3.5-mini --temperature 0.2
"#)]
pub struct Cli {
    /// Conversation to send to
    #[arg(required_unless_present = "show_config")]
    pub conversation_id: Option<String>,

    /// Message to send (omit for interactive mode)
    pub message: Option<String>,

    /// Model to answer with (server default if unset)
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Sampling temperature (0.0 - 2.0)
    #[arg(short, long, value_name = "TEMP")]
    pub temperature: Option<f32>,

    /// Upper bound on generated tokens (1 - 4096)
    #[arg(long, value_name = "N")]
    pub max_tokens: Option<u32>,

    /// Server base URL, e.g. http://localhost:8080
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Keep the locally streamed reply instead of re-fetching the conversation
    #[arg(long)]
    pub no_refresh: bool,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Print only the reply text
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}
