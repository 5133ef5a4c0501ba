//! CLI entrypoint for codeassist-chat
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use codeassist_application::{SendMessageUseCase, TranscriptStore};
use codeassist_domain::ConversationId;
use codeassist_infrastructure::{
    ApiClient, ConfigLoader, FileConfig, HttpChatGateway, HttpTranscriptRefresher,
    InMemoryTranscriptStore, JsonlConversationLogger,
};
use codeassist_presentation::{ChatRepl, Cli};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(ExitCode::SUCCESS);
    }

    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())?
    };
    apply_cli_overrides(&mut config, &cli);
    ConfigLoader::validate(&config)?;

    let Some(conversation_id) = cli.conversation_id.as_deref().map(ConversationId::new) else {
        bail!("A conversation id is required.");
    };

    info!("Starting codeassist-chat against {}", config.api.base_url);

    // === Dependency Injection ===
    let client = ApiClient::new(config.api.to_endpoint()).context("creating HTTP client")?;
    let store = Arc::new(InMemoryTranscriptStore::new());
    let mut use_case = SendMessageUseCase::new(
        Arc::new(HttpChatGateway::new(client.clone())),
        store.clone() as Arc<dyn TranscriptStore>,
    );

    if !cli.no_refresh {
        use_case = use_case.with_refresher(Arc::new(HttpTranscriptRefresher::new(
            client,
            store.clone(),
        )));
    }

    if let Some(path) = &config.logging.conversation_log {
        match JsonlConversationLogger::open(path) {
            Ok(logger) => {
                info!("Logging conversation events to {}", logger.path().display());
                use_case = use_case.with_conversation_logger(Arc::new(logger));
            }
            Err(e) => warn!("Conversation log {} disabled: {}", path.display(), e),
        }
    }

    let mut repl = ChatRepl::new(use_case, conversation_id)
        .with_options(config.chat.to_send_options())
        .with_status(!cli.quiet);

    match cli.message {
        Some(message) => match repl.send(message).await {
            Ok(_) => Ok(ExitCode::SUCCESS),
            Err(e) => {
                ChatRepl::report_failure(&e);
                Ok(ExitCode::FAILURE)
            }
        },
        None => {
            repl.run().await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn apply_cli_overrides(config: &mut FileConfig, cli: &Cli) {
    if let Some(base_url) = &cli.base_url {
        config.api.base_url = base_url.clone();
    }
    if let Some(model) = &cli.model {
        config.chat.model = Some(model.clone());
    }
    if let Some(temperature) = cli.temperature {
        config.chat.temperature = Some(temperature);
    }
    if let Some(max_tokens) = cli.max_tokens {
        config.chat.max_tokens = Some(max_tokens);
    }
}
