//! REPL (Read-Eval-Print Loop) for interactive chat

use crate::progress::stream_printer::StreamPrinter;
use codeassist_application::{
    SendMessageError, SendMessageInput, SendMessageOutput, SendMessageUseCase,
};
use codeassist_domain::util::preview;
use codeassist_domain::{ConversationId, SendOptions};
use colored::Colorize;
use std::io::{self, Write};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;

/// Slash commands understood by the REPL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Quit,
    Help,
    /// Resend the input of the last failed send
    Retry,
    Unknown(String),
}

impl ReplCommand {
    pub fn parse(line: &str) -> Self {
        match line.trim() {
            "/quit" | "/exit" | "/q" => ReplCommand::Quit,
            "/help" | "/h" | "/?" => ReplCommand::Help,
            "/retry" | "/r" => ReplCommand::Retry,
            other => ReplCommand::Unknown(other.to_string()),
        }
    }
}

/// Interactive chat bound to one conversation
pub struct ChatRepl {
    use_case: SendMessageUseCase,
    conversation_id: ConversationId,
    options: SendOptions,
    show_status: bool,
    last_failed: Option<String>,
}

impl ChatRepl {
    pub fn new(use_case: SendMessageUseCase, conversation_id: ConversationId) -> Self {
        Self {
            use_case,
            conversation_id,
            options: SendOptions::default(),
            show_status: true,
            last_failed: None,
        }
    }

    pub fn with_options(mut self, options: SendOptions) -> Self {
        self.options = options;
        self
    }

    /// Set whether to print prompts and status prefixes
    pub fn with_status(mut self, show: bool) -> Self {
        self.show_status = show;
        self
    }

    /// Input of the last send that failed, if it has not been retried yet.
    pub fn last_failed(&self) -> Option<&str> {
        self.last_failed.as_deref()
    }

    /// Run the interactive REPL on stdin
    pub async fn run(&mut self) -> io::Result<()> {
        self.run_with(BufReader::new(tokio::io::stdin())).await
    }

    /// Run the REPL reading lines from `reader` until EOF or `/quit`.
    pub async fn run_with<R: AsyncBufRead + Unpin>(&mut self, reader: R) -> io::Result<()> {
        if self.show_status {
            self.print_welcome();
        }
        let mut lines = reader.lines();

        loop {
            self.prompt();
            let line = tokio::select! {
                line = lines.next_line() => line?,
                _ = tokio::signal::ctrl_c() => {
                    println!("^C");
                    None
                }
            };
            let Some(line) = line else {
                println!("Bye!");
                break;
            };

            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if line.starts_with('/') {
                match ReplCommand::parse(line) {
                    ReplCommand::Quit => {
                        println!("Bye!");
                        break;
                    }
                    ReplCommand::Help => Self::print_help(),
                    ReplCommand::Retry => match self.last_failed.take() {
                        Some(input) => self.submit(input).await,
                        None => println!("Nothing to retry"),
                    },
                    ReplCommand::Unknown(cmd) => {
                        println!("Unknown command: {}", cmd);
                        println!("Type /help for available commands");
                    }
                }
                continue;
            }

            self.submit(line.to_string()).await;
        }

        Ok(())
    }

    /// Send one message, printing the reply as it streams.
    ///
    /// Ctrl-C while the reply streams cancels the send.
    pub async fn send(&self, message: String) -> Result<SendMessageOutput, SendMessageError> {
        let cancel = CancellationToken::new();
        let watcher = {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    cancel.cancel();
                }
            })
        };

        let input = SendMessageInput::new(self.conversation_id.clone(), message)
            .with_options(self.options.clone())
            .with_cancellation(cancel);
        let printer = StreamPrinter::stdout(self.show_status);
        let result = self.use_case.execute(input, &printer).await;
        watcher.abort();
        result
    }

    /// Print a failed send; returns the input worth retrying, if any.
    pub fn report_failure(error: &SendMessageError) -> Option<String> {
        match error {
            SendMessageError::Rejected(reason) => {
                eprintln!("{} {}", "Not sent:".yellow().bold(), reason);
                None
            }
            SendMessageError::Stream { .. } => {
                eprintln!("{} {}", "Error:".red().bold(), error);
                let original = error.original_input()?;
                eprintln!(
                    "Type /retry to send again: {}",
                    preview(original, 60).dimmed()
                );
                Some(original.to_string())
            }
        }
    }

    async fn submit(&mut self, message: String) {
        match self.send(message).await {
            Ok(_) => self.last_failed = None,
            Err(e) => {
                if let Some(original) = Self::report_failure(&e) {
                    self.last_failed = Some(original);
                }
            }
        }
        println!();
    }

    fn prompt(&self) {
        if self.show_status {
            print!("{} ", "you>".cyan().bold());
            let _ = io::stdout().flush();
        }
    }

    fn print_welcome(&self) {
        println!();
        println!("codeassist-chat - conversation {}", self.conversation_id);
        if let Some(model) = &self.options.model_name {
            println!("Model: {}", model);
        }
        println!("Type /help for commands, Ctrl-C stops a reply.");
        println!();
    }

    fn print_help() {
        println!();
        println!("Commands:");
        println!("  /help, /h, /?     - Show this help");
        println!("  /retry, /r        - Resend the last failed message");
        println!("  /quit, /exit, /q  - Exit chat");
        println!();
    }
}
