//! Prints tokens to the terminal as they are applied.

use codeassist_application::StreamProgressNotifier;
use codeassist_domain::{ConversationId, StreamError};
use colored::Colorize;
use std::io::{self, Stdout, Write};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

/// [`StreamProgressNotifier`] writing each token straight to `W`.
///
/// With `show_status`, a colored `assistant>` prefix is written when the
/// reply starts streaming.
pub struct StreamPrinter<W: Write + Send = Stdout> {
    out: Mutex<W>,
    show_status: bool,
    line_open: AtomicBool,
}

impl StreamPrinter<Stdout> {
    pub fn stdout(show_status: bool) -> Self {
        Self::new(io::stdout(), show_status)
    }
}

impl<W: Write + Send> StreamPrinter<W> {
    pub fn new(out: W, show_status: bool) -> Self {
        Self {
            out: Mutex::new(out),
            show_status,
            line_open: AtomicBool::new(false),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
            .into_inner()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn write(&self, text: &str) {
        if let Ok(mut out) = self.out.lock() {
            let _ = out.write_all(text.as_bytes());
            let _ = out.flush();
        }
    }

    fn end_line(&self) {
        if self.line_open.swap(false, Ordering::SeqCst) {
            self.write("\n");
        }
    }
}

impl<W: Write + Send> StreamProgressNotifier for StreamPrinter<W> {
    fn on_stream_start(&self, _conversation: &ConversationId) {
        if self.show_status {
            self.write(&format!("{} ", "assistant>".green().bold()));
            self.line_open.store(true, Ordering::SeqCst);
        }
    }

    fn on_token(&self, _conversation: &ConversationId, token: &str) {
        self.write(token);
        self.line_open.store(true, Ordering::SeqCst);
    }

    fn on_completed(&self, _conversation: &ConversationId, _content: &str) {
        self.end_line();
    }

    fn on_error(&self, _conversation: &ConversationId, _error: &StreamError) {
        self.end_line();
    }
}
