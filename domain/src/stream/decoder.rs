//! Line-oriented `data:` frame decoder.
//!
//! The response body is a sequence of `\n`-terminated lines. Lines starting
//! with [`DATA_PREFIX`] carry a payload; every other line is ignored. The
//! payload [`DONE_SENTINEL`] ends the logical stream.
//!
//! ```
//! use codeassist_domain::stream::{FrameDecoder, FrameEvent};
//!
//! let mut decoder = FrameDecoder::new();
//! let mut events = decoder.feed(b"data: Hel");
//! events.extend(decoder.feed(b"lo\ndata: [DONE]\n"));
//! assert_eq!(
//!     events,
//!     vec![FrameEvent::Token("Hello".to_string()), FrameEvent::Done]
//! );
//! ```

use super::utf8::Utf8Carry;

/// Prefix of a payload-carrying line.
pub const DATA_PREFIX: &str = "data: ";

/// Payload that marks explicit end-of-stream.
pub const DONE_SENTINEL: &str = "[DONE]";

/// Output of the [`FrameDecoder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameEvent {
    /// One payload, in encounter order.
    Token(String),
    /// End of the logical stream, explicit (sentinel) or implicit (source ended).
    Done,
}

/// Incremental decoder from raw byte chunks to [`FrameEvent`]s.
///
/// Chunk boundaries are arbitrary: a line, the prefix, or a multi-byte
/// character may be split anywhere. After [`FrameEvent::Done`] has been
/// produced, all further input is discarded.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    utf8: Utf8Carry,
    buffer: String,
    done: bool,
    saw_sentinel: bool,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk and drain every event its complete lines produce.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<FrameEvent> {
        if self.done {
            return Vec::new();
        }
        self.utf8.decode(chunk, &mut self.buffer);
        self.drain_lines()
    }

    /// Signal that the byte source ended.
    ///
    /// Yields [`FrameEvent::Done`] unless the sentinel was already seen. An
    /// unterminated trailing line is not a frame and is dropped.
    pub fn finish(&mut self) -> Vec<FrameEvent> {
        if self.done {
            return Vec::new();
        }
        self.done = true;
        self.buffer.clear();
        self.utf8 = Utf8Carry::new();
        vec![FrameEvent::Done]
    }

    /// `true` once [`FrameEvent::Done`] has been produced.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// `true` if the stream ended on the sentinel rather than on source end.
    pub fn saw_sentinel(&self) -> bool {
        self.saw_sentinel
    }

    /// Bytes and characters held back waiting for a line terminator.
    pub fn pending_len(&self) -> usize {
        self.buffer.len() + self.utf8.pending_len()
    }

    fn drain_lines(&mut self) -> Vec<FrameEvent> {
        let mut events = Vec::new();
        let mut consumed = 0;

        while let Some(offset) = self.buffer[consumed..].find('\n') {
            let line_end = consumed + offset;
            let event = parse_line(&self.buffer[consumed..line_end]);
            consumed = line_end + 1;

            match event {
                Some(FrameEvent::Done) => {
                    self.done = true;
                    self.saw_sentinel = true;
                    self.buffer.clear();
                    self.utf8 = Utf8Carry::new();
                    events.push(FrameEvent::Done);
                    return events;
                }
                Some(token) => events.push(token),
                None => {}
            }
        }

        self.buffer.drain(..consumed);
        events
    }
}

/// Interpret one complete line (without its `\n`).
///
/// Only the line terminator is stripped from a token payload: leading spaces
/// inside the payload are part of the token (`"data:  World"` → `" World"`).
fn parse_line(line: &str) -> Option<FrameEvent> {
    let payload = line.strip_prefix(DATA_PREFIX)?;
    let payload = payload.strip_suffix('\r').unwrap_or(payload);

    if payload.trim() == DONE_SENTINEL {
        return Some(FrameEvent::Done);
    }
    if payload.is_empty() {
        return None;
    }
    Some(FrameEvent::Token(payload.to_string()))
}
