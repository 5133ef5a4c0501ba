//! Lazy token sequence over a raw response body.
//!
//! [`TokenStream`] pairs one [`ByteStream`] with one [`FrameDecoder`] and
//! exposes the decoded tokens as a [`Stream`]. Each pull either yields the
//! next token, ends the sequence, or surfaces the transport error; while no
//! complete frame is buffered, a pull stays pending on the byte source.
//!
//! The sequence is single-pass and fused. The byte source is dropped, and
//! with it the connection, as soon as the stream ends or fails, or when the
//! `TokenStream` itself is dropped before that.

use crate::ports::chat_gateway::ByteStream;
use codeassist_domain::{FrameDecoder, FrameEvent, StreamError};
use futures::stream::{FusedStream, Stream, StreamExt};
use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{Context, Poll};
use tracing::{debug, trace};

pub struct TokenStream {
    source: Option<ByteStream>,
    decoder: FrameDecoder,
    ready: VecDeque<String>,
    terminated: bool,
}

impl TokenStream {
    pub fn new(source: ByteStream) -> Self {
        Self {
            source: Some(source),
            decoder: FrameDecoder::new(),
            ready: VecDeque::new(),
            terminated: false,
        }
    }

    /// Pull the next token.
    pub async fn next_token(&mut self) -> Option<Result<String, StreamError>> {
        self.next().await
    }

    /// `true` while the byte source is still held.
    pub fn holds_source(&self) -> bool {
        self.source.is_some()
    }

    fn release(&mut self) {
        if self.source.take().is_some() {
            debug!("Token stream released byte source");
        }
    }

    fn absorb(&mut self, events: Vec<FrameEvent>) {
        for event in events {
            match event {
                FrameEvent::Token(token) => self.ready.push_back(token),
                FrameEvent::Done => {
                    debug!(
                        "Token stream reached end ({})",
                        if self.decoder.saw_sentinel() {
                            "sentinel"
                        } else {
                            "source closed"
                        }
                    );
                    self.release();
                }
            }
        }
    }
}

impl Stream for TokenStream {
    type Item = Result<String, StreamError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        loop {
            if let Some(token) = this.ready.pop_front() {
                trace!("Token stream yielded {} bytes", token.len());
                return Poll::Ready(Some(Ok(token)));
            }
            if this.terminated {
                return Poll::Ready(None);
            }

            let Some(source) = this.source.as_mut() else {
                this.terminated = true;
                return Poll::Ready(None);
            };

            match source.as_mut().poll_next(cx) {
                Poll::Pending => return Poll::Pending,
                Poll::Ready(Some(Ok(chunk))) => {
                    let events = this.decoder.feed(&chunk);
                    this.absorb(events);
                }
                Poll::Ready(Some(Err(error))) => {
                    debug!("Token stream failed: {}", error);
                    this.release();
                    this.terminated = true;
                    return Poll::Ready(Some(Err(error)));
                }
                Poll::Ready(None) => {
                    let events = this.decoder.finish();
                    this.absorb(events);
                }
            }
        }
    }
}

impl FusedStream for TokenStream {
    fn is_terminated(&self) -> bool {
        self.terminated
    }
}

impl std::fmt::Debug for TokenStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenStream")
            .field("holds_source", &self.source.is_some())
            .field("ready", &self.ready.len())
            .field("terminated", &self.terminated)
            .finish()
    }
}
