//! Wire-level stream decoding.
//!
//! - [`decoder::FrameDecoder`]: bytes → `data:` frames → [`decoder::FrameEvent`]s
//! - [`utf8::Utf8Carry`]: lossy UTF-8 decoding across chunk boundaries

pub mod decoder;
pub mod utf8;

pub use decoder::{DATA_PREFIX, DONE_SENTINEL, FrameDecoder, FrameEvent};
pub use utf8::Utf8Carry;
