//! Token sequence production.
//!
//! - [`token_stream::TokenStream`] : lazy, single-pass tokens over a [`ByteStream`](crate::ports::chat_gateway::ByteStream)

pub mod token_stream;

pub use token_stream::TokenStream;
