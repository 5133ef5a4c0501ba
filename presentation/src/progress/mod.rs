//! Live output of streaming sessions

pub mod stream_printer;
