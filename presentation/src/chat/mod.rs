//! Interactive chat session

mod repl;

pub use repl::{ChatRepl, ReplCommand};
