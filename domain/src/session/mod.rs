//! Stream session domain.
//!
//! - [`entities::StreamSession`] : the state of one in-flight send
//! - [`entities::SessionStatus`] : Sending → Streaming → Completed | Errored

pub mod entities;
